/// Cell semantics for the room grid.
///
/// Two ways a cell becomes walkable, depending on where the grid came from:
///   - image-derived: brightness above the walk threshold (light = open floor)
///   - hand-authored: the character itself is open floor (` `, `.`, `:`)
///
/// Both rules live here so the loaders never hard-code them.

/// Brightness ramp, darkest to lightest.
pub const RAMP: &[u8; 10] = b"@%#*+=-:. ";

/// Brightness used to pad short rows (reads as open floor).
pub const PAD_BRIGHTNESS: u8 = 255;

/// Default cutoff: brightness strictly above this is walkable.
pub const WALK_THRESHOLD: u8 = 160;

/// Map a luminance value to its ramp character.
#[inline]
pub fn ramp_char(brightness: u8) -> char {
    let idx = brightness as usize * (RAMP.len() - 1) / 255;
    RAMP[idx] as char
}

/// Is a pixel of this brightness open floor?
#[inline]
pub fn is_open_brightness(brightness: u8, threshold: u8) -> bool {
    brightness > threshold
}

/// Is this layout character open floor?
#[inline]
pub fn is_open_char(ch: char) -> bool {
    matches!(ch, ' ' | '.' | ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints() {
        assert_eq!(ramp_char(0), '@');
        assert_eq!(ramp_char(255), ' ');
    }

    #[test]
    fn ramp_uses_floor_division() {
        // 28 * 9 / 255 = 0.98 -> '@'; 29 * 9 / 255 = 1.02 -> '%'
        assert_eq!(ramp_char(28), '@');
        assert_eq!(ramp_char(29), '%');
        assert_eq!(ramp_char(254), '.');
    }

    #[test]
    fn ramp_is_monotonic() {
        let mut last = 0usize;
        for b in 0..=255u8 {
            let idx = RAMP.iter().position(|&c| c as char == ramp_char(b)).unwrap();
            assert!(idx >= last);
            last = idx;
        }
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!is_open_brightness(160, WALK_THRESHOLD));
        assert!(is_open_brightness(161, WALK_THRESHOLD));
        assert!(is_open_brightness(PAD_BRIGHTNESS, WALK_THRESHOLD));
    }

    #[test]
    fn open_chars() {
        assert!(is_open_char(' '));
        assert!(is_open_char('.'));
        assert!(is_open_char(':'));
        assert!(!is_open_char('|'));
        assert!(!is_open_char('T'));
        assert!(!is_open_char('_'));
    }
}
