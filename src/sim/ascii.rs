/// Image-to-ASCII converter.
///
/// Pipeline:
///   1. Decode and convert to single-channel luminance
///   2. Resize to `width` columns and a height corrected for the tall
///      aspect of terminal cells (`vertical_scale`)
///   3. Map each pixel through the brightness ramp
///
/// The brightness of every cell is kept next to its character so the world
/// can derive walkability from the real luminance, not the ramp glyph.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::GrayImage;
use log::{debug, info};

use crate::domain::tile;
use crate::error::{GameError, Result};

/// Shortest grid the converter will produce.
const MIN_HEIGHT: u32 = 10;
/// Columns kept free beside the image when sizing to the terminal.
const TERMINAL_MARGIN: u16 = 4;
/// Terminal size assumed when it cannot be queried.
pub const DEFAULT_TERMINAL: (u16, u16) = (120, 40);

/// Converted image: display lines plus per-cell brightness, same shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiArt {
    pub lines: Vec<String>,
    pub brightness: Vec<Vec<u8>>,
}

impl AsciiArt {
    pub fn width(&self) -> usize {
        self.brightness.first().map_or(0, |r| r.len())
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Current terminal columns, or the default when not attached to one.
pub fn terminal_columns() -> u16 {
    crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .unwrap_or(DEFAULT_TERMINAL.0)
}

/// Target width: terminal columns minus a margin, clamped to `[floor, ceiling]`.
pub fn target_width(columns: u16, floor: u32, ceiling: u32) -> u32 {
    let avail = columns.saturating_sub(TERMINAL_MARGIN) as u32;
    ceiling.min(floor.max(avail)).max(1)
}

/// Target height for an image of `src_w × src_h` scaled to `width` columns.
pub fn target_height(src_w: u32, src_h: u32, width: u32, vertical_scale: f32) -> u32 {
    let h = (src_h as f64 / src_w as f64) * width as f64 * vertical_scale as f64;
    MIN_HEIGHT.max(h.round() as u32)
}

/// Convert the image at `path`, or report it as unavailable.
///
/// Never surfaces an error: a missing or unreadable image is logged and
/// treated like no image at all.
pub fn convert(path: Option<&Path>, width: u32, vertical_scale: f32) -> Option<AsciiArt> {
    let path = path?;
    if !path.exists() {
        info!("image {} not found; using built-in layout", path.display());
        return None;
    }
    match image_to_ascii(path, width, vertical_scale) {
        Ok(art) => {
            info!(
                "converted {} to {}x{} cells",
                path.display(),
                art.width(),
                art.height()
            );
            Some(art)
        }
        Err(e) => {
            info!("could not convert {}: {e}; using built-in layout", path.display());
            None
        }
    }
}

/// Open, decode and convert one image file.
pub fn image_to_ascii(path: &Path, width: u32, vertical_scale: f32) -> Result<AsciiArt> {
    let img = image::open(path)?;
    luma_to_ascii(&img.to_luma8(), width, vertical_scale)
        .map_err(|e| match e {
            GameError::EmptyImage(_) => GameError::EmptyImage(path.display().to_string()),
            other => other,
        })
}

/// Convert an in-memory luminance image.
pub fn luma_to_ascii(gray: &GrayImage, width: u32, vertical_scale: f32) -> Result<AsciiArt> {
    let (src_w, src_h) = gray.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(GameError::EmptyImage(format!("{src_w}x{src_h}")));
    }

    let width = width.max(1);
    let height = target_height(src_w, src_h, width, vertical_scale);
    debug!("resizing {src_w}x{src_h} -> {width}x{height}");
    let resized = imageops::resize(gray, width, height, FilterType::CatmullRom);

    let mut lines = Vec::with_capacity(height as usize);
    let mut brightness = Vec::with_capacity(height as usize);
    for y in 0..height {
        let row: Vec<u8> = (0..width).map(|x| resized.get_pixel(x, y).0[0]).collect();
        lines.push(row.iter().map(|&b| tile::ramp_char(b)).collect());
        brightness.push(row);
    }

    Ok(AsciiArt { lines, brightness })
}
