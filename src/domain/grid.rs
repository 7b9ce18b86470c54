/// Grid: the display characters of a room plus a parallel walkability layer.
///
/// Both layers are built once and never mutated. Every row has the same
/// length (short rows are padded on construction) and any coordinate outside
/// `width × height` is reported as not walkable.

use super::tile::{self, PAD_BRIGHTNESS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<char>>,
    walkable: Vec<Vec<bool>>,
}

impl Grid {
    /// Build from a hand-authored layout. Walkability comes from the
    /// characters themselves.
    pub fn from_layout<S: AsRef<str>>(rows: &[S]) -> Self {
        let cells = pad_chars(rows.iter().map(|r| r.as_ref().chars().collect()).collect());
        let walkable = cells
            .iter()
            .map(|row| row.iter().map(|&c| tile::is_open_char(c)).collect())
            .collect();
        Self::assemble(cells, walkable)
    }

    /// Build from converted image lines and their brightness values.
    /// Walkability comes from brightness, never from the ramp character.
    pub fn from_brightness(lines: &[String], brightness: &[Vec<u8>], threshold: u8) -> Self {
        let cells = pad_chars(lines.iter().map(|l| l.chars().collect()).collect());
        let width = cells.first().map_or(0, |r| r.len());
        let walkable = (0..cells.len())
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let b = brightness
                            .get(y)
                            .and_then(|row| row.get(x))
                            .copied()
                            .unwrap_or(PAD_BRIGHTNESS);
                        tile::is_open_brightness(b, threshold)
                    })
                    .collect()
            })
            .collect();
        Self::assemble(cells, walkable)
    }

    fn assemble(cells: Vec<Vec<char>>, walkable: Vec<Vec<bool>>) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, |r| r.len());
        Grid { width, height, cells, walkable }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Out-of-bounds is never walkable.
    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.walkable[y][x]
    }

    pub fn cells(&self) -> &[Vec<char>] {
        &self.cells
    }

    /// Display rows as strings.
    pub fn rows(&self) -> Vec<String> {
        self.cells.iter().map(|r| r.iter().collect()).collect()
    }

    /// All walkable cells, row-major.
    pub fn walkable_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.walkable[y][x] {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// First occurrence of `label`, scanning rows top to bottom.
    /// Returns the column of the label's middle character.
    pub fn find_label(&self, label: &str) -> Option<(usize, usize)> {
        let label_len = label.chars().count();
        if label_len == 0 {
            return None;
        }
        for (y, row) in self.rows().iter().enumerate() {
            if let Some(byte_idx) = row.find(label) {
                let col = row[..byte_idx].chars().count();
                return Some((col + label_len / 2, y));
            }
        }
        None
    }
}

/// Right-pad every row with spaces to the widest row.
fn pad_chars(mut rows: Vec<Vec<char>>) -> Vec<Vec<char>> {
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, ' ');
    }
    rows
}
