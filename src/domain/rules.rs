/// Movement, reach, and damage rules.
///
/// Pure functions over a `Grid` and plain numbers. They decide what is legal
/// or how much something hurts; they never mutate state.
///
/// ## Movement
/// ┌──────────────────────────┬────────┐
/// │ Target cell               │ Allow? │
/// ├──────────────────────────┼────────┤
/// │ Off the grid (any side)   │ DENY   │
/// │ Not walkable              │ DENY   │
/// │ Walkable                  │ ALLOW  │
/// └──────────────────────────┴────────┘
///
/// ## Player damage by items held
/// ┌───────┬───┬───┬───┬───┬───┬─────┐
/// │ items │ 0 │ 1 │ 2 │ 3 │ 4 │ ≥ 5 │
/// ├───────┼───┼───┼───┼───┼───┼─────┤
/// │ dmg   │ 2 │ 3 │ 4 │ 5 │ 7 │  8  │
/// └───────┴───┴───┴───┴───┴───┴─────┘

use super::entity::MoveDir;
use super::grid::Grid;

/// The opponent always hits this hard.
pub const OPPONENT_DAMAGE: u32 = 4;

const PLAYER_DAMAGE: [u32; 6] = [2, 3, 4, 5, 7, 8];

/// Damage the player deals with `items` collected. Saturates at the top row.
pub fn player_damage(items: u32) -> u32 {
    let idx = (items as usize).min(PLAYER_DAMAGE.len() - 1);
    PLAYER_DAMAGE[idx]
}

/// Where a step in `dir` from (x, y) lands, if that cell may be entered.
pub fn step_target(grid: &Grid, x: usize, y: usize, dir: MoveDir) -> Option<(usize, usize)> {
    let (dx, dy) = dir.delta();
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    if grid.is_walkable(nx, ny) {
        Some((nx, ny))
    } else {
        None
    }
}

// ══════════════════════════════════════════════════════════════
// Reach: when is the player "near" something
// ══════════════════════════════════════════════════════════════

/// Max horizontal / vertical distance for a point interactable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Reach {
    pub dx: usize,
    pub dy: usize,
}

/// Tables are reachable from two columns and one row away.
pub const TABLE_REACH: Reach = Reach { dx: 2, dy: 1 };

impl Reach {
    pub fn covers(self, from: (usize, usize), to: (usize, usize)) -> bool {
        from.0.abs_diff(to.0) <= self.dx && from.1.abs_diff(to.1) <= self.dy
    }
}

/// Axis-aligned rectangle of cells, half-open on both axes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Zone {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl Zone {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }
}

/// Depth of the staff-door zone from the bottom edge.
const STAFF_ZONE_ROWS: usize = 6;
/// Depth of the main-door zone from the right edge.
const DOOR_ZONE_COLS: usize = 8;

/// Teacher's desk and staff-only door: left third of the bottom rows.
pub fn staff_zone(width: usize, height: usize) -> Zone {
    Zone {
        x0: 0,
        x1: width / 3,
        y0: height.saturating_sub(STAFF_ZONE_ROWS),
        y1: height,
    }
}

/// Main door: the rightmost columns, full height.
pub fn door_zone(width: usize, height: usize) -> Zone {
    Zone {
        x0: width.saturating_sub(DOOR_ZONE_COLS),
        x1: width,
        y0: 0,
        y1: height,
    }
}

// ══════════════════════════════════════════════════════════════
// Spawn
// ══════════════════════════════════════════════════════════════

/// First walkable cell scanning rows outward from the middle
/// (0, +1, -1, +2, -2, ...), each row left to right.
/// Falls back to the geometric center when nothing is walkable.
pub fn spawn_point(grid: &Grid) -> (usize, usize) {
    let (w, h) = (grid.width(), grid.height());
    let mid = h / 2;
    for y in spawn_rows(mid, h) {
        if let Some(x) = (0..w).find(|&x| grid.is_walkable(x, y)) {
            return (x, y);
        }
    }
    (w / 2, h / 2)
}

/// Row order for the spawn scan. Rows outside `0..height` are skipped.
fn spawn_rows(mid: usize, height: usize) -> impl Iterator<Item = usize> {
    (0..height.max(1) * 2).filter_map(move |i| {
        let offset = (i as isize + 1) / 2;
        let signed = if i % 2 == 1 { offset } else { -offset };
        mid.checked_add_signed(signed).filter(|&y| y < height)
    })
}
