/// Room and door loading, plus table placement.
///
/// ## Sources (priority order):
///   1. First existing image among the configured candidates
///   2. Built-in embedded layout
///
/// ## Embedded room legend:
///   ' ', '.', ':'  = open floor
///   `[T1]`..`[T6]` = tables (the label's middle column is the anchor)
///   anything else  = wall or furniture
///
/// Image-derived rooms carry no labels, so their tables are scattered over
/// random walkable cells instead.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::domain::grid::Grid;
use crate::sim::ascii::{self, AsciiArt};

/// Number of tables in every room.
pub const TABLE_COUNT: usize = 6;

/// Where a grid came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GridSource {
    Image,
    Embedded,
}

/// A loaded room or door view.
#[derive(Clone, Debug)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub source: GridSource,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the room from the first configured image, or the embedded layout.
pub fn load_room(config: &GameConfig) -> LoadedGrid {
    let width = config_width(config);
    let art = ascii::convert(config.room_image(), width, config.grid.vertical_scale);
    let loaded = from_art_or(art, config.grid.walk_threshold, embedded_room);
    info!(
        "room: {:?} grid {}x{}",
        loaded.source,
        loaded.grid.width(),
        loaded.grid.height()
    );
    loaded
}

/// Load the door view the same way as the room.
pub fn load_door(config: &GameConfig) -> LoadedGrid {
    let width = config_width(config);
    let art = ascii::convert(config.door_image(), width, config.grid.vertical_scale);
    let loaded = from_art_or(art, config.grid.walk_threshold, embedded_door);
    info!(
        "door: {:?} view {}x{}",
        loaded.source,
        loaded.grid.width(),
        loaded.grid.height()
    );
    loaded
}

/// The embedded room, as a grid.
pub fn embedded_room() -> Grid {
    Grid::from_layout(ROOM_LAYOUT)
}

/// The embedded door drawing, as a grid.
pub fn embedded_door() -> Grid {
    Grid::from_layout(DOOR_LAYOUT)
}

fn config_width(config: &GameConfig) -> u32 {
    ascii::target_width(
        ascii::terminal_columns(),
        config.grid.min_width,
        config.grid.max_width,
    )
}

fn from_art_or(art: Option<AsciiArt>, threshold: u8, fallback: fn() -> Grid) -> LoadedGrid {
    match art {
        Some(art) => LoadedGrid {
            grid: Grid::from_brightness(&art.lines, &art.brightness, threshold),
            source: GridSource::Image,
        },
        None => LoadedGrid {
            grid: fallback(),
            source: GridSource::Embedded,
        },
    }
}

// ══════════════════════════════════════════════════════════════
// Table placement
// ══════════════════════════════════════════════════════════════

/// A way of choosing the six table anchors for a grid.
pub trait TablePlacement {
    /// Anchors in table order (T1 first), or `None` if this strategy
    /// cannot place all of them.
    fn place(&self, grid: &Grid, rng: &mut dyn rand::RngCore) -> Option<Vec<(usize, usize)>>;

    fn name(&self) -> &'static str;
}

/// Find `T1`..`T6` written into the layout. First match per label.
pub struct LabelScan;

impl TablePlacement for LabelScan {
    fn place(&self, grid: &Grid, _rng: &mut dyn rand::RngCore) -> Option<Vec<(usize, usize)>> {
        (1..=TABLE_COUNT)
            .map(|n| grid.find_label(&format!("T{n}")))
            .collect()
    }

    fn name(&self) -> &'static str {
        "label scan"
    }
}

/// Six distinct walkable cells, chosen without replacement.
pub struct RandomCells;

impl TablePlacement for RandomCells {
    fn place(&self, grid: &Grid, rng: &mut dyn rand::RngCore) -> Option<Vec<(usize, usize)>> {
        let cells = grid.walkable_cells();
        if cells.len() < TABLE_COUNT {
            return None;
        }
        Some(cells.choose_multiple(rng, TABLE_COUNT).copied().collect())
    }

    fn name(&self) -> &'static str {
        "random cells"
    }
}

/// Try each strategy in order; the first that places every table wins.
/// When none does (a grid with fewer than six open cells), whatever
/// walkable cells exist are used and the rest stack on the center.
pub fn place_tables<R: Rng>(
    grid: &Grid,
    strategies: &[&dyn TablePlacement],
    rng: &mut R,
) -> Vec<(usize, usize)> {
    for strategy in strategies {
        if let Some(anchors) = strategy.place(grid, rng) {
            debug!("tables placed by {}: {:?}", strategy.name(), anchors);
            return anchors;
        }
        debug!("{} could not place all tables", strategy.name());
    }

    let center = (grid.width() / 2, grid.height() / 2);
    let mut anchors = grid.walkable_cells();
    anchors.shuffle(rng);
    anchors.resize(TABLE_COUNT, center);
    debug!("tables placed on a cramped grid: {:?}", anchors);
    anchors
}

/// Strategies to try for a grid from `source`.
pub fn strategies_for(source: GridSource) -> Vec<&'static dyn TablePlacement> {
    match source {
        GridSource::Embedded => vec![&LabelScan, &RandomCells],
        GridSource::Image => vec![&RandomCells],
    }
}

// ══════════════════════════════════════════════════════════════
// Embedded layouts
// ══════════════════════════════════════════════════════════════

const ROOM_LAYOUT: &[&str] = &[
    "+---------------------------------------------+",
    "|  [T1]      [T2]      [T3]       window      |",
    "|                                             |",
    "|  [T4]      [T5]      [T6]                   |",
    "|                                             |",
    "|      teacher desk (staff-only door)         |",
    "|                    _______                  |",
    "|                   |staff |  main door -->   |",
    "+---------------------------------------------+",
];

const DOOR_LAYOUT: &[&str] = &[
    "  ________________________",
    " |  ____                 |",
    " | |    |   []           |",
    " | |    |   -()          |",
    " | |____|                |",
    " |_______________________|",
    " /                       \\",
    "/_________________________\\",
];
