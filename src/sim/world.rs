/// World: the room, its interactables, and the items hidden in it.
///
/// ## Layers
///
///   - `room`:   display chars + walkability. **Never mutated** after build.
///   - `tables`: six anchors with a reach rule, plus a remaining item count
///               per table. Counts only ever drain to zero.
///   - zones:    staff door (bottom-left) and main door (right edge),
///               derived from the room's dimensions.
///
/// ## Interaction priority
/// ┌───┬─────────────────────────────────────────────┐
/// │ 1 │ any table in reach (first in label order)   │
/// │ 2 │ staff-door zone                             │
/// │ 3 │ main-door zone                              │
/// │ 4 │ nothing                                     │
/// └───┴─────────────────────────────────────────────┘

use log::debug;
use rand::Rng;

use crate::domain::entity::Player;
use crate::domain::grid::Grid;
use crate::domain::rules::{self, Reach, Zone, TABLE_REACH};
use crate::sim::level::{self, LoadedGrid};

/// Drawn centered on the player when it fits on open floor.
pub const PLAYER_GLYPH: &str = "(*-*)";
/// Drawn at the player's cell when the glyph does not fit.
pub const PLAYER_MARKER: char = '*';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// 1-based, matching the `T1`..`T6` labels.
    pub number: usize,
    pub x: usize,
    pub y: usize,
    pub reach: Reach,
    pub items: u32,
}

/// What the player is close enough to use.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interactable {
    /// Index into `World::tables`.
    Table(usize),
    StaffDoor,
    MainDoor,
    Nothing,
}

#[derive(Clone, Debug)]
pub struct World {
    room: Grid,
    door_view: Grid,
    tables: Vec<Table>,
    staff_zone: Zone,
    door_zone: Zone,
    spawn: (usize, usize),
}

impl World {
    /// Build the world from a loaded room and door view, scattering
    /// `item_total` items over the tables.
    pub fn build<R: Rng>(room: LoadedGrid, door_view: Grid, item_total: u32, rng: &mut R) -> Self {
        let strategies = level::strategies_for(room.source);
        let anchors = level::place_tables(&room.grid, &strategies, rng);
        let mut tables: Vec<Table> = anchors
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| Table { number: i + 1, x, y, reach: TABLE_REACH, items: 0 })
            .collect();

        for _ in 0..item_total {
            let t = rng.gen_range(0..tables.len());
            tables[t].items += 1;
        }
        debug!(
            "items per table: {:?}",
            tables.iter().map(|t| t.items).collect::<Vec<_>>()
        );

        let (w, h) = (room.grid.width(), room.grid.height());
        let spawn = rules::spawn_point(&room.grid);
        debug!("spawn at {:?}", spawn);

        World {
            staff_zone: rules::staff_zone(w, h),
            door_zone: rules::door_zone(w, h),
            spawn,
            tables,
            room: room.grid,
            door_view,
        }
    }

    pub fn room(&self) -> &Grid {
        &self.room
    }

    pub fn door_view(&self) -> &Grid {
        &self.door_view
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn spawn(&self) -> (usize, usize) {
        self.spawn
    }

    /// Empty table `idx` and return how many items it held.
    /// Out-of-range indices hold nothing.
    pub fn take_items(&mut self, idx: usize) -> u32 {
        self.tables
            .get_mut(idx)
            .map_or(0, |t| std::mem::take(&mut t.items))
    }

    /// Resolve what is in range of (x, y).
    pub fn nearby(&self, x: usize, y: usize) -> Interactable {
        if let Some(i) = self
            .tables
            .iter()
            .position(|t| t.reach.covers((x, y), (t.x, t.y)))
        {
            return Interactable::Table(i);
        }
        if self.staff_zone.contains(x, y) {
            return Interactable::StaffDoor;
        }
        if self.door_zone.contains(x, y) {
            return Interactable::MainDoor;
        }
        Interactable::Nothing
    }

    /// The room with the player drawn in. Pure.
    pub fn render(&self, player: &Player) -> Vec<String> {
        let mut cells: Vec<Vec<char>> = self.room.cells().to_vec();
        let glyph: Vec<char> = PLAYER_GLYPH.chars().collect();
        let half = glyph.len() / 2;

        let span = player
            .x
            .checked_sub(half)
            .map(|x0| x0..x0 + glyph.len())
            .filter(|span| span.clone().all(|x| self.room.is_walkable(x, player.y)));

        match span {
            Some(span) => {
                for (x, ch) in span.zip(glyph) {
                    cells[player.y][x] = ch;
                }
            }
            None => {
                if let Some(cell) = cells.get_mut(player.y).and_then(|r| r.get_mut(player.x)) {
                    *cell = PLAYER_MARKER;
                }
            }
        }

        cells.into_iter().map(|r| r.into_iter().collect()).collect()
    }
}
