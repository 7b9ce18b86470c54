/// Entities: Player, Opponent, and the one-way story flags.

/// Hit points both combatants start an encounter with.
pub const MAX_HP: u32 = 20;

/// Cardinal movement. No diagonals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    pub fn delta(self) -> (isize, isize) {
        match self {
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub items: u32,
    pub hp: u32,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player { x, y, items: 0, hp: MAX_HP }
    }

    /// Apply damage, floored at zero. Returns remaining hp.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opponent {
    pub hp: u32,
}

impl Opponent {
    pub fn new() -> Self {
        Opponent { hp: MAX_HP }
    }

    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }
}

impl Default for Opponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Story flags. Each one only ever goes false -> true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    first_scene_shown: bool,
    met_opponent: bool,
    got_key: bool,
    escaped: bool,
}

impl Flags {
    pub fn first_scene_shown(&self) -> bool { self.first_scene_shown }
    pub fn met_opponent(&self) -> bool { self.met_opponent }
    pub fn got_key(&self) -> bool { self.got_key }
    pub fn escaped(&self) -> bool { self.escaped }

    pub fn mark_first_scene_shown(&mut self) { self.first_scene_shown = true; }
    pub fn mark_met_opponent(&mut self) { self.met_opponent = true; }
    pub fn mark_got_key(&mut self) { self.got_key = true; }
    pub fn mark_escaped(&mut self) { self.escaped = true; }
}
