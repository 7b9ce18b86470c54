/// Events emitted by `Session::step`.
/// The presentation layer turns these into text; the session never prints.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    // ── Exploration ──
    Moved { x: usize, y: usize },
    Blocked,
    /// The room with the player drawn in.
    MapShown { rows: Vec<String> },
    Look,
    Help,
    Inventory { items: u32, hp: u32, has_key: bool },
    Unknown,
    Quit,

    // ── Interaction ──
    /// `table` is the 1-based label number.
    TableSearched { table: usize, found: u32 },
    NothingNearby,
    StaffDoorApproached,
    DoorShown { rows: Vec<String> },
    DoorLocked,
    Escaped,

    // ── Combat ──
    OpponentIntro,
    CombatStarted,
    RoundStarted { round: u32 },
    OpponentStruck { prompt: usize, damage: u32, player_hp: u32 },
    ChoiceOffered { options: Vec<usize> },
    InvalidChoice,
    PlayerStruck { option: usize, damage: u32, opponent_hp: u32 },
    CombatWon,
    CombatLost,
}
