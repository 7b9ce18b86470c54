/// Session: all mutable game state, advanced one input line at a time.
///
/// Processing per `step`:
///   1. Exploring → parse a command, apply it
///   2. Combat    → treat the line as a choice, resolve the round
///   3. After any encounter resolves, drop back to exploring
///
/// The session never prints and never blocks. Every observable effect is
/// returned as a `GameEvent` for the presentation layer to narrate.

use log::debug;
use rand::Rng;

use crate::domain::combat::{CombatState, Encounter};
use crate::domain::entity::{Flags, MoveDir, Opponent, Player};
use crate::domain::rules;
use crate::error::GameError;
use super::command::Command;
use super::event::GameEvent;
use super::world::{Interactable, World};

#[derive(Clone, Debug)]
pub enum Mode {
    Exploring,
    Combat(Encounter),
}

/// Sizes of the content pools the encounter draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pools {
    pub prompts: usize,
    pub responses: usize,
}

pub struct Session<R: Rng> {
    world: World,
    player: Player,
    opponent: Opponent,
    flags: Flags,
    mode: Mode,
    pools: Pools,
    quit: bool,
    rng: R,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

impl<R: Rng> Session<R> {
    pub fn new(world: World, pools: Pools, rng: R) -> Self {
        let (x, y) = world.spawn();
        Session {
            world,
            player: Player::new(x, y),
            opponent: Opponent::new(),
            flags: Flags::default(),
            mode: Mode::Exploring,
            pools,
            quit: false,
            rng,
        }
    }

    pub fn step(&mut self, line: &str) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_finished() {
            return events;
        }
        if self.in_combat() {
            self.answer(line, &mut events);
        } else {
            self.explore(Command::parse(line), &mut events);
        }
        events
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn in_combat(&self) -> bool {
        matches!(self.mode, Mode::Combat(_))
    }

    /// Escaped or quit. No further input is accepted.
    pub fn is_finished(&self) -> bool {
        self.quit || self.flags.escaped()
    }

    pub fn mark_intro_shown(&mut self) {
        self.flags.mark_first_scene_shown();
    }

    /// Current room with the player drawn in.
    pub fn render(&self) -> Vec<String> {
        self.world.render(&self.player)
    }

    // ══════════════════════════════════════════════════════════
    // Exploration
    // ══════════════════════════════════════════════════════════

    fn explore(&mut self, cmd: Command, events: &mut Vec<GameEvent>) {
        match cmd {
            Command::Move(dir) => self.walk(dir, events),
            Command::Look => events.push(GameEvent::Look),
            Command::Map => events.push(GameEvent::MapShown { rows: self.render() }),
            Command::Inventory => events.push(GameEvent::Inventory {
                items: self.player.items,
                hp: self.player.hp,
                has_key: self.flags.got_key(),
            }),
            Command::Help => events.push(GameEvent::Help),
            Command::Quit => {
                self.quit = true;
                events.push(GameEvent::Quit);
            }
            Command::Interact => self.interact(events),
            Command::Unknown(s) => {
                debug!("unknown command {s:?}");
                events.push(GameEvent::Unknown);
            }
        }
    }

    fn walk(&mut self, dir: MoveDir, events: &mut Vec<GameEvent>) {
        match rules::step_target(self.world.room(), self.player.x, self.player.y, dir) {
            Some((x, y)) => {
                self.player.x = x;
                self.player.y = y;
                events.push(GameEvent::Moved { x, y });
                events.push(GameEvent::MapShown { rows: self.render() });
            }
            None => events.push(GameEvent::Blocked),
        }
    }

    fn interact(&mut self, events: &mut Vec<GameEvent>) {
        match self.world.nearby(self.player.x, self.player.y) {
            Interactable::Table(idx) => {
                let table = self.world.tables()[idx].number;
                let found = self.world.take_items(idx);
                self.player.items += found;
                events.push(GameEvent::TableSearched { table, found });
            }
            Interactable::StaffDoor => {
                events.push(GameEvent::StaffDoorApproached);
                if !self.flags.met_opponent() {
                    self.flags.mark_met_opponent();
                    events.push(GameEvent::OpponentIntro);
                }
                self.start_encounter(events);
            }
            Interactable::MainDoor => {
                events.push(GameEvent::DoorShown { rows: self.world.door_view().rows() });
                if self.flags.got_key() {
                    self.flags.mark_escaped();
                    events.push(GameEvent::Escaped);
                } else {
                    events.push(GameEvent::DoorLocked);
                }
            }
            Interactable::Nothing => events.push(GameEvent::NothingNearby),
        }
    }

    // ══════════════════════════════════════════════════════════
    // Combat
    // ══════════════════════════════════════════════════════════

    fn start_encounter(&mut self, events: &mut Vec<GameEvent>) {
        let mut enc = Encounter::new(&mut self.rng, self.pools.prompts, self.pools.responses);
        enc.begin(&mut self.player, &mut self.opponent);
        debug!("encounter begins with prompts {:?}", enc.prompts());
        events.push(GameEvent::CombatStarted);
        self.opponent_round(enc, events);
    }

    /// Run the opponent's half of a round and settle the new mode.
    fn opponent_round(&mut self, mut enc: Encounter, events: &mut Vec<GameEvent>) {
        if let Some(turn) = enc.opponent_turn(&mut self.rng, &mut self.player) {
            debug!("round {}: opponent hits, player hp {}", turn.round, turn.player_hp);
            events.push(GameEvent::RoundStarted { round: turn.round });
            events.push(GameEvent::OpponentStruck {
                prompt: turn.prompt,
                damage: turn.damage,
                player_hp: turn.player_hp,
            });
        }
        self.settle(enc, events);
    }

    fn answer(&mut self, line: &str, events: &mut Vec<GameEvent>) {
        let mut enc = match std::mem::replace(&mut self.mode, Mode::Exploring) {
            Mode::Combat(enc) => enc,
            Mode::Exploring => return,
        };

        match enc.choose(line, &self.player, &mut self.opponent) {
            Ok(turn) => {
                debug!("player hits for {}, opponent hp {}", turn.damage, turn.opponent_hp);
                events.push(GameEvent::PlayerStruck {
                    option: turn.option,
                    damage: turn.damage,
                    opponent_hp: turn.opponent_hp,
                });
                if enc.is_over() {
                    self.settle(enc, events);
                } else {
                    self.opponent_round(enc, events);
                }
            }
            Err(GameError::InvalidChoice(s)) => {
                debug!("invalid combat choice {s:?}");
                events.push(GameEvent::InvalidChoice);
                self.mode = Mode::Combat(enc);
            }
            Err(e) => {
                debug!("combat input rejected: {e}");
                self.settle(enc, events);
            }
        }
    }

    /// Park the encounter while the player is up, or resolve it.
    fn settle(&mut self, enc: Encounter, events: &mut Vec<GameEvent>) {
        if let Some(options) = enc.pending_options() {
            events.push(GameEvent::ChoiceOffered { options: options.to_vec() });
            self.mode = Mode::Combat(enc);
            return;
        }
        match enc.state() {
            CombatState::Won => {
                self.flags.mark_got_key();
                events.push(GameEvent::CombatWon);
            }
            CombatState::Lost => events.push(GameEvent::CombatLost),
            _ => {}
        }
        self.mode = Mode::Exploring;
    }
}
