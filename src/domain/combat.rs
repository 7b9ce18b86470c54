/// Boss encounter state machine.
///
/// ```text
///   NotStarted ──begin──▶ InProgress ──opponent_turn──▶ AwaitingChoice
///                             ▲                 │              │
///                             │             hp == 0         choose
///                             │                 ▼              │
///                             │               Lost             ▼
///                             └──── opp hp > 0 ◀──────── (player hits)
///                                                   opp hp == 0 ──▶ Won
/// ```
///
/// The machine never blocks. Invalid input to `choose` leaves it in
/// `AwaitingChoice` so the caller can simply ask again.
///
/// Prompts and response options are indices into pools the caller owns;
/// this module only decides which ones are drawn and when.

use rand::seq::index;
use rand::Rng;

use super::entity::{Opponent, Player, MAX_HP};
use super::rules::{self, OPPONENT_DAMAGE};
use crate::error::{GameError, Result};

/// Distinct prompts drawn at the start of each encounter.
pub const PROMPTS_PER_ENCOUNTER: usize = 4;
/// Response options offered on each player turn.
pub const OPTIONS_PER_TURN: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatState {
    NotStarted,
    InProgress,
    AwaitingChoice { options: Vec<usize> },
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpponentTurn {
    pub round: u32,
    pub prompt: usize,
    pub damage: u32,
    pub player_hp: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerTurn {
    pub option: usize,
    pub damage: u32,
    pub opponent_hp: u32,
}

#[derive(Clone, Debug)]
pub struct Encounter {
    state: CombatState,
    round: u32,
    prompts: Vec<usize>,
    prompt_cursor: usize,
    option_pool: usize,
}

impl Encounter {
    /// Draw this encounter's prompts from a pool of `prompt_pool` entries.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, prompt_pool: usize, option_pool: usize) -> Self {
        let take = PROMPTS_PER_ENCOUNTER.min(prompt_pool);
        let prompts = index::sample(rng, prompt_pool, take).into_vec();
        Encounter {
            state: CombatState::NotStarted,
            round: 0,
            prompts,
            prompt_cursor: 0,
            option_pool,
        }
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn prompts(&self) -> &[usize] {
        &self.prompts
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, CombatState::Won | CombatState::Lost)
    }

    /// Options currently on offer, if the player is up.
    pub fn pending_options(&self) -> Option<&[usize]> {
        match &self.state {
            CombatState::AwaitingChoice { options } => Some(options),
            _ => None,
        }
    }

    /// Reset both combatants and enter the first round.
    pub fn begin(&mut self, player: &mut Player, opponent: &mut Opponent) {
        player.hp = MAX_HP;
        opponent.hp = MAX_HP;
        self.round = 1;
        self.prompt_cursor = 0;
        self.state = CombatState::InProgress;
    }

    /// The opponent asks its next question and hits the player.
    /// Returns `None` unless the machine is `InProgress`.
    pub fn opponent_turn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        player: &mut Player,
    ) -> Option<OpponentTurn> {
        if self.state != CombatState::InProgress {
            return None;
        }

        let prompt = if self.prompts.is_empty() {
            0
        } else {
            self.prompts[self.prompt_cursor % self.prompts.len()]
        };
        self.prompt_cursor += 1;

        let player_hp = player.take_damage(OPPONENT_DAMAGE);
        self.state = if player_hp == 0 {
            CombatState::Lost
        } else {
            let take = OPTIONS_PER_TURN.min(self.option_pool);
            CombatState::AwaitingChoice {
                options: index::sample(rng, self.option_pool, take).into_vec(),
            }
        };

        Some(OpponentTurn {
            round: self.round,
            prompt,
            damage: OPPONENT_DAMAGE,
            player_hp,
        })
    }

    /// Resolve the player's pick (`"1"`, `"2"`, ...). Damage depends only on
    /// how many items the player holds, never on which option was picked.
    pub fn choose(
        &mut self,
        input: &str,
        player: &Player,
        opponent: &mut Opponent,
    ) -> Result<PlayerTurn> {
        let options = match &self.state {
            CombatState::AwaitingChoice { options } => options,
            _ => return Err(GameError::NotAwaitingChoice),
        };

        let picked = input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=options.len()).contains(n))
            .ok_or_else(|| GameError::InvalidChoice(input.trim().to_string()))?;
        let option = options[picked - 1];

        let damage = rules::player_damage(player.items);
        let opponent_hp = opponent.take_damage(damage);
        self.round += 1;
        self.state = if opponent_hp == 0 {
            CombatState::Won
        } else {
            CombatState::InProgress
        };

        Ok(PlayerTurn { option, damage, opponent_hp })
    }
}
