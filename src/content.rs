/// Narrative content: every line of story text the game can print.
///
/// Built-in defaults cover the whole game. A TOML file may override any
/// subset of keys; missing keys keep their defaults. Templates use `{name}`
/// placeholders, filled by `fill`.

use std::fmt::Display;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::{GameError, Result};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Content {
    // ── Framing ──
    pub hint: String,
    pub prompt: String,
    pub help: Vec<String>,
    pub look: String,
    pub unknown: String,
    pub blocked: String,
    pub quit: String,
    pub victory: String,
    pub interrupted: String,

    // ── Opening scene ──
    pub intro: Vec<String>,
    pub intro_prompt: String,
    pub intro_reminder: String,

    // ── Interaction ──
    pub table_search: String,
    pub found_one: String,
    pub found_many: String,
    pub nothing_here: String,
    pub nothing_nearby: String,
    pub staff_approach: String,
    pub door_open: String,
    pub door_locked: String,

    // ── Inventory ──
    pub inventory_items: String,
    pub inventory_hp: String,
    pub inventory_key: String,
    pub yes: String,
    pub no: String,

    // ── Combat ──
    pub opponent_intro: Vec<String>,
    pub battle_start: String,
    pub round_header: String,
    pub opponent_glyph: String,
    pub opponent_hit: String,
    pub options_header: String,
    pub option_line: String,
    pub choice_prompt: String,
    pub invalid_choice: String,
    pub player_said: String,
    pub player_hit: String,
    pub win: Vec<String>,
    pub loss: Vec<String>,
    /// The opponent's questions. One is drawn per round.
    pub prompts: Vec<String>,
    /// The player's replies. Two are offered per round.
    pub responses: Vec<String>,
}

impl Default for Content {
    fn default() -> Self {
        Content {
            hint: "move with w/a/s/d. interact when near tables/teacher/door.".into(),
            prompt: "> ".into(),
            help: lines(&[
                "commands:",
                "  w/a/s/d  -> move up/left/down/right",
                "  move w/a/s/d -> same",
                "  look -> describe surroundings",
                "  interact -> interact with a nearby object/table/door",
                "  map -> redraw ascii room",
                "  inventory -> show lollipops/hp/key",
                "  quit -> exit",
            ]),
            look: "you see desks, a teacher desk with a staff-only door, and the main door. \
                   try to move near items to interact."
                .into(),
            unknown: "unknown command. type help".into(),
            blocked: "you can't move there. there's something blocking you.".into(),
            quit: "bye.".into(),
            victory: "congrats. you escaped k13. game over.".into(),
            interrupted: "exiting".into(),

            intro: lines(&[
                "you wake up in a classroom, alone and confused.",
                "you look around the classroom and feel a sense of unease.",
                "after a look around, you realise that you’re in k13.",
                "a wave of memories fills your mind.",
                "the website task.",
                "scratch.",
                "unity.",
                "(client task)",
                "a wave of disgust rolls over you and you shudder.",
                "you notice the number of things scattered over the desks.",
                "notes, and… lollipops?",
                "what am i doing in k13 again?",
                "why am i willingly staying longer than i have to be in k13??",
                "you stagger up to walk to the door, intending to leave.",
                "you flick the lock on the door from locked to unlocked as you would for any \
                 normal classroom door at fort street.",
                "you pull on the handle.",
                "the door does not open.",
                "you shake the door handle aggressively, but the door still doesn’t open.",
                "how am i locked inside the classroom?",
                "you turn around, eyes fixing on the closest of the three windows.",
                "jumping off the second story of kilgour was not a good idea…",
                "but what other choice was there?",
                "and then there was the staff only door behind the teacher’s desk.",
                "maybe there’s something there?",
                "(find your way out)",
            ]),
            intro_prompt: "(press space then enter to continue) ".into(),
            intro_reminder: "press the spacebar then enter like it asks.".into(),

            table_search: "you rummage table {table}.".into(),
            found_one: "you found 1 lollipop!".into(),
            found_many: "you found {count} lollipops!".into(),
            nothing_here: "there's nothing here.".into(),
            nothing_nearby: "there's nothing obvious to interact with here.".into(),
            staff_approach: "you approach the teacher's desk and the staff-only door.".into(),
            door_open: "you use the key and the main door opens. you escaped k13.".into(),
            door_locked: "the door is still locked. stop trying to force it open and find clues."
                .into(),

            inventory_items: "lollipops: {items}".into(),
            inventory_hp: "hp: {hp}/{max}".into(),
            inventory_key: "key: {key}".into(),
            yes: "yes".into(),
            no: "no".into(),

            opponent_intro: lines(&[
                "\"what are you doing here?\"",
                "uh oh, it's mr clark.",
                "\"where did you appear from??\"",
            ]),
            battle_start: "mr clark stares at you. battle begins.".into(),
            round_header: "--- round {round} ---".into(),
            opponent_glyph: "(-_-)".into(),
            opponent_hit: "mr clark hits you -{damage}. your hp: {hp}/{max}".into(),
            options_header: "your options:".into(),
            option_line: "  {n}. {text}".into(),
            choice_prompt: "choose 1 or 2: ".into(),
            invalid_choice: "type 1 or 2".into(),
            player_said: "you: {text}".into(),
            player_hit: "you deal -{damage} to mr clark. mr clark hp: {hp}/{max}".into(),
            win: lines(&["\"okay fine here's the key.\"", "he tosses you a small key."]),
            loss: lines(&[
                "\"go do your homework. you don't know enough about cpt.\"",
                "mr clark leaves.",
            ]),
            prompts: lines(&[
                "mr clark: explain how simulations can model emergent behaviour.",
                "mr clark: describe why game loops are important.",
                "mr clark: code a simple python function that returns true if a number is prime.",
                "mr clark: what's the map-reduce idea used in big data?",
                "mr clark: talk about the seven bridges problem and why it's important.",
                "mr clark: why is computational thinking important in games?",
                "mr clark: outline how you'd optimise a physics update loop.",
            ]),
            responses: lines(&[
                "you answer confidently with a neat code solution.",
                "you bluff about a clever optimisation you once read.",
                "you tie it back to an example in a game engine.",
                "you rant about datasets and pipelines for a moment.",
                "you recall a graph theory trick about bridges.",
                "you explain a tiny prime-check function in python.",
            ]),
        }
    }
}

fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(|s| s.to_string()).collect()
}

// ── Loading ──

impl Content {
    /// Load overrides from `path`, or use the built-in text.
    /// Unreadable or invalid files are logged and ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Content::default();
        };
        match Self::from_file(path) {
            Ok(content) => {
                info!("content loaded from {}", path.display());
                content
            }
            Err(e) => {
                warn!("{e}; using built-in content");
                Content::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let content: Content = toml::from_str(text)?;
        content.validate()?;
        Ok(content)
    }

    /// The encounter needs at least one prompt and two replies to offer.
    pub fn validate(&self) -> Result<()> {
        if self.prompts.is_empty() {
            return Err(GameError::Content("no opponent prompts".into()));
        }
        if self.responses.len() < 2 {
            return Err(GameError::Content(format!(
                "need at least 2 responses, found {}",
                self.responses.len()
            )));
        }
        Ok(())
    }
}

/// Substitute `{name}` placeholders. Unknown placeholders are left as-is.
pub fn fill(template: &str, vars: &[(&str, &dyn Display)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), &value.to_string())
    })
}
