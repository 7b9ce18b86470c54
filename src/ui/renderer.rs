/// Presentation layer: turns `GameEvent`s into lines of text.
///
/// All output is queued through crossterm's `Print` and flushed once per
/// batch, the same way for a real terminal and for an in-memory buffer.
/// Every string comes from `Content`; this module only chooses which one
/// and fills in the numbers.

use std::io::{self, Write};

use crossterm::{queue, style::Print};
use log::debug;

use crate::content::{fill, Content};
use crate::domain::entity::MAX_HP;
use crate::sim::event::GameEvent;

pub struct Renderer<W: Write> {
    out: W,
    content: Content,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, content: Content) -> Self {
        Renderer { out, content }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Give back the sink (tests inspect what was written).
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    // ── Primitives ──

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text), Print("\n"))
    }

    pub fn lines<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        for l in lines {
            self.line(l.as_ref())?;
        }
        Ok(())
    }

    /// Text with no newline, flushed so it shows before input is read.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))?;
        self.out.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    // ── Framing ──

    pub fn hint(&mut self) -> io::Result<()> {
        let text = self.content.hint.clone();
        self.line(&text)
    }

    pub fn help(&mut self) -> io::Result<()> {
        let help = self.content.help.clone();
        self.lines(&help)
    }

    // ══════════════════════════════════════════════════════════════
    // Event narration
    // ══════════════════════════════════════════════════════════════

    pub fn narrate(&mut self, events: &[GameEvent]) -> io::Result<()> {
        for event in events {
            self.narrate_one(event)?;
        }
        self.out.flush()
    }

    fn narrate_one(&mut self, event: &GameEvent) -> io::Result<()> {
        let c = &self.content;
        let text: Vec<String> = match event {
            GameEvent::Moved { x, y } => {
                debug!("player at ({x}, {y})");
                vec![]
            }
            GameEvent::Blocked => vec![c.blocked.clone()],
            GameEvent::MapShown { rows } | GameEvent::DoorShown { rows } => rows.clone(),
            GameEvent::Look => vec![c.look.clone()],
            GameEvent::Help => c.help.clone(),
            GameEvent::Inventory { items, hp, has_key } => vec![
                fill(&c.inventory_items, &[("items", items)]),
                fill(&c.inventory_hp, &[("hp", hp), ("max", &MAX_HP)]),
                fill(&c.inventory_key, &[("key", if *has_key { &c.yes } else { &c.no })]),
            ],
            GameEvent::Unknown => vec![c.unknown.clone()],
            GameEvent::Quit => vec![c.quit.clone()],

            GameEvent::TableSearched { table, found } => vec![
                fill(&c.table_search, &[("table", table)]),
                match found {
                    0 => c.nothing_here.clone(),
                    1 => c.found_one.clone(),
                    n => fill(&c.found_many, &[("count", n)]),
                },
            ],
            GameEvent::NothingNearby => vec![c.nothing_nearby.clone()],
            GameEvent::StaffDoorApproached => vec![c.staff_approach.clone()],
            GameEvent::DoorLocked => vec![c.door_locked.clone()],
            GameEvent::Escaped => vec![c.door_open.clone()],

            GameEvent::OpponentIntro => c.opponent_intro.clone(),
            GameEvent::CombatStarted => vec![c.battle_start.clone()],
            GameEvent::RoundStarted { round } => {
                vec![String::new(), fill(&c.round_header, &[("round", round)])]
            }
            GameEvent::OpponentStruck { prompt, damage, player_hp } => vec![
                format!("{} {}", c.opponent_glyph, pick(&c.prompts, *prompt)),
                fill(&c.opponent_hit, &[("damage", damage), ("hp", player_hp), ("max", &MAX_HP)]),
            ],
            GameEvent::ChoiceOffered { options } => {
                let mut v = vec![c.options_header.clone()];
                v.extend(options.iter().enumerate().map(|(i, &o)| {
                    fill(&c.option_line, &[("n", &(i + 1)), ("text", &pick(&c.responses, o))])
                }));
                v
            }
            GameEvent::InvalidChoice => vec![c.invalid_choice.clone()],
            GameEvent::PlayerStruck { option, damage, opponent_hp } => vec![
                fill(&c.player_said, &[("text", &pick(&c.responses, *option))]),
                fill(&c.player_hit, &[("damage", damage), ("hp", opponent_hp), ("max", &MAX_HP)]),
            ],
            GameEvent::CombatWon => c.win.clone(),
            GameEvent::CombatLost => c.loss.clone(),
        };
        self.lines(&text)
    }
}

/// Pool entry by index; an out-of-range index prints nothing.
fn pick(pool: &[String], idx: usize) -> &str {
    pool.get(idx).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrate(events: &[GameEvent]) -> String {
        let mut r = Renderer::new(Vec::new(), Content::default());
        r.narrate(events).unwrap();
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn table_messages_by_count() {
        assert_eq!(
            narrate(&[GameEvent::TableSearched { table: 3, found: 0 }]),
            "you rummage table 3.\nthere's nothing here.\n"
        );
        assert_eq!(
            narrate(&[GameEvent::TableSearched { table: 1, found: 1 }]),
            "you rummage table 1.\nyou found 1 lollipop!\n"
        );
        assert_eq!(
            narrate(&[GameEvent::TableSearched { table: 6, found: 4 }]),
            "you rummage table 6.\nyou found 4 lollipops!\n"
        );
    }

    #[test]
    fn combat_round_narration() {
        let out = narrate(&[
            GameEvent::RoundStarted { round: 2 },
            GameEvent::OpponentStruck { prompt: 1, damage: 4, player_hp: 12 },
            GameEvent::ChoiceOffered { options: vec![5, 0] },
            GameEvent::PlayerStruck { option: 0, damage: 7, opponent_hp: 6 },
        ]);
        let expected = "\n--- round 2 ---\n\
            (-_-) mr clark: describe why game loops are important.\n\
            mr clark hits you -4. your hp: 12/20\n\
            your options:\n\
            \x20 1. you explain a tiny prime-check function in python.\n\
            \x20 2. you answer confidently with a neat code solution.\n\
            you: you answer confidently with a neat code solution.\n\
            you deal -7 to mr clark. mr clark hp: 6/20\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn inventory_lines() {
        let out = narrate(&[GameEvent::Inventory { items: 3, hp: 16, has_key: true }]);
        assert_eq!(out, "lollipops: 3\nhp: 16/20\nkey: yes\n");
    }

    #[test]
    fn map_rows_printed_verbatim() {
        let out = narrate(&[
            GameEvent::Moved { x: 1, y: 1 },
            GameEvent::MapShown { rows: vec!["+--+".into(), "|* |".into()] },
        ]);
        assert_eq!(out, "+--+\n|* |\n");
    }

    #[test]
    fn prompt_has_no_newline() {
        let mut r = Renderer::new(Vec::new(), Content::default());
        r.prompt("> ").unwrap();
        assert_eq!(r.into_inner(), b"> ");
    }
}
