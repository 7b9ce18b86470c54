/// Command parsing for the exploration prompt.
///
/// One command per line, trimmed and case-insensitive.
/// ┌──────────────────────────────────┬───────────┐
/// │ Input                            │ Command   │
/// ├──────────────────────────────────┼───────────┤
/// │ w a s d / up down left right     │ Move      │
/// │ move <any of the above>          │ Move      │
/// │ look                             │ Look      │
/// │ interact / e                     │ Interact  │
/// │ map / m                          │ Map       │
/// │ inventory / i                    │ Inventory │
/// │ help / h                         │ Help      │
/// │ quit / q / exit                  │ Quit      │
/// │ anything else (incl. empty)      │ Unknown   │
/// └──────────────────────────────────┴───────────┘

use crate::domain::entity::MoveDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(MoveDir),
    Look,
    Interact,
    Map,
    Inventory,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let cmd = line.trim().to_lowercase();
        let mut words = cmd.split_whitespace();
        let (first, rest) = (words.next().unwrap_or(""), words.next());

        if first == "move" {
            return match rest.and_then(direction) {
                Some(dir) => Command::Move(dir),
                None => Command::Unknown(cmd),
            };
        }
        if rest.is_some() {
            return Command::Unknown(cmd);
        }
        if let Some(dir) = direction(first) {
            return Command::Move(dir);
        }
        match first {
            "look" => Command::Look,
            "interact" | "e" => Command::Interact,
            "map" | "m" => Command::Map,
            "inventory" | "i" => Command::Inventory,
            "help" | "h" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Unknown(cmd),
        }
    }
}

fn direction(word: &str) -> Option<MoveDir> {
    match word {
        "w" | "up" => Some(MoveDir::Up),
        "s" | "down" => Some(MoveDir::Down),
        "a" | "left" => Some(MoveDir::Left),
        "d" | "right" => Some(MoveDir::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_aliases() {
        for (s, d) in [
            ("w", MoveDir::Up),
            ("UP", MoveDir::Up),
            ("  s ", MoveDir::Down),
            ("left", MoveDir::Left),
            ("d", MoveDir::Right),
            ("move up", MoveDir::Up),
            ("Move  A", MoveDir::Left),
        ] {
            assert_eq!(Command::parse(s), Command::Move(d), "input {s:?}");
        }
    }

    #[test]
    fn word_commands() {
        assert_eq!(Command::parse("look"), Command::Look);
        assert_eq!(Command::parse("E"), Command::Interact);
        assert_eq!(Command::parse("interact"), Command::Interact);
        assert_eq!(Command::parse("m"), Command::Map);
        assert_eq!(Command::parse("inventory"), Command::Inventory);
        assert_eq!(Command::parse("h"), Command::Help);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("Q"), Command::Quit);
    }

    #[test]
    fn unknown_inputs() {
        for s in ["", "   ", "move", "move north", "jump", "look around", "ww"] {
            assert!(matches!(Command::parse(s), Command::Unknown(_)), "input {s:?}");
        }
    }
}
