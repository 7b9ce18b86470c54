/// Entry point and game loop.

mod config;
mod content;
mod domain;
mod error;
mod sim;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use config::GameConfig;
use content::Content;
use sim::level;
use sim::session::{Pools, Session};
use sim::world::World;
use ui::input::{BufferedInput, Line, LineSource, TerminalInput};
use ui::renderer::Renderer;

#[derive(Parser, Debug)]
#[command(name = "classroom-escape")]
#[command(about = "Escape a locked classroom: explore, collect lollipops, outwit mr clark")]
#[command(version)]
struct Cli {
    /// Configuration file (default: config.toml next to the binary or in the CWD)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Room image; overrides `[images] room`
    #[arg(long)]
    room: Option<PathBuf>,

    /// Door image; overrides `[images] door`
    #[arg(long)]
    door: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible room
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the opening scene
    #[arg(long)]
    skip_intro: bool,

    /// Verbose logging to stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line values win over the config file.
    fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(room) = &self.room {
            config.images.room = vec![room.clone()];
        }
        if let Some(door) = &self.door {
            config.images.door = vec![door.clone()];
        }
        if self.seed.is_some() {
            config.game.seed = self.seed;
        }
        if self.skip_intro {
            config.game.skip_intro = true;
        }
        config
    }
}

/// How the game loop ended. Every variant exits with status 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    Escaped,
    Quit,
    Interrupted,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.apply(GameConfig::load(cli.config.as_deref()));
    debug!("config: {:?}", config);
    let content = Content::load(config.content_file.as_deref());

    let rng = match config.game.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = build_session(&config, &content, rng);
    debug!("tables: {:?}", session.world().tables());
    install_interrupt_handler(interrupt_notice(&content));
    let mut renderer = Renderer::new(io::stdout(), content);

    let exit = if io::stdin().is_tty() {
        let mut input = TerminalInput::new(io::stdout());
        game_loop(&mut session, &mut renderer, &mut input, config.game.skip_intro)
    } else {
        let mut input = BufferedInput::new(io::stdin().lock());
        game_loop(&mut session, &mut renderer, &mut input, config.game.skip_intro)
    }
    .context("failed to write to the terminal")?;

    info!(
        "game over: {:?} (items {}, hp {}, opponent hp {})",
        exit,
        session.player().items,
        session.player().hp,
        session.opponent().hp
    );
    Ok(())
}

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

/// SIGINT outside raw mode (piped stdin, or while output is being written)
/// says goodbye the same way the in-game interrupt does and exits 0.
fn install_interrupt_handler(notice: String) {
    let result = ctrlc::set_handler(move || {
        let mut out = io::stdout();
        let _ = out.write_all(notice.as_bytes());
        let _ = out.flush();
        std::process::exit(0);
    });
    if let Err(e) = result {
        warn!("could not install interrupt handler: {e}");
    }
}

fn build_session<R: Rng>(config: &GameConfig, content: &Content, mut rng: R) -> Session<R> {
    let room = level::load_room(config);
    let door = level::load_door(config);
    let world = World::build(room, door.grid, config.game.item_total, &mut rng);
    let pools = Pools {
        prompts: content.prompts.len(),
        responses: content.responses.len(),
    };
    Session::new(world, pools, rng)
}

// ══════════════════════════════════════════════════════════════
// Game loop
// ══════════════════════════════════════════════════════════════

fn game_loop<R: Rng, W: Write>(
    session: &mut Session<R>,
    renderer: &mut Renderer<W>,
    input: &mut dyn LineSource,
    skip_intro: bool,
) -> io::Result<Exit> {
    renderer.hint()?;

    if !skip_intro && input.is_interactive() && !session.flags().first_scene_shown() {
        if let Some(exit) = play_intro(renderer, input)? {
            return Ok(exit);
        }
    }
    session.mark_intro_shown();

    renderer.lines(&session.render())?;
    renderer.help()?;

    loop {
        if session.flags().escaped() {
            let text = renderer.content().victory.clone();
            renderer.line(&text)?;
            renderer.flush()?;
            return Ok(Exit::Escaped);
        }

        let prompt = if session.in_combat() {
            renderer.content().choice_prompt.clone()
        } else {
            renderer.content().prompt.clone()
        };
        renderer.prompt(&prompt)?;

        match input.read_line()? {
            Line::Text(line) => {
                let events = session.step(&line);
                renderer.narrate(&events)?;
                if session.is_finished() && !session.flags().escaped() {
                    return Ok(Exit::Quit);
                }
            }
            Line::Interrupted | Line::Eof => return interrupted(renderer),
        }
    }
}

/// The opening scene: one line at a time, each acknowledged with a lone space.
fn play_intro<W: Write>(
    renderer: &mut Renderer<W>,
    input: &mut dyn LineSource,
) -> io::Result<Option<Exit>> {
    let c = renderer.content().clone();
    for text in &c.intro {
        renderer.line(text)?;
        loop {
            renderer.prompt(&c.intro_prompt)?;
            match input.read_line()? {
                Line::Text(s) if s == " " => break,
                Line::Text(_) => renderer.line(&c.intro_reminder)?,
                Line::Interrupted | Line::Eof => return interrupted(renderer).map(Some),
            }
        }
    }
    Ok(None)
}

fn interrupted<W: Write>(renderer: &mut Renderer<W>) -> io::Result<Exit> {
    let notice = interrupt_notice(renderer.content());
    renderer.prompt(&notice)?;
    Ok(Exit::Interrupted)
}

fn interrupt_notice(content: &Content) -> String {
    format!("\n{}\n", content.interrupted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MoveDir;
    use crate::sim::level::{GridSource, LoadedGrid};
    use crate::sim::route::route;
    use std::collections::VecDeque;
    use std::io::Cursor;

    struct Script {
        lines: VecDeque<Line>,
        interactive: bool,
    }

    impl Script {
        fn new(lines: &[&str], interactive: bool) -> Self {
            Script {
                lines: lines.iter().map(|l| Line::Text(l.to_string())).collect(),
                interactive,
            }
        }
    }

    impl LineSource for Script {
        fn read_line(&mut self) -> io::Result<Line> {
            Ok(self.lines.pop_front().unwrap_or(Line::Eof))
        }

        fn is_interactive(&self) -> bool {
            self.interactive
        }
    }

    fn session(seed: u64) -> Session<StdRng> {
        let mut rng = StdRng::seed_from_u64(seed);
        let room = LoadedGrid { grid: level::embedded_room(), source: GridSource::Embedded };
        let world = World::build(room, level::embedded_door(), 5, &mut rng);
        Session::new(world, Pools { prompts: 7, responses: 6 }, rng)
    }

    fn play(s: &mut Session<StdRng>, input: &mut dyn LineSource, skip: bool) -> (Exit, String) {
        let mut r = Renderer::new(Vec::new(), Content::default());
        let exit = game_loop(s, &mut r, input, skip).unwrap();
        (exit, String::from_utf8(r.into_inner()).unwrap())
    }

    fn keys(steps: &[MoveDir]) -> Vec<String> {
        steps
            .iter()
            .map(|d| match d {
                MoveDir::Up => "w",
                MoveDir::Down => "s",
                MoveDir::Left => "a",
                MoveDir::Right => "d",
            })
            .map(String::from)
            .collect()
    }

    #[test]
    fn quit_prints_bye() {
        let mut s = session(0);
        let mut input = BufferedInput::new(Cursor::new("look\nq\nlook\n"));
        let (exit, out) = play(&mut s, &mut input, false);
        assert_eq!(exit, Exit::Quit);
        assert!(out.starts_with("move with w/a/s/d."));
        // spawn (1, 4) is against the wall, so only the marker fits
        assert!(out.contains("\n|*    "));
        assert!(out.contains("commands:"));
        assert!(out.contains("you see desks"));
        assert!(out.ends_with("> bye.\n"));
        // piped input never sees the opening scene
        assert!(!out.contains("you wake up"));
    }

    #[test]
    fn garbled_input_is_an_unknown_command() {
        let mut s = session(0);
        let mut input = BufferedInput::new(Cursor::new(&b"look\n\xff\xfe\nlook\nq\n"[..]));
        let (exit, out) = play(&mut s, &mut input, false);
        assert_eq!(exit, Exit::Quit);
        assert_eq!(out.matches("unknown command. type help").count(), 1);
        assert_eq!(out.matches("you see desks").count(), 2);
        assert!(out.ends_with("> bye.\n"));
    }

    #[test]
    fn eof_exits_cleanly() {
        let mut s = session(0);
        let mut input = BufferedInput::new(Cursor::new("jump\n"));
        let (exit, out) = play(&mut s, &mut input, false);
        assert_eq!(exit, Exit::Interrupted);
        assert!(out.contains("unknown command. type help"));
        assert!(out.ends_with("\nexiting\n"));
    }

    #[test]
    fn signal_notice_matches_in_game_interrupt() {
        let mut s = session(0);
        let mut input = Script::new(&[], false);
        input.lines.push_back(Line::Interrupted);
        let (_, out) = play(&mut s, &mut input, true);
        let notice = interrupt_notice(&Content::default());
        assert_eq!(notice, "\nexiting\n");
        assert!(out.ends_with(&format!("> {notice}")));
    }

    #[test]
    fn intro_waits_for_space() {
        let mut s = session(0);
        let mut lines = vec!["x", " "];
        lines.extend(std::iter::repeat(" ").take(24));
        lines.push("q");
        let mut input = Script::new(&lines, true);
        let (exit, out) = play(&mut s, &mut input, false);
        assert_eq!(exit, Exit::Quit);
        assert_eq!(out.matches("press the spacebar then enter like it asks.").count(), 1);
        assert_eq!(out.matches("(press space then enter to continue) ").count(), 26);
        assert!(out.contains("(find your way out)"));
        assert!(s.flags().first_scene_shown());
    }

    #[test]
    fn interrupt_during_intro() {
        let mut s = session(0);
        let mut input = Script::new(&[" "], true);
        input.lines.push_back(Line::Interrupted);
        let (exit, out) = play(&mut s, &mut input, false);
        assert_eq!(exit, Exit::Interrupted);
        assert!(out.ends_with("\nexiting\n"));
        assert!(!out.contains("commands:"));
    }

    #[test]
    fn skip_intro_flag() {
        let mut s = session(0);
        let mut input = Script::new(&["q"], true);
        let (_, out) = play(&mut s, &mut input, true);
        assert!(!out.contains("you wake up"));
    }

    #[test]
    fn combat_prompts_for_choice() {
        let mut s = session(3);
        let mut lines = keys(&route(s.world().room(), s.world().spawn(), (10, 6)).unwrap());
        lines.extend(["e", "9", "1", "q"].map(String::from));
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut input = Script::new(&refs, false);
        let (exit, out) = play(&mut s, &mut input, true);
        assert!(out.contains("uh oh, it's mr clark."));
        assert!(out.contains("mr clark stares at you. battle begins."));
        assert!(out.contains("choose 1 or 2: type 1 or 2\n"));
        assert!(out.contains("--- round 2 ---"));
        // "q" arrives while a choice is pending and is rejected
        assert!(out.ends_with("choose 1 or 2: type 1 or 2\nchoose 1 or 2: \nexiting\n"));
        assert_eq!(exit, Exit::Interrupted);
    }

    #[test]
    fn full_escape_ends_loop() {
        let mut s = session(5);
        let world = s.world().clone();
        let mut at = world.spawn();
        let mut lines: Vec<String> = vec![];
        let mut go = |to: (usize, usize), lines: &mut Vec<String>| {
            lines.extend(keys(&route(world.room(), at, to).unwrap()));
            at = to;
        };

        go((42, 4), &mut lines);
        lines.push("e".into());
        for x in [5, 15, 25] {
            go((x, 2), &mut lines);
            lines.push("e".into());
            go((x, 4), &mut lines);
            lines.push("e".into());
        }
        go((10, 6), &mut lines);
        lines.extend(["e", "1", "2", "1"].map(String::from));
        go((42, 4), &mut lines);
        lines.extend(["e", "look", "look"].map(String::from));

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut input = Script::new(&refs, false);
        let (exit, out) = play(&mut s, &mut input, true);

        assert_eq!(exit, Exit::Escaped);
        assert!(out.contains("the door is still locked."));
        assert!(out.contains("he tosses you a small key."));
        assert!(out.ends_with(
            "you use the key and the main door opens. you escaped k13.\n\
             congrats. you escaped k13. game over.\n"
        ));
        assert!(!out.contains("you see desks"));
        assert_eq!(input.lines.len(), 2);
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "classroom-escape",
            "--room",
            "r.png",
            "--seed",
            "7",
            "--skip-intro",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        let cfg = cli.apply(GameConfig::default());
        assert_eq!(cfg.images.room, vec![PathBuf::from("r.png")]);
        assert_eq!(cfg.images.door, GameConfig::default().images.door);
        assert_eq!(cfg.game.seed, Some(7));
        assert!(cfg.game.skip_intro);
    }
}
