/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), or from an
/// explicit path given on the command line.
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::tile::WALK_THRESHOLD;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub images: ImageConfig,
    pub grid: GridConfig,
    pub game: RulesConfig,
    pub content_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ImageConfig {
    /// Candidate room images; the first that exists is used.
    pub room: Vec<PathBuf>,
    /// Candidate door images; the first that exists is used.
    pub door: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GridConfig {
    pub max_width: u32,
    pub min_width: u32,
    pub vertical_scale: f32,
    pub walk_threshold: u8,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub item_total: u32,
    pub seed: Option<u64>,
    pub skip_intro: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    images: TomlImages,
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlImages {
    #[serde(default = "default_room_images")]
    room: Vec<String>,
    #[serde(default = "default_door_images")]
    door: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_max_width")]
    max_width: u32,
    #[serde(default = "default_min_width")]
    min_width: u32,
    #[serde(default = "default_vertical_scale")]
    vertical_scale: f32,
    #[serde(default = "default_walk_threshold")]
    walk_threshold: u8,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_item_total")]
    item_total: u32,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    skip_intro: bool,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    content_file: Option<String>,
}

// ── Defaults ──

fn default_room_images() -> Vec<String> { vec!["room.png".into(), "assets/room.png".into()] }
fn default_door_images() -> Vec<String> { vec!["door.png".into(), "assets/door.png".into()] }
fn default_max_width() -> u32 { 120 }
fn default_min_width() -> u32 { 40 }
fn default_vertical_scale() -> f32 { 0.45 }   // terminal cells are ~2x taller than wide
fn default_walk_threshold() -> u8 { WALK_THRESHOLD }
fn default_item_total() -> u32 { 5 }

impl Default for TomlImages {
    fn default() -> Self {
        TomlImages {
            room: default_room_images(),
            door: default_door_images(),
        }
    }
}

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            max_width: default_max_width(),
            min_width: default_min_width(),
            vertical_scale: default_vertical_scale(),
            walk_threshold: default_walk_threshold(),
        }
    }
}

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            item_total: default_item_total(),
            seed: None,
            skip_intro: false,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `explicit` if given, otherwise search for `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = match explicit {
            Some(path) => read_toml(path).unwrap_or_default(),
            None => load_toml(&search_dirs),
        };
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let mut grid = GridConfig {
            max_width: cfg.grid.max_width,
            min_width: cfg.grid.min_width,
            vertical_scale: cfg.grid.vertical_scale,
            walk_threshold: cfg.grid.walk_threshold,
        };
        if grid.min_width > grid.max_width {
            warn!(
                "grid.min_width {} exceeds max_width {}; swapping",
                grid.min_width, grid.max_width
            );
            std::mem::swap(&mut grid.min_width, &mut grid.max_width);
        }
        if !(grid.vertical_scale.is_finite() && grid.vertical_scale > 0.0) {
            warn!("grid.vertical_scale {} is not positive; using default", grid.vertical_scale);
            grid.vertical_scale = default_vertical_scale();
        }

        GameConfig {
            images: ImageConfig {
                room: resolve_all(&cfg.images.room, search_dirs),
                door: resolve_all(&cfg.images.door, search_dirs),
            },
            grid,
            game: RulesConfig {
                item_total: cfg.game.item_total,
                seed: cfg.game.seed,
                skip_intro: cfg.game.skip_intro,
            },
            content_file: cfg.general.content_file.map(|p| resolve(&p, search_dirs)),
        }
    }

    /// First room image candidate that exists on disk.
    pub fn room_image(&self) -> Option<&Path> {
        first_existing(&self.images.room)
    }

    /// First door image candidate that exists on disk.
    pub fn door_image(&self) -> Option<&Path> {
        first_existing(&self.images.door)
    }
}

fn first_existing(paths: &[PathBuf]) -> Option<&Path> {
    paths.iter().map(PathBuf::as_path).find(|p| p.exists())
}

/// Relative paths are looked up in each search dir; the first hit wins,
/// otherwise the path stays relative to the CWD.
fn resolve(path: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return p;
    }
    search_dirs
        .iter()
        .map(|d| d.join(path))
        .find(|c| c.exists())
        .unwrap_or(p)
}

fn resolve_all(paths: &[String], search_dirs: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().map(|p| resolve(p, search_dirs)).collect()
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            if let Some(cfg) = read_toml(&path) {
                return cfg;
            }
            return TomlConfig::default();
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!("{} parse error: {e}; using default settings", path.display());
                None
            }
        },
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GameConfig, toml::de::Error> {
        Ok(GameConfig::from_toml(toml::from_str::<TomlConfig>(text)?, &[]))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.grid.max_width, 120);
        assert_eq!(cfg.grid.min_width, 40);
        assert!((cfg.grid.vertical_scale - 0.45).abs() < 1e-6);
        assert_eq!(cfg.grid.walk_threshold, 160);
        assert_eq!(cfg.game.item_total, 5);
        assert_eq!(cfg.game.seed, None);
        assert!(!cfg.game.skip_intro);
        assert_eq!(cfg.images.room[0], PathBuf::from("room.png"));
        assert!(cfg.content_file.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(
            r#"
            [game]
            seed = 42
            [grid]
            max_width = 80
            "#,
        )
        .unwrap();
        assert_eq!(cfg.game.seed, Some(42));
        assert_eq!(cfg.game.item_total, 5);
        assert_eq!(cfg.grid.max_width, 80);
        assert_eq!(cfg.grid.min_width, 40);
    }

    #[test]
    fn inverted_widths_are_swapped() {
        let cfg = parse("[grid]\nmax_width = 30\nmin_width = 90\n").unwrap();
        assert_eq!(cfg.grid.min_width, 30);
        assert_eq!(cfg.grid.max_width, 90);
    }

    #[test]
    fn bad_scale_falls_back() {
        let cfg = parse("[grid]\nvertical_scale = -1.0\n").unwrap();
        assert!((cfg.grid.vertical_scale - 0.45).abs() < 1e-6);
    }

    #[test]
    fn wrong_types_are_errors() {
        assert!(parse("[game]\nitem_total = \"many\"\n").is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[game]\nitem_total = 9\nskip_intro = true\n").unwrap();
        let cfg = GameConfig::load(Some(&path));
        assert_eq!(cfg.game.item_total, 9);
        assert!(cfg.game.skip_intro);
    }

    #[test]
    fn unreadable_explicit_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GameConfig::load(Some(&dir.path().join("nope.toml")));
        assert_eq!(cfg.game.item_total, 5);
    }

    #[test]
    fn first_existing_image_wins() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.png");
        std::fs::write(&b, b"x").unwrap();
        let mut cfg = GameConfig::default();
        cfg.images.room = vec![dir.path().join("a.png"), b.clone()];
        assert_eq!(cfg.room_image(), Some(b.as_path()));
        cfg.images.door = vec![dir.path().join("c.png")];
        assert_eq!(cfg.door_image(), None);
    }
}
