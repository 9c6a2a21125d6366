//! Persistent command-line defaults.
//!
//! The defaults file holds flag tokens exactly as they are typed on the
//! command line, one or more per line, with `#` comments. A global file
//! lives in the user's config directory; a `.papersetrc` in the working
//! directory overrides it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::highlight::{HighlightBackground, background_from_colorfgbg};

const APP_DIR: &str = "paperset";
const LOCAL_FILE: &str = ".papersetrc";

/// Background the code highlighting theme is chosen for.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Resolve to a concrete background; `Auto` consults `COLORFGBG`.
    pub fn background(self, colorfgbg: Option<&str>) -> HighlightBackground {
        match self {
            Self::Auto => background_from_colorfgbg(colorfgbg),
            Self::Light => HighlightBackground::Light,
            Self::Dark => HighlightBackground::Dark,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub json: bool,
    pub perf: bool,
    pub no_highlight: bool,
    pub theme: Option<ThemeMode>,
    pub heading_offset: Option<u8>,
    pub output: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets. Switches are or-ed; valued options from `other`
    /// win when set.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            json: self.json || other.json,
            perf: self.perf || other.perf,
            no_highlight: self.no_highlight || other.no_highlight,
            theme: other.theme.or(self.theme),
            heading_offset: other.heading_offset.or(self.heading_offset),
            output: other.output.clone().or_else(|| self.output.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join(APP_DIR).join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# paperset defaults (saved with --save)".to_string()];
    let switches = [
        (flags.watch, "--watch"),
        (flags.json, "--json"),
        (flags.perf, "--perf"),
        (flags.no_highlight, "--no-highlight"),
    ];
    lines.extend(
        switches
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| flag.to_string()),
    );
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(offset) = flags.heading_offset {
        lines.push(format!("--heading-offset {offset}"));
    }
    if let Some(output) = &flags.output {
        lines.push(format!("--output {}", output.display()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of a token list; everything else
/// (program name, file argument, unknown flags) is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let mut value = || {
            inline_value.map(ToOwned::to_owned).or_else(|| {
                let next = tokens.get(i + 1).cloned();
                if next.is_some() {
                    i += 1;
                }
                next
            })
        };

        match name {
            "-w" | "--watch" => flags.watch = true,
            "--json" => flags.json = true,
            "--perf" => flags.perf = true,
            "--no-highlight" => flags.no_highlight = true,
            "--theme" => flags.theme = value().as_deref().and_then(ThemeMode::parse),
            "--heading-offset" => flags.heading_offset = value().and_then(|v| v.parse().ok()),
            "-o" | "--output" => flags.output = value().map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}
