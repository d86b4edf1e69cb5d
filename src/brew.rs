use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::Settings;

mod homebrew;

pub use homebrew::Homebrew;

/// Install locations checked when `brew` is neither configured nor on PATH.
pub const WELL_KNOWN_PATHS: [&str; 3] = [
    "/opt/homebrew/bin/brew",
    "/usr/local/bin/brew",
    "/home/linuxbrew/.linuxbrew/bin/brew",
];

/// An outdated formula as reported by `brew outdated --json=v2`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Formula {
    pub name: String,
    /// Oldest first; the last entry is the active one.
    #[serde(default)]
    pub installed_versions: Vec<String>,
    #[serde(rename = "current_version")]
    pub latest_version: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub pinned_version: Option<String>,
}

impl Formula {
    pub fn current_version(&self) -> &str {
        self.installed_versions
            .last()
            .map(String::as_str)
            .unwrap_or("?")
    }
}

/// An outdated cask. Casks have a single installed version and cannot be pinned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cask {
    pub name: String,
    #[serde(rename = "installed_versions", deserialize_with = "single_version")]
    pub installed_version: String,
    #[serde(rename = "current_version")]
    pub latest_version: String,
}

/// Parsed outdated report for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Outdated {
    #[serde(default)]
    pub formulae: Vec<Formula>,
    #[serde(default)]
    pub casks: Vec<Cask>,
}

impl Outdated {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing `brew outdated --json=v2` output")
    }

    pub fn unpinned_formulae(&self) -> impl Iterator<Item = &Formula> {
        self.formulae.iter().filter(|f| !f.pinned)
    }

    pub fn pinned_formulae(&self) -> impl Iterator<Item = &Formula> {
        self.formulae.iter().filter(|f| f.pinned)
    }

    /// Packages that an upgrade would touch.
    pub fn upgradable_count(&self) -> usize {
        self.unpinned_formulae().count() + self.casks.len()
    }
}

// Older brew releases report a plain string, newer ones a list.
fn single_version<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(de)? {
        OneOrMany::One(v) => v,
        OneOrMany::Many(vs) => vs.into_iter().last().unwrap_or_default(),
    })
}

/// The `--greedy*` switches passed to `outdated` and cask upgrades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyFlags {
    pub greedy: bool,
    pub latest: bool,
    pub auto_updates: bool,
}

impl GreedyFlags {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            greedy: settings.greedy,
            latest: settings.greedy_latest,
            auto_updates: settings.greedy_auto_updates,
        }
    }

    pub fn args(&self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.greedy {
            args.push("--greedy");
        }
        if self.latest {
            args.push("--greedy-latest");
        }
        if self.auto_updates {
            args.push("--greedy-auto-updates");
        }
        args
    }
}

/// Operations the status menu needs from the package manager.
pub trait PackageManager {
    fn path(&self) -> &Path;
    fn update(&self) -> Result<()>;
    fn outdated(&self, flags: GreedyFlags) -> Result<Outdated>;
}

/// Resolution order: override, PATH lookup, well-known install locations.
#[derive(Debug, Clone)]
pub struct BrewLocator {
    pub override_path: Option<PathBuf>,
    /// PATH value to search; `None` skips the lookup.
    pub search_path: Option<OsString>,
    pub fixed_paths: Vec<PathBuf>,
}

/// `brew` could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    /// The path reported to the user.
    pub checked: PathBuf,
}

impl BrewLocator {
    pub fn from_env(settings: &Settings) -> Self {
        Self {
            override_path: settings.brew_path_override(),
            search_path: std::env::var_os("PATH"),
            fixed_paths: WELL_KNOWN_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn locate(&self) -> Result<PathBuf, NotFound> {
        if let Some(path) = self.override_path.as_deref() {
            if path.is_file() {
                debug!(path = %path.display(), "brew from override");
                return Ok(path.to_path_buf());
            }
        }

        if let Some(search_path) = self.search_path.as_deref() {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
            if let Ok(path) = which::which_in("brew", Some(search_path), cwd) {
                debug!(path = %path.display(), "brew from PATH");
                return Ok(path);
            }
        }

        if let Some(path) = self.fixed_paths.iter().find(|p| p.is_file()) {
            debug!(path = %path.display(), "brew from well-known location");
            return Ok(path.clone());
        }

        let checked = self
            .override_path
            .clone()
            .or_else(|| self.fixed_paths.first().cloned())
            .unwrap_or_else(|| PathBuf::from("brew"));
        Err(NotFound { checked })
    }
}
