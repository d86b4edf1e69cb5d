use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

pub const SCHEMA_VERSION: u32 = 1;

/// Env override for the settings file location.
pub const CONFIG_ENV: &str = "BREWBAR_CONFIG";
/// Env override for the brew executable (the host exports plugin vars this way).
pub const BREW_PATH_ENV: &str = "VAR_BREW_PATH";

/// Plugin settings persisted beside the program.
///
/// Keys keep the host's `VAR_*` naming so the host's own variable editor and this
/// plugin read the same file. Missing keys fall back to defaults; keys this version
/// does not know are carried through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub version: u32,

    #[serde(rename = "VAR_GREEDY", default, deserialize_with = "lenient_bool")]
    pub greedy: bool,

    #[serde(rename = "VAR_GREEDY_LATEST", default, deserialize_with = "lenient_bool")]
    pub greedy_latest: bool,

    #[serde(
        rename = "VAR_GREEDY_AUTO_UPDATES",
        default,
        deserialize_with = "lenient_bool"
    )]
    pub greedy_auto_updates: bool,

    /// Run `brew update` before querying.
    #[serde(
        rename = "VAR_AUTO_UPDATE",
        default = "default_true",
        deserialize_with = "lenient_bool_default_true"
    )]
    pub auto_update: bool,

    #[serde(
        rename = "VAR_UPGRADE_ALL_EXCLUDE",
        default,
        deserialize_with = "lenient_list"
    )]
    pub upgrade_all_exclude: Vec<String>,

    #[serde(
        rename = "VAR_BREW_PATH",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_path"
    )]
    pub brew_path: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            greedy: false,
            greedy_latest: false,
            greedy_auto_updates: false,
            auto_update: true,
            upgrade_all_exclude: Vec::new(),
            brew_path: None,
            extra: BTreeMap::new(),
        }
    }
}

/// The boolean settings exposed as menu toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Greedy,
    GreedyLatest,
    GreedyAutoUpdates,
    AutoUpdate,
}

impl Toggle {
    pub const ALL: [Toggle; 4] = [
        Toggle::Greedy,
        Toggle::GreedyLatest,
        Toggle::GreedyAutoUpdates,
        Toggle::AutoUpdate,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Toggle::Greedy => "VAR_GREEDY",
            Toggle::GreedyLatest => "VAR_GREEDY_LATEST",
            Toggle::GreedyAutoUpdates => "VAR_GREEDY_AUTO_UPDATES",
            Toggle::AutoUpdate => "VAR_AUTO_UPDATE",
        }
    }

    /// Name of the RPC handler flipping this toggle.
    pub fn method(self) -> &'static str {
        match self {
            Toggle::Greedy => "toggle_greedy",
            Toggle::GreedyLatest => "toggle_greedy_latest",
            Toggle::GreedyAutoUpdates => "toggle_greedy_auto_updates",
            Toggle::AutoUpdate => "toggle_auto_update",
        }
    }
}

impl Settings {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Greedy => self.greedy,
            Toggle::GreedyLatest => self.greedy_latest,
            Toggle::GreedyAutoUpdates => self.greedy_auto_updates,
            Toggle::AutoUpdate => self.auto_update,
        }
    }

    pub fn set(&mut self, toggle: Toggle, value: bool) {
        let slot = match toggle {
            Toggle::Greedy => &mut self.greedy,
            Toggle::GreedyLatest => &mut self.greedy_latest,
            Toggle::GreedyAutoUpdates => &mut self.greedy_auto_updates,
            Toggle::AutoUpdate => &mut self.auto_update,
        };
        *slot = value;
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.upgrade_all_exclude.iter().any(|n| n == name)
    }

    /// Adds names to the exclusion set. Returns true if anything changed.
    pub fn exclude<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changed = false;
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || self.is_excluded(name) {
                continue;
            }
            self.upgrade_all_exclude.push(name.to_string());
            changed = true;
        }
        if changed {
            self.upgrade_all_exclude.sort_unstable();
        }
        changed
    }

    /// Removes names from the exclusion set. Returns true if anything changed.
    pub fn include<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.upgrade_all_exclude.len();
        for name in names {
            let name = name.as_ref().trim();
            self.upgrade_all_exclude.retain(|n| n != name);
        }
        before != self.upgrade_all_exclude.len()
    }

    /// Brew path override: environment first, then the settings file.
    pub fn brew_path_override(&self) -> Option<PathBuf> {
        if let Ok(p) = env::var(BREW_PATH_ENV) {
            if !p.trim().is_empty() {
                return Some(PathBuf::from(p.trim()));
            }
        }
        self.brew_path.as_deref().map(PathBuf::from)
    }
}

/// Settings file handle. Reads are tolerant of a missing file; writes overwrite it whole.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Settings> {
        let root = read_json_or_empty_object(&self.path)?;
        if !root.is_object() {
            return Err(anyhow!(
                "settings root must be a JSON object ({})",
                self.path.display()
            ));
        }
        let mut settings: Settings = serde_json::from_value(root)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        if settings.version == 0 {
            debug!(path = %self.path.display(), "upgrading unversioned settings");
            settings.version = SCHEMA_VERSION;
        }
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create settings dir {}", parent.display()))?;
            }
        }

        let mut s = serde_json::to_string_pretty(settings).context("serialize settings")?;
        s.push('\n');
        fs::write(&self.path, s.as_bytes())
            .with_context(|| format!("write {}", self.path.display()))?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Load, apply `f`, save.
    pub fn update<F>(&self, f: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load()?;
        f(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}

/// `BREWBAR_CONFIG` if set, otherwise `<program dir>/<program file name>.vars.json`.
pub fn resolve_config_path(program: &Path) -> PathBuf {
    if let Ok(p) = env::var(CONFIG_ENV) {
        if !p.trim().is_empty() {
            return PathBuf::from(p);
        }
    }

    let file_name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "brewbar".to_string());
    let dir = program.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{file_name}.vars.json"))
}

fn read_json_or_empty_object(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let bytes = fs::read(path).with_context(|| format!("reading settings {}", path.display()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    let v: Value =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(v)
}

fn default_true() -> bool {
    true
}

// The host stores variables as strings in older files; accept both shapes.
// Values that are neither keep the field's default.
fn lenient_bool<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(bool_value(Value::deserialize(de)?).unwrap_or(false))
}

fn lenient_bool_default_true<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(bool_value(Value::deserialize(de)?).unwrap_or_else(default_true))
}

fn bool_value(v: Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(b),
        Value::String(s) => parse_bool(&s),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

fn lenient_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let mut names: Vec<String> = match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    names.retain(|n| !n.trim().is_empty());
    names.sort_unstable();
    names.dedup();
    Ok(names)
}

fn lenient_path<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Parses the textual booleans used on the RPC command line.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
