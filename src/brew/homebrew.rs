use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use super::{GreedyFlags, Outdated};
use crate::exec;

/// `brew` driven as a subprocess.
pub struct Homebrew {
    path: PathBuf,
}

impl Homebrew {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn run_brew(&self, args: &[&str]) -> Result<String> {
        let out = exec::run(&self.path, args)?;
        Ok(out.stdout)
    }
}

impl super::PackageManager for Homebrew {
    fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self) -> Result<()> {
        let _ = self.run_brew(&["update"])?;
        info!("brew metadata refreshed");
        Ok(())
    }

    fn outdated(&self, flags: GreedyFlags) -> Result<Outdated> {
        let mut args = vec!["outdated", "--json=v2"];
        args.extend(flags.args());
        let raw = self.run_brew(&args)?;
        Outdated::parse(&raw)
    }
}
