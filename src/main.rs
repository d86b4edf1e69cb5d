use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use brewbar::config::{self, SettingsStore};
use brewbar::tray::{commands, common, model::BrewStatus, render::Renderer};

const LOG_ENV: &str = "BREWBAR_LOG";
const BACKTRACE_ENV: &str = "RUST_BACKTRACE";
const LIB_BACKTRACE_ENV: &str = "RUST_LIB_BACKTRACE";

#[derive(Parser, Debug)]
#[command(
    name = "brewbar",
    version,
    about = "Outdated Homebrew packages for xbar-compatible menu bars",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Without arguments the menu is rendered. Menu items re-invoke the plugin
    /// with `<method> [args...]` to change settings. Every argument goes to the
    /// dispatcher; the host never reads help or version text.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "METHOD")]
    call: Vec<String>,
}

fn main() {
    // The error menu shows a stack trace, so capture one unless the user chose.
    if env::var_os(BACKTRACE_ENV).is_none() && env::var_os(LIB_BACKTRACE_ENV).is_none() {
        env::set_var(LIB_BACKTRACE_ENV, "1");
    }
    init_tracing();

    let program = program_path();
    let renderer = Renderer::new(program.display().to_string(), plugin_name(&program));

    // The host treats a crash or empty output as a broken plugin, so failures
    // become menu content and the exit code stays 0.
    let mut buf = Vec::new();
    let result = Cli::try_parse()
        .map_err(|e| anyhow::Error::from(e).context("parse arguments"))
        .and_then(|cli| run(&cli.call, &program, renderer.clone(), &mut buf));
    if let Err(err) = result {
        error!(error = %format!("{err:#}"), "plugin failed");
        buf.clear();
        if let Err(e) = renderer.render_menu(&common::error_menu(&err), &mut buf) {
            error!(error = %e, "rendering error menu");
        }
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(&buf).and_then(|()| stdout.flush()) {
        error!(error = %e, "writing stdout");
    }
}

fn run(call: &[String], program: &Path, renderer: Renderer, out: &mut Vec<u8>) -> Result<()> {
    let store = SettingsStore::new(config::resolve_config_path(program));
    let mut service = BrewStatus::new(store, renderer).context("initialize plugin")?;
    commands::run(&mut service, call, out)
}

fn init_tracing() {
    // stdout carries the menu protocol; logs go to stderr only.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Path the host launched us by; the settings file and `rpc` calls are relative to it.
fn program_path() -> PathBuf {
    match env::args_os().next().map(PathBuf::from) {
        Some(p) if p.is_absolute() => p,
        _ => env::current_exe().unwrap_or_else(|_| PathBuf::from("brewbar")),
    }
}

fn plugin_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "brewbar".to_string())
}
