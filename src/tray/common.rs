use std::backtrace::BacktraceStatus;

use crate::brew::NotFound;
use crate::config::{Settings, Toggle};
use crate::tray::menu::{Item, MenuItem, MenuSpec};

pub const WARNING_ICON: &str = ":warning:";
pub const INSTALL_URL: &str = "https://brew.sh";

pub fn toggle_title(toggle: Toggle) -> &'static str {
    match toggle {
        Toggle::Greedy => "Greedy",
        Toggle::GreedyLatest => "Greedy latest",
        Toggle::GreedyAutoUpdates => "Greedy auto-updates",
        Toggle::AutoUpdate => "Auto-update metadata",
    }
}

pub fn toggle_hint(toggle: Toggle) -> &'static str {
    match toggle {
        Toggle::Greedy => "--greedy: include casks with auto_updates or version :latest",
        Toggle::GreedyLatest => "--greedy-latest: include casks with version :latest",
        Toggle::GreedyAutoUpdates => "--greedy-auto-updates: include casks with auto_updates",
        Toggle::AutoUpdate => "Run `brew update` before checking for updates",
    }
}

pub fn toggle_label(toggle: Toggle, enabled: bool) -> String {
    let mark = if enabled { "✅" } else { "⬜️" };
    format!("{mark} {}", toggle_title(toggle))
}

pub fn versions_label(installed: &[String]) -> String {
    if installed.is_empty() {
        return "?".to_string();
    }
    installed.join(", ")
}

pub fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Names that "Upgrade All" should pass to brew, in input order.
pub fn upgrade_all_names<'a, I>(names: I, settings: &Settings) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| !settings.is_excluded(name))
        .map(str::to_string)
        .collect()
}

/// Shown when no `brew` executable could be found.
pub fn not_found_menu(not_found: &NotFound) -> MenuSpec {
    MenuSpec::new(vec![
        Item::new(WARNING_ICON).dropdown(false).into(),
        MenuItem::Separator,
        Item::new("Homebrew not found").color("red").into(),
        Item::new(format!(
            "Executable \"{}\" does not exist.",
            not_found.checked.display()
        ))
        .into(),
        MenuItem::Separator,
        Item::new("Visit https://brew.sh/ for installation instructions")
            .href(INSTALL_URL)
            .into(),
    ])
}

/// Menu used when anything on the way to a render fails.
pub fn error_menu(err: &anyhow::Error) -> MenuSpec {
    let message = err.to_string();
    let mut lines = protocol_lines(&message);
    let headline = if lines.is_empty() {
        "Unknown error".to_string()
    } else {
        lines.remove(0)
    };

    let mut details = Item::new(headline).color("red");
    for line in lines {
        details = details.child(Item::new(line));
    }
    for cause in err.chain().skip(1) {
        for (i, line) in protocol_lines(&cause.to_string()).into_iter().enumerate() {
            let label = if i == 0 {
                format!("Caused by: {line}")
            } else {
                line
            };
            details = details.child(Item::new(label));
        }
    }

    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        let frames = protocol_lines(&backtrace.to_string())
            .into_iter()
            .map(|line| Item::new(line).into());
        details = details.separator().child(Item::new("Backtrace").children(frames));
    }

    MenuSpec::new(vec![
        Item::new(WARNING_ICON).dropdown(false).into(),
        MenuItem::Separator,
        details.into(),
    ])
}

// Labels cannot span lines or contain the attribute delimiter.
fn protocol_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end().replace('|', "¦"))
        .filter(|l| !l.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::tray::render::Renderer;

    fn render(menu: &MenuSpec) -> String {
        let mut out = Vec::new();
        Renderer::new("/p/brewbar", "brewbar")
            .render_menu(menu, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn not_found_menu_matches_host_layout() {
        let menu = not_found_menu(&NotFound {
            checked: PathBuf::from("/opt/homebrew/bin/brew"),
        });
        assert_eq!(
            render(&menu),
            ":warning: | dropdown=\"false\"\n\
             ---\n\
             Homebrew not found | color=\"red\"\n\
             Executable \"/opt/homebrew/bin/brew\" does not exist.\n\
             ---\n\
             Visit https://brew.sh/ for installation instructions | href=\"https://brew.sh\"\n"
        );
    }

    #[test]
    fn error_menu_lists_causes_as_children() {
        let err = anyhow::anyhow!("exit 1\nsecond | line").context("brew outdated");
        let out = render(&error_menu(&err));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], ":warning: | dropdown=\"false\"");
        assert_eq!(lines[1], "---");
        assert_eq!(lines[2], "brew outdated | color=\"red\"");
        assert_eq!(lines[3], "--Caused by: exit 1");
        assert_eq!(lines[4], "--second ¦ line");
    }

    #[test]
    fn upgrade_all_skips_excluded() {
        let mut settings = Settings::default();
        settings.exclude(["node"]);
        assert_eq!(
            upgrade_all_names(["wget", "node", "git"], &settings),
            ["wget", "git"]
        );
    }

    #[test]
    fn labels() {
        assert_eq!(plural(1, "cask", "casks"), "1 cask");
        assert_eq!(plural(0, "cask", "casks"), "0 casks");
        assert_eq!(versions_label(&["1.0".into(), "1.1".into()]), "1.0, 1.1");
        assert_eq!(toggle_label(Toggle::Greedy, true), "✅ Greedy");
    }
}
