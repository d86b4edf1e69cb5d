use std::{io::Write, path::Path};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::brew::{BrewLocator, Cask, Formula, GreedyFlags, Homebrew, Outdated, PackageManager};
use crate::config::{self, Settings, SettingsStore, Toggle};
use crate::tray::commands::{Arity, Method, RpcError, RpcService, RpcTable};
use crate::tray::common;
use crate::tray::menu::{Item, MenuSpec};
use crate::tray::render::Renderer;

/// The status menu for outdated Homebrew packages, plus the handlers its items call.
pub struct BrewStatus {
    store: SettingsStore,
    settings: Settings,
    renderer: Renderer,
    locator: BrewLocator,
}

impl BrewStatus {
    pub fn new(store: SettingsStore, renderer: Renderer) -> Result<Self> {
        let settings = store.load().context("load settings")?;
        let locator = BrewLocator::from_env(&settings);
        Ok(Self {
            store,
            settings,
            renderer,
            locator,
        })
    }

    pub fn with_locator(mut self, locator: BrewLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Refresh, query and render against an already located package manager.
    pub fn render_with(&self, brew: &dyn PackageManager, out: &mut dyn Write) -> Result<()> {
        if self.settings.auto_update {
            // Usually another update is already running; the query below still works.
            if let Err(err) = brew.update() {
                warn!(error = %format!("{err:#}"), "brew update failed, continuing");
            }
        }

        let outdated = brew
            .outdated(GreedyFlags::from_settings(&self.settings))
            .context("query outdated packages")?;
        info!(
            formulae = outdated.formulae.len(),
            casks = outdated.casks.len(),
            "outdated packages"
        );

        let menu = self.menu_spec(brew.path(), &outdated);
        self.renderer
            .render_menu(&menu, out)
            .context("write menu")?;
        Ok(())
    }

    pub fn menu_spec(&self, brew: &Path, outdated: &Outdated) -> MenuSpec {
        let brew = brew.display().to_string();
        let greedy = GreedyFlags::from_settings(&self.settings);
        let unpinned: Vec<&Formula> = outdated.unpinned_formulae().collect();
        let pinned: Vec<&Formula> = outdated.pinned_formulae().collect();

        let mut menu = MenuSpec::default();
        menu.push(Item::new(format!("↑{}", outdated.upgradable_count())).dropdown(false));
        menu.separator();
        menu.push(self.settings_menu(&brew));
        menu.push(self.status_menu(&brew, greedy, &unpinned, &outdated.casks, pinned.len()));

        if unpinned.is_empty() && outdated.casks.is_empty() && pinned.is_empty() {
            menu.separator();
            menu.push(Item::new("Everything is up to date ✨"));
            return menu;
        }

        if !unpinned.is_empty() {
            menu.separator();
            let entries = unpinned.iter().map(|f| self.formula_menu(&brew, f).into());
            menu.push(Item::new(format!("Formulae ({})", unpinned.len())).children(entries));
        }

        if !outdated.casks.is_empty() {
            menu.separator();
            let entries = outdated
                .casks
                .iter()
                .map(|c| self.cask_menu(&brew, greedy, c).into());
            menu.push(Item::new(format!("Casks ({})", outdated.casks.len())).children(entries));
        }

        if !pinned.is_empty() {
            menu.separator();
            let entries = pinned.iter().map(|f| pinned_menu(&brew, f).into());
            menu.push(Item::new(format!("Pinned ({})", pinned.len())).children(entries));
        }

        menu
    }

    fn settings_menu(&self, brew: &str) -> Item {
        let mut item = Item::new("Settings");
        for toggle in Toggle::ALL {
            let enabled = self.settings.get(toggle);
            item = item.child(
                Item::new(common::toggle_label(toggle, enabled))
                    .alt(common::toggle_hint(toggle))
                    .rpc([toggle.method(), if enabled { "false" } else { "true" }])
                    .terminal(false)
                    .refresh(),
            );
        }
        item.separator()
            .child(Item::new(format!("brew: {brew}")).color("gray"))
            .child(
                Item::new(format!("Settings file: {}", self.store.path().display()))
                    .color("gray"),
            )
    }

    fn status_menu(
        &self,
        brew: &str,
        greedy: GreedyFlags,
        formulae: &[&Formula],
        casks: &[Cask],
        pinned: usize,
    ) -> Item {
        let formula_names =
            common::upgrade_all_names(formulae.iter().map(|f| f.name.as_str()), &self.settings);
        let cask_names =
            common::upgrade_all_names(casks.iter().map(|c| c.name.as_str()), &self.settings);

        let mut all_cmd = vec![brew.to_string(), "upgrade".to_string()];
        all_cmd.extend(greedy.args().into_iter().map(String::from));
        all_cmd.extend(formula_names.iter().chain(&cask_names).cloned());

        let mut formula_cmd = vec![brew.to_string(), "upgrade".into(), "--formula".into()];
        formula_cmd.extend(formula_names.iter().cloned());

        let mut cask_cmd = vec![brew.to_string(), "upgrade".into(), "--cask".into()];
        cask_cmd.extend(greedy.args().into_iter().map(String::from));
        cask_cmd.extend(cask_names.iter().cloned());

        let mut item = Item::new("Status")
            .child(Item::new(format!(
                "Formulae: {} outdated, {} pinned",
                formulae.len(),
                pinned
            )))
            .child(Item::new(format!("Casks: {} outdated", casks.len())))
            .separator()
            .child(upgrade_all_item(
                "Upgrade All",
                formula_names.len() + cask_names.len(),
                all_cmd,
            ))
            .child(upgrade_all_item(
                "Upgrade All Formulae",
                formula_names.len(),
                formula_cmd,
            ))
            .child(upgrade_all_item(
                "Upgrade All Casks",
                cask_names.len(),
                cask_cmd,
            ));

        let excluded = &self.settings.upgrade_all_exclude;
        if !excluded.is_empty() {
            let mut breakdown =
                Item::new(format!("Excluded from Upgrade All ({})", excluded.len()));
            for name in excluded {
                breakdown = breakdown.child(
                    Item::new(name.as_str()).child(
                        Item::new("✅ Include in Upgrade All")
                            .rpc(["remove_from_exclusion_set", name.as_str()])
                            .terminal(false)
                            .refresh(),
                    ),
                );
            }
            let mut include_all = vec!["remove_from_exclusion_set".to_string()];
            include_all.extend(excluded.iter().cloned());
            breakdown = breakdown.separator().child(
                Item::new("Include All")
                    .rpc(include_all)
                    .terminal(false)
                    .refresh(),
            );
            item = item.separator().child(breakdown);
        }

        item.separator()
            .child(Item::new("🔄 Refresh").refresh())
            .child(
                Item::new("🧹 Cleanup")
                    .shell([brew, "cleanup"])
                    .terminal(true)
                    .refresh(),
            )
            .child(Item::new("🩺 Doctor").shell([brew, "doctor"]).terminal(true))
    }

    fn formula_menu(&self, brew: &str, formula: &Formula) -> Item {
        let name = formula.name.as_str();
        let current = formula.current_version();

        package_header(name, self.settings.is_excluded(name))
            .child(Item::new(format!(
                "Installed: {}",
                common::versions_label(&formula.installed_versions)
            )))
            .child(Item::new(format!("Latest: {}", formula.latest_version)))
            .separator()
            .child(
                Item::new("⬆️ Upgrade")
                    .alt(format!("⬆️ Upgrade ({current} → {})", formula.latest_version))
                    .shell([brew, "upgrade", "--formula", name])
                    .terminal(true)
                    .refresh(),
            )
            .child(
                Item::new("📌 Pin")
                    .alt(format!("📌 Pin at {current}"))
                    .shell([brew, "pin", name])
                    .terminal(false)
                    .refresh(),
            )
            .child(self.exclusion_item(name))
            .separator()
            .child(uninstall_item(brew, "--formula", name))
    }

    fn cask_menu(&self, brew: &str, greedy: GreedyFlags, cask: &Cask) -> Item {
        let name = cask.name.as_str();
        let mut upgrade = vec![brew, "upgrade", "--cask"];
        upgrade.extend(greedy.args());
        upgrade.push(name);

        package_header(name, self.settings.is_excluded(name))
            .child(Item::new(format!("Installed: {}", cask.installed_version)))
            .child(Item::new(format!("Latest: {}", cask.latest_version)))
            .separator()
            .child(
                Item::new("⬆️ Upgrade")
                    .alt(format!(
                        "⬆️ Upgrade ({} → {})",
                        cask.installed_version, cask.latest_version
                    ))
                    .shell(upgrade)
                    .terminal(true)
                    .refresh(),
            )
            .child(self.exclusion_item(name))
            .separator()
            .child(uninstall_item(brew, "--cask", name))
    }

    fn exclusion_item(&self, name: &str) -> Item {
        let (label, method) = if self.settings.is_excluded(name) {
            ("✅ Include in Upgrade All", "remove_from_exclusion_set")
        } else {
            ("🚫 Exclude from Upgrade All", "add_to_exclusion_set")
        };
        Item::new(label)
            .rpc([method, name])
            .terminal(false)
            .refresh()
    }

    pub fn toggle(&mut self, toggle: Toggle, args: &[String]) -> Result<()> {
        let raw = args.first().map(String::as_str).unwrap_or_default();
        let value = config::parse_bool(raw)
            .ok_or_else(|| anyhow!("{}: expected true or false, got '{raw}'", toggle.method()))?;
        self.settings = self
            .store
            .update(|s| s.set(toggle, value))
            .with_context(|| format!("update {}", toggle.key()))?;
        info!(key = toggle.key(), value, "toggled");
        Ok(())
    }

    pub fn add_to_exclusion_set(&mut self, names: &[String]) -> Result<()> {
        let mut changed = false;
        self.settings = self
            .store
            .update(|s| changed = s.exclude(names))
            .context("update upgrade-all exclusions")?;
        info!(?names, changed, "excluded from upgrade all");
        Ok(())
    }

    pub fn remove_from_exclusion_set(&mut self, names: &[String]) -> Result<()> {
        let mut changed = false;
        self.settings = self
            .store
            .update(|s| changed = s.include(names))
            .context("update upgrade-all exclusions")?;
        info!(?names, changed, "included in upgrade all");
        Ok(())
    }
}

impl RpcService for BrewStatus {
    fn render(&mut self, out: &mut dyn Write) -> Result<()> {
        let path = match self.locator.locate() {
            Ok(path) => path,
            Err(not_found) => {
                warn!(checked = %not_found.checked.display(), "brew not found");
                self.renderer
                    .render_menu(&common::not_found_menu(&not_found), out)
                    .context("write menu")?;
                return Ok(());
            }
        };
        self.render_with(&Homebrew::new(path), out)
    }

    fn methods(&self) -> Result<RpcTable<Self>, RpcError> {
        RpcTable::new(vec![
            Method::new("toggle_greedy", Arity::Exact(1), |s: &mut Self, a| {
                s.toggle(Toggle::Greedy, a)
            }),
            Method::new("toggle_greedy_latest", Arity::Exact(1), |s: &mut Self, a| {
                s.toggle(Toggle::GreedyLatest, a)
            }),
            Method::new(
                "toggle_greedy_auto_updates",
                Arity::Exact(1),
                |s: &mut Self, a| s.toggle(Toggle::GreedyAutoUpdates, a),
            ),
            Method::new("toggle_auto_update", Arity::Exact(1), |s: &mut Self, a| {
                s.toggle(Toggle::AutoUpdate, a)
            }),
            Method::new("add_to_exclusion_set", Arity::AtLeast(1), |s: &mut Self, a| {
                s.add_to_exclusion_set(a)
            }),
            Method::new(
                "remove_from_exclusion_set",
                Arity::AtLeast(1),
                |s: &mut Self, a| s.remove_from_exclusion_set(a),
            ),
        ])
    }
}

fn package_header(name: &str, excluded: bool) -> Item {
    if excluded {
        Item::new(format!("{name} 🚫"))
    } else {
        Item::new(name)
    }
}

fn upgrade_all_item(title: &str, count: usize, cmd: Vec<String>) -> Item {
    if count == 0 {
        return Item::new(format!("{title} (nothing to upgrade)")).color("gray");
    }
    Item::new(format!("⬆️ {title} ({count})"))
        .shell(cmd)
        .terminal(true)
        .refresh()
}

fn uninstall_item(brew: &str, kind: &str, name: &str) -> Item {
    Item::new("❌ Uninstall").child(
        Item::new(format!("Yes, uninstall {name}"))
            .color("red")
            .shell([brew, "uninstall", kind, name])
            .terminal(true)
            .refresh(),
    )
}

fn pinned_menu(brew: &str, formula: &Formula) -> Item {
    let name = formula.name.as_str();
    let pinned_at = formula
        .pinned_version
        .as_deref()
        .unwrap_or_else(|| formula.current_version());

    Item::new(name)
        .child(Item::new(format!("Pinned: {pinned_at}")))
        .child(Item::new(format!("Latest: {}", formula.latest_version)))
        .separator()
        .child(
            Item::new("📍 Unpin")
                .shell([brew, "unpin", name])
                .terminal(false)
                .refresh(),
        )
        .separator()
        .child(uninstall_item(brew, "--formula", name))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tempfile::TempDir;

    use super::*;
    use crate::tray::commands;
    use crate::tray::menu::{AttrValue, MenuItem};

    struct FakeBrew {
        outdated: Outdated,
        update_fails: bool,
        updates: Cell<usize>,
        last_flags: Cell<Option<GreedyFlags>>,
    }

    impl FakeBrew {
        fn new(json: &str) -> Self {
            Self {
                outdated: Outdated::parse(json).unwrap(),
                update_fails: false,
                updates: Cell::new(0),
                last_flags: Cell::new(None),
            }
        }
    }

    impl PackageManager for FakeBrew {
        fn path(&self) -> &Path {
            Path::new("/opt/homebrew/bin/brew")
        }

        fn update(&self) -> Result<()> {
            self.updates.set(self.updates.get() + 1);
            if self.update_fails {
                anyhow::bail!("Another active Homebrew update process is already in progress");
            }
            Ok(())
        }

        fn outdated(&self, flags: GreedyFlags) -> Result<Outdated> {
            self.last_flags.set(Some(flags));
            Ok(self.outdated.clone())
        }
    }

    const ONE_FORMULA: &str = r#"{"formulae": [{"name": "foo", "installed_versions": ["1.0"],
        "current_version": "2.0", "pinned": false, "pinned_version": null}], "casks": []}"#;

    const MIXED: &str = r#"{
      "formulae": [
        {"name": "foo", "installed_versions": ["1.0"], "current_version": "2.0", "pinned": false},
        {"name": "node", "installed_versions": ["20.1"], "current_version": "21.0",
         "pinned": false},
        {"name": "bar", "installed_versions": ["3.1"], "current_version": "3.2",
         "pinned": true, "pinned_version": "3.1"}
      ],
      "casks": [{"name": "firefox", "installed_versions": ["120.0"], "current_version": "121.0"}]
    }"#;

    fn service(dir: &TempDir) -> BrewStatus {
        let store = SettingsStore::new(dir.path().join("brewbar.vars.json"));
        BrewStatus::new(store, Renderer::new("/plugins/brewbar", "brewbar"))
            .unwrap()
            .with_locator(BrewLocator {
                override_path: None,
                search_path: None,
                fixed_paths: vec![dir.path().join("no-brew-here")],
            })
    }

    fn render_with(svc: &BrewStatus, brew: &FakeBrew) -> String {
        let mut out = Vec::new();
        svc.render_with(brew, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn find<'a>(items: &'a [MenuItem], label: &str) -> &'a Item {
        items
            .iter()
            .find_map(|i| match i {
                MenuItem::Item(item) if item.label.starts_with(label) => Some(item),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no item labelled {label}"))
    }

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_outdated_formula() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let brew = FakeBrew::new(ONE_FORMULA);

        let menu = svc.menu_spec(brew.path(), &brew.outdated);
        assert_eq!(menu.items[0].label(), Some("↑1"));

        let formulae = find(&menu.items, "Formulae");
        let entries: Vec<_> = formulae.children.iter().filter_map(|c| c.label()).collect();
        assert_eq!(entries, ["foo"]);

        let MenuItem::Item(foo) = &formulae.children[0] else {
            panic!("expected item");
        };
        let upgrade = find(&foo.children, "⬆️ Upgrade");
        assert_eq!(upgrade.alt.as_deref(), Some("⬆️ Upgrade (1.0 → 2.0)"));
        assert!(menu.items.iter().all(|i| i.label() != Some("Casks (0)")));

        let out = render_with(&svc, &brew);
        assert!(out.starts_with("↑1 | dropdown=\"false\"\n---\n"));
        assert!(
            out.contains("\n----⬆️ Upgrade (1.0 → 2.0) | shell=\"/opt/homebrew/bin/brew\"")
        );
        assert_eq!(brew.updates.get(), 1);
    }

    #[test]
    fn upgrade_line_chains_refresh() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let out = render_with(&svc, &FakeBrew::new(ONE_FORMULA));
        let line = out
            .lines()
            .find(|l| l.starts_with("----⬆️ Upgrade |"))
            .unwrap();
        assert!(line.contains("refresh=\"false\""));
        assert!(line.contains(
            "param4=\"&&\" param5=\"open\" param6=\"-jg\" \
             param7=\"'xbar://app.xbarapp.com/refreshPlugin?path=brewbar'\""
        ));
    }

    #[test]
    fn update_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let mut brew = FakeBrew::new(ONE_FORMULA);
        brew.update_fails = true;
        let out = render_with(&svc, &brew);
        assert!(out.starts_with("↑1"));
    }

    #[test]
    fn auto_update_off_skips_refresh() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        svc.toggle(Toggle::AutoUpdate, &args(&["false"])).unwrap();
        let brew = FakeBrew::new(ONE_FORMULA);
        render_with(&svc, &brew);
        assert_eq!(brew.updates.get(), 0);
    }

    #[test]
    fn greedy_settings_reach_query() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        svc.toggle(Toggle::GreedyLatest, &args(&["true"])).unwrap();
        let brew = FakeBrew::new(ONE_FORMULA);
        render_with(&svc, &brew);
        assert_eq!(
            brew.last_flags.get(),
            Some(GreedyFlags {
                greedy: false,
                latest: true,
                auto_updates: false
            })
        );
    }

    #[test]
    fn partitions_and_excludes() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        svc.add_to_exclusion_set(&args(&["node"])).unwrap();
        let brew = FakeBrew::new(MIXED);
        let menu = svc.menu_spec(brew.path(), &brew.outdated);

        assert_eq!(menu.items[0].label(), Some("↑3"));
        assert_eq!(find(&menu.items, "Formulae").children.len(), 2);
        assert_eq!(find(&menu.items, "Casks").children.len(), 1);
        let pinned = find(&menu.items, "Pinned");
        assert_eq!(pinned.children[0].label(), Some("bar"));

        let status = find(&menu.items, "Status");
        let all = find(&status.children, "⬆️ Upgrade All (2)");
        assert_eq!(
            all.attrs.get("shell"),
            Some(&AttrValue::List(args(&[
                "/opt/homebrew/bin/brew",
                "upgrade",
                "foo",
                "firefox"
            ])))
        );
        let formulae = find(&status.children, "⬆️ Upgrade All Formulae (1)");
        assert_eq!(
            formulae.attrs.get("shell"),
            Some(&AttrValue::List(args(&[
                "/opt/homebrew/bin/brew",
                "upgrade",
                "--formula",
                "foo"
            ])))
        );

        let excluded = find(&status.children, "Excluded from Upgrade All (1)");
        assert_eq!(excluded.children[0].label(), Some("node"));

        let node = find(&find(&menu.items, "Formulae").children, "node");
        assert_eq!(node.label, "node 🚫");
        let include = find(&node.children, "✅ Include in Upgrade All");
        assert_eq!(
            include.attrs.get("rpc"),
            Some(&AttrValue::List(args(&["remove_from_exclusion_set", "node"])))
        );
    }

    #[test]
    fn everything_excluded_disables_upgrade_all() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        svc.add_to_exclusion_set(&args(&["foo"])).unwrap();
        let brew = FakeBrew::new(ONE_FORMULA);
        let menu = svc.menu_spec(brew.path(), &brew.outdated);
        let status = find(&menu.items, "Status");
        let all = find(&status.children, "Upgrade All (nothing to upgrade)");
        assert!(!all.attrs.contains("shell"));
    }

    #[test]
    fn settings_toggles_invoke_opposite_value() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let brew = FakeBrew::new("{}");
        let menu = svc.menu_spec(brew.path(), &brew.outdated);
        let settings = find(&menu.items, "Settings");

        let greedy = find(&settings.children, "⬜️ Greedy");
        assert_eq!(
            greedy.attrs.get("rpc"),
            Some(&AttrValue::List(args(&["toggle_greedy", "true"])))
        );
        assert!(greedy.attrs.is_true("refresh"));

        let auto = find(&settings.children, "✅ Auto-update");
        assert_eq!(
            auto.attrs.get("rpc"),
            Some(&AttrValue::List(args(&["toggle_auto_update", "false"])))
        );

        assert!(menu
            .items
            .iter()
            .any(|i| i.label() == Some("Everything is up to date ✨")));
    }

    #[test]
    fn rpc_toggle_persists_without_output() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        let mut out = Vec::new();
        commands::run(&mut svc, &args(&["toggle_greedy_latest", "true"]), &mut out).unwrap();
        assert!(out.is_empty());

        let saved = std::fs::read_to_string(dir.path().join("brewbar.vars.json")).unwrap();
        assert!(saved.contains("\"VAR_GREEDY_LATEST\": true"));
        assert!(svc.settings().greedy_latest);
    }

    #[test]
    fn rpc_toggle_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        let err = commands::run(&mut svc, &args(&["toggle_greedy", "perhaps"]), &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("expected true or false"));
        assert!(!dir.path().join("brewbar.vars.json").exists());
    }

    #[test]
    fn exclusion_handlers_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        svc.add_to_exclusion_set(&args(&["foo", "bar"])).unwrap();
        svc.add_to_exclusion_set(&args(&["foo"])).unwrap();
        assert_eq!(svc.settings().upgrade_all_exclude, ["bar", "foo"]);

        svc.remove_from_exclusion_set(&args(&["foo", "absent"])).unwrap();
        svc.remove_from_exclusion_set(&args(&["foo"])).unwrap();
        assert_eq!(svc.settings().upgrade_all_exclude, ["bar"]);
    }

    #[test]
    fn missing_brew_renders_not_found_menu() {
        let dir = TempDir::new().unwrap();
        let mut svc = service(&dir);
        let mut out = Vec::new();
        commands::run(&mut svc, &[], &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], ":warning: | dropdown=\"false\"");
        assert_eq!(
            lines[3],
            format!(
                "Executable \"{}\" does not exist.",
                dir.path().join("no-brew-here").display()
            )
        );
        assert_eq!(
            lines[5],
            "Visit https://brew.sh/ for installation instructions | href=\"https://brew.sh\""
        );
    }

    #[test]
    fn rpc_table_is_closed() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let table = svc.methods().unwrap();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names.len(), 6);
        assert!(table.get("render_with").is_none());
        assert!(table.get("menu_spec").is_none());

        let toggles: Vec<_> = Toggle::ALL.iter().map(|t| t.method()).collect();
        assert!(toggles.iter().all(|m| names.contains(m)));
    }
}
