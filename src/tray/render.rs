use std::io::{self, Write};

use super::menu::{AttrValue, Attrs, Item, MenuItem, MenuSpec};

const SUB_PREFIX: &str = "--";
const SEPARATOR: &str = "---";
const ATTR_SEP: &str = "|";

/// Writes menus in the host's line protocol.
///
/// `program` is the path used for `rpc` self-invocations and `plugin_name` the file
/// name the host knows this plugin by (used for refresh URLs).
#[derive(Debug, Clone)]
pub struct Renderer {
    program: String,
    plugin_name: String,
}

impl Renderer {
    pub fn new(program: impl Into<String>, plugin_name: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            plugin_name: plugin_name.into(),
        }
    }

    pub fn render_menu<W: Write + ?Sized>(&self, menu: &MenuSpec, out: &mut W) -> io::Result<()> {
        for item in &menu.items {
            self.render(item, 0, out)?;
        }
        Ok(())
    }

    /// Renders `item` and its subtree at `depth`.
    pub fn render<W: Write + ?Sized>(
        &self,
        item: &MenuItem,
        depth: usize,
        out: &mut W,
    ) -> io::Result<()> {
        match item {
            MenuItem::Separator => writeln!(out, "{}{SEPARATOR}", SUB_PREFIX.repeat(depth)),
            MenuItem::Item(item) => self.render_item(item, depth, out),
        }
    }

    fn render_item<W: Write + ?Sized>(
        &self,
        item: &Item,
        depth: usize,
        out: &mut W,
    ) -> io::Result<()> {
        if !item.label.is_empty() {
            let attrs = self.normalize(&item.attrs);
            write_line(out, depth, &item.label, &attrs)?;

            if let Some(alt) = item.alt.as_deref().filter(|a| !a.is_empty()) {
                let mut alt_attrs = attrs;
                alt_attrs.set("alternate", true);
                write_line(out, depth, alt, &alt_attrs)?;
            }
        }

        for child in &item.children {
            self.render(child, depth + 1, out)?;
        }
        Ok(())
    }

    pub fn refresh_uri(&self) -> String {
        format!(
            "xbar://app.xbarapp.com/refreshPlugin?path={}",
            self.plugin_name
        )
    }

    /// Rewrites sugar attributes into what the host understands.
    pub fn normalize(&self, attrs: &Attrs) -> Attrs {
        let mut attrs = attrs.clone();

        // `rpc` is not a host attribute; an explicit `shell` takes precedence.
        if let Some(call) = attrs.remove("rpc") {
            if !attrs.contains("shell") {
                let mut cmd = vec![self.program.clone()];
                match call {
                    AttrValue::List(call) => cmd.extend(call),
                    other => cmd.push(other.to_string()),
                }
                attrs.set("shell", cmd);
            }
        }

        if let Some(AttrValue::List(cmd)) = attrs.get("shell").cloned() {
            let mut parts = cmd.into_iter();
            attrs.set("shell", parts.next().unwrap_or_default());
            for (i, param) in parts.enumerate() {
                attrs.set(format!("param{}", i + 1), param);
            }
        }

        // The host ignores `refresh` for terminal commands, so chain a refresh
        // request onto the command itself.
        if attrs.is_true("terminal") && attrs.is_true("refresh") && attrs.contains("shell") {
            attrs.set("refresh", false);
            let mut i = 1;
            while attrs.contains(&format!("param{i}")) {
                i += 1;
            }
            let refresh = format!("'{}'", self.refresh_uri());
            for arg in ["&&", "open", "-jg", refresh.as_str()] {
                attrs.set(format!("param{i}"), arg);
                i += 1;
            }
        }

        attrs
    }
}

fn write_line<W: Write + ?Sized>(
    out: &mut W,
    depth: usize,
    label: &str,
    attrs: &Attrs,
) -> io::Result<()> {
    let mut line = String::from(label);
    if !attrs.is_empty() {
        line.push(' ');
        line.push_str(ATTR_SEP);
        for (key, value) in attrs.iter() {
            line.push_str(&format!(" {key}=\"{value}\""));
        }
    }
    writeln!(out, "{}{line}", SUB_PREFIX.repeat(depth))
}
