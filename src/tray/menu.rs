use std::fmt;

/// Attribute value as understood by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    /// Program and arguments (`shell`) or method and arguments (`rpc`).
    List(Vec<String>),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value)
    }
}

/// Insertion-ordered attribute map. Setting an existing key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, AttrValue)>);

impl Attrs {
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.get(key), Some(AttrValue::Bool(true)))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A labelled menu entry with optional submenu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub label: String,
    pub attrs: Attrs,
    pub alt: Option<String>,
    pub children: Vec<MenuItem>,
}

impl Item {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.set(key, value);
        self
    }

    pub fn color(self, color: &str) -> Self {
        self.attr("color", color)
    }

    pub fn href(self, url: &str) -> Self {
        self.attr("href", url)
    }

    pub fn dropdown(self, enabled: bool) -> Self {
        self.attr("dropdown", enabled)
    }

    pub fn refresh(self) -> Self {
        self.attr("refresh", true)
    }

    pub fn terminal(self, enabled: bool) -> Self {
        self.attr("terminal", enabled)
    }

    /// Runs `program args...` when clicked.
    pub fn shell<I, S>(self, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attr("shell", cmd.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    /// Re-invokes this program with `method args...` when clicked.
    pub fn rpc<I, S>(self, call: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attr("rpc", call.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    pub fn alt(mut self, label: impl Into<String>) -> Self {
        self.alt = Some(label.into());
        self
    }

    pub fn child(mut self, item: impl Into<MenuItem>) -> Self {
        self.children.push(item.into());
        self
    }

    pub fn children<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = MenuItem>,
    {
        self.children.extend(items);
        self
    }

    pub fn separator(mut self) -> Self {
        self.children.push(MenuItem::Separator);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Item(Item),
    Separator,
}

impl MenuItem {
    /// Label of an item, `None` for separators.
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuItem::Item(item) => Some(&item.label),
            MenuItem::Separator => None,
        }
    }
}

impl From<Item> for MenuItem {
    fn from(item: Item) -> Self {
        MenuItem::Item(item)
    }
}

/// Top-level menu: the first item is the status bar line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSpec {
    pub items: Vec<MenuItem>,
}

impl MenuSpec {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: impl Into<MenuItem>) {
        self.items.push(item.into());
    }

    pub fn separator(&mut self) {
        self.items.push(MenuItem::Separator);
    }
}
