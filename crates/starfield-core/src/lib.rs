use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub popularity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl Item {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            description: String::new(),
            tags: String::new(),
            color: None,
            popularity: 0,
            homepage: None,
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.split(',').map(str::trim).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RectKind {
    Panel,
    Text,
    Control,
    Button,
    Card,
}

// Axis-aligned UI region in screen space (origin top-left, y down).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExclusionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: RectKind,
}

impl ExclusionRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: RectKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Msg {
    Hello { version: String },
    RequestCatalog,
    Catalog { items: Vec<Item> },
    ItemUpdated { item: Item },
    RecordClick { id: ItemId },
    Ping,
    Pong,
}
