use std::path::Path;

use serde::{Deserialize, Serialize};

/// A collection entry: a launchable game or a sub-collection node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique name within the collection, also the media file stem
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub full_title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub genre: String,
    /// Name of the parent item when this is a clone
    #[serde(default)]
    pub clone_of: String,
    #[serde(default)]
    pub players: String,
    #[serde(default)]
    pub buttons: String,
    /// true = launchable, false = sub-collection
    #[serde(default = "default_leaf")]
    pub leaf: bool,
    #[serde(default)]
    pub launcher: String,
    #[serde(default)]
    pub file_path: String,
    /// Owning collection, filled in by the loader
    #[serde(default)]
    pub collection: String,
    #[serde(skip)]
    lc_title: String,
    #[serde(skip)]
    lc_full_title: String,
}

fn default_leaf() -> bool {
    true
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        let mut item = Self {
            name: name.into(),
            title: String::new(),
            full_title: String::new(),
            year: String::new(),
            manufacturer: String::new(),
            genre: String::new(),
            clone_of: String::new(),
            players: String::new(),
            buttons: String::new(),
            leaf: true,
            launcher: String::new(),
            file_path: String::new(),
            collection: String::new(),
            lc_title: String::new(),
            lc_full_title: String::new(),
        };
        item.normalize();
        item
    }

    /// Sub-collection entry shown in a menu
    pub fn submenu(name: impl Into<String>) -> Self {
        let mut item = Self::new(name);
        item.leaf = false;
        item
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self.full_title.clear();
        self.normalize();
        self
    }

    /// Fill derived fields: missing titles come from the name and the
    /// lowercase copies used for sorting and letter jumps are cached.
    pub fn normalize(&mut self) {
        if self.title.is_empty() {
            self.title = self.name.clone();
        }
        if self.full_title.is_empty() {
            self.full_title = self.title.clone();
        }
        self.lc_title = self.title.to_lowercase();
        self.lc_full_title = self.full_title.to_lowercase();
    }

    pub fn lc_title(&self) -> &str {
        &self.lc_title
    }

    pub fn lc_full_title(&self) -> &str {
        &self.lc_full_title
    }

    /// File name component of `file_path`
    pub fn file_name(&self) -> String {
        Path::new(&self.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_clone(&self) -> bool {
        !self.clone_of.is_empty()
    }

    /// Value of a named metadata field, for text panels bound to the selection
    pub fn field(&self, field: &str) -> Option<&str> {
        let value = match field.to_ascii_lowercase().as_str() {
            "name" => &self.name,
            "title" => &self.title,
            "fulltitle" | "full_title" => &self.full_title,
            "year" => &self.year,
            "manufacturer" => &self.manufacturer,
            "genre" => &self.genre,
            "cloneof" | "clone_of" => &self.clone_of,
            "players" | "numberplayers" => &self.players,
            "buttons" | "numberbuttons" => &self.buttons,
            "launcher" => &self.launcher,
            "collection" => &self.collection,
            _ => return None,
        };
        Some(value.as_str())
    }
}
