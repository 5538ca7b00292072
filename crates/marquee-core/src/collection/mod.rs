//! Collections: the ordered item snapshots a menu scrolls through.
//!
//! On disk a collection is a directory under `collections/`:
//!
//! ```text
//! collections/Arcade/
//!     items.toml         [[items]] tables
//!     menu.toml          optional [[items]] sub-collection entries
//!     playlists/*.txt    one item name per line
//! ```

mod item;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{Error, Result};

pub use item::Item;

/// Shared, read-only snapshot of an ordered item sequence
pub type ItemList = Arc<Vec<Arc<Item>>>;

pub const ALL_PLAYLIST: &str = "all";
pub const FAVORITES_PLAYLIST: &str = "favorites";

#[derive(Debug, Deserialize)]
struct ItemsFile {
    #[serde(default)]
    items: Vec<Item>,
}

/// A loaded collection with its playlists
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: String,
    items: ItemList,
    playlists: BTreeMap<String, ItemList>,
}

impl CollectionInfo {
    /// Build a collection from an in-memory item list. Items are normalized
    /// and sorted by lowercase full title.
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        let name = name.into();
        let items = Self::prepare(&name, items);
        let mut playlists = BTreeMap::new();
        playlists.insert(ALL_PLAYLIST.to_string(), items.clone());
        playlists.insert(FAVORITES_PLAYLIST.to_string(), Arc::new(Vec::new()));
        Self {
            name,
            items,
            playlists,
        }
    }

    fn prepare(name: &str, items: Vec<Item>) -> ItemList {
        let mut items: Vec<Arc<Item>> = items
            .into_iter()
            .map(|mut item| {
                item.collection = name.to_string();
                item.normalize();
                Arc::new(item)
            })
            .collect();
        items.sort_by(|a, b| a.lc_full_title().cmp(b.lc_full_title()));
        Arc::new(items)
    }

    /// Load `<collections_dir>/<name>`
    pub fn load(collections_dir: &Path, name: &str) -> Result<Self> {
        let dir = collections_dir.join(name);
        if !dir.is_dir() {
            return Err(Error::CollectionNotFound(name.to_string()));
        }

        let mut items = read_items(&dir.join("items.toml"))?;
        let menu_path = dir.join("menu.toml");
        if menu_path.exists() {
            let mut menu = read_items(&menu_path)?;
            for entry in &mut menu {
                entry.leaf = false;
            }
            debug!(collection = name, entries = menu.len(), "Loaded menu entries");
            items.extend(menu);
        }

        let mut collection = Self::new(name, items);

        let playlist_dir = dir.join("playlists");
        if playlist_dir.is_dir() {
            for entry in std::fs::read_dir(&playlist_dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let content = std::fs::read_to_string(&path)?;
                collection.add_playlist(stem, content.lines());
            }
        }

        info!(
            collection = name,
            items = collection.items.len(),
            playlists = collection.playlists.len(),
            "Loaded collection"
        );
        Ok(collection)
    }

    /// Register a playlist from item names. Unknown names are skipped.
    pub fn add_playlist<'a>(&mut self, playlist: &str, names: impl IntoIterator<Item = &'a str>) {
        let mut selected = Vec::new();
        for name in names.into_iter().map(str::trim).filter(|n| !n.is_empty()) {
            match self.items.iter().find(|i| i.name == name) {
                Some(item) => selected.push(item.clone()),
                None => warn!(playlist, item = name, "Playlist entry not in collection"),
            }
        }
        selected.sort_by(|a, b| a.lc_full_title().cmp(b.lc_full_title()));
        self.playlists.insert(playlist.to_string(), Arc::new(selected));
    }

    /// Add a collection item to a playlist, creating the playlist if needed.
    /// Returns false when the item is foreign or already listed.
    pub fn add_to_playlist(&mut self, playlist: &str, item: &Item) -> bool {
        let Some(item) = self.find(&item.name) else {
            warn!(playlist, item = %item.name, "Item not in collection");
            return false;
        };
        let list = self.playlists.entry(playlist.to_string()).or_default();
        if list.iter().any(|i| i.name == item.name) {
            return false;
        }
        let list = Arc::make_mut(list);
        list.push(item);
        list.sort_by(|a, b| a.lc_full_title().cmp(b.lc_full_title()));
        true
    }

    /// Returns false when the item was not in the playlist
    pub fn remove_from_playlist(&mut self, playlist: &str, item: &Item) -> bool {
        let Some(list) = self.playlists.get_mut(playlist) else {
            return false;
        };
        let Some(pos) = list.iter().position(|i| i.name == item.name) else {
            return false;
        };
        Arc::make_mut(list).remove(pos);
        true
    }

    /// Write `<collections_dir>/<name>/playlists/<playlist>.txt`
    pub fn save_playlist(&self, collections_dir: &Path, playlist: &str) -> Result<()> {
        let list = self
            .playlists
            .get(playlist)
            .ok_or_else(|| Error::Other(format!("No playlist {} in {}", playlist, self.name)))?;

        let dir = collections_dir.join(&self.name).join("playlists");
        std::fs::create_dir_all(&dir)?;
        let mut content = String::new();
        for item in list.iter() {
            content.push_str(&item.name);
            content.push('\n');
        }
        std::fs::write(dir.join(format!("{}.txt", playlist)), content)?;

        debug!(collection = %self.name, playlist, items = list.len(), "Saved playlist");
        Ok(())
    }

    pub fn items(&self) -> ItemList {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<Arc<Item>> {
        self.items.iter().find(|i| i.name == name).cloned()
    }

    /// Parent of a clone, if it is part of this collection
    pub fn parent_of(&self, item: &Item) -> Option<Arc<Item>> {
        if !item.is_clone() {
            return None;
        }
        self.find(&item.clone_of)
    }

    pub fn clones_of(&self, name: &str) -> Vec<Arc<Item>> {
        self.items
            .iter()
            .filter(|i| i.clone_of == name)
            .cloned()
            .collect()
    }

    pub fn playlist(&self, name: &str) -> Option<ItemList> {
        self.playlists.get(name).cloned()
    }

    /// Playlist names with `all` first, the rest alphabetical
    pub fn playlist_names(&self) -> Vec<String> {
        let mut names = vec![ALL_PLAYLIST.to_string()];
        names.extend(
            self.playlists
                .keys()
                .filter(|k| k.as_str() != ALL_PLAYLIST)
                .cloned(),
        );
        names
    }
}

fn read_items(path: &Path) -> Result<Vec<Item>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    let file: ItemsFile = toml::from_str(&content)?;
    Ok(file.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("marquee-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_items_sorted_by_full_title() {
        let collection = CollectionInfo::new(
            "Arcade",
            vec![
                Item::new("zelda").with_title("Zelda"),
                Item::new("1943").with_title("1943"),
                Item::new("apple").with_title("apple"),
                Item::new("banana").with_title("Banana"),
            ],
        );
        let titles: Vec<_> = collection.items().iter().map(|i| i.title.clone()).collect();
        assert_eq!(titles, vec!["1943", "apple", "Banana", "Zelda"]);
        assert!(collection.items().iter().all(|i| i.collection == "Arcade"));
    }

    #[test]
    fn test_clone_relationships() {
        let mut clone = Item::new("puckman");
        clone.clone_of = "pacman".to_string();
        let collection = CollectionInfo::new("Arcade", vec![Item::new("pacman"), clone.clone()]);
        let parent = collection.parent_of(&clone).unwrap();
        assert_eq!(parent.name, "pacman");
        assert_eq!(collection.clones_of("pacman").len(), 1);
        assert!(collection.parent_of(&parent).is_none());
    }

    #[test]
    fn test_playlists() {
        let mut collection = CollectionInfo::new(
            "Arcade",
            vec![Item::new("a"), Item::new("b"), Item::new("c")],
        );
        collection.add_playlist("favorites", ["c", "missing", "a"]);
        let favorites = collection.playlist("favorites").unwrap();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].name, "a");
        assert_eq!(collection.playlist_names(), vec!["all", "favorites"]);
    }

    #[test]
    fn test_edit_playlist() {
        let mut collection = CollectionInfo::new(
            "Arcade",
            vec![Item::new("c"), Item::new("a"), Item::new("b")],
        );
        let a = collection.find("a").unwrap();
        let c = collection.find("c").unwrap();

        assert!(collection.add_to_playlist(FAVORITES_PLAYLIST, &c));
        assert!(collection.add_to_playlist(FAVORITES_PLAYLIST, &a));
        assert!(!collection.add_to_playlist(FAVORITES_PLAYLIST, &a));
        assert!(!collection.add_to_playlist(FAVORITES_PLAYLIST, &Item::new("stranger")));

        let favorites = collection.playlist(FAVORITES_PLAYLIST).unwrap();
        let names: Vec<_> = favorites.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);

        assert!(collection.remove_from_playlist(FAVORITES_PLAYLIST, &a));
        assert!(!collection.remove_from_playlist(FAVORITES_PLAYLIST, &a));
        assert!(!collection.remove_from_playlist("missing", &c));
        assert_eq!(collection.playlist(FAVORITES_PLAYLIST).unwrap().len(), 1);
        // Earlier snapshots stay untouched
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_saved_playlist_reloads() {
        let dir = temp_dir();
        let coll = dir.join("Main");
        std::fs::create_dir_all(&coll).unwrap();
        std::fs::write(
            coll.join("items.toml"),
            "[[items]]\nname = \"galaga\"\n\n[[items]]\nname = \"digdug\"\n",
        )
        .unwrap();

        let mut collection = CollectionInfo::load(&dir, "Main").unwrap();
        let galaga = collection.find("galaga").unwrap();
        assert!(collection.add_to_playlist(FAVORITES_PLAYLIST, &galaga));
        collection.save_playlist(&dir, FAVORITES_PLAYLIST).unwrap();
        assert!(collection.save_playlist(&dir, "missing").is_err());

        let reloaded = CollectionInfo::load(&dir, "Main").unwrap();
        let favorites = reloaded.playlist(FAVORITES_PLAYLIST).unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "galaga");
    }

    #[test]
    fn test_load_missing_collection() {
        let dir = temp_dir();
        let err = CollectionInfo::load(&dir, "Nope").unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = temp_dir();
        let coll = dir.join("Main");
        std::fs::create_dir_all(coll.join("playlists")).unwrap();
        std::fs::write(
            coll.join("items.toml"),
            r#"
            [[items]]
            name = "galaga"
            title = "Galaga"

            [[items]]
            name = "digdug"
            title = "Dig Dug"
            "#,
        )
        .unwrap();
        std::fs::write(
            coll.join("menu.toml"),
            "[[items]]\nname = \"Consoles\"\n",
        )
        .unwrap();
        std::fs::write(coll.join("playlists/shooters.txt"), "galaga\n\n").unwrap();

        let collection = CollectionInfo::load(&dir, "Main").unwrap();
        assert_eq!(collection.len(), 3);
        let consoles = collection.find("Consoles").unwrap();
        assert!(!consoles.leaf);
        assert_eq!(collection.playlist("shooters").unwrap().len(), 1);
        assert_eq!(collection.items()[0].name, "Consoles");
    }
}
