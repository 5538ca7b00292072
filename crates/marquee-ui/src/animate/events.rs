//! L3 Molecular Layer: Event-name to animation table

use std::collections::{BTreeMap, HashMap};

use super::animation::Animation;

pub const ENTER: &str = "enter";
pub const EXIT: &str = "exit";
pub const IDLE: &str = "idle";
pub const HIGHLIGHT_ENTER: &str = "highlightEnter";
pub const HIGHLIGHT_EXIT: &str = "highlightExit";
pub const MENU_ENTER: &str = "menuEnter";
pub const MENU_EXIT: &str = "menuExit";
pub const MENU_SCROLL: &str = "menuScroll";

/// Variant index used when no specific one is requested
pub const DEFAULT_INDEX: i32 = -1;

/// `(event, variant index) -> Animation`
///
/// A missing variant falls back to the default index; a missing event is
/// created empty on first lookup, so a lookup always yields an animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationEvents {
    table: HashMap<String, BTreeMap<i32, Animation>>,
}

impl AnimationEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, event: &str, index: i32, animation: Animation) {
        self.table
            .entry(event.to_string())
            .or_default()
            .insert(index, animation);
    }

    /// Lookup with fallback, creating the empty default when needed
    pub fn get(&mut self, event: &str, index: i32) -> &Animation {
        let variants = self.table.entry(event.to_string()).or_default();
        let key = if variants.contains_key(&index) {
            index
        } else {
            DEFAULT_INDEX
        };
        variants.entry(key).or_default()
    }

    /// Read-only lookup with the same fallback, without creating entries
    pub fn find(&self, event: &str, index: i32) -> Option<&Animation> {
        let variants = self.table.get(event)?;
        variants.get(&index).or_else(|| variants.get(&DEFAULT_INDEX))
    }

    pub fn contains(&self, event: &str) -> bool {
        self.table.contains_key(event)
    }

    /// Drop every variant of an event
    pub fn clear(&mut self, event: &str) {
        self.table.remove(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
