//! A screen: decorative components on fixed layers plus one scrolling
//! menu per drill-down depth.
//!
//! Lists report selection changes over a channel; the page turns a settled
//! change into a highlight on everything it owns. Scripted animations reach
//! components through the page's [`AnimationManager`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use marquee_core::collection::{ALL_PLAYLIST, FAVORITES_PLAYLIST};
use marquee_core::{CollectionInfo, Item};

use crate::animate::{AnimationHandle, AnimationManager, AnimationTarget};
use crate::component::{Component, ComponentId, Drawable};
use crate::layout::MenuTemplate;
use crate::render::SharedRenderer;
use crate::scrolling_list::{ScrollDirection, ScrollState, ScrollingList};
use crate::view_info::ViewInfo;

pub const NUM_LAYERS: usize = 20;

impl AnimationTarget for Vec<Component> {
    fn view_info_mut(&mut self, id: ComponentId) -> Option<&mut ViewInfo> {
        self.get_mut(id.0).map(Component::view_mut)
    }
}

/// One level of the drill-down stack
#[derive(Debug)]
struct MenuFrame {
    collection: CollectionInfo,
    playlist: String,
}

pub struct Page {
    renderer: SharedRenderer,
    components: Vec<Component>,
    names: HashMap<String, ComponentId>,
    templates: Vec<MenuTemplate>,
    /// Lists for every depth reached so far; index is depth - 1
    menus: Vec<ScrollingList>,
    collections: Vec<MenuFrame>,
    menu_depth: usize,
    selection_tx: UnboundedSender<Arc<Item>>,
    selection_rx: UnboundedReceiver<Arc<Item>>,
    selected: Option<Arc<Item>>,
    selected_changed: bool,
    scroll_active: bool,
    animations: AnimationManager,
    started: bool,
    allocated: bool,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("components", &self.components.len())
            .field("menus", &self.menus)
            .field("menu_depth", &self.menu_depth)
            .field("selected", &self.selected.as_ref().map(|i| &i.name))
            .finish_non_exhaustive()
    }
}

impl Page {
    pub fn new(renderer: SharedRenderer) -> Self {
        let (selection_tx, selection_rx) = mpsc::unbounded_channel();
        Self {
            renderer,
            components: Vec::new(),
            names: HashMap::new(),
            templates: Vec::new(),
            menus: Vec::new(),
            collections: Vec::new(),
            menu_depth: 0,
            selection_tx,
            selection_rx,
            selected: None,
            selected_changed: false,
            scroll_active: false,
            animations: AnimationManager::new(),
            started: false,
            allocated: false,
        }
    }

    /// Add a decorative component. Returns `None` when its layer is out of range.
    pub fn add_component(&mut self, name: Option<String>, component: Component) -> Option<ComponentId> {
        if component.layer() >= NUM_LAYERS {
            error!(layer = component.layer(), "Component layer too large");
            return None;
        }
        let id = ComponentId(self.components.len());
        if let Some(name) = name {
            if self.names.insert(name.clone(), id).is_some() {
                warn!(name = %name, "Duplicate component id, the later one wins");
            }
        }
        self.components.push(component);
        Some(id)
    }

    /// Menu layout for the next drill-down depth; the last one is reused
    /// for any deeper level.
    pub fn add_menu(&mut self, template: MenuTemplate) {
        self.templates.push(template);
    }

    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Sender side for scripted animation chains
    pub fn animation_handle(&self) -> AnimationHandle {
        self.animations.handle()
    }

    pub fn menu_depth(&self) -> usize {
        self.menu_depth
    }

    pub fn active_menu(&self) -> Option<&ScrollingList> {
        self.menus.get(self.menu_depth.checked_sub(1)?)
    }

    fn active_menu_mut(&mut self) -> Option<&mut ScrollingList> {
        self.menus.get_mut(self.menu_depth.checked_sub(1)?)
    }

    /// Index used for menu-variant animation lookups at the current depth
    fn depth_index(&self) -> i32 {
        self.menu_depth as i32 - 1
    }

    pub fn collection_name(&self) -> Option<&str> {
        self.collections.last().map(|f| f.collection.name.as_str())
    }

    /// Collection shown by the active menu
    pub fn collection(&self) -> Option<&CollectionInfo> {
        self.collections.last().map(|f| &f.collection)
    }

    /// Show `collection` one level deeper
    pub fn push_collection(&mut self, collection: CollectionInfo) -> bool {
        if self.templates.is_empty() {
            warn!(collection = %collection.name, "Page has no menus, collection not shown");
            return false;
        }
        if self.menu_depth > 0 {
            self.exit_menu();
        }

        let depth = self.menu_depth;
        if self.menus.len() <= depth {
            let template = &self.templates[depth.min(self.templates.len() - 1)];
            let mut list = template.instantiate(Arc::clone(&self.renderer));
            list.add_notifier(Box::new(self.selection_tx.clone()));
            if self.allocated {
                list.allocate_resources();
            }
            if self.started {
                list.trigger_enter_event();
            }
            self.menus.push(list);
        }
        self.menus[depth].set_items(collection.items());

        info!(collection = %collection.name, items = collection.len(), depth = depth + 1, "Collection pushed");
        self.collections.push(MenuFrame {
            collection,
            playlist: ALL_PLAYLIST.to_string(),
        });
        self.menu_depth += 1;
        self.apply_menu_index();
        self.enter_menu();
        true
    }

    /// Back to the previous level; the first level is never popped
    pub fn pop_collection(&mut self) -> bool {
        if self.menu_depth <= 1 || self.collections.len() <= 1 {
            return false;
        }
        self.exit_menu();
        if let Some(frame) = self.collections.pop() {
            debug!(collection = %frame.collection.name, "Collection popped");
        }
        self.menu_depth -= 1;
        self.apply_menu_index();
        self.enter_menu();
        self.selected_changed = true;
        true
    }

    fn apply_menu_index(&mut self) {
        let index = self.depth_index();
        for menu in &mut self.menus {
            menu.set_menu_index(index);
        }
        for component in &mut self.components {
            component.set_menu_index(index);
        }
    }

    pub fn enter_menu(&mut self) {
        let index = self.depth_index();
        for menu in &mut self.menus {
            menu.trigger_menu_enter_event(index);
        }
        for component in &mut self.components {
            component.trigger_menu_enter(index);
        }
    }

    pub fn exit_menu(&mut self) {
        let index = self.depth_index();
        for menu in &mut self.menus {
            menu.trigger_menu_exit_event(index);
        }
        for component in &mut self.components {
            component.trigger_menu_exit(index);
        }
    }

    pub fn playlist_name(&self) -> Option<&str> {
        self.collections.last().map(|f| f.playlist.as_str())
    }

    pub fn next_playlist(&mut self) {
        self.cycle_playlist(true);
    }

    pub fn prev_playlist(&mut self) {
        self.cycle_playlist(false);
    }

    /// Step to the neighbouring non-empty playlist, wrapping around
    fn cycle_playlist(&mut self, forward: bool) {
        let Some(frame) = self.collections.last() else {
            return;
        };
        let names = frame.collection.playlist_names();
        if names.is_empty() {
            return;
        }
        let count = names.len();
        let mut index = names.iter().position(|n| *n == frame.playlist).unwrap_or(0);
        for _ in 0..count {
            index = if forward { (index + 1) % count } else { (index + count - 1) % count };
            let non_empty = frame
                .collection
                .playlist(&names[index])
                .is_some_and(|items| !items.is_empty());
            if non_empty {
                break;
            }
        }
        let name = names[index].clone();
        self.show_playlist(name);
    }

    /// Switch to a named playlist. Unknown or empty playlists are ignored.
    pub fn select_playlist(&mut self, name: &str) -> bool {
        let Some(frame) = self.collections.last() else {
            return false;
        };
        let non_empty = frame
            .collection
            .playlist(name)
            .is_some_and(|items| !items.is_empty());
        if !non_empty {
            debug!(playlist = %name, "Playlist missing or empty");
            return false;
        }
        self.show_playlist(name.to_string());
        true
    }

    fn show_playlist(&mut self, name: String) {
        let Some(frame) = self.collections.last_mut() else {
            return;
        };
        let Some(items) = frame.collection.playlist(&name) else {
            return;
        };
        debug!(playlist = %name, items = items.len(), "Playlist selected");
        frame.playlist = name;
        if let Some(menu) = self.active_menu_mut() {
            menu.set_items(items);
        }
    }

    /// Add the selected item to the favorites of the current collection.
    /// Ignored while the favorites themselves are showing.
    pub fn add_to_favorites(&mut self) -> bool {
        let Some(item) = self.selected_item() else {
            return false;
        };
        let Some(frame) = self.collections.last_mut() else {
            return false;
        };
        if frame.playlist == FAVORITES_PLAYLIST {
            return false;
        }
        let added = frame.collection.add_to_playlist(FAVORITES_PLAYLIST, &item);
        if added {
            info!(item = %item.name, collection = %frame.collection.name, "Added to favorites");
        }
        added
    }

    /// Drop the selected item from the favorites. A showing favorites list
    /// is refreshed, falling back to `all` once it runs empty.
    pub fn remove_from_favorites(&mut self) -> bool {
        let Some(item) = self.selected_item() else {
            return false;
        };
        let Some(frame) = self.collections.last_mut() else {
            return false;
        };
        if !frame.collection.remove_from_playlist(FAVORITES_PLAYLIST, &item) {
            return false;
        }
        info!(item = %item.name, collection = %frame.collection.name, "Removed from favorites");

        if frame.playlist == FAVORITES_PLAYLIST {
            let emptied = frame
                .collection
                .playlist(FAVORITES_PLAYLIST)
                .map_or(true, |items| items.is_empty());
            let next = if emptied { ALL_PLAYLIST } else { FAVORITES_PLAYLIST };
            self.show_playlist(next.to_string());
        }
        true
    }

    /// Start or stop continuous scrolling of the active menu
    pub fn set_scrolling(&mut self, direction: ScrollDirection) {
        let active = direction != ScrollDirection::Idle;
        if active && !self.scroll_active && self.selected.is_some() {
            for component in &mut self.components {
                component.trigger_menu_scroll();
            }
        }
        self.scroll_active = active;
        for component in &mut self.components {
            component.set_scroll_active(active);
        }
        if let Some(menu) = self.active_menu_mut() {
            menu.set_scroll_direction(direction);
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll_active
    }

    /// Forward moves one page down the list
    pub fn page_scroll(&mut self, direction: ScrollDirection) {
        if let Some(menu) = self.active_menu_mut() {
            match direction {
                ScrollDirection::Forward => menu.page_down(),
                ScrollDirection::Back => menu.page_up(),
                ScrollDirection::Idle => {}
            }
        }
    }

    /// Forward moves to the next letter group
    pub fn letter_scroll(&mut self, direction: ScrollDirection) {
        if let Some(menu) = self.active_menu_mut() {
            match direction {
                ScrollDirection::Forward => menu.letter_up(),
                ScrollDirection::Back => menu.letter_down(),
                ScrollDirection::Idle => {}
            }
        }
    }

    pub fn select_random(&mut self) {
        if let Some(menu) = self.active_menu_mut() {
            menu.random();
        }
    }

    pub fn selected_item(&self) -> Option<Arc<Item>> {
        self.active_menu()?.selected_item()
    }

    pub fn item_by_offset(&self, offset: i32) -> Option<Arc<Item>> {
        self.active_menu()?.item_by_offset(offset)
    }

    pub fn start(&mut self) {
        self.started = true;
        for component in &mut self.components {
            component.trigger_enter();
        }
        for menu in &mut self.menus {
            menu.trigger_enter_event();
        }
    }

    pub fn stop(&mut self) {
        self.started = false;
        for component in &mut self.components {
            component.trigger_exit();
        }
        for menu in &mut self.menus {
            menu.trigger_exit_event();
        }
    }

    pub fn is_menu_idle(&self) -> bool {
        self.menus.iter().all(Drawable::is_idle)
    }

    pub fn is_graphics_idle(&self) -> bool {
        self.components.iter().all(Drawable::is_idle)
    }

    /// Take pending selection reports; a settled change fires a highlight
    fn process_selection(&mut self) {
        while let Ok(item) = self.selection_rx.try_recv() {
            self.selected = Some(item);
            self.selected_changed = true;
        }

        let settled = self
            .active_menu()
            .map_or(true, |m| m.scroll_state() == ScrollState::Idle);
        if !self.selected_changed || self.scroll_active || !settled {
            return;
        }
        self.selected_changed = false;
        if let Some(item) = self.selected_item() {
            self.selected = Some(item);
        }

        let item = self.selected.clone();
        debug!(item = ?item.as_ref().map(|i| &i.name), "Highlight");
        for component in &mut self.components {
            component.trigger_highlight(item.as_ref());
        }
        for menu in &mut self.menus {
            menu.trigger_highlight_event(item.as_ref());
        }
    }
}

impl Drawable for Page {
    fn update(&mut self, dt: f32) {
        self.animations.update(dt, &mut self.components);
        for menu in &mut self.menus {
            menu.update(dt);
        }
        self.process_selection();
        for component in &mut self.components {
            component.update(dt);
        }
    }

    /// Layers low to high; decorative components before menu slots
    fn draw(&mut self) {
        for layer in 0..NUM_LAYERS {
            for component in &mut self.components {
                if component.layer() == layer {
                    component.draw();
                }
            }
            for menu in &mut self.menus {
                menu.draw_layer(layer);
            }
        }
    }

    fn allocate_resources(&mut self) {
        self.allocated = true;
        for component in &mut self.components {
            component.allocate_resources();
        }
        for menu in &mut self.menus {
            menu.allocate_resources();
        }
    }

    fn free_resources(&mut self) {
        self.allocated = false;
        for component in &mut self.components {
            component.free_resources();
        }
        for menu in &mut self.menus {
            menu.free_resources();
        }
    }

    fn is_idle(&self) -> bool {
        self.is_menu_idle() && self.is_graphics_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::events::{DEFAULT_INDEX, ENTER, MENU_ENTER, MENU_EXIT};
    use crate::animate::{Animation, AnimationEvents, ScriptedStep, Tween, TweenSet};
    use crate::component::{AnimationState, ComponentKind, MediaBuilder};
    use crate::render::testing::{Call, RecordingRenderer};
    use marquee_core::{ScrollConfig, TweenAlgorithm, TweenProperty};
    use std::sync::Mutex;

    fn renderer() -> (Arc<Mutex<RecordingRenderer>>, SharedRenderer) {
        let recording = Arc::new(Mutex::new(RecordingRenderer::new()));
        let shared: SharedRenderer = recording.clone();
        (recording, shared)
    }

    fn template(count: usize, layer: usize) -> MenuTemplate {
        let points = (0..count)
            .map(|i| {
                let mut view = ViewInfo::default();
                view.y = 100.0 * i as f32;
                view.height = 50.0;
                view.layer = layer;
                view
            })
            .collect();
        MenuTemplate {
            builder: MediaBuilder::new(vec!["/media".into()], "logo", false),
            points,
            events: vec![AnimationEvents::new(); count],
            scroll: ScrollConfig::default(),
        }
    }

    fn collection(name: &str, count: usize) -> CollectionInfo {
        CollectionInfo::new(
            name,
            (0..count).map(|i| Item::new(format!("{name}{i:02}"))).collect(),
        )
    }

    fn decoration(shared: &SharedRenderer, layer: usize) -> Component {
        let mut view = ViewInfo::default();
        view.layer = layer;
        Component::new(ComponentKind::image("bg.png"), view, AnimationEvents::new(), Arc::clone(shared))
    }

    fn settle(page: &mut Page) {
        for _ in 0..10 {
            page.update(1.0);
        }
    }

    #[test]
    fn test_rejects_layer_out_of_range() {
        let (_, shared) = renderer();
        let mut page = Page::new(Arc::clone(&shared));
        assert!(page.add_component(None, decoration(&shared, NUM_LAYERS)).is_none());
        let id = page.add_component(Some("bg".to_string()), decoration(&shared, 3));
        assert_eq!(id, Some(ComponentId(0)));
        assert_eq!(page.component_id("bg"), id);
        assert_eq!(page.component_id("missing"), None);
    }

    #[test]
    fn test_push_without_menus_fails() {
        let (_, shared) = renderer();
        let mut page = Page::new(shared);
        assert!(!page.push_collection(collection("arcade", 3)));
        assert!(page.selected_item().is_none());
    }

    #[test]
    fn test_draw_order_interleaves_layers() {
        let (recording, shared) = renderer();
        let mut page = Page::new(Arc::clone(&shared));
        page.add_component(None, decoration(&shared, 5));
        page.add_component(None, decoration(&shared, 0));
        page.add_menu(template(1, 2));
        page.allocate_resources();
        page.push_collection(collection("arcade", 4));
        page.start();
        settle(&mut page);

        recording.lock().unwrap().calls.clear();
        page.draw();
        let recording = recording.lock().unwrap();
        // Layer 0 backdrop, the layer 2 slot, then the layer 5 backdrop
        let heights: Vec<f32> = recording
            .calls
            .iter()
            .map(|c| match c {
                Call::Copy { dst, .. } | Call::Solid { dst, .. } => dst.height,
            })
            .collect();
        assert_eq!(heights, vec![100.0, 50.0, 100.0]);
    }

    #[test]
    fn test_highlight_waits_for_scroll_to_stop() {
        let (_, shared) = renderer();
        let mut page = Page::new(Arc::clone(&shared));
        let mut reloadable = Component::new(
            ComponentKind::reloadable_text("name"),
            ViewInfo::default(),
            AnimationEvents::new(),
            Arc::clone(&shared),
        );
        reloadable.trigger_enter();
        let id = page.add_component(None, reloadable).unwrap();
        page.add_menu(template(3, 0));
        page.allocate_resources();
        page.push_collection(collection("arcade", 10));
        page.start();
        settle(&mut page);

        let text = |page: &Page| match page.component(id).unwrap().kind() {
            ComponentKind::ReloadableText { text, .. } => text.clone(),
            other => panic!("unexpected kind {other:?}"),
        };
        assert_eq!(text(&page), "arcade00");

        page.set_scrolling(ScrollDirection::Forward);
        for _ in 0..4 {
            page.update(0.05);
        }
        assert!(page.selected_item().unwrap().name != "arcade00");
        assert_eq!(text(&page), "arcade00");

        page.set_scrolling(ScrollDirection::Idle);
        settle(&mut page);
        let selected = page.selected_item().unwrap();
        assert_eq!(text(&page), selected.name);
    }

    #[test]
    fn test_drill_down_wires_menu_depth() {
        let (_, shared) = renderer();
        let mut page = Page::new(Arc::clone(&shared));
        let mut events = AnimationEvents::new();
        events.set(ENTER, DEFAULT_INDEX, Animation::default());
        let slide = |to: f32| {
            Animation::new(vec![TweenSet::new(vec![Tween::new(
                TweenProperty::X,
                TweenAlgorithm::Linear,
                0.0,
                to,
                0.5,
            )])])
        };
        events.set(MENU_ENTER, 1, slide(10.0));
        events.set(MENU_EXIT, 0, slide(-10.0));
        let component = Component::new(ComponentKind::Container, ViewInfo::default(), events, Arc::clone(&shared));
        let id = page.add_component(None, component).unwrap();

        page.add_menu(template(2, 0));
        page.push_collection(collection("main", 3));
        page.start();
        settle(&mut page);
        assert_eq!(page.menu_depth(), 1);

        assert!(page.push_collection(collection("arcade", 5)));
        assert_eq!(page.menu_depth(), 2);
        assert_eq!(page.collection_name(), Some("arcade"));
        // Exit of depth 0 and enter of depth 1 are both pending; exit wins the tie-break
        page.update(0.0);
        assert_eq!(page.component(id).unwrap().state(), AnimationState::MenuExit);
        settle(&mut page);
        assert_eq!(page.component(id).unwrap().view().x, 10.0);

        assert_eq!(page.selected_item().unwrap().name, "arcade00");
        assert!(page.pop_collection());
        assert!(!page.pop_collection());
        assert_eq!(page.selected_item().unwrap().name, "main00");
    }

    #[test]
    fn test_favorites_follow_selection() {
        let (_, shared) = renderer();
        let mut page = Page::new(shared);
        page.add_menu(template(2, 0));
        page.push_collection(collection("arcade", 6));
        assert!(!page.select_playlist("favorites"));

        assert!(page.add_to_favorites());
        assert!(!page.add_to_favorites());
        page.page_scroll(ScrollDirection::Forward);
        assert_eq!(page.selected_item().unwrap().name, "arcade02");
        assert!(page.add_to_favorites());

        assert!(page.select_playlist("favorites"));
        assert_eq!(page.active_menu().unwrap().size(), 2);
        // Nothing to add from the favorites list itself
        assert!(!page.add_to_favorites());
        assert_eq!(page.collection().unwrap().playlist("favorites").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_favorite_while_showing() {
        let (_, shared) = renderer();
        let mut page = Page::new(shared);
        page.add_menu(template(2, 0));
        let mut arcade = collection("arcade", 6);
        arcade.add_playlist("favorites", ["arcade01", "arcade03"]);
        page.push_collection(arcade);
        assert!(page.select_playlist("favorites"));
        assert_eq!(page.selected_item().unwrap().name, "arcade01");

        assert!(page.remove_from_favorites());
        assert_eq!(page.playlist_name(), Some("favorites"));
        assert_eq!(page.active_menu().unwrap().size(), 1);
        assert_eq!(page.selected_item().unwrap().name, "arcade03");

        // The last one out returns to the full list
        assert!(page.remove_from_favorites());
        assert_eq!(page.playlist_name(), Some("all"));
        assert_eq!(page.active_menu().unwrap().size(), 6);
        assert!(!page.remove_from_favorites());
    }

    #[test]
    fn test_playlist_cycle_skips_empty() {
        let (_, shared) = renderer();
        let mut page = Page::new(shared);
        page.add_menu(template(2, 0));
        let mut arcade = collection("arcade", 6);
        arcade.add_playlist("shooters", ["arcade02", "arcade04"]);
        page.push_collection(arcade);
        assert_eq!(page.playlist_name(), Some("all"));

        // favorites is empty and gets skipped
        page.next_playlist();
        assert_eq!(page.playlist_name(), Some("shooters"));
        assert_eq!(page.active_menu().unwrap().size(), 2);
        page.next_playlist();
        assert_eq!(page.playlist_name(), Some("all"));
        page.prev_playlist();
        assert_eq!(page.playlist_name(), Some("shooters"));

        assert!(!page.select_playlist("favorites"));
        assert!(!page.select_playlist("nope"));
        assert!(page.select_playlist("all"));
        assert_eq!(page.active_menu().unwrap().size(), 6);
    }

    #[test]
    fn test_scripted_animation_moves_component() {
        let (_, shared) = renderer();
        let mut page = Page::new(Arc::clone(&shared));
        let id = page
            .add_component(Some("logo".to_string()), decoration(&shared, 1))
            .unwrap();
        let handle = page.animation_handle();
        handle.start(
            ScriptedStep::new(id, 1.0, TweenAlgorithm::Linear).to(TweenProperty::Y, 40.0),
            false,
            true,
        );
        page.update(0.5);
        assert_eq!(page.component(id).unwrap().view().y, 20.0);
        page.update(0.5);
        assert_eq!(page.component(id).unwrap().view().y, 40.0);
    }

    #[test]
    fn test_idle_tracks_lists_and_components() {
        let (_, shared) = renderer();
        let mut page = Page::new(Arc::clone(&shared));
        page.add_component(None, decoration(&shared, 0));
        page.add_menu(template(2, 0));
        page.allocate_resources();
        page.push_collection(collection("arcade", 4));
        page.start();
        settle(&mut page);
        assert!(page.is_idle());

        page.stop();
        settle(&mut page);
        assert!(page.is_idle());
        page.free_resources();
    }
}
