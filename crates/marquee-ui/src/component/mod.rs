//! On-screen components
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `scrolling_text` - Marquee timing and glyph clipping
//! - `kind` - Image, video, text, container and reloadable kinds
//!
//! ## L3 Molecular Layer
//! - `state` - Enter/highlight/exit/menu state machine
//! - `builder` - Media lookup with fallback tiers
//!
//! A [`Component`] pairs one kind with its view and state machine and is
//! driven through the [`Drawable`] capability.

// L4 Atomic Layer
pub mod kind;
pub mod scrolling_text;

// L3 Molecular Layer
pub mod builder;
pub mod state;

use std::sync::{Arc, Weak};

use marquee_core::Item;

use crate::animate::AnimationEvents;
use crate::render::{with_renderer, SharedRenderer};
use crate::view_info::ViewInfo;

use kind::clip;

pub use builder::MediaBuilder;
pub use kind::ComponentKind;
pub use scrolling_text::ScrollingText;
pub use state::{AnimationState, StateMachine};

/// Handle for addressing a component from outside its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

/// What the page loop needs from anything it draws
pub trait Drawable {
    fn update(&mut self, dt: f32);
    fn draw(&mut self);
    fn allocate_resources(&mut self);
    fn free_resources(&mut self);
    fn is_idle(&self) -> bool;
}

pub struct Component {
    /// Live view, written by animations every frame
    view: ViewInfo,
    machine: StateMachine,
    kind: ComponentKind,
    renderer: SharedRenderer,
    selected: Weak<Item>,
    reload_pending: bool,
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("kind", &self.kind)
            .field("state", &self.machine.state())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Component {
    pub fn new(kind: ComponentKind, view: ViewInfo, events: AnimationEvents, renderer: SharedRenderer) -> Self {
        Self {
            view,
            machine: StateMachine::new(events),
            kind,
            renderer,
            selected: Weak::new(),
            reload_pending: false,
        }
    }

    pub fn view(&self) -> &ViewInfo {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewInfo {
        &mut self.view
    }

    pub fn set_view(&mut self, view: ViewInfo) {
        self.view = view;
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn state(&self) -> AnimationState {
        self.machine.state()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn state_machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }

    /// Swap in new media, releasing the old textures
    pub fn replace_kind(&mut self, kind: ComponentKind) {
        self.free_resources();
        self.kind = kind;
        self.allocate_resources();
    }

    pub fn set_events(&mut self, events: AnimationEvents) {
        self.machine.set_events(events);
    }

    pub fn layer(&self) -> usize {
        self.view.layer
    }

    /// Item the component currently reflects, if it is still alive
    pub fn selected_item(&self) -> Option<Arc<Item>> {
        self.selected.upgrade()
    }

    pub fn trigger_enter(&mut self) {
        self.machine.trigger_enter();
    }

    pub fn trigger_exit(&mut self) {
        self.machine.trigger_exit();
    }

    pub fn trigger_menu_enter(&mut self, index: i32) {
        self.machine.trigger_menu_enter(index);
    }

    pub fn trigger_menu_exit(&mut self, index: i32) {
        self.machine.trigger_menu_exit(index);
    }

    pub fn trigger_menu_scroll(&mut self) {
        self.machine.trigger_menu_scroll();
    }

    /// Record the newly selected item and ask for a highlight cycle
    pub fn trigger_highlight(&mut self, item: Option<&Arc<Item>>) {
        self.selected = item.map(Arc::downgrade).unwrap_or_default();
        if self.kind.bound_field().is_some() {
            self.reload_pending = true;
        }
        self.machine.trigger_highlight();
    }

    pub fn set_scroll_active(&mut self, active: bool) {
        self.machine.set_scroll_active(active);
    }

    pub fn set_menu_index(&mut self, index: i32) {
        self.machine.set_menu_index(index);
    }

    pub fn is_hidden(&self) -> bool {
        self.machine.is_hidden()
    }

    pub fn is_menu_scrolling(&self) -> bool {
        self.machine.is_menu_scrolling()
    }

    /// Bound text waits for the highlight exit to finish so the swap is
    /// not visible, unless nothing is on screen yet.
    fn reload_if_due(&mut self) {
        if !self.reload_pending {
            return;
        }
        let due = self.machine.highlight_exit_complete()
            || self.machine.is_hidden()
            || !self.kind.has_content();
        if !due {
            return;
        }
        self.reload_pending = false;

        let value = match (self.kind.bound_field(), self.selected.upgrade()) {
            (Some(field), Some(item)) => item.field(field).unwrap_or_default().to_string(),
            _ => String::new(),
        };
        let Self {
            kind,
            view,
            renderer,
            ..
        } = self;
        with_renderer(renderer, |r| kind.reload(&value, r, view));
    }
}

impl Drawable for Component {
    fn update(&mut self, dt: f32) {
        self.machine.update(dt, &mut self.view);
        self.reload_if_due();
        self.kind.update(dt);
    }

    fn draw(&mut self) {
        if self.machine.is_hidden() {
            return;
        }
        let Self {
            kind,
            view,
            renderer,
            ..
        } = self;
        with_renderer(renderer, |r| {
            if view.background_alpha > 0.0 {
                let color = [view.background_red, view.background_green, view.background_blue];
                if let Some((_, dst)) = clip(view.bounds(), view.bounds(), view.container) {
                    r.render_solid(color, view.background_alpha * view.alpha, dst);
                }
            }
            kind.draw(r, view);
        });
    }

    fn allocate_resources(&mut self) {
        let Self {
            kind,
            view,
            renderer,
            ..
        } = self;
        with_renderer(renderer, |r| kind.allocate(r, view));
    }

    fn free_resources(&mut self) {
        let Self { kind, renderer, .. } = self;
        with_renderer(renderer, |r| kind.free(r));
    }

    fn is_idle(&self) -> bool {
        self.machine.is_idle() || self.machine.is_hidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::events::{DEFAULT_INDEX, HIGHLIGHT_EXIT};
    use crate::animate::{Animation, Tween, TweenSet};
    use crate::render::testing::{Call, RecordingRenderer};
    use marquee_core::{TweenAlgorithm, TweenProperty};
    use std::sync::Mutex;

    fn renderer() -> (Arc<Mutex<RecordingRenderer>>, SharedRenderer) {
        let recording = Arc::new(Mutex::new(RecordingRenderer::new()));
        let shared: SharedRenderer = recording.clone();
        (recording, shared)
    }

    fn enter(component: &mut Component) {
        component.trigger_enter();
        for _ in 0..6 {
            component.update(10.0);
        }
        assert_eq!(component.state(), AnimationState::Idle);
    }

    #[test]
    fn test_hidden_components_are_not_drawn() {
        let (recording, shared) = renderer();
        let mut component = Component::new(
            ComponentKind::image("a.png"),
            ViewInfo::default(),
            AnimationEvents::new(),
            shared,
        );
        component.allocate_resources();
        component.draw();
        assert!(recording.lock().unwrap().calls.is_empty());

        enter(&mut component);
        component.draw();
        assert_eq!(recording.lock().unwrap().calls.len(), 1);
    }

    #[test]
    fn test_background_drawn_before_content() {
        let (recording, shared) = renderer();
        let mut view = ViewInfo::default();
        view.background_alpha = 0.5;
        view.alpha = 0.5;
        let mut component = Component::new(ComponentKind::Container, view, AnimationEvents::new(), shared);
        enter(&mut component);
        component.draw();
        let recording = recording.lock().unwrap();
        assert!(matches!(recording.calls[0], Call::Solid { alpha, .. } if alpha == 0.25));
    }

    #[test]
    fn test_free_destroys_textures() {
        let (recording, shared) = renderer();
        let mut component = Component::new(
            ComponentKind::image("a.png"),
            ViewInfo::default(),
            AnimationEvents::new(),
            shared,
        );
        component.allocate_resources();
        assert_eq!(recording.lock().unwrap().live.len(), 1);
        component.free_resources();
        assert!(recording.lock().unwrap().live.is_empty());
    }

    #[test]
    fn test_reloadable_text_waits_for_highlight_exit() {
        let (_recording, shared) = renderer();
        let mut events = AnimationEvents::new();
        events.set(
            HIGHLIGHT_EXIT,
            DEFAULT_INDEX,
            Animation::new(vec![TweenSet::new(vec![Tween::new(
                TweenProperty::Alpha,
                TweenAlgorithm::Linear,
                1.0,
                0.0,
                1.0,
            )])]),
        );
        let mut component = Component::new(
            ComponentKind::reloadable_text("year"),
            ViewInfo::default(),
            events,
            shared,
        );
        let mut galaga = Item::new("galaga");
        galaga.year = "1981".to_string();
        let mut pacman = Item::new("pacman");
        pacman.year = "1980".to_string();
        let (first, second) = (Arc::new(galaga), Arc::new(pacman));

        // Nothing loaded yet, so the first value goes in right away
        component.trigger_highlight(Some(&first));
        component.update(0.016);
        assert_eq!(component.kind(), &ComponentKind::ReloadableText {
            field: "year".to_string(),
            text: "1981".to_string(),
        });
        enter(&mut component);

        component.trigger_highlight(Some(&second));
        component.update(0.5);
        assert_eq!(component.state(), AnimationState::HighlightExit);
        assert!(matches!(component.kind(), ComponentKind::ReloadableText { text, .. } if text == "1981"));

        component.update(0.6);
        assert!(matches!(component.kind(), ComponentKind::ReloadableText { text, .. } if text == "1981"));
        // Exit animation done, handed over to highlight enter
        component.update(0.6);
        component.update(0.0);
        assert!(matches!(component.kind(), ComponentKind::ReloadableText { text, .. } if text == "1980"));
        assert_eq!(component.selected_item().map(|i| i.name.clone()), Some("pacman".to_string()));
    }
}
