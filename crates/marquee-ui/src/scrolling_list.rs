//! Circular scrolling menu
//!
//! A fixed row of slots (scroll points) shows a sliding window over a ring
//! of items. Each scroll tick moves the window by one item: the component
//! that falls off one end is rebuilt for the item entering at the other
//! end, and every slot is re-tweened towards its neighbour's position.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, trace};

use marquee_core::{Item, ItemList, ScrollConfig, TweenAlgorithm, TweenProperty};

use crate::animate::events::{DEFAULT_INDEX, MENU_SCROLL};
use crate::animate::{Animation, AnimationEvents, Tween, TweenSet};
use crate::component::{Component, Drawable, MediaBuilder};
use crate::notifier::MenuNotifier;
use crate::render::{with_renderer, SharedRenderer};
use crate::view_info::ViewInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    #[default]
    Idle,
    Forward,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    #[default]
    Idle,
    Active,
    Stopping,
}

/// `(offset + i) mod size`, 0 for an empty ring
pub fn loop_increment(offset: usize, i: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    (offset + i) % size
}

/// `(offset - i) mod size`, 0 for an empty ring
pub fn loop_decrement(offset: usize, i: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    ((offset % size) + size - (i % size)) % size
}

fn starts_alphabetic(title: &str) -> (bool, Option<char>) {
    let first = title.chars().next();
    (first.is_some_and(char::is_alphabetic), first)
}

/// Moving from `start` to `end` crosses a letter group boundary
fn crosses_group(start: &str, end: &str) -> bool {
    let (start_alpha, start_char) = starts_alphabetic(start);
    let (end_alpha, end_char) = starts_alphabetic(end);
    (start_alpha ^ end_alpha) || (start_alpha && end_alpha && start_char != end_char)
}

/// Point `component` at `current` and install a single menu-scroll step
/// that carries every property to `next` over `duration`.
fn reset_tweens(
    component: &mut Component,
    template: &AnimationEvents,
    current: &ViewInfo,
    next: &ViewInfo,
    duration: f32,
) {
    let (width, height) = (component.view().image_width, component.view().image_height);
    let mut current = current.clone();
    let mut next = next.clone();
    current.set_image_size(width, height);
    next.set_image_size(width, height);

    let mut events = template.clone();
    events.clear(MENU_SCROLL);

    let tweens = TweenProperty::ALL
        .iter()
        .map(|&property| {
            Tween::new(
                property,
                TweenAlgorithm::EaseInOutQuadratic,
                current.property(property),
                next.property(property),
                duration,
            )
        })
        .collect();
    events.set(MENU_SCROLL, DEFAULT_INDEX, Animation::new(vec![TweenSet::new(tweens)]));

    component.set_events(events);
    component.set_view(current);
}

pub struct ScrollingList {
    items: ItemList,
    scroll_points: Vec<ViewInfo>,
    tween_points: Vec<AnimationEvents>,
    /// One per scroll point; empty while unallocated or without items
    components: Vec<Option<Component>>,
    builder: MediaBuilder,
    renderer: SharedRenderer,
    /// Logical index shown in slot 0
    item_index: usize,
    selected_offset_index: usize,
    start_scroll_time: f32,
    scroll_acceleration: f32,
    scroll_period: f32,
    requested_direction: ScrollDirection,
    current_direction: ScrollDirection,
    scroll_state: ScrollState,
    notify_all: bool,
    notifiers: Vec<Box<dyn MenuNotifier>>,
    allocated: bool,
    entered: bool,
    menu_index: i32,
}

impl std::fmt::Debug for ScrollingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollingList")
            .field("items", &self.items.len())
            .field("points", &self.scroll_points.len())
            .field("item_index", &self.item_index)
            .field("scroll_state", &self.scroll_state)
            .finish_non_exhaustive()
    }
}

impl ScrollingList {
    pub fn new(builder: MediaBuilder, renderer: SharedRenderer, scroll: ScrollConfig) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            scroll_points: Vec::new(),
            tween_points: Vec::new(),
            components: Vec::new(),
            builder,
            renderer,
            item_index: 0,
            selected_offset_index: scroll.selected_index,
            start_scroll_time: scroll.start_scroll_time,
            scroll_acceleration: scroll.scroll_acceleration,
            scroll_period: scroll.start_scroll_time,
            requested_direction: ScrollDirection::Idle,
            current_direction: ScrollDirection::Idle,
            scroll_state: ScrollState::Idle,
            notify_all: false,
            notifiers: Vec::new(),
            allocated: false,
            entered: false,
            menu_index: DEFAULT_INDEX,
        }
    }

    /// Slot geometry and per-slot animations; both must have one entry per slot
    pub fn set_points(&mut self, scroll_points: Vec<ViewInfo>, tween_points: Vec<AnimationEvents>) {
        self.deallocate_sprite_points();
        let count = scroll_points.len().min(tween_points.len());
        self.scroll_points = scroll_points;
        self.tween_points = tween_points;
        self.scroll_points.truncate(count);
        self.tween_points.truncate(count);
        self.components = (0..count).map(|_| None).collect();
        self.item_index = loop_decrement(0, self.selected_offset_index, self.items.len());
        self.allocate_sprite_points();
    }

    pub fn set_items(&mut self, items: ItemList) {
        self.deallocate_sprite_points();
        self.items = items;
        self.item_index = loop_decrement(0, self.selected_offset_index, self.items.len());
        self.allocate_sprite_points();
        self.notify_all = true;
        debug!(items = self.items.len(), "Scrolling list items set");
    }

    pub fn items(&self) -> &ItemList {
        &self.items
    }

    pub fn scroll_points(&self) -> &[ViewInfo] {
        &self.scroll_points
    }

    pub fn components(&self) -> &[Option<Component>] {
        &self.components
    }

    pub fn add_notifier(&mut self, notifier: Box<dyn MenuNotifier>) {
        self.notifiers.push(notifier);
    }

    pub fn set_scroll_acceleration(&mut self, value: f32) {
        self.scroll_acceleration = value;
    }

    pub fn set_start_scroll_time(&mut self, value: f32) {
        self.start_scroll_time = value;
    }

    pub fn set_scroll_direction(&mut self, direction: ScrollDirection) {
        self.requested_direction = direction;
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll_state
    }

    /// Number of items in the ring
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Logical index shown in slot 0
    pub fn item_index(&self) -> usize {
        self.item_index
    }

    /// Logical index of the selected item
    pub fn selected_index(&self) -> usize {
        loop_increment(self.item_index, self.selected_offset_index, self.items.len())
    }

    /// Jump so that logical index `index` is selected
    pub fn set_selected_index(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.item_index = loop_decrement(index, self.selected_offset_index, self.items.len());
        self.reallocate();
    }

    /// Slot that holds the selected item
    pub fn scroll_offset_index(&self) -> usize {
        self.selected_offset_index
    }

    /// Move the selection to another slot, keeping the window where it is
    pub fn set_scroll_offset_index(&mut self, offset: usize) {
        self.selected_offset_index = offset;
        self.notify_all = true;
    }

    pub fn selected_item(&self) -> Option<Arc<Item>> {
        self.items.get(self.selected_index()).cloned()
    }

    /// Item `offset` places away from the selection, wrapping both ways
    pub fn item_by_offset(&self, offset: i32) -> Option<Arc<Item>> {
        let size = self.items.len();
        if size == 0 {
            return None;
        }
        let selected = self.selected_index();
        let index = if offset >= 0 {
            loop_increment(selected, offset.unsigned_abs() as usize, size)
        } else {
            loop_decrement(selected, offset.unsigned_abs() as usize, size)
        };
        self.items.get(index).cloned()
    }

    pub fn page_up(&mut self) {
        if self.components.is_empty() || self.items.is_empty() {
            return;
        }
        self.item_index = loop_decrement(self.item_index, self.components.len(), self.items.len());
        self.reallocate();
    }

    pub fn page_down(&mut self) {
        if self.components.is_empty() || self.items.is_empty() {
            return;
        }
        self.item_index = loop_increment(self.item_index, self.components.len(), self.items.len());
        self.reallocate();
    }

    pub fn random(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.item_index = rand::thread_rng().gen_range(0..self.items.len());
        self.reallocate();
    }

    /// Next letter group
    pub fn letter_up(&mut self) {
        self.letter_change(true);
    }

    /// Start of the previous letter group
    pub fn letter_down(&mut self) {
        self.letter_change(false);
    }

    fn title_at(&self, index: usize) -> &str {
        let size = self.items.len();
        self.items[loop_increment(index, self.selected_offset_index, size)].lc_full_title()
    }

    fn letter_change(&mut self, increment: bool) {
        let size = self.items.len();
        if size == 0 {
            return;
        }

        let start = self.title_at(self.item_index).to_string();
        for i in 0..size {
            let index = if increment {
                loop_increment(self.item_index, i, size)
            } else {
                loop_decrement(self.item_index, i, size)
            };
            if crosses_group(&start, self.title_at(index)) {
                self.item_index = index;
                break;
            }
        }

        // Walk back to the first item of the group just reached
        if !increment {
            let start = self.title_at(self.item_index).to_string();
            for i in 0..size {
                let index = loop_decrement(self.item_index, i, size);
                if crosses_group(&start, self.title_at(index)) {
                    self.item_index = loop_increment(index, 1, size);
                    break;
                }
            }
        }
        self.reallocate();
    }

    pub fn trigger_enter_event(&mut self) {
        self.entered = true;
        for component in self.components.iter_mut().flatten() {
            component.trigger_enter();
        }
    }

    pub fn trigger_exit_event(&mut self) {
        self.entered = false;
        for component in self.components.iter_mut().flatten() {
            component.trigger_exit();
        }
    }

    pub fn trigger_menu_enter_event(&mut self, index: i32) {
        for component in self.components.iter_mut().flatten() {
            component.trigger_menu_enter(index);
        }
    }

    pub fn trigger_menu_exit_event(&mut self, index: i32) {
        for component in self.components.iter_mut().flatten() {
            component.trigger_menu_exit(index);
        }
    }

    /// Hand the new selection to every slot so each runs its highlight cycle
    pub fn trigger_highlight_event(&mut self, item: Option<&Arc<Item>>) {
        for component in self.components.iter_mut().flatten() {
            component.trigger_highlight(item);
        }
    }

    /// Variant index used for every slot's animation lookups
    pub fn set_menu_index(&mut self, index: i32) {
        self.menu_index = index;
        for component in self.components.iter_mut().flatten() {
            component.set_menu_index(index);
        }
    }

    pub fn draw_layer(&mut self, layer: usize) {
        for component in self.components.iter_mut().flatten() {
            if component.layer() == layer {
                component.draw();
            }
        }
    }

    /// No slot is in the middle of a menu-scroll animation
    fn slots_ready(&self) -> bool {
        !self
            .components
            .iter()
            .flatten()
            .any(Component::is_menu_scrolling)
    }

    /// One scroll tick: move the window by one item and re-tween every slot
    /// to its neighbour over `duration`.
    pub fn click(&mut self, duration: f32) {
        let size = self.items.len();
        let count = self.scroll_points.len();
        if size == 0 || count == 0 {
            return;
        }
        let forward = match self.current_direction {
            ScrollDirection::Forward => true,
            ScrollDirection::Back => false,
            ScrollDirection::Idle => return,
        };

        let (slot, item) = if forward {
            let item = Arc::clone(&self.items[loop_increment(self.item_index, count, size)]);
            self.item_index = loop_increment(self.item_index, 1, size);
            (0, item)
        } else {
            let item = Arc::clone(&self.items[loop_decrement(self.item_index, 1, size)]);
            self.item_index = loop_decrement(self.item_index, 1, size);
            (count - 1, item)
        };
        if self.allocated {
            self.recycle(slot, &item);
        }

        for i in 0..count {
            let next = if forward {
                loop_decrement(i, 1, count)
            } else {
                loop_increment(i, 1, count)
            };
            if let Some(component) = self.components[i].as_mut() {
                reset_tweens(
                    component,
                    &self.tween_points[next],
                    &self.scroll_points[i],
                    &self.scroll_points[next],
                    duration,
                );
                component.trigger_menu_scroll();
            }
        }

        if forward {
            self.components.rotate_left(1);
        } else {
            self.components.rotate_right(1);
        }
        self.notify_all = true;
        trace!(item_index = self.item_index, duration, "Scroll tick");
    }

    /// Replace the component in `slot` with a fresh one for `item`
    fn recycle(&mut self, slot: usize, item: &Item) {
        if let Some(mut old) = self.components[slot].take() {
            old.free_resources();
        }
        let mut component = self.new_component(slot, item);
        component.set_menu_index(self.menu_index);
        self.components[slot] = Some(component);
    }

    fn new_component(&self, slot: usize, item: &Item) -> Component {
        let kind = with_renderer(&self.renderer, |r| self.builder.build(item, r));
        let mut component = Component::new(
            kind,
            self.scroll_points[slot].clone(),
            self.tween_points[slot].clone(),
            Arc::clone(&self.renderer),
        );
        component.allocate_resources();
        component
    }

    fn update_scroll(&mut self) {
        if self.scroll_period < self.scroll_acceleration {
            self.scroll_period = self.start_scroll_time;
        }

        if self.scroll_state == ScrollState::Active && self.requested_direction != self.current_direction {
            debug!(requested = ?self.requested_direction, "Scroll stopping");
            self.scroll_state = ScrollState::Stopping;
        }

        let ready = self.slots_ready();
        match self.scroll_state {
            ScrollState::Idle if ready && self.requested_direction != ScrollDirection::Idle => {
                debug!(direction = ?self.requested_direction, "Scroll started");
                self.scroll_state = ScrollState::Active;
                self.scroll_period = self.start_scroll_time;
                self.current_direction = self.requested_direction;
            }
            ScrollState::Stopping if ready => self.settle(),
            ScrollState::Active if ready => {
                self.scroll_period =
                    (self.scroll_period - self.scroll_acceleration).max(self.scroll_acceleration);
                self.click(self.scroll_period);
            }
            _ => {}
        }
    }

    /// Finish the scroll with an instant tick and snap every slot onto its point
    fn settle(&mut self) {
        self.click(0.0);
        self.scroll_state = ScrollState::Idle;
        self.current_direction = ScrollDirection::Idle;

        for (i, component) in self.components.iter_mut().enumerate() {
            let Some(component) = component else {
                continue;
            };
            let mut events = self.tween_points[i].clone();
            events.clear(MENU_SCROLL);
            component.set_events(events);

            let view = component.view();
            let (width, height) = (view.image_width, view.image_height);
            self.scroll_points[i].set_image_size(width, height);
            component.set_view(self.scroll_points[i].clone());
        }
        self.notify_all = true;
        debug!(selected = self.selected_index(), "Scroll settled");
    }

    /// Rebuild every slot for the current window
    fn reallocate(&mut self) {
        self.deallocate_sprite_points();
        self.allocate_sprite_points();
        self.notify_all = true;
    }

    fn allocate_sprite_points(&mut self) {
        if !self.allocated {
            return;
        }
        if self.items.is_empty() || self.scroll_points.is_empty() {
            self.components.iter_mut().for_each(|c| *c = None);
            return;
        }

        let size = self.items.len();
        for slot in 0..self.scroll_points.len() {
            let item = Arc::clone(&self.items[loop_increment(self.item_index, slot, size)]);
            match self.components[slot].as_mut() {
                Some(component) => {
                    let kind = with_renderer(&self.renderer, |r| self.builder.build(&item, r));
                    component.replace_kind(kind);
                }
                None => {
                    let mut component = self.new_component(slot, &item);
                    component.set_menu_index(self.menu_index);
                    if self.entered {
                        component.trigger_enter();
                    }
                    self.components[slot] = Some(component);
                }
            }

            if let Some(component) = self.components[slot].as_mut() {
                let mut view = self.scroll_points[slot].clone();
                view.set_image_size(component.view().image_width, component.view().image_height);
                component.set_view(view);
                component.set_events(self.tween_points[slot].clone());
            }
        }
    }

    fn deallocate_sprite_points(&mut self) {
        for component in self.components.iter_mut().flatten() {
            component.free_resources();
        }
    }

    fn notify(&mut self) {
        if !self.notify_all {
            return;
        }
        self.notify_all = false;
        if let Some(item) = self.selected_item() {
            for notifier in &mut self.notifiers {
                notifier.on_new_item_selected(&item);
            }
        }
    }
}

impl Drawable for ScrollingList {
    fn update(&mut self, dt: f32) {
        self.update_scroll();
        for component in self.components.iter_mut().flatten() {
            component.update(dt);
        }
        self.notify();
    }

    fn draw(&mut self) {
        for component in self.components.iter_mut().flatten() {
            component.draw();
        }
    }

    fn allocate_resources(&mut self) {
        self.allocated = true;
        self.scroll_period = self.start_scroll_time;
        self.allocate_sprite_points();
    }

    fn free_resources(&mut self) {
        self.deallocate_sprite_points();
        self.allocated = false;
        self.scroll_period = 0.0;
    }

    fn is_idle(&self) -> bool {
        self.scroll_state == ScrollState::Idle && self.components.iter().flatten().all(|c| c.is_idle())
    }
}
