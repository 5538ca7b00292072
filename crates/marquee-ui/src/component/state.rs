//! L3 Molecular Layer: Component animation state machine
//!
//! Triggers only record requests. Everything visible happens in `update`,
//! which re-runs the transition table whenever the playing animation has
//! completed and then advances the (possibly new) animation.

use tracing::trace;

use crate::animate::events::{
    DEFAULT_INDEX, ENTER, EXIT, HIGHLIGHT_ENTER, HIGHLIGHT_EXIT, IDLE, MENU_ENTER, MENU_EXIT,
    MENU_SCROLL,
};
use crate::animate::{Animation, AnimationEvents};
use crate::view_info::ViewInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Hidden,
    Enter,
    HighlightEnter,
    Idle,
    HighlightExit,
    HighlightWait,
    Exit,
    MenuEnter,
    MenuScroll,
    MenuExit,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    state: AnimationState,
    events: AnimationEvents,
    current: Animation,
    tween_complete: bool,
    enter_requested: bool,
    exit_requested: bool,
    menu_enter_requested: Option<i32>,
    menu_exit_requested: Option<i32>,
    menu_scroll_requested: bool,
    new_item_selected: bool,
    highlight_exit_complete: bool,
    scroll_active: bool,
    /// Variant index for non-menu event lookups
    menu_index: i32,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(AnimationEvents::default())
    }
}

impl StateMachine {
    pub fn new(events: AnimationEvents) -> Self {
        Self {
            state: AnimationState::Hidden,
            events,
            current: Animation::default(),
            tween_complete: false,
            enter_requested: false,
            exit_requested: false,
            menu_enter_requested: None,
            menu_exit_requested: None,
            menu_scroll_requested: false,
            new_item_selected: false,
            highlight_exit_complete: false,
            scroll_active: false,
            menu_index: DEFAULT_INDEX,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn events(&self) -> &AnimationEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut AnimationEvents {
        &mut self.events
    }

    /// Swap the animation table; the playing animation keeps running
    pub fn set_events(&mut self, events: AnimationEvents) {
        self.events = events;
    }

    pub fn current(&self) -> &Animation {
        &self.current
    }

    pub fn trigger_enter(&mut self) {
        self.enter_requested = true;
    }

    pub fn trigger_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn trigger_menu_enter(&mut self, index: i32) {
        self.menu_enter_requested = Some(index);
    }

    pub fn trigger_menu_exit(&mut self, index: i32) {
        self.menu_exit_requested = Some(index);
    }

    pub fn trigger_menu_scroll(&mut self) {
        self.menu_scroll_requested = true;
    }

    pub fn trigger_highlight(&mut self) {
        self.new_item_selected = true;
    }

    pub fn set_scroll_active(&mut self, active: bool) {
        self.scroll_active = active;
    }

    pub fn set_menu_index(&mut self, index: i32) {
        self.menu_index = index;
    }

    pub fn menu_index(&self) -> i32 {
        self.menu_index
    }

    pub fn is_idle(&self) -> bool {
        self.state == AnimationState::Idle
    }

    pub fn is_hidden(&self) -> bool {
        self.state == AnimationState::Hidden
    }

    pub fn is_waiting(&self) -> bool {
        self.state == AnimationState::HighlightWait
    }

    /// A menu-scroll animation is still playing
    pub fn is_menu_scrolling(&self) -> bool {
        self.state == AnimationState::MenuScroll && !self.tween_complete
    }

    /// True for the single frame in which a highlight exit handed over to
    /// the next highlight enter
    pub fn highlight_exit_complete(&self) -> bool {
        self.highlight_exit_complete
    }

    /// Back to the initial hidden state with no pending requests
    pub fn reset(&mut self) {
        let events = std::mem::take(&mut self.events);
        let menu_index = self.menu_index;
        *self = Self::new(events);
        self.menu_index = menu_index;
    }

    pub fn update(&mut self, dt: f32, view: &mut ViewInfo) {
        self.highlight_exit_complete = false;

        let forced = matches!(
            self.state,
            AnimationState::Hidden | AnimationState::HighlightWait
        ) || (self.state == AnimationState::Idle && self.exit_requested);
        if forced {
            self.tween_complete = true;
        }

        let mut step = dt;
        if self.tween_complete {
            let from = self.state;
            let (to, event) = self.transition();
            if from != to {
                trace!(?from, ?to, "Component state transition");
            }
            self.state = to;
            self.current = match event {
                Some((name, index)) => self.events.get(name, index).clone(),
                None => Animation::default(),
            };
            self.tween_complete = false;
            step = 0.0;
        }

        self.tween_complete = self.current.advance(step, view, self.is_idle());
    }

    /// Pick the pending menu request. The lower index wins; a tie goes to
    /// menu exit. The other request stays pending.
    fn take_menu_request(&mut self) -> Option<(AnimationState, &'static str, i32)> {
        match (self.menu_enter_requested, self.menu_exit_requested) {
            (Some(enter), Some(exit)) if enter < exit => {
                self.menu_enter_requested = None;
                Some((AnimationState::MenuEnter, MENU_ENTER, enter))
            }
            (_, Some(exit)) => {
                self.menu_exit_requested = None;
                Some((AnimationState::MenuExit, MENU_EXIT, exit))
            }
            (Some(enter), None) => {
                self.menu_enter_requested = None;
                Some((AnimationState::MenuEnter, MENU_ENTER, enter))
            }
            (None, None) => None,
        }
    }

    fn take_menu_scroll(&mut self) -> Option<(AnimationState, &'static str, i32)> {
        if !self.menu_scroll_requested {
            return None;
        }
        self.menu_scroll_requested = false;
        Some((AnimationState::MenuScroll, MENU_SCROLL, self.menu_index))
    }

    fn transition(&mut self) -> (AnimationState, Option<(&'static str, i32)>) {
        use AnimationState::*;

        let index = self.menu_index;
        match self.state {
            Hidden => {
                if self.enter_requested || self.exit_requested {
                    return (Enter, Some((ENTER, index)));
                }
                if let Some((state, name, i)) = self
                    .take_menu_request()
                    .or_else(|| self.take_menu_scroll())
                {
                    return (state, Some((name, i)));
                }
                (Hidden, None)
            }
            Enter => (HighlightEnter, Some((HIGHLIGHT_ENTER, index))),
            HighlightEnter => (Idle, Some((IDLE, index))),
            Idle => {
                if self.enter_requested {
                    self.enter_requested = false;
                    self.new_item_selected = false;
                    return (Idle, None);
                }
                if let Some((state, name, i)) = self
                    .take_menu_request()
                    .or_else(|| self.take_menu_scroll())
                {
                    return (state, Some((name, i)));
                }
                if self.scroll_active || self.new_item_selected || self.exit_requested {
                    return (HighlightExit, Some((HIGHLIGHT_EXIT, index)));
                }
                (Idle, Some((IDLE, index)))
            }
            MenuEnter | MenuScroll | MenuExit => (Idle, None),
            HighlightExit | HighlightWait => {
                if self.exit_requested && self.state == HighlightWait {
                    (HighlightExit, Some((HIGHLIGHT_EXIT, index)))
                } else if self.exit_requested && self.state == HighlightExit {
                    self.exit_requested = false;
                    (Exit, Some((EXIT, index)))
                } else if self.scroll_active {
                    (HighlightWait, None)
                } else if self.new_item_selected {
                    self.highlight_exit_complete = true;
                    self.new_item_selected = false;
                    (HighlightEnter, Some((HIGHLIGHT_ENTER, index)))
                } else {
                    (HighlightWait, None)
                }
            }
            Exit => (Hidden, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::{Tween, TweenSet};
    use marquee_core::{TweenAlgorithm, TweenProperty};

    /// One-second tween on `x` ending at `marker`, so the playing event is observable
    fn marked(marker: f32) -> Animation {
        Animation::new(vec![TweenSet::new(vec![Tween::new(
            TweenProperty::X,
            TweenAlgorithm::Linear,
            marker,
            marker,
            1.0,
        )])])
    }

    fn machine() -> StateMachine {
        let mut events = AnimationEvents::new();
        events.set(ENTER, DEFAULT_INDEX, marked(1.0));
        events.set(HIGHLIGHT_ENTER, DEFAULT_INDEX, marked(2.0));
        events.set(IDLE, DEFAULT_INDEX, marked(3.0));
        events.set(HIGHLIGHT_EXIT, DEFAULT_INDEX, marked(4.0));
        events.set(EXIT, DEFAULT_INDEX, marked(5.0));
        events.set(MENU_ENTER, DEFAULT_INDEX, marked(6.0));
        events.set(MENU_EXIT, DEFAULT_INDEX, marked(7.0));
        events.set(MENU_SCROLL, DEFAULT_INDEX, marked(8.0));
        StateMachine::new(events)
    }

    #[test]
    fn test_starts_hidden_and_stays_without_requests() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        for _ in 0..3 {
            m.update(10.0, &mut view);
        }
        assert_eq!(m.state(), AnimationState::Hidden);
        assert_eq!(view, ViewInfo::default());
    }

    #[test]
    fn test_triggers_are_deferred() {
        let mut m = machine();
        let view = ViewInfo::default();
        m.trigger_enter();
        m.trigger_menu_scroll();
        assert_eq!(m.state(), AnimationState::Hidden);
        assert_eq!(view, ViewInfo::default());
    }

    #[test]
    fn test_enter_reaches_idle() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        m.trigger_enter();

        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::Enter);
        assert_eq!(view.x, 1.0);

        let mut frames = 0;
        while !m.is_idle() {
            m.update(10.0, &mut view);
            frames += 1;
            assert!(frames <= 5, "did not settle");
        }
        assert_eq!(view.x, 3.0);

        // Spurious enter is absorbed, idle keeps replaying
        for _ in 0..4 {
            m.update(10.0, &mut view);
            assert!(m.is_idle());
        }
    }

    /// Enter, reach idle, then absorb the pending enter request
    fn settle_idle(m: &mut StateMachine, view: &mut ViewInfo) {
        m.trigger_enter();
        while !m.is_idle() {
            m.update(10.0, view);
        }
        m.update(10.0, view);
        m.update(10.0, view);
        assert!(m.is_idle());
    }

    #[test]
    fn test_highlight_cycle() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        settle_idle(&mut m, &mut view);

        m.trigger_highlight();
        m.update(10.0, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightExit);
        assert_eq!(view.x, 4.0);

        m.update(10.0, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightExit);
        m.update(10.0, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightEnter);
        assert!(m.highlight_exit_complete());

        m.update(10.0, &mut view);
        assert!(!m.highlight_exit_complete());
        m.update(10.0, &mut view);
        assert!(m.is_idle());
    }

    #[test]
    fn test_scroll_active_waits() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        settle_idle(&mut m, &mut view);

        m.set_scroll_active(true);
        m.update(10.0, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightExit);
        m.update(10.0, &mut view);
        m.update(10.0, &mut view);
        assert!(m.is_waiting());

        m.trigger_highlight();
        m.update(10.0, &mut view);
        assert!(m.is_waiting());

        m.set_scroll_active(false);
        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightEnter);
    }

    #[test]
    fn test_exit_from_idle() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        settle_idle(&mut m, &mut view);

        m.trigger_exit();
        m.update(0.001, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightExit);
        m.update(10.0, &mut view);
        m.update(10.0, &mut view);
        assert_eq!(m.state(), AnimationState::Exit);
        assert_eq!(view.x, 5.0);
        m.update(10.0, &mut view);
        m.update(10.0, &mut view);
        assert!(m.is_hidden());
        m.update(10.0, &mut view);
        assert!(m.is_hidden());
    }

    #[test]
    fn test_menu_exit_wins_when_index_not_greater() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        m.trigger_menu_enter(2);
        m.trigger_menu_exit(1);
        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::MenuExit);
        assert_eq!(view.x, 7.0);

        let mut m = machine();
        m.trigger_menu_enter(1);
        m.trigger_menu_exit(1);
        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::MenuExit);
    }

    #[test]
    fn test_menu_enter_wins_with_lower_index() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        m.trigger_menu_enter(1);
        m.trigger_menu_exit(2);
        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::MenuEnter);
        assert_eq!(view.x, 6.0);

        // The losing request plays once the winner is done
        m.update(10.0, &mut view);
        m.update(10.0, &mut view);
        assert!(m.is_idle());
        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::MenuExit);
    }

    #[test]
    fn test_menu_variant_lookup() {
        let mut m = machine();
        m.events_mut().set(MENU_ENTER, 3, marked(33.0));
        let mut view = ViewInfo::default();
        m.trigger_menu_enter(3);
        m.update(0.016, &mut view);
        assert_eq!(view.x, 33.0);
    }

    #[test]
    fn test_menu_scroll_from_idle_and_back() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        settle_idle(&mut m, &mut view);

        m.trigger_menu_scroll();
        m.update(10.0, &mut view);
        assert_eq!(m.state(), AnimationState::MenuScroll);
        assert_eq!(view.x, 8.0);
        assert!(m.is_menu_scrolling());
        m.update(10.0, &mut view);
        assert!(!m.is_menu_scrolling());
        m.update(10.0, &mut view);
        assert!(m.is_idle());
    }

    #[test]
    fn test_missing_animation_snaps() {
        let mut m = StateMachine::default();
        let mut view = ViewInfo::default();
        m.trigger_enter();
        m.update(0.016, &mut view);
        assert_eq!(m.state(), AnimationState::Enter);
        m.update(0.0, &mut view);
        assert_eq!(m.state(), AnimationState::HighlightEnter);
        m.update(0.0, &mut view);
        assert!(m.is_idle());
    }

    #[test]
    fn test_reset_keeps_table() {
        let mut m = machine();
        let mut view = ViewInfo::default();
        m.set_menu_index(2);
        m.trigger_enter();
        m.update(0.016, &mut view);
        m.reset();
        assert!(m.is_hidden());
        assert_eq!(m.menu_index(), 2);
        assert!(m.events().contains(ENTER));
    }
}
