//! Attract mode: after a stretch without input the active menu scrolls
//! forward on its own for a short, random burst, then settles again.

use rand::Rng;
use tracing::debug;

use crate::page::Page;
use crate::scrolling_list::ScrollDirection;

/// Shortest and longest burst in seconds
const BURST_SECS: std::ops::Range<f32> = 1.0..5.0;

#[derive(Debug, Clone, Default)]
pub struct AttractMode {
    /// Seconds without input before a burst; 0 disables attract mode
    idle_time: f32,
    elapsed: f32,
    active: bool,
    active_time: f32,
}

impl AttractMode {
    pub fn new(idle_time: f32) -> Self {
        Self {
            idle_time,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the idle clock, starting or ending a burst on `page`
    pub fn update(&mut self, dt: f32, page: &mut Page) {
        if self.idle_time <= 0.0 {
            return;
        }
        self.elapsed += dt;

        if !self.active && self.elapsed > self.idle_time {
            self.active = true;
            self.elapsed = 0.0;
            self.active_time = rand::thread_rng().gen_range(BURST_SECS);
            debug!(burst = self.active_time, "Attract mode started");
        }

        if !self.active {
            return;
        }
        if self.elapsed > self.active_time {
            self.active = false;
            self.elapsed = 0.0;
            page.set_scrolling(ScrollDirection::Idle);
            debug!("Attract mode finished");
        } else if !page.is_scrolling() {
            page.set_scrolling(ScrollDirection::Forward);
        }
    }

    /// Input arrived. Returns true when a running burst was cut short; the
    /// caller owns the scroll state from then on.
    pub fn reset(&mut self) -> bool {
        let was_active = self.active;
        self.elapsed = 0.0;
        self.active = false;
        self.active_time = 0.0;
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use marquee_core::{CollectionInfo, Item, ScrollConfig};

    use crate::animate::AnimationEvents;
    use crate::component::MediaBuilder;
    use crate::layout::MenuTemplate;
    use crate::render::testing::RecordingRenderer;
    use crate::render::SharedRenderer;
    use crate::view_info::ViewInfo;

    fn page() -> Page {
        let shared: SharedRenderer = Arc::new(Mutex::new(RecordingRenderer::new()));
        let mut page = Page::new(shared);
        page.add_menu(MenuTemplate {
            builder: MediaBuilder::new(vec!["/media".into()], "logo", false),
            points: vec![ViewInfo::default(); 3],
            events: vec![AnimationEvents::new(); 3],
            scroll: ScrollConfig::default(),
        });
        let items = (0..8).map(|i| Item::new(format!("game{i}"))).collect();
        page.push_collection(CollectionInfo::new("arcade", items));
        page
    }

    #[test]
    fn test_starts_after_idle_time() {
        let mut page = page();
        let mut attract = AttractMode::new(10.0);

        attract.update(6.0, &mut page);
        attract.update(3.0, &mut page);
        assert!(!attract.is_active());
        assert!(!page.is_scrolling());

        attract.update(2.0, &mut page);
        assert!(attract.is_active());
        assert!(page.is_scrolling());
    }

    #[test]
    fn test_burst_ends_idle() {
        let mut page = page();
        let mut attract = AttractMode::new(1.0);
        attract.update(1.5, &mut page);
        assert!(page.is_scrolling());

        // Longer than any burst
        attract.update(BURST_SECS.end + 0.1, &mut page);
        assert!(!attract.is_active());
        assert!(!page.is_scrolling());

        // The idle clock starts over
        attract.update(0.5, &mut page);
        assert!(!attract.is_active());
    }

    #[test]
    fn test_zero_idle_time_disables() {
        let mut page = page();
        let mut attract = AttractMode::new(0.0);
        for _ in 0..100 {
            attract.update(60.0, &mut page);
        }
        assert!(!attract.is_active());
        assert!(!page.is_scrolling());
    }

    #[test]
    fn test_reset_restarts_idle_clock() {
        let mut page = page();
        let mut attract = AttractMode::new(10.0);
        attract.update(9.0, &mut page);
        assert!(!attract.reset());
        attract.update(9.0, &mut page);
        assert!(!attract.is_active());

        attract.update(2.0, &mut page);
        assert!(attract.reset());
        assert!(!attract.is_active());
    }
}
