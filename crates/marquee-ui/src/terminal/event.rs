use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Frame-paced poller for terminal events
pub struct EventHandler {
    frame_time: Duration,
}

/// Front-end events
#[derive(Debug)]
pub enum AppEvent {
    /// A key went down
    Key(KeyEvent),
    /// A key came up. Only reported by terminals with keyboard enhancement.
    KeyUp(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// A frame elapsed with no input
    Tick,
}

impl EventHandler {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_time: frame_time(frame_rate),
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Wait up to `timeout` for the next event
    pub fn next(&self, timeout: Duration) -> Result<AppEvent> {
        if !event::poll(timeout)? {
            return Ok(AppEvent::Tick);
        }
        Ok(match event::read()? {
            Event::Key(key) => match key.kind {
                KeyEventKind::Press => AppEvent::Key(key),
                KeyEventKind::Release => AppEvent::KeyUp(key),
                // Auto-repeat carries nothing new for a held key
                KeyEventKind::Repeat => AppEvent::Tick,
            },
            Event::Resize(w, h) => AppEvent::Resize(w, h),
            _ => AppEvent::Tick,
        })
    }
}

fn frame_time(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(frame_rate.clamp(1, 240)))
}
