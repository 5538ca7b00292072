//! Horizontal marquee text.
//!
//! Waits `start_time`, slides left at `speed` until the whole string has
//! passed, rests `end_time`, then starts over. Glyphs crossing either edge
//! of the box are cut, not dropped.

use crate::render::{Glyph, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollingText {
    /// Item field to show; `None` keeps `text` fixed
    pub field: Option<String>,
    pub text: String,
    /// Pixels per second
    pub speed: f32,
    pub start_time: f32,
    pub end_time: f32,
    position: f32,
    wait_start: f32,
    wait_end: f32,
}

impl ScrollingText {
    pub fn new(text: impl Into<String>, speed: f32, start_time: f32, end_time: f32) -> Self {
        Self {
            field: None,
            text: text.into(),
            speed,
            start_time,
            end_time,
            position: 0.0,
            wait_start: start_time,
            wait_end: 0.0,
        }
    }

    pub fn bound_to(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Scroll offset into the string
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Waiting out the rest period after a full pass
    pub fn is_resting(&self) -> bool {
        self.wait_end > 0.0
    }

    pub fn update(&mut self, dt: f32) {
        if self.wait_end > 0.0 {
            self.wait_end -= dt;
        } else if self.wait_start > 0.0 {
            self.wait_start -= dt;
        } else {
            self.position += self.speed * dt;
        }
    }

    /// New text, back to the start of the cycle
    pub fn reload(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.position = 0.0;
        self.wait_start = self.start_time;
        self.wait_end = 0.0;
    }

    /// Start the rest period once the text has fully scrolled past
    pub fn wrap(&mut self, text_width: f32) {
        if self.position > text_width {
            self.wait_start = self.start_time;
            self.wait_end = self.end_time;
            self.position = 0.0;
        }
    }

    /// Glyph index with source/destination rectangles for every visible
    /// piece, the box starting at `x_origin`, `max_width` wide, tops at `y`.
    pub fn layout(&self, glyphs: &[Glyph], x_origin: f32, y: f32, max_width: f32) -> Vec<(usize, Rect, Rect)> {
        let right_edge = x_origin + max_width;
        let mut pieces = Vec::new();
        let mut x = x_origin;
        if self.position < 0.0 {
            x -= self.position;
        }
        let mut position = 0.0;

        for (index, glyph) in glyphs.iter().enumerate() {
            if x >= right_edge {
                break;
            }
            let mut src = glyph.rect;
            let mut dst = Rect::new(x, y, src.width, src.height);

            if x + glyph.advance >= right_edge {
                dst.width = right_edge - x;
                src.width = dst.width.min(src.width);
                dst.width = src.width;
            }

            if position + glyph.advance > self.position {
                if position < self.position {
                    let visible = glyph.advance + position - self.position;
                    let cut = (src.width - visible).max(0.0);
                    src.x += cut;
                    src.width -= cut;
                    dst.width = src.width;
                }
                if dst.width > 0.0 {
                    pieces.push((index, src, dst));
                }
                x += dst.width;
            }
            position += glyph.advance;
        }
        pieces
    }
}
