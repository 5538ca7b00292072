//! Rendering collaborator.
//!
//! The engine decides what goes where; a `Renderer` owns the actual
//! textures. Handles returned here are opaque to the engine, which only
//! promises to create them before the first draw and destroy them before a
//! reload or teardown. Renderers shared with a decode thread do their own
//! locking around every call.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::view_info::Reflection;

/// The one renderer every component draws through. The mutex is the single
/// lock guarding create/destroy/blit.
pub type SharedRenderer = Arc<Mutex<dyn Renderer + Send>>;

pub fn shared<R: Renderer + Send + 'static>(renderer: R) -> SharedRenderer {
    Arc::new(Mutex::new(renderer))
}

/// Run `f` with the renderer locked. A poisoned lock is recovered, since a
/// panicked frame leaves no half-written engine state behind.
pub fn with_renderer<T>(renderer: &SharedRenderer, f: impl FnOnce(&mut dyn Renderer) -> T) -> T {
    let mut guard = renderer.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut *guard)
}

/// Opaque texture handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// A created texture and its natural size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned rectangle in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap of two rectangles, `None` when they do not touch
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// One character of a font atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub texture: Texture,
    /// Source rectangle inside `texture`
    pub rect: Rect,
    /// Horizontal pen advance
    pub advance: f32,
}

pub trait Renderer {
    fn create_image(&mut self, path: &Path) -> Option<Texture>;

    fn create_video(&mut self, path: &Path) -> Option<Texture>;

    /// Glyph metrics and atlas location for `ch` at `font_size`
    fn measure_glyph(&mut self, ch: char, font_size: f32) -> Option<Glyph>;

    fn render_copy(
        &mut self,
        texture: &Texture,
        alpha: f32,
        src: Option<Rect>,
        dst: Rect,
        angle: f32,
        reflection: Option<&Reflection>,
    );

    /// Filled box, used for container backgrounds
    fn render_solid(&mut self, color: [f32; 3], alpha: f32, dst: Rect);

    fn destroy(&mut self, texture: Texture);
}
