//! Concrete component kinds and how each one talks to the renderer.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::scrolling_text::ScrollingText;
use crate::render::{Glyph, Rect, Renderer, Texture};
use crate::view_info::ViewInfo;

/// Font size used when neither a font size nor a height is known
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Image {
        path: PathBuf,
        texture: Option<Texture>,
    },
    Video {
        path: PathBuf,
        texture: Option<Texture>,
        /// Drawn instead when the video cannot be opened
        fallback: Option<Box<ComponentKind>>,
    },
    Text {
        text: String,
    },
    /// Solid box, visible through its background colour only
    Container,
    /// Text bound to a field of the selected item
    ReloadableText {
        field: String,
        text: String,
    },
    ScrollingText(ScrollingText),
}

impl ComponentKind {
    pub fn image(path: impl Into<PathBuf>) -> Self {
        ComponentKind::Image {
            path: path.into(),
            texture: None,
        }
    }

    pub fn video(path: impl Into<PathBuf>, fallback: Option<ComponentKind>) -> Self {
        ComponentKind::Video {
            path: path.into(),
            texture: None,
            fallback: fallback.map(Box::new),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ComponentKind::Text { text: text.into() }
    }

    pub fn reloadable_text(field: impl Into<String>) -> Self {
        ComponentKind::ReloadableText {
            field: field.into(),
            text: String::new(),
        }
    }

    /// Field of the selected item this kind displays, if any
    pub fn bound_field(&self) -> Option<&str> {
        match self {
            ComponentKind::ReloadableText { field, .. } => Some(field),
            ComponentKind::ScrollingText(text) => text.field.as_deref(),
            _ => None,
        }
    }

    /// Something is loaded and ready to draw
    pub fn has_content(&self) -> bool {
        match self {
            ComponentKind::Image { texture, .. } => texture.is_some(),
            ComponentKind::Video {
                texture, fallback, ..
            } => texture.is_some() || fallback.as_ref().is_some_and(|f| f.has_content()),
            ComponentKind::Text { text } | ComponentKind::ReloadableText { text, .. } => {
                !text.is_empty()
            }
            ComponentKind::Container => true,
            ComponentKind::ScrollingText(text) => !text.text.is_empty(),
        }
    }

    /// Create textures and record the natural size on `view`
    pub fn allocate(&mut self, renderer: &mut dyn Renderer, view: &mut ViewInfo) {
        match self {
            ComponentKind::Image { path, texture } => {
                if texture.is_none() {
                    *texture = renderer.create_image(path);
                    if texture.is_none() {
                        warn!(path = %path.display(), "Failed to create image");
                    }
                }
                if let Some(t) = texture {
                    view.set_image_size(t.width, t.height);
                }
            }
            ComponentKind::Video {
                path,
                texture,
                fallback,
            } => {
                if texture.is_none() {
                    *texture = renderer.create_video(path);
                }
                match (texture.as_ref(), fallback) {
                    (Some(t), _) => view.set_image_size(t.width, t.height),
                    (None, Some(fallback)) => {
                        debug!(path = %path.display(), "Video unavailable, using fallback");
                        fallback.allocate(renderer, view);
                    }
                    (None, None) => warn!(path = %path.display(), "Failed to create video"),
                }
            }
            ComponentKind::Text { text } | ComponentKind::ReloadableText { text, .. } => {
                measure_text(renderer, text, view);
            }
            ComponentKind::ScrollingText(scrolling) => {
                measure_text(renderer, &scrolling.text, view);
            }
            ComponentKind::Container => {}
        }
    }

    /// Destroy textures; the kind can be allocated again later
    pub fn free(&mut self, renderer: &mut dyn Renderer) {
        match self {
            ComponentKind::Image { texture, .. } => {
                if let Some(t) = texture.take() {
                    renderer.destroy(t);
                }
            }
            ComponentKind::Video {
                texture, fallback, ..
            } => {
                if let Some(t) = texture.take() {
                    renderer.destroy(t);
                }
                if let Some(fallback) = fallback {
                    fallback.free(renderer);
                }
            }
            _ => {}
        }
    }

    /// Swap in new text from the selected item
    pub fn reload(&mut self, value: &str, renderer: &mut dyn Renderer, view: &mut ViewInfo) {
        match self {
            ComponentKind::ReloadableText { text, .. } => {
                *text = value.to_string();
                measure_text(renderer, text, view);
            }
            ComponentKind::ScrollingText(scrolling) => {
                scrolling.reload(value);
                measure_text(renderer, &scrolling.text, view);
            }
            _ => {}
        }
    }

    pub fn update(&mut self, dt: f32) {
        if let ComponentKind::ScrollingText(text) = self {
            text.update(dt);
        }
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer, view: &ViewInfo) {
        match self {
            ComponentKind::Image {
                texture: Some(texture),
                ..
            }
            | ComponentKind::Video {
                texture: Some(texture),
                ..
            } => draw_texture(renderer, texture, view),
            ComponentKind::Video {
                fallback: Some(fallback),
                ..
            } => fallback.draw(renderer, view),
            ComponentKind::Text { text } | ComponentKind::ReloadableText { text, .. } => {
                draw_text(renderer, text, view);
            }
            ComponentKind::ScrollingText(scrolling) => draw_scrolling_text(renderer, scrolling, view),
            _ => {}
        }
    }
}

/// Font size text is measured at for `view`
fn font_size(view: &ViewInfo) -> f32 {
    let size = view.effective_font_size();
    if size > 0.0 {
        size
    } else {
        DEFAULT_FONT_SIZE
    }
}

fn glyphs(renderer: &mut dyn Renderer, text: &str, size: f32) -> Vec<Glyph> {
    text.chars()
        .filter_map(|ch| renderer.measure_glyph(ch, size))
        .collect()
}

fn measure_text(renderer: &mut dyn Renderer, text: &str, view: &mut ViewInfo) {
    let size = font_size(view);
    let width: f32 = glyphs(renderer, text, size).iter().map(|g| g.advance).sum();
    view.set_image_size(width, size);
}

/// Cut `dst` to the container box, trimming `src` by the same proportion
pub fn clip(src: Rect, dst: Rect, container: Option<Rect>) -> Option<(Rect, Rect)> {
    let Some(container) = container else {
        return Some((src, dst));
    };
    let visible = dst.intersect(&container)?;
    let sx = src.width / dst.width;
    let sy = src.height / dst.height;
    Some((
        Rect::new(
            src.x + (visible.x - dst.x) * sx,
            src.y + (visible.y - dst.y) * sy,
            visible.width * sx,
            visible.height * sy,
        ),
        visible,
    ))
}

fn draw_texture(renderer: &mut dyn Renderer, texture: &Texture, view: &ViewInfo) {
    let dst = view.bounds();
    if view.container.is_none() {
        renderer.render_copy(texture, view.alpha, None, dst, view.angle, view.reflection.as_ref());
        return;
    }
    let full = Rect::new(0.0, 0.0, texture.width, texture.height);
    if let Some((src, dst)) = clip(full, dst, view.container) {
        renderer.render_copy(texture, view.alpha, Some(src), dst, view.angle, view.reflection.as_ref());
    }
}

fn draw_text(renderer: &mut dyn Renderer, text: &str, view: &ViewInfo) {
    let size = font_size(view);
    let scale = if view.image_height > 0.0 {
        view.resolved_height() / view.image_height
    } else {
        1.0
    };
    let mut x = view.x_relative_to_origin();
    let y = view.y_relative_to_origin();

    for glyph in glyphs(renderer, text, size) {
        let dst = Rect::new(x, y, glyph.rect.width * scale, glyph.rect.height * scale);
        x += glyph.advance * scale;
        if let Some((src, dst)) = clip(glyph.rect, dst, view.container) {
            renderer.render_copy(&glyph.texture, view.alpha, Some(src), dst, view.angle, view.reflection.as_ref());
        }
    }
}

fn draw_scrolling_text(renderer: &mut dyn Renderer, scrolling: &mut ScrollingText, view: &ViewInfo) {
    let size = font_size(view);
    let glyphs = glyphs(renderer, &scrolling.text, size);
    let text_width: f32 = glyphs.iter().map(|g| g.advance).sum();
    let max_width = if view.width > 0.0 && view.width < view.max_width {
        view.width
    } else {
        view.max_width
    };

    let pieces = scrolling.layout(
        &glyphs,
        view.x_relative_to_origin(),
        view.y_relative_to_origin(),
        max_width,
    );
    for (index, src, dst) in pieces {
        if let Some((src, dst)) = clip(src, dst, view.container) {
            renderer.render_copy(&glyphs[index].texture, view.alpha, Some(src), dst, view.angle, None);
        }
    }
    scrolling.wrap(text_width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Call, RecordingRenderer};

    #[test]
    fn test_image_allocate_sets_natural_size() {
        let mut renderer = RecordingRenderer::new();
        let mut view = ViewInfo::default();
        let mut kind = ComponentKind::image("art/galaga.png");
        kind.allocate(&mut renderer, &mut view);
        assert_eq!((view.image_width, view.image_height), (200.0, 100.0));
        assert!(kind.has_content());

        kind.free(&mut renderer);
        assert!(!kind.has_content());
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn test_video_falls_back() {
        let mut renderer = RecordingRenderer::new();
        let mut view = ViewInfo::default();
        let mut kind = ComponentKind::video("video/galaga.mp4", Some(ComponentKind::text("Galaga")));
        kind.allocate(&mut renderer, &mut view);
        assert!(kind.has_content());
        assert_eq!(view.image_height, DEFAULT_FONT_SIZE);

        kind.draw(&mut renderer, &view);
        assert_eq!(renderer.calls.len(), 6);
    }

    #[test]
    fn test_text_measures_with_font_size() {
        let mut renderer = RecordingRenderer::new();
        let mut view = ViewInfo::default();
        view.font_size = 20.0;
        let mut kind = ComponentKind::text("abcd");
        kind.allocate(&mut renderer, &mut view);
        assert_eq!((view.image_width, view.image_height), (40.0, 20.0));
    }

    #[test]
    fn test_text_draw_scales_to_height() {
        let mut renderer = RecordingRenderer::new();
        let mut view = ViewInfo::default();
        view.font_size = 20.0;
        let mut kind = ComponentKind::text("ab");
        kind.allocate(&mut renderer, &mut view);
        view.height = 40.0;
        kind.draw(&mut renderer, &view);
        match &renderer.calls[1] {
            Call::Copy { dst, .. } => assert_eq!(*dst, Rect::new(20.0, 0.0, 20.0, 40.0)),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_container_clip() {
        let src = Rect::new(0.0, 0.0, 100.0, 100.0);
        let dst = Rect::new(0.0, 0.0, 50.0, 50.0);
        let container = Rect::new(25.0, 0.0, 100.0, 100.0);
        let (src, dst) = clip(src, dst, Some(container)).unwrap();
        assert_eq!(dst, Rect::new(25.0, 0.0, 25.0, 50.0));
        assert_eq!(src, Rect::new(50.0, 0.0, 50.0, 100.0));
        assert!(clip(src, dst, Some(Rect::new(500.0, 0.0, 1.0, 1.0))).is_none());
    }

    #[test]
    fn test_reload_replaces_text() {
        let mut renderer = RecordingRenderer::new();
        let mut view = ViewInfo::default();
        let mut kind = ComponentKind::reloadable_text("year");
        assert!(!kind.has_content());
        kind.reload("1981", &mut renderer, &mut view);
        assert!(kind.has_content());
        assert_eq!(kind.bound_field(), Some("year"));
        assert_eq!(view.image_width, 4.0 * DEFAULT_FONT_SIZE / 2.0);
    }
}
