//! L4 Atomic Layer: Renderer that records a frame of sprites for the terminal
//!
//! Images are decoded once into a small thumbnail that the stage widget
//! samples with half blocks. Videos cannot be decoded here, so they show as
//! labelled boxes with the 4:3 fallback size.

use std::collections::HashMap;
use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use tracing::{debug, trace};
use unicode_width::UnicodeWidthChar;

use crate::render::{Glyph, Rect, Renderer, Texture, TextureId};
use crate::view_info::Reflection;

/// Natural size used when the real one cannot be read
pub const FALLBACK_SIZE: (f32, f32) = (640.0, 480.0);

/// Longest thumbnail edge in pixels
const THUMBNAIL_EDGE: u32 = 96;

/// Horizontal advance of a one-cell glyph, as a fraction of the font size
const CELL_ASPECT: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Media {
        texture: TextureId,
        alpha: f32,
        /// Part of the texture shown, in texture pixels
        src: Option<Rect>,
        dst: Rect,
    },
    Glyph {
        ch: char,
        alpha: f32,
        dst: Rect,
    },
    Solid {
        color: [f32; 3],
        alpha: f32,
        dst: Rect,
    },
}

#[derive(Debug)]
pub struct Media {
    /// File stem, shown when there is no thumbnail
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub thumbnail: Option<RgbaImage>,
}

#[derive(Debug, Default)]
pub struct TerminalRenderer {
    next_id: u64,
    media: HashMap<TextureId, Media>,
    glyph_ids: HashMap<char, TextureId>,
    glyph_chars: HashMap<TextureId, char>,
    frame: Vec<Sprite>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> TextureId {
        self.next_id += 1;
        TextureId(self.next_id)
    }

    /// Sprites drawn since the last `clear_frame`, in draw order
    pub fn sprites(&self) -> &[Sprite] {
        &self.frame
    }

    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }

    pub fn media(&self, id: TextureId) -> Option<&Media> {
        self.media.get(&id)
    }

    /// Live media textures
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    fn label(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn insert_media(&mut self, media: Media) -> Texture {
        let id = self.next_id();
        let texture = Texture {
            id,
            width: media.width,
            height: media.height,
        };
        self.media.insert(id, media);
        texture
    }
}

impl Renderer for TerminalRenderer {
    fn create_image(&mut self, path: &Path) -> Option<Texture> {
        if !path.is_file() {
            return None;
        }
        let (width, height, thumbnail) = match image::open(path) {
            Ok(img) => {
                let (width, height) = (img.width() as f32, img.height() as f32);
                let thumbnail = img
                    .resize(THUMBNAIL_EDGE, THUMBNAIL_EDGE, FilterType::Triangle)
                    .to_rgba8();
                (width, height, Some(thumbnail))
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Image not decodable, using fallback size");
                (FALLBACK_SIZE.0, FALLBACK_SIZE.1, None)
            }
        };
        Some(self.insert_media(Media {
            label: Self::label(path),
            width,
            height,
            thumbnail,
        }))
    }

    fn create_video(&mut self, path: &Path) -> Option<Texture> {
        if !path.is_file() {
            return None;
        }
        Some(self.insert_media(Media {
            label: Self::label(path),
            width: FALLBACK_SIZE.0,
            height: FALLBACK_SIZE.1,
            thumbnail: None,
        }))
    }

    fn measure_glyph(&mut self, ch: char, font_size: f32) -> Option<Glyph> {
        let cells = ch.width().filter(|w| *w > 0)?;
        let id = match self.glyph_ids.get(&ch) {
            Some(id) => *id,
            None => {
                let id = self.next_id();
                self.glyph_ids.insert(ch, id);
                self.glyph_chars.insert(id, ch);
                id
            }
        };
        let advance = cells as f32 * font_size * CELL_ASPECT;
        Some(Glyph {
            texture: Texture {
                id,
                width: advance,
                height: font_size,
            },
            rect: Rect::new(0.0, 0.0, advance, font_size),
            advance,
        })
    }

    fn render_copy(
        &mut self,
        texture: &Texture,
        alpha: f32,
        src: Option<Rect>,
        dst: Rect,
        _angle: f32,
        _reflection: Option<&Reflection>,
    ) {
        if let Some(ch) = self.glyph_chars.get(&texture.id) {
            // A glyph cut to less than half its width is left out
            let visible = src.map_or(1.0, |s| s.width / texture.width);
            if visible >= 0.5 {
                self.frame.push(Sprite::Glyph { ch: *ch, alpha, dst });
            }
            return;
        }
        if self.media.contains_key(&texture.id) {
            self.frame.push(Sprite::Media {
                texture: texture.id,
                alpha,
                src,
                dst,
            });
        } else {
            trace!(texture = ?texture.id, "Copy of unknown texture");
        }
    }

    fn render_solid(&mut self, color: [f32; 3], alpha: f32, dst: Rect) {
        self.frame.push(Sprite::Solid { color, alpha, dst });
    }

    fn destroy(&mut self, texture: Texture) {
        self.media.remove(&texture.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("marquee-render-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_files_create_nothing() {
        let mut renderer = TerminalRenderer::new();
        assert!(renderer.create_image(Path::new("/nonexistent/a.png")).is_none());
        assert!(renderer.create_video(Path::new("/nonexistent/a.mp4")).is_none());
    }

    #[test]
    fn test_image_natural_size_and_fallback() {
        let dir = temp_dir();
        let png = dir.join("galaga.png");
        RgbaImage::new(40, 30).save(&png).unwrap();
        let broken = dir.join("broken.png");
        std::fs::write(&broken, b"not a png").unwrap();

        let mut renderer = TerminalRenderer::new();
        let texture = renderer.create_image(&png).unwrap();
        assert_eq!((texture.width, texture.height), (40.0, 30.0));
        assert_eq!(renderer.media(texture.id).unwrap().label, "galaga");
        assert!(renderer.media(texture.id).unwrap().thumbnail.is_some());

        let texture = renderer.create_image(&broken).unwrap();
        assert_eq!((texture.width, texture.height), FALLBACK_SIZE);

        renderer.destroy(texture);
        assert_eq!(renderer.media_count(), 1);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_glyph_width_follows_cells() {
        let mut renderer = TerminalRenderer::new();
        let narrow = renderer.measure_glyph('a', 20.0).unwrap();
        let wide = renderer.measure_glyph('漢', 20.0).unwrap();
        assert_eq!(narrow.advance, 10.0);
        assert_eq!(wide.advance, 20.0);
        assert!(renderer.measure_glyph('\u{7}', 20.0).is_none());
        assert_eq!(renderer.measure_glyph('a', 40.0).unwrap().texture.id, narrow.texture.id);
    }

    #[test]
    fn test_records_frame() {
        let mut renderer = TerminalRenderer::new();
        let glyph = renderer.measure_glyph('x', 10.0).unwrap();
        renderer.render_copy(&glyph.texture, 1.0, None, Rect::new(0.0, 0.0, 5.0, 10.0), 0.0, None);
        let clipped = Rect::new(0.0, 0.0, 1.0, 10.0);
        renderer.render_copy(&glyph.texture, 1.0, Some(clipped), clipped, 0.0, None);
        renderer.render_solid([1.0, 0.0, 0.0], 0.5, Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(renderer.sprites().len(), 2);
        assert!(matches!(renderer.sprites()[0], Sprite::Glyph { ch: 'x', .. }));
        renderer.clear_frame();
        assert!(renderer.sprites().is_empty());
    }
}
