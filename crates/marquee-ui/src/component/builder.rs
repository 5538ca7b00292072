//! L3 Molecular Layer: Menu slot media lookup
//!
//! Tiers, first hit wins: art named after the item, its full title, its
//! parent when it is a clone, then `default`. Each name is tried in every
//! search directory, videos first when enabled. The renderer decides what
//! exists; the last resort is the item title as text.

use std::path::PathBuf;

use tracing::debug;

use marquee_core::Item;

use super::kind::ComponentKind;
use crate::render::Renderer;

pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "MP4", "avi", "AVI"];
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "PNG", "jpg", "jpeg", "gif", "bmp"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaBuilder {
    pub search_dirs: Vec<PathBuf>,
    /// Media category, a subdirectory of each search dir
    pub image_type: String,
    pub video: bool,
}

impl MediaBuilder {
    pub fn new(search_dirs: Vec<PathBuf>, image_type: impl Into<String>, video: bool) -> Self {
        Self {
            search_dirs,
            image_type: image_type.into(),
            video,
        }
    }

    /// File stems to look for, most specific first
    pub fn names(item: &Item) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in [
            item.name.as_str(),
            item.full_title.as_str(),
            item.clone_of.as_str(),
            "default",
        ] {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Every path tried, in order, with whether it is a video
    pub fn candidates(&self, item: &Item) -> Vec<(PathBuf, bool)> {
        let mut candidates = Vec::new();
        for name in Self::names(item) {
            for dir in &self.search_dirs {
                let base = dir.join(&self.image_type);
                if self.video {
                    for ext in VIDEO_EXTENSIONS {
                        candidates.push((base.join(format!("{name}.{ext}")), true));
                    }
                }
                for ext in IMAGE_EXTENSIONS {
                    candidates.push((base.join(format!("{name}.{ext}")), false));
                }
            }
        }
        candidates
    }

    /// Resolve media for `item`. Found media comes back with its texture
    /// already created.
    pub fn build(&self, item: &Item, renderer: &mut dyn Renderer) -> ComponentKind {
        for (path, is_video) in self.candidates(item) {
            if is_video {
                if let Some(texture) = renderer.create_video(&path) {
                    debug!(item = %item.name, path = %path.display(), "Using video");
                    return ComponentKind::Video {
                        path,
                        texture: Some(texture),
                        fallback: Some(Box::new(ComponentKind::text(item.title.clone()))),
                    };
                }
            } else if let Some(texture) = renderer.create_image(&path) {
                debug!(item = %item.name, path = %path.display(), "Using image");
                return ComponentKind::Image {
                    path,
                    texture: Some(texture),
                };
            }
        }
        debug!(item = %item.name, "No media found, using title text");
        ComponentKind::text(item.title.clone())
    }
}
