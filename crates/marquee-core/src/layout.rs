//! Declarative layout description (TOML).
//!
//! This is only the data shape. `marquee-ui::layout` turns it into view
//! infos, animation tables and components.
//!
//! ```toml
//! width = 1920
//! height = 1080
//!
//! [[components]]
//! kind = "image"
//! path = "background.png"
//! view = { x = 0, y = 0, width = 1920, height = 1080 }
//! animations = [
//!     { event = "enter", steps = [[{ property = "alpha", from = 0, to = 1, duration = 0.5 }]] },
//! ]
//!
//! [[menus]]
//! image_type = "logo"
//! search_dirs = ["media/logos"]
//!
//! [[menus.points]]
//! view = { x = 960, y = 540, x_origin = 0.5, y_origin = 0.5, height = 120 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tween::{TweenAlgorithm, TweenProperty};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDescription {
    #[serde(default = "default_stage_width")]
    pub width: f32,
    #[serde(default = "default_stage_height")]
    pub height: f32,
    #[serde(default)]
    pub components: Vec<ComponentDescription>,
    /// One scrolling menu per drill-down depth; the last is reused past the end
    #[serde(default)]
    pub menus: Vec<MenuDescription>,
}

impl Default for LayoutDescription {
    fn default() -> Self {
        Self {
            width: default_stage_width(),
            height: default_stage_height(),
            components: Vec::new(),
            menus: Vec::new(),
        }
    }
}

/// Static view values. Unset sizes mean "derive from the media aspect ratio".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewDescription {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub x_origin: f32,
    #[serde(default)]
    pub y_origin: f32,
    #[serde(default)]
    pub x_offset: f32,
    #[serde(default)]
    pub y_offset: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    #[serde(default)]
    pub angle: f32,
    pub alpha: Option<f32>,
    pub font_size: Option<f32>,
    /// `#rrggbb`
    pub background_color: Option<String>,
    #[serde(default)]
    pub background_alpha: f32,
    #[serde(default)]
    pub layer: usize,
    pub reflection: Option<ReflectionDescription>,
    pub container: Option<ContainerDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionDescription {
    /// top, bottom, left or right
    pub side: String,
    #[serde(default)]
    pub distance: f32,
    #[serde(default = "default_reflection_scale")]
    pub scale: f32,
    #[serde(default = "default_reflection_alpha")]
    pub alpha: f32,
}

/// Clip box in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerDescription {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKindDescription {
    Image,
    Video,
    Text,
    Container,
    ReloadableText,
    ScrollingText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDescription {
    pub kind: ComponentKindDescription,
    /// Handle for scripted animations
    pub id: Option<String>,
    /// Media path, relative to the layout directory
    pub path: Option<PathBuf>,
    /// Static text
    pub text: Option<String>,
    /// Item field shown by reloadable and scrolling text
    pub field: Option<String>,
    /// Scrolling text speed in pixels per second
    #[serde(default = "default_scroll_speed")]
    pub speed: f32,
    /// Seconds before scrolling text starts moving
    #[serde(default)]
    pub start_time: f32,
    /// Seconds scrolling text rests after it has scrolled out
    #[serde(default)]
    pub end_time: f32,
    #[serde(default)]
    pub view: ViewDescription,
    #[serde(default)]
    pub animations: Vec<AnimationDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDescription {
    pub selected_index: Option<usize>,
    pub scroll_time: Option<f32>,
    pub scroll_acceleration: Option<f32>,
    /// Media category the menu shows, used as a subdirectory of each search dir
    #[serde(default = "default_image_type")]
    pub image_type: String,
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
    /// Prefer video over still images
    #[serde(default)]
    pub video: bool,
    /// Font size for the text fallback
    pub font_size: Option<f32>,
    #[serde(default)]
    pub points: Vec<PointDescription>,
    /// Animations shared by points that declare none of their own
    #[serde(default)]
    pub animations: Vec<AnimationDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointDescription {
    #[serde(default)]
    pub view: ViewDescription,
    #[serde(default)]
    pub animations: Vec<AnimationDescription>,
}

/// An event animation: a list of steps, each a list of parallel tweens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationDescription {
    pub event: String,
    #[serde(default = "default_index")]
    pub index: i32,
    #[serde(default)]
    pub steps: Vec<Vec<TweenDescription>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweenDescription {
    pub property: TweenProperty,
    #[serde(default)]
    pub algorithm: TweenAlgorithm,
    /// Start value; the static view value when missing
    pub from: Option<f32>,
    pub to: f32,
    #[serde(default)]
    pub duration: f32,
}

fn default_stage_width() -> f32 {
    1920.0
}

fn default_stage_height() -> f32 {
    1080.0
}

fn default_reflection_scale() -> f32 {
    0.25
}

fn default_reflection_alpha() -> f32 {
    1.0
}

fn default_scroll_speed() -> f32 {
    60.0
}

fn default_image_type() -> String {
    "artwork".to_string()
}

fn default_index() -> i32 {
    -1
}

impl LayoutDescription {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Layout(format!(
                "layout file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let layout = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            components = layout.components.len(),
            menus = layout.menus.len(),
            "Loaded layout"
        );
        Ok(layout)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let layout: Self = toml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::Layout(format!(
                "stage size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let animations = self
            .components
            .iter()
            .flat_map(|c| c.animations.iter())
            .chain(self.menus.iter().flat_map(|m| {
                m.animations
                    .iter()
                    .chain(m.points.iter().flat_map(|p| p.animations.iter()))
            }));
        for animation in animations {
            for tween in animation.steps.iter().flatten() {
                if !(tween.duration >= 0.0) {
                    return Err(Error::Layout(format!(
                        "negative duration on '{}' tween in '{}' animation",
                        tween.property.name(),
                        animation.event
                    )));
                }
            }
        }
        Ok(())
    }
}
