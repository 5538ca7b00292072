//! Visual state of one on-screen element.

use marquee_core::TweenProperty;

use crate::render::Rect;

/// Width/height sentinel: derive from the media aspect ratio
pub const UNSET: f32 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectionSide {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl ReflectionSide {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Some(ReflectionSide::Top),
            "bottom" => Some(ReflectionSide::Bottom),
            "left" => Some(ReflectionSide::Left),
            "right" => Some(ReflectionSide::Right),
            _ => None,
        }
    }
}

/// Mirror image drawn next to a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub side: ReflectionSide,
    pub distance: f32,
    /// Fraction of the texture mirrored
    pub scale: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewInfo {
    pub x: f32,
    pub y: f32,
    /// Fraction of the width the x position refers to
    pub x_origin: f32,
    pub y_origin: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
    /// Natural size of the loaded media
    pub image_width: f32,
    pub image_height: f32,
    pub font_size: f32,
    pub angle: f32,
    pub alpha: f32,
    pub background_red: f32,
    pub background_green: f32,
    pub background_blue: f32,
    pub background_alpha: f32,
    pub layer: usize,
    pub reflection: Option<Reflection>,
    /// Clip box in stage coordinates
    pub container: Option<Rect>,
}

impl Default for ViewInfo {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_origin: 0.0,
            y_origin: 0.0,
            x_offset: 0.0,
            y_offset: 0.0,
            width: UNSET,
            height: UNSET,
            min_width: 0.0,
            min_height: 0.0,
            max_width: f32::MAX,
            max_height: f32::MAX,
            image_width: 0.0,
            image_height: 0.0,
            font_size: UNSET,
            angle: 0.0,
            alpha: 1.0,
            background_red: 0.0,
            background_green: 0.0,
            background_blue: 0.0,
            background_alpha: 0.0,
            layer: 0,
            reflection: None,
            container: None,
        }
    }
}

impl ViewInfo {
    /// Height after aspect derivation and min/max clamping
    pub fn resolved_height(&self) -> f32 {
        if self.height == UNSET && self.width == UNSET {
            return self.image_height;
        }
        let mut value = self.height;
        if self.height == UNSET && self.image_width != 0.0 {
            value = self.image_height * self.width / self.image_width;
        }
        if value < self.min_height {
            self.min_height
        } else if value > self.max_height {
            self.max_height
        } else {
            value
        }
    }

    /// Width after aspect derivation and min/max clamping
    pub fn resolved_width(&self) -> f32 {
        if self.height == UNSET && self.width == UNSET {
            return self.image_width;
        }
        let mut value = self.width;
        if self.width == UNSET && self.image_height != 0.0 {
            value = self.image_width * self.height / self.image_height;
        }
        if value < self.min_width {
            self.min_width
        } else if value > self.max_width {
            self.max_width
        } else {
            value
        }
    }

    pub fn x_relative_to_origin(&self) -> f32 {
        self.x + self.x_offset - self.x_origin * self.resolved_width()
    }

    pub fn y_relative_to_origin(&self) -> f32 {
        self.y + self.y_offset - self.y_origin * self.resolved_height()
    }

    /// Destination rectangle on the stage
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x_relative_to_origin(),
            self.y_relative_to_origin(),
            self.resolved_width(),
            self.resolved_height(),
        )
    }

    pub fn set_image_size(&mut self, width: f32, height: f32) {
        self.image_width = width;
        self.image_height = height;
    }

    /// Effective font size, falling back to the resolved height
    pub fn effective_font_size(&self) -> f32 {
        if self.font_size == UNSET {
            self.resolved_height()
        } else {
            self.font_size
        }
    }

    /// Current value of a tweenable property. Sizes report their resolved value.
    pub fn property(&self, property: TweenProperty) -> f32 {
        match property {
            TweenProperty::Height => self.resolved_height(),
            TweenProperty::Width => self.resolved_width(),
            TweenProperty::Angle => self.angle,
            TweenProperty::Alpha => self.alpha,
            TweenProperty::X => self.x,
            TweenProperty::Y => self.y,
            TweenProperty::XOrigin => self.x_origin,
            TweenProperty::YOrigin => self.y_origin,
            TweenProperty::XOffset => self.x_offset,
            TweenProperty::YOffset => self.y_offset,
            TweenProperty::FontSize => self.font_size,
            TweenProperty::BackgroundAlpha => self.background_alpha,
            TweenProperty::MaxWidth => self.max_width,
            TweenProperty::MaxHeight => self.max_height,
        }
    }

    pub fn set_property(&mut self, property: TweenProperty, value: f32) {
        match property {
            TweenProperty::Height => self.height = value,
            TweenProperty::Width => self.width = value,
            TweenProperty::Angle => self.angle = value,
            TweenProperty::Alpha => self.alpha = value,
            TweenProperty::X => self.x = value,
            TweenProperty::Y => self.y = value,
            TweenProperty::XOrigin => self.x_origin = value,
            TweenProperty::YOrigin => self.y_origin = value,
            TweenProperty::XOffset => self.x_offset = value,
            TweenProperty::YOffset => self.y_offset = value,
            TweenProperty::FontSize => self.font_size = value,
            TweenProperty::BackgroundAlpha => self.background_alpha = value,
            TweenProperty::MaxWidth => self.max_width = value,
            TweenProperty::MaxHeight => self.max_height = value,
        }
    }
}
