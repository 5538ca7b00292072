//! Tween vocabulary shared by the layout description and the engine.
//!
//! The easing math lives in `marquee-ui`; this module only names things.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Easing curve applied by a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TweenAlgorithm {
    #[default]
    Linear,
    EaseInQuadratic,
    EaseOutQuadratic,
    EaseInOutQuadratic,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuartic,
    EaseOutQuartic,
    EaseInOutQuartic,
    EaseInQuintic,
    EaseOutQuintic,
    EaseInOutQuintic,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExponential,
    EaseOutExponential,
    EaseInOutExponential,
    EaseInCircular,
    EaseOutCircular,
    EaseInOutCircular,
}

impl TweenAlgorithm {
    pub const ALL: [TweenAlgorithm; 22] = [
        TweenAlgorithm::Linear,
        TweenAlgorithm::EaseInQuadratic,
        TweenAlgorithm::EaseOutQuadratic,
        TweenAlgorithm::EaseInOutQuadratic,
        TweenAlgorithm::EaseInCubic,
        TweenAlgorithm::EaseOutCubic,
        TweenAlgorithm::EaseInOutCubic,
        TweenAlgorithm::EaseInQuartic,
        TweenAlgorithm::EaseOutQuartic,
        TweenAlgorithm::EaseInOutQuartic,
        TweenAlgorithm::EaseInQuintic,
        TweenAlgorithm::EaseOutQuintic,
        TweenAlgorithm::EaseInOutQuintic,
        TweenAlgorithm::EaseInSine,
        TweenAlgorithm::EaseOutSine,
        TweenAlgorithm::EaseInOutSine,
        TweenAlgorithm::EaseInExponential,
        TweenAlgorithm::EaseOutExponential,
        TweenAlgorithm::EaseInOutExponential,
        TweenAlgorithm::EaseInCircular,
        TweenAlgorithm::EaseOutCircular,
        TweenAlgorithm::EaseInOutCircular,
    ];

    /// Canonical layout name, e.g. `easeInOutQuadratic`
    pub fn name(&self) -> &'static str {
        match self {
            TweenAlgorithm::Linear => "linear",
            TweenAlgorithm::EaseInQuadratic => "easeInQuadratic",
            TweenAlgorithm::EaseOutQuadratic => "easeOutQuadratic",
            TweenAlgorithm::EaseInOutQuadratic => "easeInOutQuadratic",
            TweenAlgorithm::EaseInCubic => "easeInCubic",
            TweenAlgorithm::EaseOutCubic => "easeOutCubic",
            TweenAlgorithm::EaseInOutCubic => "easeInOutCubic",
            TweenAlgorithm::EaseInQuartic => "easeInQuartic",
            TweenAlgorithm::EaseOutQuartic => "easeOutQuartic",
            TweenAlgorithm::EaseInOutQuartic => "easeInOutQuartic",
            TweenAlgorithm::EaseInQuintic => "easeInQuintic",
            TweenAlgorithm::EaseOutQuintic => "easeOutQuintic",
            TweenAlgorithm::EaseInOutQuintic => "easeInOutQuintic",
            TweenAlgorithm::EaseInSine => "easeInSine",
            TweenAlgorithm::EaseOutSine => "easeOutSine",
            TweenAlgorithm::EaseInOutSine => "easeInOutSine",
            TweenAlgorithm::EaseInExponential => "easeInExponential",
            TweenAlgorithm::EaseOutExponential => "easeOutExponential",
            TweenAlgorithm::EaseInOutExponential => "easeInOutExponential",
            TweenAlgorithm::EaseInCircular => "easeInCircular",
            TweenAlgorithm::EaseOutCircular => "easeOutCircular",
            TweenAlgorithm::EaseInOutCircular => "easeInOutCircular",
        }
    }

    /// Case-insensitive lookup. Unknown names fall back to `Linear`.
    pub fn parse(name: &str) -> Self {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .unwrap_or(TweenAlgorithm::Linear)
    }
}

impl Serialize for TweenAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TweenAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// A ViewInfo field a tween can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    Height,
    Width,
    Angle,
    Alpha,
    X,
    Y,
    XOrigin,
    YOrigin,
    XOffset,
    YOffset,
    FontSize,
    BackgroundAlpha,
    MaxWidth,
    MaxHeight,
}

impl TweenProperty {
    pub const ALL: [TweenProperty; 14] = [
        TweenProperty::Height,
        TweenProperty::Width,
        TweenProperty::Angle,
        TweenProperty::Alpha,
        TweenProperty::X,
        TweenProperty::Y,
        TweenProperty::XOrigin,
        TweenProperty::YOrigin,
        TweenProperty::XOffset,
        TweenProperty::YOffset,
        TweenProperty::FontSize,
        TweenProperty::BackgroundAlpha,
        TweenProperty::MaxWidth,
        TweenProperty::MaxHeight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TweenProperty::Height => "height",
            TweenProperty::Width => "width",
            TweenProperty::Angle => "angle",
            TweenProperty::Alpha => "alpha",
            TweenProperty::X => "x",
            TweenProperty::Y => "y",
            TweenProperty::XOrigin => "xOrigin",
            TweenProperty::YOrigin => "yOrigin",
            TweenProperty::XOffset => "xOffset",
            TweenProperty::YOffset => "yOffset",
            TweenProperty::FontSize => "fontSize",
            TweenProperty::BackgroundAlpha => "backgroundAlpha",
            TweenProperty::MaxWidth => "maxWidth",
            TweenProperty::MaxHeight => "maxHeight",
        }
    }

    /// Case-insensitive lookup; `transparency` is accepted for `alpha`
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        if wanted.eq_ignore_ascii_case("transparency") {
            return Some(TweenProperty::Alpha);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
    }
}

impl Serialize for TweenProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TweenProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown tween property '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_parse_case_insensitive() {
        assert_eq!(
            TweenAlgorithm::parse("EASEINOUTQUADRATIC"),
            TweenAlgorithm::EaseInOutQuadratic
        );
        assert_eq!(TweenAlgorithm::parse("easeOutSine"), TweenAlgorithm::EaseOutSine);
        assert_eq!(TweenAlgorithm::parse("linear"), TweenAlgorithm::Linear);
    }

    #[test]
    fn test_algorithm_unknown_is_linear() {
        assert_eq!(TweenAlgorithm::parse("bounce"), TweenAlgorithm::Linear);
        assert_eq!(TweenAlgorithm::parse(""), TweenAlgorithm::Linear);
    }

    #[test]
    fn test_property_aliases() {
        assert_eq!(TweenProperty::parse("transparency"), Some(TweenProperty::Alpha));
        assert_eq!(TweenProperty::parse("XORIGIN"), Some(TweenProperty::XOrigin));
        assert_eq!(TweenProperty::parse("fontsize"), Some(TweenProperty::FontSize));
        assert_eq!(TweenProperty::parse("depth"), None);
    }

    #[test]
    fn test_serde_names() {
        #[derive(Deserialize)]
        struct Row {
            property: TweenProperty,
            algorithm: TweenAlgorithm,
        }
        let row: Row = toml::from_str("property = \"yOffset\"\nalgorithm = \"easeInCircular\"").unwrap();
        assert_eq!(row.property, TweenProperty::YOffset);
        assert_eq!(row.algorithm, TweenAlgorithm::EaseInCircular);

        let bad: Result<Row, _> = toml::from_str("property = \"depth\"\nalgorithm = \"linear\"");
        assert!(bad.is_err());
    }
}
