//! Layout description to engine types.
//!
//! Tween start values left out of the description default to the static
//! view value of the element the animation belongs to.

use std::path::Path;

use tracing::{debug, warn};

use marquee_core::layout::{
    AnimationDescription, ComponentDescription, ComponentKindDescription, MenuDescription,
    ViewDescription,
};
use marquee_core::{Error, LayoutDescription, Result, ScrollConfig};

use crate::animate::{Animation, AnimationEvents, Tween, TweenSet};
use crate::component::{Component, ComponentKind, MediaBuilder, ScrollingText};
use crate::page::Page;
use crate::render::{Rect, SharedRenderer};
use crate::scrolling_list::ScrollingList;
use crate::view_info::{Reflection, ReflectionSide, ViewInfo, UNSET};

/// Everything needed to build the scrolling list of one menu depth
#[derive(Debug, Clone, Default)]
pub struct MenuTemplate {
    pub builder: MediaBuilder,
    pub points: Vec<ViewInfo>,
    pub events: Vec<AnimationEvents>,
    pub scroll: ScrollConfig,
}

impl MenuTemplate {
    pub fn from_description(desc: &MenuDescription, layout_dir: &Path, defaults: ScrollConfig) -> Self {
        let scroll = ScrollConfig {
            start_scroll_time: desc.scroll_time.unwrap_or(defaults.start_scroll_time),
            scroll_acceleration: desc.scroll_acceleration.unwrap_or(defaults.scroll_acceleration),
            selected_index: desc.selected_index.unwrap_or(defaults.selected_index),
        };

        let mut points = Vec::with_capacity(desc.points.len());
        let mut events = Vec::with_capacity(desc.points.len());
        for point in &desc.points {
            let mut view = view_info(&point.view);
            if point.view.font_size.is_none() {
                if let Some(size) = desc.font_size {
                    view.font_size = size;
                }
            }
            let animations = if point.animations.is_empty() {
                &desc.animations
            } else {
                &point.animations
            };
            events.push(animation_events(animations, &view));
            points.push(view);
        }

        let search_dirs = desc.search_dirs.iter().map(|d| layout_dir.join(d)).collect();
        Self {
            builder: MediaBuilder::new(search_dirs, desc.image_type.clone(), desc.video),
            points,
            events,
            scroll,
        }
    }

    pub fn instantiate(&self, renderer: SharedRenderer) -> ScrollingList {
        let mut list = ScrollingList::new(self.builder.clone(), renderer, self.scroll);
        list.set_points(self.points.clone(), self.events.clone());
        list
    }
}

/// `#rrggbb` as unit floats
fn parse_color(value: &str) -> Option<[f32; 3]> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(|c| f32::from(c) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn view_info(desc: &ViewDescription) -> ViewInfo {
    let mut view = ViewInfo {
        x: desc.x,
        y: desc.y,
        x_origin: desc.x_origin,
        y_origin: desc.y_origin,
        x_offset: desc.x_offset,
        y_offset: desc.y_offset,
        width: desc.width.unwrap_or(UNSET),
        height: desc.height.unwrap_or(UNSET),
        angle: desc.angle,
        font_size: desc.font_size.unwrap_or(UNSET),
        background_alpha: desc.background_alpha,
        layer: desc.layer,
        ..ViewInfo::default()
    };
    if let Some(value) = desc.min_width {
        view.min_width = value;
    }
    if let Some(value) = desc.min_height {
        view.min_height = value;
    }
    if let Some(value) = desc.max_width {
        view.max_width = value;
    }
    if let Some(value) = desc.max_height {
        view.max_height = value;
    }
    if let Some(alpha) = desc.alpha {
        view.alpha = alpha;
    }

    if let Some(color) = &desc.background_color {
        match parse_color(color) {
            Some([r, g, b]) => {
                view.background_red = r;
                view.background_green = g;
                view.background_blue = b;
            }
            None => warn!(color = %color, "Invalid background color"),
        }
    }

    if let Some(reflection) = &desc.reflection {
        match ReflectionSide::parse(&reflection.side) {
            Some(side) => {
                view.reflection = Some(Reflection {
                    side,
                    distance: reflection.distance,
                    scale: reflection.scale,
                    alpha: reflection.alpha,
                });
            }
            None => warn!(side = %reflection.side, "Unknown reflection side"),
        }
    }

    view.container = desc
        .container
        .map(|c| Rect::new(c.x, c.y, c.width, c.height));
    view
}

pub fn animation_events(descs: &[AnimationDescription], base: &ViewInfo) -> AnimationEvents {
    let mut events = AnimationEvents::new();
    for desc in descs {
        let steps = desc
            .steps
            .iter()
            .map(|step| {
                TweenSet::new(
                    step.iter()
                        .map(|t| {
                            let from = t.from.unwrap_or_else(|| base.property(t.property));
                            Tween::new(t.property, t.algorithm, from, t.to, t.duration)
                        })
                        .collect(),
                )
            })
            .collect();
        events.set(&desc.event, desc.index, Animation::new(steps));
    }
    events
}

fn required<'a, T: ?Sized>(value: Option<&'a T>, what: &str, desc: &ComponentDescription) -> Result<&'a T> {
    value.ok_or_else(|| {
        Error::Layout(format!(
            "{:?} component{} needs a {what}",
            desc.kind,
            desc.id.as_deref().map(|id| format!(" '{id}'")).unwrap_or_default()
        ))
    })
}

pub fn component_kind(desc: &ComponentDescription, layout_dir: &Path) -> Result<ComponentKind> {
    let kind = match desc.kind {
        ComponentKindDescription::Image => {
            ComponentKind::image(layout_dir.join(required(desc.path.as_deref(), "path", desc)?))
        }
        ComponentKindDescription::Video => ComponentKind::video(
            layout_dir.join(required(desc.path.as_deref(), "path", desc)?),
            desc.text.as_deref().map(ComponentKind::text),
        ),
        ComponentKindDescription::Text => {
            ComponentKind::text(required(desc.text.as_deref(), "text", desc)?)
        }
        ComponentKindDescription::Container => ComponentKind::Container,
        ComponentKindDescription::ReloadableText => {
            ComponentKind::reloadable_text(required(desc.field.as_deref(), "field", desc)?)
        }
        ComponentKindDescription::ScrollingText => {
            if desc.text.is_none() && desc.field.is_none() {
                return Err(Error::Layout(
                    "scrolling text needs a text or a field".to_string(),
                ));
            }
            let text = ScrollingText::new(
                desc.text.clone().unwrap_or_default(),
                desc.speed,
                desc.start_time,
                desc.end_time,
            );
            ComponentKind::ScrollingText(match &desc.field {
                Some(field) => text.bound_to(field.clone()),
                None => text,
            })
        }
    };
    Ok(kind)
}

pub fn component(desc: &ComponentDescription, layout_dir: &Path, renderer: SharedRenderer) -> Result<Component> {
    let view = view_info(&desc.view);
    let events = animation_events(&desc.animations, &view);
    let kind = component_kind(desc, layout_dir)?;
    Ok(Component::new(kind, view, events, renderer))
}

/// Build a page with every component and menu of `desc`. Media paths are
/// resolved against `layout_dir`.
pub fn build_page(
    desc: &LayoutDescription,
    layout_dir: &Path,
    renderer: SharedRenderer,
    scroll: ScrollConfig,
) -> Result<Page> {
    let mut page = Page::new(renderer.clone());
    for component_desc in &desc.components {
        let component = component(component_desc, layout_dir, renderer.clone())?;
        page.add_component(component_desc.id.clone(), component);
    }
    for menu in &desc.menus {
        page.add_menu(MenuTemplate::from_description(menu, layout_dir, scroll));
    }
    debug!(
        components = page.components().len(),
        menus = desc.menus.len(),
        "Page built"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::events::{DEFAULT_INDEX, ENTER, HIGHLIGHT_ENTER};
    use crate::render::testing::RecordingRenderer;
    use marquee_core::{TweenAlgorithm, TweenProperty};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    const LAYOUT: &str = r##"
        [[components]]
        kind = "image"
        id = "bg"
        path = "bg.png"
        view = { x = 5, width = 640, height = 480, background_color = "#ff8000", background_alpha = 0.5 }
        animations = [
            { event = "enter", steps = [[{ property = "x", to = 50, duration = 0.5 }]] },
        ]

        [[components]]
        kind = "scrolling_text"
        field = "manufacturer"
        view = { layer = 25 }

        [[menus]]
        selected_index = 1
        scroll_time = 0.3
        search_dirs = ["media"]
        font_size = 18
        animations = [
            { event = "highlightEnter", steps = [[{ property = "alpha", from = 0.5, to = 1, duration = 0.2 }]] },
        ]

        [[menus.points]]
        view = { x = 100, y = 40, height = 40 }

        [[menus.points]]
        view = { x = 100, y = 100, height = 60, font_size = 30 }
        animations = [
            { event = "highlightEnter", index = 2, steps = [[{ property = "angle", algorithm = "easeOutCubic", to = 10, duration = 0.2 }]] },
        ]
    "##;

    fn renderer() -> SharedRenderer {
        Arc::new(Mutex::new(RecordingRenderer::new()))
    }

    #[test]
    fn test_view_info_from_description() {
        let layout = LayoutDescription::parse(LAYOUT).unwrap();
        let view = view_info(&layout.components[0].view);
        assert_eq!((view.x, view.width, view.height), (5.0, 640.0, 480.0));
        assert_eq!(view.background_red, 1.0);
        assert_eq!(view.background_green, 128.0 / 255.0);
        assert_eq!(view.background_blue, 0.0);
        assert_eq!(view.max_width, f32::MAX);

        let unset = view_info(&ViewDescription::default());
        assert_eq!(unset.width, UNSET);
        assert_eq!(unset.alpha, 1.0);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#000000"), Some([0.0, 0.0, 0.0]));
        assert_eq!(parse_color("ffffff"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }

    #[test]
    fn test_missing_from_uses_base_view() {
        let layout = LayoutDescription::parse(LAYOUT).unwrap();
        let desc = &layout.components[0];
        let events = animation_events(&desc.animations, &view_info(&desc.view));
        let enter = events.find(ENTER, DEFAULT_INDEX).unwrap();
        let tween = enter.steps()[0].find(TweenProperty::X).unwrap();
        assert_eq!((tween.start, tween.end, tween.duration), (5.0, 50.0, 0.5));
        assert_eq!(tween.algorithm, TweenAlgorithm::Linear);
    }

    #[test]
    fn test_menu_template() {
        let layout = LayoutDescription::parse(LAYOUT).unwrap();
        let template = MenuTemplate::from_description(
            &layout.menus[0],
            Path::new("/layouts/default"),
            ScrollConfig::default(),
        );
        assert_eq!(template.scroll.selected_index, 1);
        assert_eq!(template.scroll.start_scroll_time, 0.3);
        assert_eq!(
            template.scroll.scroll_acceleration,
            ScrollConfig::default().scroll_acceleration
        );
        assert_eq!(template.builder.search_dirs, vec![PathBuf::from("/layouts/default/media")]);

        // Menu font size fills in only where the point has none
        assert_eq!(template.points[0].font_size, 18.0);
        assert_eq!(template.points[1].font_size, 30.0);

        // Points without animations share the menu's
        assert!(template.events[0].find(HIGHLIGHT_ENTER, DEFAULT_INDEX).is_some());
        assert!(template.events[1].find(HIGHLIGHT_ENTER, DEFAULT_INDEX).is_none());
        assert!(template.events[1].find(HIGHLIGHT_ENTER, 2).is_some());

        let list = template.instantiate(renderer());
        assert_eq!(list.scroll_points().len(), 2);
        assert_eq!(list.scroll_offset_index(), 1);
    }

    #[test]
    fn test_component_kinds() {
        let mut desc: ComponentDescription = toml::from_str(r#"kind = "image""#).unwrap();
        assert!(matches!(component_kind(&desc, Path::new("/l")), Err(Error::Layout(_))));
        desc.path = Some(PathBuf::from("art/bg.png"));
        assert_eq!(
            component_kind(&desc, Path::new("/l")).unwrap(),
            ComponentKind::image("/l/art/bg.png")
        );

        let desc: ComponentDescription =
            toml::from_str("kind = \"video\"\npath = \"v.mp4\"\ntext = \"Attract\"").unwrap();
        assert_eq!(
            component_kind(&desc, Path::new("/l")).unwrap(),
            ComponentKind::video("/l/v.mp4", Some(ComponentKind::text("Attract")))
        );

        let desc: ComponentDescription = toml::from_str(r#"kind = "reloadable_text""#).unwrap();
        assert!(component_kind(&desc, Path::new("/l")).is_err());

        let desc: ComponentDescription = toml::from_str(r#"kind = "scrolling_text""#).unwrap();
        assert!(component_kind(&desc, Path::new("/l")).is_err());
    }

    #[test]
    fn test_build_page_skips_bad_layer() {
        let layout = LayoutDescription::parse(LAYOUT).unwrap();
        let page = build_page(&layout, Path::new("/l"), renderer(), ScrollConfig::default()).unwrap();
        assert_eq!(page.components().len(), 1);
        assert!(page.component_id("bg").is_some());
    }
}
