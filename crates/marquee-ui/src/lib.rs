//! Component animation and scrolling-list engine for the Marquee front-end
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `render` - Renderer collaborator and shared handle
//! - `view_info` - Visual state of one element
//! - `notifier` - Selection-change listeners
//! - `animate` - Tweens, animations and the scripted scheduler
//!
//! ## L3 Molecular Layer
//! - `component` - Media, text and container components with their state machine
//! - `scrolling_list` - Recycling item list over fixed scroll points
//!
//! ## L2 Organism Layer
//! - `page` - Layered components and the menu stack
//! - `attract` - Idle-time auto scrolling
//! - `layout` - Builds a page from a layout description
//! - `terminal` - Renderer and widgets for drawing into a terminal

// L4 Atomic Layer
pub mod animate;
pub mod notifier;
pub mod render;
pub mod view_info;

// L3 Molecular Layer
pub mod component;
pub mod scrolling_list;

// L2 Organism Layer
pub mod attract;
pub mod layout;
pub mod page;
pub mod terminal;

pub use attract::AttractMode;
pub use component::{Component, ComponentId, Drawable};
pub use layout::{build_page, MenuTemplate};
pub use page::Page;
pub use render::{Renderer, SharedRenderer};
pub use scrolling_list::{ScrollDirection, ScrollState, ScrollingList};
pub use view_info::ViewInfo;
