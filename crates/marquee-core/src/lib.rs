pub mod collection;
pub mod config;
pub mod error;
pub mod layout;
pub mod tween;

pub use collection::{CollectionInfo, Item, ItemList};
pub use config::{AppConfig, KeymapConfig, ScrollConfig};
pub use error::{Error, Result};
pub use layout::LayoutDescription;
pub use tween::{TweenAlgorithm, TweenProperty};
