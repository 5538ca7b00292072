//! Animation primitives for components
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Penner easing formulas over `TweenAlgorithm`
//! - `tween` - One property interpolated over time
//! - `tween_set` - Tweens that play together as a step
//!
//! ## L3 Molecular Layer
//! - `animation` - Steps played in order with a cursor
//! - `events` - Named, variant-indexed animation table
//! - `manager` - Command-driven scheduler for ad-hoc chains
//!
//! # Usage
//!
//! ```ignore
//! use marquee_ui::animate::{Animation, Tween, TweenSet};
//!
//! let step = TweenSet::new(vec![Tween::new(TweenProperty::X, TweenAlgorithm::Linear, 0.0, 100.0, 0.5)]);
//! let mut animation = Animation::new(vec![step]);
//!
//! // Once per frame
//! let done = animation.advance(dt, &mut view, false);
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod tween;
pub mod tween_set;

// L3 Molecular Layer
pub mod animation;
pub mod events;
pub mod manager;

pub use animation::Animation;
pub use easing::TweenAlgorithmExt;
pub use events::AnimationEvents;
pub use manager::{AnimationHandle, AnimationManager, AnimationTarget, ChainId, ScriptedStep};
pub use tween::Tween;
pub use tween_set::TweenSet;
