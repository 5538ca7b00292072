//! Terminal front end for the engine
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `event` - Frame-paced input polling
//! - `keymap` - Vim-style key bindings mapped to front-end actions
//! - `renderer` - `Renderer` that records each frame as sprites
//!
//! ## L3 Molecular Layer
//! - `stage` - Widgets that paint the recorded frame and a status line
//!
//! # Usage
//!
//! ```ignore
//! let terminal_renderer = Arc::new(Mutex::new(TerminalRenderer::new()));
//! let renderer: SharedRenderer = terminal_renderer.clone();
//!
//! // Each frame
//! terminal_renderer.lock()?.clear_frame();
//! page.draw();
//! let recorded = terminal_renderer.lock()?;
//! frame.render_widget(StageWidget::new(&recorded, 1920.0, 1080.0), area);
//! ```

// L4 Atomic Layer
pub mod event;
pub mod keymap;
pub mod renderer;

// L3 Molecular Layer
pub mod stage;

pub use event::{AppEvent, EventHandler};
pub use keymap::{Action, KeyBinding, Keymap};
pub use renderer::{Sprite, TerminalRenderer};
pub use stage::{StageWidget, StatusLine};
