use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (collections, layouts, log file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Layout name, resolved under `<data_dir>/layouts/<layout>.toml`
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Collection shown at startup
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            layout: default_layout(),
            collection: default_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frames per second for the update/draw loop
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// A scroll key without a repeat for this long counts as released
    #[serde(default = "default_hold_window_ms")]
    pub hold_window_ms: u64,
    /// Idle seconds before the menu starts scrolling by itself, 0 to disable
    #[serde(default)]
    pub attract_idle_secs: f32,
    /// Scrolling list timing
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            hold_window_ms: default_hold_window_ms(),
            attract_idle_secs: 0.0,
            scroll: ScrollConfig::default(),
        }
    }
}

/// Scrolling list timing defaults, overridable per menu in the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Length of the first scroll tick in seconds
    #[serde(default = "default_start_scroll_time")]
    pub start_scroll_time: f32,
    /// Amount each tick shortens by while a direction is held
    #[serde(default = "default_scroll_acceleration")]
    pub scroll_acceleration: f32,
    /// Slot index that holds the selected item
    #[serde(default)]
    pub selected_index: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            start_scroll_time: default_start_scroll_time(),
            scroll_acceleration: default_scroll_acceleration(),
            selected_index: 0,
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Scroll toward the next item
    #[serde(default = "default_key_forward")]
    pub forward: String,
    /// Scroll toward the previous item
    #[serde(default = "default_key_back")]
    pub back: String,
    /// Jump one page forward
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    /// Jump one page back
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    /// Jump to the next letter group
    #[serde(default = "default_key_letter_down")]
    pub letter_down: String,
    /// Jump to the previous letter group
    #[serde(default = "default_key_letter_up")]
    pub letter_up: String,
    /// Select a random item
    #[serde(default = "default_key_random")]
    pub random: String,
    /// Enter a sub-collection or launch the selected item
    #[serde(default = "default_key_select")]
    pub select: String,
    /// Leave the current sub-collection
    #[serde(default = "default_key_menu_back")]
    pub menu_back: String,
    /// Switch to the next playlist
    #[serde(default = "default_key_next_playlist")]
    pub next_playlist: String,
    /// Switch to the previous playlist
    #[serde(default = "default_key_prev_playlist")]
    pub prev_playlist: String,
    /// Add the selected item to the favorites
    #[serde(default = "default_key_add_favorite")]
    pub add_favorite: String,
    /// Remove the selected item from the favorites
    #[serde(default = "default_key_remove_favorite")]
    pub remove_favorite: String,
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            forward: default_key_forward(),
            back: default_key_back(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            letter_down: default_key_letter_down(),
            letter_up: default_key_letter_up(),
            random: default_key_random(),
            select: default_key_select(),
            menu_back: default_key_menu_back(),
            next_playlist: default_key_next_playlist(),
            prev_playlist: default_key_prev_playlist(),
            add_favorite: default_key_add_favorite(),
            remove_favorite: default_key_remove_favorite(),
            quit: default_key_quit(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_forward() -> String { "j".to_string() }
fn default_key_back() -> String { "k".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_letter_down() -> String { "l".to_string() }
fn default_key_letter_up() -> String { "h".to_string() }
fn default_key_random() -> String { "r".to_string() }
fn default_key_select() -> String { "<CR>".to_string() }
fn default_key_menu_back() -> String { "<BS>".to_string() }
fn default_key_next_playlist() -> String { "<Tab>".to_string() }
fn default_key_prev_playlist() -> String { "<S-Tab>".to_string() }
fn default_key_add_favorite() -> String { "f".to_string() }
fn default_key_remove_favorite() -> String { "F".to_string() }
fn default_key_quit() -> String { "q".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_layout() -> String {
    "default".to_string()
}

fn default_collection() -> String {
    "Main".to_string()
}

fn default_frame_rate() -> u32 {
    60
}

fn default_hold_window_ms() -> u64 {
    550
}

fn default_start_scroll_time() -> f32 {
    0.5
}

fn default_scroll_acceleration() -> f32 {
    0.05
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(config_path: &std::path::Path) -> crate::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/marquee/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("marquee")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir().join("collections")
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.data_dir().join("layouts")
    }

    /// Path of a named layout, or the configured one when `name` is `None`
    pub fn layout_path(&self, name: Option<&str>) -> PathBuf {
        let name = name.unwrap_or(&self.general.layout);
        self.layouts_dir().join(format!("{}.toml", name))
    }

    /// Log file used while the terminal is owned by the frame loop
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("marquee.log")
    }
}
