use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{debug, info, warn};

use marquee_core::collection::FAVORITES_PLAYLIST;
use marquee_core::{AppConfig, CollectionInfo, LayoutDescription};
use marquee_ui::{
    build_page,
    terminal::{Action, AppEvent, EventHandler, Keymap, StageWidget, StatusLine, TerminalRenderer},
    AttractMode, Drawable, Page, ScrollDirection, SharedRenderer,
};

type Backend = CrosstermBackend<io::Stdout>;

/// Longest wait for exit animations after quitting
const EXIT_GRACE: Duration = Duration::from_secs(2);

/// Scroll key currently held down
struct HeldScroll {
    direction: ScrollDirection,
    last_seen: Instant,
}

/// Frame loop state besides the page itself
struct Session<'a> {
    config: &'a AppConfig,
    keymap: Keymap,
    attract: AttractMode,
    held: Option<HeldScroll>,
    hold_window: Duration,
    /// Terminal reports key releases
    key_release: bool,
    quitting: Option<Instant>,
}

fn recorder(renderer: &Mutex<TerminalRenderer>) -> MutexGuard<'_, TerminalRenderer> {
    renderer.lock().unwrap_or_else(PoisonError::into_inner)
}

pub async fn run(config: &AppConfig, layout: Option<&str>, collection: Option<&str>) -> Result<()> {
    let layout_path = config.layout_path(layout);
    let description = LayoutDescription::load(&layout_path)
        .with_context(|| format!("Cannot load layout {}", layout_path.display()))?;
    let layout_dir = layout_path.parent().unwrap_or(Path::new("."));

    let start = collection.unwrap_or(&config.general.collection);
    let collection = CollectionInfo::load(&config.collections_dir(), start)?;

    let terminal_renderer = Arc::new(Mutex::new(TerminalRenderer::new()));
    let renderer: SharedRenderer = terminal_renderer.clone();
    let mut page = build_page(&description, layout_dir, renderer, config.ui.scroll)?;

    page.allocate_resources();
    if !page.push_collection(collection) {
        return Err(anyhow!(
            "Layout {} has no menus.\nAdd a [[menus]] table with at least one point.",
            layout_path.display()
        ));
    }
    page.start();
    info!(layout = %layout_path.display(), collection = start, "Front-end started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Marquee"))?;
    let key_release = supports_keyboard_enhancement().unwrap_or(false);
    if key_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut session = Session {
        config,
        keymap: Keymap::from_config(&config.keymap),
        attract: AttractMode::new(config.ui.attract_idle_secs),
        held: None,
        hold_window: Duration::from_millis(config.ui.hold_window_ms),
        key_release,
        quitting: None,
    };
    let result = frame_loop(
        &mut terminal,
        &mut page,
        &terminal_renderer,
        &mut session,
        (description.width, description.height),
    );

    page.free_resources();

    // Restore terminal
    if key_release {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn frame_loop(
    terminal: &mut Terminal<Backend>,
    page: &mut Page,
    terminal_renderer: &Mutex<TerminalRenderer>,
    session: &mut Session,
    (stage_width, stage_height): (f32, f32),
) -> Result<()> {
    let events = EventHandler::new(session.config.ui.frame_rate);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;

        page.update(dt);
        session.release_stale_scroll(page);
        if session.held.is_none() && session.quitting.is_none() {
            session.attract.update(dt, page);
        }

        recorder(terminal_renderer).clear_frame();
        page.draw();
        {
            let recorded = recorder(terminal_renderer);
            let collection = page.collection_name().unwrap_or_default();
            let playlist = page.playlist_name().unwrap_or_default();
            let selected = page
                .selected_item()
                .map(|item| item.full_title.clone())
                .unwrap_or_default();

            terminal.draw(|frame| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(frame.area());
                frame.render_widget(StageWidget::new(&recorded, stage_width, stage_height), rows[0]);
                StatusLine::render(frame, rows[1], collection, playlist, &selected);
            })?;
        }

        if let Some(since) = session.quitting {
            if page.is_graphics_idle() || since.elapsed() >= EXIT_GRACE {
                return Ok(());
            }
        }

        let timeout = events.frame_time().saturating_sub(frame_start.elapsed());
        match events.next(timeout)? {
            AppEvent::Key(key) => {
                if let Some(action) = session.keymap.action(&key) {
                    session.handle_action(page, action);
                }
            }
            AppEvent::KeyUp(key) => {
                if let Some(action) = session.keymap.action(&key) {
                    session.handle_release(page, action);
                }
            }
            AppEvent::Resize(w, h) => debug!(width = w, height = h, "Terminal resized"),
            AppEvent::Tick => {}
        }
    }
}

fn scroll_direction(action: Action) -> ScrollDirection {
    match action {
        Action::Forward => ScrollDirection::Forward,
        Action::Back => ScrollDirection::Back,
        _ => ScrollDirection::Idle,
    }
}

impl Session<'_> {
    fn handle_action(&mut self, page: &mut Page, action: Action) {
        if self.quitting.is_some() {
            return;
        }
        if self.attract.reset() {
            page.set_scrolling(ScrollDirection::Idle);
        }

        if action.is_scroll() {
            let direction = scroll_direction(action);
            let now = Instant::now();
            match &mut self.held {
                Some(held) if held.direction == direction => held.last_seen = now,
                _ => {
                    page.set_scrolling(direction);
                    self.held = Some(HeldScroll {
                        direction,
                        last_seen: now,
                    });
                }
            }
            return;
        }

        match action {
            Action::PageDown => page.page_scroll(ScrollDirection::Forward),
            Action::PageUp => page.page_scroll(ScrollDirection::Back),
            Action::NextLetter => page.letter_scroll(ScrollDirection::Forward),
            Action::PrevLetter => page.letter_scroll(ScrollDirection::Back),
            Action::Random => page.select_random(),
            Action::NextPlaylist => page.next_playlist(),
            Action::PrevPlaylist => page.prev_playlist(),
            Action::Select => self.select(page),
            Action::AddFavorite => {
                if page.add_to_favorites() {
                    self.save_favorites(page);
                }
            }
            Action::RemoveFavorite => {
                if page.remove_from_favorites() {
                    self.save_favorites(page);
                }
            }
            Action::MenuBack => {
                if !page.pop_collection() {
                    debug!("Already at the top menu");
                }
            }
            Action::Quit => {
                self.stop_scrolling(page);
                page.stop();
                self.quitting = Some(Instant::now());
            }
            Action::Forward | Action::Back => {}
        }
    }

    fn handle_release(&mut self, page: &mut Page, action: Action) {
        let released = scroll_direction(action);
        if self.held.as_ref().is_some_and(|held| held.direction == released) {
            self.stop_scrolling(page);
        }
    }

    /// Without release events a key counts as up once its repeats stop
    fn release_stale_scroll(&mut self, page: &mut Page) {
        if self.key_release {
            return;
        }
        if self
            .held
            .as_ref()
            .is_some_and(|held| held.last_seen.elapsed() > self.hold_window)
        {
            self.stop_scrolling(page);
        }
    }

    fn stop_scrolling(&mut self, page: &mut Page) {
        if self.held.take().is_some() {
            page.set_scrolling(ScrollDirection::Idle);
        }
    }

    fn save_favorites(&self, page: &Page) {
        let Some(collection) = page.collection() else {
            return;
        };
        if let Err(e) = collection.save_playlist(&self.config.collections_dir(), FAVORITES_PLAYLIST) {
            warn!(collection = %collection.name, error = %e, "Cannot save favorites");
        }
    }

    /// Enter a sub-collection, or report the launch of a game
    fn select(&mut self, page: &mut Page) {
        if page.is_scrolling() {
            return;
        }
        let Some(item) = page.selected_item() else {
            return;
        };

        if item.leaf {
            info!(
                item = %item.name,
                launcher = %item.launcher,
                path = %item.file_path,
                "Launch requested"
            );
            return;
        }

        match CollectionInfo::load(&self.config.collections_dir(), &item.name) {
            Ok(collection) => {
                page.push_collection(collection);
            }
            Err(e) => warn!(collection = %item.name, error = %e, "Cannot enter sub-collection"),
        }
    }
}
