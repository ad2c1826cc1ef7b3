use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::logging::json_str;
use crate::runtime::frame::GridOverlay;
use crate::runtime::{ShellEvent, ShellRuntime};
use crate::session::move_candidate;
use crate::{LogLevel, ShellError};

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("runtime error: {0}")]
    Runtime(#[from] ShellError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// What a key press asks the driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Dispatch(ShellEvent),
    /// Only the grid overlay changed.
    Redraw,
    Quit,
    Noop,
}

/// Translates key presses into shell events and tracks the More grid cursor
/// plus the tile currently picked up for a drag.
#[derive(Debug, Default, Clone)]
pub struct KeyMapper {
    cursor: usize,
    held: Option<usize>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn held(&self) -> Option<usize> {
        self.held
    }

    pub fn map(&mut self, key: &KeyEvent, runtime: &ShellRuntime) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Noop;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyAction::Quit;
            }
            KeyCode::Char('q') => return KeyAction::Quit,
            KeyCode::Tab => return self.step_nav(runtime, 1),
            KeyCode::BackTab => return self.step_nav(runtime, -1),
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                return match runtime.presenter().strip().get(index) {
                    Some(entry) => self.nav_to(entry.key.clone()),
                    None => KeyAction::Noop,
                };
            }
            _ => {}
        }

        if !runtime.presenter().is_more_active() {
            return KeyAction::Noop;
        }
        if runtime.drilldown_target().is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Backspace => KeyAction::Dispatch(ShellEvent::CloseDrilldown),
                _ => KeyAction::Noop,
            };
        }

        let columns = runtime_columns(runtime);
        let reordering = runtime.session().is_reordering();
        match key.code {
            KeyCode::Left => self.move_cursor(runtime, -1),
            KeyCode::Right => self.move_cursor(runtime, 1),
            KeyCode::Up => self.move_cursor(runtime, -(columns as isize)),
            KeyCode::Down => self.move_cursor(runtime, columns as isize),
            KeyCode::Char('r') => {
                self.held = None;
                KeyAction::Dispatch(ShellEvent::ToggleReorder)
            }
            KeyCode::Enter if !reordering => runtime
                .session()
                .overflow_items()
                .nth(self.cursor)
                .map(|item| KeyAction::Dispatch(ShellEvent::SelectItem(item.key.clone())))
                .unwrap_or(KeyAction::Noop),
            KeyCode::Char(' ') if reordering => match self.held.take() {
                None => {
                    self.held = Some(self.cursor);
                    KeyAction::Redraw
                }
                Some(from) => {
                    match move_candidate(runtime.session().working_order(), from, self.cursor) {
                        Some(candidate) => KeyAction::Dispatch(ShellEvent::DragRelease(candidate)),
                        None => KeyAction::Redraw,
                    }
                }
            },
            // Dropping a held tile without releasing it leaves the order alone.
            KeyCode::Esc if self.held.is_some() => {
                self.held = None;
                KeyAction::Redraw
            }
            _ => KeyAction::Noop,
        }
    }

    /// Re-clamp after the runtime handled an event.
    pub fn sync(&mut self, runtime: &ShellRuntime) {
        if !runtime.session().is_reordering() {
            self.held = None;
        }
        let count = tile_count(runtime);
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    pub fn overlay(&self, runtime: &ShellRuntime) -> GridOverlay {
        if !runtime.presenter().is_more_active() || runtime.drilldown_target().is_some() {
            return GridOverlay::default();
        }
        GridOverlay {
            cursor: (tile_count(runtime) > 0).then_some(self.cursor),
            held: self.held,
        }
    }

    fn step_nav(&mut self, runtime: &ShellRuntime, step: isize) -> KeyAction {
        let strip = runtime.presenter().strip();
        let active = runtime.active_selection();
        let current = strip.iter().position(|e| e.key == active).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(strip.len() as isize) as usize;
        self.nav_to(strip[next].key.clone())
    }

    fn nav_to(&mut self, key: String) -> KeyAction {
        self.held = None;
        self.cursor = 0;
        KeyAction::Dispatch(ShellEvent::SelectNav(key))
    }

    fn move_cursor(&mut self, runtime: &ShellRuntime, delta: isize) -> KeyAction {
        let count = tile_count(runtime);
        let target = self.cursor as isize + delta;
        if count == 0 || target < 0 || target >= count as isize {
            return KeyAction::Noop;
        }
        self.cursor = target as usize;
        KeyAction::Redraw
    }
}

fn tile_count(runtime: &ShellRuntime) -> usize {
    match runtime.working_order_for_display() {
        Some(grid) => grid.len(),
        None => runtime.session().overflow_items().count(),
    }
}

fn runtime_columns(runtime: &ShellRuntime) -> usize {
    runtime.renderer_settings().grid_columns.max(1)
}

/// Terminal driver that owns a `ShellRuntime` and manages raw mode plus the
/// alternate screen around a blocking key loop.
pub struct CliDriver {
    runtime: ShellRuntime,
    keys: KeyMapper,
}

impl CliDriver {
    pub fn new(runtime: ShellRuntime) -> Self {
        Self {
            runtime,
            keys: KeyMapper::new(),
        }
    }

    pub fn run(mut self) -> DriverResult<()> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let (width, _height) = terminal::size()?;
        self.runtime.renderer_settings_mut().width = width;
        self.runtime.start();
        self.draw(stdout)?;

        loop {
            match event::read()? {
                Event::Key(key) => match self.keys.map(&key, &self.runtime) {
                    KeyAction::Dispatch(shell_event) => {
                        self.runtime.dispatch(shell_event)?;
                        self.keys.sync(&self.runtime);
                        self.draw(stdout)?;
                    }
                    KeyAction::Redraw => self.draw(stdout)?,
                    KeyAction::Quit => break,
                    KeyAction::Noop => {}
                },
                Event::Resize(width, _height) => {
                    self.runtime.renderer_settings_mut().width = width;
                    execute!(stdout, Clear(ClearType::All))?;
                    self.draw(stdout)?;
                }
                _ => {}
            }
        }

        self.runtime.stop();
        Ok(())
    }

    fn draw(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let mut frame = self.runtime.frame();
        frame.overlay = self.keys.overlay(&self.runtime);
        self.runtime.render_frame(stdout, &frame)?;
        Ok(())
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        if terminal::disable_raw_mode().is_err() {
            self.runtime.log_runtime_event(
                LogLevel::Warn,
                "terminal_restore_failed",
                [json_str("step", "disable_raw_mode")],
            );
        }
    }
}
