use std::io::Write;

use crate::cursor;
use crate::error::Result;
use crate::runtime::frame::{GridOverlay, GridTile, NavCell, ScreenFrame, ShellFrame};
use crate::width::{display_width, fit_display, truncate_display};
use crate::zone::Zone;

const REORDER_HINT: &str = "drag to arrange · Done to save";

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Columns available to the shell.
    pub width: u16,
    /// Tiles per row on the More grid.
    pub grid_columns: usize,
    /// Zero-based terminal row the first line is drawn on.
    pub origin_row: u16,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            width: 80,
            grid_columns: 4,
            origin_row: 0,
        }
    }
}

/// ANSI escape code renderer writing whole frames to a terminal handle.
pub struct AnsiRenderer {
    settings: RendererSettings,
    last_height: usize,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            last_height: 0,
        }
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn render(&mut self, writer: &mut impl Write, frame: &ShellFrame) -> Result<()> {
        let lines = render_lines(frame, &self.settings);
        let origin = self.settings.origin_row;

        for (offset, line) in lines.iter().enumerate() {
            let row = origin + offset as u16 + 1;
            write!(writer, "{}{}{}", cursor::move_to(row, 1), line, cursor::clear_to_line_end())?;
        }
        // Lines left over from a taller previous frame.
        for offset in lines.len()..self.last_height {
            let row = origin + offset as u16 + 1;
            write!(writer, "{}{}", cursor::move_to(row, 1), cursor::clear_line())?;
        }
        self.last_height = lines.len();

        writer.flush()?;
        Ok(())
    }
}

/// Lay a frame out as plain lines: screen body, a rule, then the nav strip.
pub fn render_lines(frame: &ShellFrame, settings: &RendererSettings) -> Vec<String> {
    let width = settings.width as usize;
    let mut lines = Vec::new();

    match &frame.screen {
        ScreenFrame::Item { content, .. } => {
            lines.extend(wrap_to_width(content, width));
        }
        ScreenFrame::Drilldown { content, .. } => {
            lines.push(truncate_display("< back (Esc)", width));
            lines.extend(wrap_to_width(content, width));
        }
        ScreenFrame::More { reordering, tiles } => {
            let title = if *reordering { "More · reordering" } else { "More" };
            lines.push(truncate_display(title, width));
            if *reordering {
                lines.push(truncate_display(REORDER_HINT, width));
            }
            lines.extend(grid_lines(tiles, frame.overlay, settings));
        }
    }

    lines.push("─".repeat(width));
    lines.push(nav_line(&frame.nav, width));
    lines
}

fn grid_lines(tiles: &[GridTile], overlay: GridOverlay, settings: &RendererSettings) -> Vec<String> {
    let columns = settings.grid_columns.max(1);
    let cell_width = (settings.width as usize / columns).max(1);

    tiles
        .chunks(columns)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, tile)| {
                    let index = row * columns + col;
                    fit_display(&tile_text(tile, index, overlay), cell_width)
                })
                .collect::<String>()
        })
        .collect()
}

fn tile_text(tile: &GridTile, index: usize, overlay: GridOverlay) -> String {
    let pointer = if overlay.cursor == Some(index) { '>' } else { ' ' };
    let mark = match (overlay.held == Some(index), tile.zone) {
        (true, _) => '*',
        (false, Some(Zone::Shortcut)) => '^',
        _ => ' ',
    };
    format!("{pointer}{mark}{}", tile.label)
}

fn nav_line(cells: &[NavCell], width: usize) -> String {
    let line = cells
        .iter()
        .map(|cell| {
            if cell.active {
                format!("[{}]", cell.label)
            } else {
                format!(" {} ", cell.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    truncate_display(&line, width)
}

fn wrap_to_width(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for raw in content.split('\n') {
        let mut current = String::new();
        for ch in raw.chars() {
            if current.is_empty() && ch == ' ' {
                continue;
            }
            current.push(ch);
            let display = display_width(&current);
            if display > width {
                current.pop();
                lines.push(std::mem::take(&mut current));
                if ch != ' ' {
                    current.push(ch);
                }
            } else if display == width {
                lines.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() || raw.is_empty() {
            lines.push(current);
        }
    }

    lines
}
