//! L3 Molecular Layer: Stage widget
//!
//! Maps stage coordinates onto terminal cells and paints a recorded frame.
//! Thumbnails are drawn with upper half blocks, two pixels per cell.

use ratatui::{
    buffer::Buffer,
    layout::Rect as Area,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::renderer::{Sprite, TerminalRenderer};
use crate::render::Rect;

/// Sprites fainter than this are not drawn
const MIN_ALPHA: f32 = 0.05;

const BACKDROP: Color = Color::Rgb(0x28, 0x28, 0x28);
const LABEL_FG: Color = Color::Rgb(0xd4, 0xbe, 0x98);
const LABEL_BG: Color = Color::Rgb(0x45, 0x40, 0x3d);
const STATUS_FG: Color = Color::Rgb(0xa8, 0x99, 0x84);

/// Cell range a stage rectangle covers inside `area`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cells {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

pub struct StageWidget<'a> {
    renderer: &'a TerminalRenderer,
    stage_width: f32,
    stage_height: f32,
}

impl<'a> StageWidget<'a> {
    pub fn new(renderer: &'a TerminalRenderer, stage_width: f32, stage_height: f32) -> Self {
        Self {
            renderer,
            stage_width,
            stage_height,
        }
    }

    fn cells(&self, area: Area, rect: &Rect) -> Option<Cells> {
        if self.stage_width <= 0.0 || self.stage_height <= 0.0 {
            return None;
        }
        let sx = f32::from(area.width) / self.stage_width;
        let sy = f32::from(area.height) / self.stage_height;
        let clamp_x = |v: f32| (v * sx).round().clamp(0.0, f32::from(area.width)) as u16;
        let clamp_y = |v: f32| (v * sy).round().clamp(0.0, f32::from(area.height)) as u16;

        let cells = Cells {
            x0: area.x + clamp_x(rect.x),
            y0: area.y + clamp_y(rect.y),
            x1: area.x + clamp_x(rect.right()),
            y1: area.y + clamp_y(rect.bottom()),
        };
        (cells.x1 > cells.x0 && cells.y1 > cells.y0).then_some(cells)
    }

    fn paint_media(&self, buf: &mut Buffer, cells: Cells, sprite: &Sprite) {
        let Sprite::Media { texture, src, .. } = sprite else {
            return;
        };
        let Some(media) = self.renderer.media(*texture) else {
            return;
        };

        let Some(thumbnail) = &media.thumbnail else {
            for y in cells.y0..cells.y1 {
                for x in cells.x0..cells.x1 {
                    buf[(x, y)].set_char(' ').set_bg(LABEL_BG);
                }
            }
            let width = usize::from(cells.x1 - cells.x0);
            let label: String = media.label.chars().take(width).collect();
            let mid = cells.y0 + (cells.y1 - cells.y0) / 2;
            buf.set_string(cells.x0, mid, label, Style::default().fg(LABEL_FG).bg(LABEL_BG));
            return;
        };

        let full = Rect::new(0.0, 0.0, media.width, media.height);
        let src = src.unwrap_or(full);
        let (tw, th) = (thumbnail.width() as f32, thumbnail.height() as f32);
        let cols = f32::from(cells.x1 - cells.x0);
        let rows = f32::from(cells.y1 - cells.y0) * 2.0;
        let sample = |col: f32, row: f32| {
            let u = (src.x + src.width * (col + 0.5) / cols) / media.width;
            let v = (src.y + src.height * (row + 0.5) / rows) / media.height;
            let px = ((u * tw) as u32).min(thumbnail.width().saturating_sub(1));
            let py = ((v * th) as u32).min(thumbnail.height().saturating_sub(1));
            let [r, g, b, _] = thumbnail.get_pixel(px, py).0;
            Color::Rgb(r, g, b)
        };

        for y in cells.y0..cells.y1 {
            let row = f32::from(y - cells.y0) * 2.0;
            for x in cells.x0..cells.x1 {
                let col = f32::from(x - cells.x0);
                buf[(x, y)]
                    .set_char('▀')
                    .set_fg(sample(col, row))
                    .set_bg(sample(col, row + 1.0));
            }
        }
    }
}

fn to_color(color: [f32; 3]) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(color[0]), channel(color[1]), channel(color[2]))
}

impl Widget for StageWidget<'_> {
    fn render(self, area: Area, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(BACKDROP));

        for sprite in self.renderer.sprites() {
            let (alpha, dst) = match sprite {
                Sprite::Media { alpha, dst, .. }
                | Sprite::Glyph { alpha, dst, .. }
                | Sprite::Solid { alpha, dst, .. } => (*alpha, dst),
            };
            if alpha < MIN_ALPHA {
                continue;
            }
            let Some(cells) = self.cells(area, dst) else {
                continue;
            };

            match sprite {
                Sprite::Solid { color, .. } => {
                    let color = to_color(*color);
                    for y in cells.y0..cells.y1 {
                        for x in cells.x0..cells.x1 {
                            buf[(x, y)].set_char(' ').set_bg(color);
                        }
                    }
                }
                Sprite::Glyph { ch, .. } => {
                    buf[(cells.x0, cells.y0)].set_char(*ch).set_fg(LABEL_FG);
                }
                Sprite::Media { .. } => self.paint_media(buf, cells, sprite),
            }
        }
    }
}

/// One-line footer with the current collection, playlist and selection
pub struct StatusLine;

impl StatusLine {
    pub fn render(frame: &mut Frame, area: Area, collection: &str, playlist: &str, selected: &str) {
        let line = Line::from(vec![
            Span::styled(
                format!(" {collection} "),
                Style::default().fg(BACKDROP).bg(LABEL_FG),
            ),
            Span::styled(
                format!(" {playlist} | {selected} "),
                Style::default().fg(STATUS_FG).bg(LABEL_BG),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(LABEL_BG)), area);
    }
}
