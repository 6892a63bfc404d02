use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};
use rosetris_engine::PieceKind;

use super::{CELL_WIDTH, kind_color};

/// A piece kind drawn in its spawn orientation inside a 4×2 grid, for the
/// NEXT and HOLD panels. Renders blank when no kind is given.
#[derive(Debug)]
pub(crate) struct PiecePreview {
    kind: Option<PieceKind>,
}

impl PiecePreview {
    pub(crate) fn new(kind: Option<PieceKind>) -> Self {
        Self { kind }
    }

    pub(crate) const fn width() -> u16 {
        4 * CELL_WIDTH
    }

    pub(crate) const fn height() -> u16 {
        2
    }
}

impl Widget for PiecePreview {
    #[expect(clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut grid = [[None::<Color>; 4]; 2];
        if let Some(kind) = self.kind {
            let color = kind_color(kind);
            for cell in kind.spawn_cells() {
                // Spawn layouts occupy columns 3..=6 on rows 0 and 1.
                grid[cell.y as usize][(cell.x - 3) as usize] = Some(color);
            }
        }

        let lines: Vec<Line> = grid
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|slot| match slot {
                        Some(color) => Span::styled("  ", Style::default().bg(*color)),
                        None => Span::raw("  "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Paragraph::new(Text::from(lines)).render(area, buf);
    }
}
