use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};
use rosetris_engine::{BOARD_HEIGHT, BOARD_WIDTH, GameSession, PieceKind};

use super::{CELL_WIDTH, kind_color};

const GRID_WIDTH: usize = BOARD_WIDTH as usize;
const GRID_HEIGHT: usize = BOARD_HEIGHT as usize;

/// The 10×20 playfield with the active piece overlaid in its kind's color.
#[derive(Debug)]
pub(crate) struct BoardView<'a> {
    session: &'a GameSession,
}

impl<'a> BoardView<'a> {
    pub(crate) fn new(session: &'a GameSession) -> Self {
        Self { session }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub(crate) const fn width() -> u16 {
        GRID_WIDTH as u16 * CELL_WIDTH
    }

    #[expect(clippy::cast_possible_truncation)]
    pub(crate) const fn height() -> u16 {
        GRID_HEIGHT as u16
    }
}

impl Widget for BoardView<'_> {
    #[expect(clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut grid = [[None::<PieceKind>; GRID_WIDTH]; GRID_HEIGHT];
        for (cell, kind) in self.session.board().occupied_cells() {
            grid[cell.y as usize][cell.x as usize] = Some(kind);
        }
        if let Some(piece) = self.session.active_piece() {
            for cell in piece.cells() {
                grid[cell.y as usize][cell.x as usize] = Some(piece.kind());
            }
        }

        let lines: Vec<Line> = grid
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|slot| match slot {
                        Some(kind) => Span::styled("  ", Style::default().bg(kind_color(*kind))),
                        None => Span::raw("  "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Paragraph::new(Text::from(lines)).render(area, buf);
    }
}
