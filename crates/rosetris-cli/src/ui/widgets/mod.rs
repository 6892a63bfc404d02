pub(crate) use self::{
    board_view::BoardView, piece_preview::PiecePreview, session_screen::SessionScreen,
    stats_view::StatsView,
};

mod board_view;
mod piece_preview;
mod session_screen;
mod stats_view;

use ratatui::style::Color;
use rosetris_engine::PieceKind;

/// Character width of one board cell.
pub(crate) const CELL_WIDTH: u16 = 2;

/// Terminal color for a piece kind.
pub(crate) fn kind_color(kind: PieceKind) -> Color {
    let (r, g, b) = kind.color();
    Color::Rgb(r, g, b)
}
