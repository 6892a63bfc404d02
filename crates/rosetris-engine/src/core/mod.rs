pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Playfield width in cells.
pub const BOARD_WIDTH: i8 = 10;
/// Playfield height in cells. Row 0 is the top row.
pub const BOARD_HEIGHT: i8 = 20;
