use std::collections::HashMap;

use arrayvec::ArrayVec;

use super::{BOARD_HEIGHT, BOARD_WIDTH, Cell, Direction, Piece, PieceKind};

/// The settled stack: every cell locked by a finished piece, keyed by
/// coordinate for O(1) occupancy lookup.
///
/// The active piece is never part of the board; the session commits it via
/// [`Board::lock`] once it can no longer fall. Each occupied cell remembers
/// the kind that produced it so the front-end can color the stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: HashMap<Cell, PieceKind>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    #[must_use]
    pub fn kind_at(&self, cell: Cell) -> Option<PieceKind> {
        self.cells.get(&cell).copied()
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, PieceKind)> + '_ {
        self.cells.iter().map(|(cell, kind)| (*cell, *kind))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// True when every candidate cell is inside the playfield and free of
    /// settled blocks.
    #[must_use]
    pub fn can_place(&self, cells: &[Cell; 4]) -> bool {
        cells
            .iter()
            .all(|cell| cell.in_bounds() && !self.is_occupied(*cell))
    }

    /// Commits the piece into the settled stack. The caller has already
    /// validated that none of its cells overlaps the stack.
    pub fn lock(&mut self, piece: &Piece) {
        for cell in piece.cells() {
            self.cells.insert(*cell, piece.kind());
        }
    }

    /// True when the piece rests on the floor or on a settled block.
    ///
    /// Only the `y == 19` edge needs a bounds check: the cell below shares
    /// its column with an in-bounds cell.
    #[must_use]
    pub fn touches_floor_or_stack(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .any(|cell| cell.y == BOARD_HEIGHT - 1 || self.is_occupied(cell.down()))
    }

    /// True when the piece is flush against the named wall or against a
    /// settled block on that side.
    #[must_use]
    pub fn touches_side_or_stack(&self, piece: &Piece, direction: Direction) -> bool {
        let (wall_x, dx) = match direction {
            Direction::Left => (0, -1),
            Direction::Right => (BOARD_WIDTH - 1, 1),
        };
        piece
            .cells()
            .iter()
            .any(|cell| cell.x == wall_x || self.is_occupied(cell.offset(dx, 0)))
    }

    /// Rows where all 10 columns are occupied, bottom-most first.
    #[must_use]
    pub fn full_rows(&self) -> ArrayVec<i8, { BOARD_HEIGHT as usize }> {
        let mut rows = ArrayVec::new();
        for y in (0..BOARD_HEIGHT).rev() {
            if (0..BOARD_WIDTH).all(|x| self.is_occupied(Cell::new(x, y))) {
                rows.push(y);
            }
        }
        rows
    }

    /// Removes the given rows and collapses the stack above them.
    ///
    /// `rows` is the [`Board::full_rows`] output, bottom-most first. After
    /// deleting the named rows, each one is processed top-most first and
    /// every cell above it moves down one row. Processing in ascending order
    /// keeps the remaining row indices valid, so clearing non-adjacent rows
    /// stacks correctly - the same final board as deleting all rows at once
    /// and letting the columns above fall.
    pub fn clear_rows(&mut self, rows: &[i8]) {
        for &row in rows {
            self.cells.retain(|cell, _| cell.y != row);
        }
        for &row in rows.iter().rev() {
            let moved: Vec<(Cell, PieceKind)> = self
                .cells
                .iter()
                .filter(|(cell, _)| cell.y < row)
                .map(|(cell, kind)| (*cell, *kind))
                .collect();
            for (cell, _) in &moved {
                self.cells.remove(cell);
            }
            for (cell, kind) in moved {
                self.cells.insert(cell.down(), kind);
            }
        }
    }

    /// Builds a board from ASCII art for tests. `#` marks an occupied cell
    /// (a kind letter marks that specific kind), `.` an empty one. Rows are
    /// listed top to bottom; trailing empty rows may be omitted.
    ///
    /// # Panics
    ///
    /// Panics when a row is not exactly 10 cells wide or contains an unknown
    /// character.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::new();
        let lines = art.lines().filter(|line| !line.trim().is_empty());
        for (y, line) in lines.enumerate() {
            let row: Vec<char> = line.trim().chars().collect();
            assert_eq!(
                row.len(),
                BOARD_WIDTH as usize,
                "each row must have exactly {BOARD_WIDTH} cells, got {} at row {y}",
                row.len()
            );
            for (x, &ch) in row.iter().enumerate() {
                let kind = match ch {
                    '.' => continue,
                    '#' => PieceKind::I,
                    _ => PieceKind::from_char(ch)
                        .unwrap_or_else(|| panic!("invalid board cell at ({x}, {y}): {ch}")),
                };
                board.cells.insert(Cell::new(x as i8, y as i8), kind);
            }
        }
        board
    }
}
