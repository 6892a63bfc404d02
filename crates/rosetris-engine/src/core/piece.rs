use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{BOARD_HEIGHT, BOARD_WIDTH};

/// A single playfield coordinate. `(0, 0)` is the top-left cell and `y`
/// grows downward.
///
/// Coordinates are signed so that a rotation candidate may momentarily leave
/// the board before validation rejects it; every committed cell is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i8,
    pub y: i8,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.offset(0, 1)
    }

    #[must_use]
    pub const fn in_bounds(self) -> bool {
        0 <= self.x && self.x < BOARD_WIDTH && 0 <= self.y && self.y < BOARD_HEIGHT
    }
}

/// Lateral movement direction for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

/// Uniform draw over the 7 kinds. Queue generation deliberately has no bag
/// fairness: repeats and droughts are part of the rule set.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::J,
            2 => PieceKind::L,
            3 => PieceKind::O,
            4 => PieceKind::S,
            5 => PieceKind::T,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in their canonical order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
    ];

    /// The fixed spawn layout of this kind, all cells on rows 0 and 1.
    ///
    /// Cell order is load-bearing: the rotation table applies one offset per
    /// cell index.
    #[must_use]
    pub const fn spawn_cells(self) -> [Cell; 4] {
        const fn c(x: i8, y: i8) -> Cell {
            Cell::new(x, y)
        }
        match self {
            Self::I => [c(3, 0), c(4, 0), c(5, 0), c(6, 0)],
            Self::J => [c(3, 0), c(3, 1), c(4, 1), c(5, 1)],
            Self::L => [c(6, 0), c(4, 1), c(5, 1), c(6, 1)],
            Self::O => [c(4, 0), c(5, 0), c(4, 1), c(5, 1)],
            Self::S => [c(5, 0), c(6, 0), c(4, 1), c(5, 1)],
            Self::T => [c(4, 0), c(3, 1), c(4, 1), c(5, 1)],
            Self::Z => [c(4, 0), c(5, 0), c(5, 1), c(6, 1)],
        }
    }

    /// Display color of this kind as an RGB triple (the rose gradient).
    #[must_use]
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            Self::I => (247, 202, 208),
            Self::J => (249, 190, 199),
            Self::L => (251, 177, 189),
            Self::O => (255, 153, 172),
            Self::S => (255, 133, 161),
            Self::T => (255, 112, 150),
            Self::Z => (255, 92, 138),
        }
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::J => 'J',
            Self::L => 'L',
            Self::O => 'O',
            Self::S => 'S',
            Self::T => 'T',
            Self::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            'O' => Some(Self::O),
            'S' => Some(Self::S),
            'T' => Some(Self::T),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }
}

impl Serialize for PieceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.as_char())
    }
}

impl<'de> Deserialize<'de> for PieceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {c}"))),
            _ => Err(serde::de::Error::custom(format!(
                "piece kind must be a single character, got '{s}'"
            ))),
        }
    }
}

/// Rotation state of a piece, an index 0..=3.
///
/// This is not the guideline SRS. Each kind walks a fixed cycle of states
/// (J, L and T visit all four, I, S and Z alternate between two, O never
/// rotates) and each step applies one fixed offset per cell, with no kick
/// search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u8);

impl Rotation {
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

struct RotationStep {
    offsets: [(i8, i8); 4],
    next: u8,
}

const fn step(offsets: [(i8, i8); 4], next: u8) -> Option<RotationStep> {
    Some(RotationStep { offsets, next })
}

/// Per-kind, per-state rotation steps, reproduced exactly from the reference
/// rule set. `None` marks a state the kind never occupies (or, for O, the
/// fact that it never rotates at all).
const ROTATION_TABLE: [[Option<RotationStep>; 4]; PieceKind::LEN] = [
    // I
    [
        step([(2, -2), (1, -1), (0, 0), (-1, 1)], 1),
        step([(-2, 2), (-1, 1), (0, 0), (1, -1)], 0),
        None,
        None,
    ],
    // J
    [
        step([(2, 0), (1, -1), (0, 0), (-1, 1)], 1),
        step([(0, 2), (1, 1), (0, 0), (-1, -1)], 2),
        step([(-2, 0), (-1, 1), (0, 0), (1, -1)], 3),
        step([(0, -2), (-1, -1), (0, 0), (1, 1)], 0),
    ],
    // L
    [
        step([(0, 2), (1, 1), (0, 0), (-1, -1)], 1),
        step([(-2, 0), (-1, -1), (0, 0), (1, 1)], 2),
        step([(0, -2), (1, -1), (0, 0), (-1, 1)], 3),
        step([(2, 0), (-1, 1), (0, 0), (1, -1)], 0),
    ],
    // O
    [None, None, None, None],
    // S
    [
        step([(0, 0), (0, 1), (2, 1), (0, 0)], 1),
        step([(0, 0), (0, -1), (-2, -1), (0, 0)], 0),
        None,
        None,
    ],
    // T
    [
        step([(0, 0), (1, 1), (0, 0), (0, 0)], 1),
        step([(-1, 1), (0, 0), (0, 0), (0, 0)], 2),
        step([(0, 0), (0, 0), (0, 0), (-1, -1)], 3),
        step([(1, -1), (-1, -1), (0, 0), (1, 1)], 0),
    ],
    // Z
    [
        step([(1, 2), (1, 0), (0, 0), (0, 0)], 1),
        step([(-1, -2), (-1, 0), (0, 0), (0, 0)], 0),
        None,
        None,
    ],
];

/// A tetromino in flight: its kind, rotation state, and the 4 cells it
/// occupies.
///
/// Pieces are immutable - movement and rotation return new `Piece` values.
/// Nothing here validates against the board; the session checks a candidate
/// before committing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    cells: [Cell; 4],
}

impl Piece {
    /// A fresh piece of the given kind at the top of the board.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::default(),
            cells: kind.spawn_cells(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    #[must_use]
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation,
            cells: self.cells.map(|cell| cell.offset(dx, dy)),
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Computes the unvalidated candidate for the next rotation state.
    ///
    /// Returns `None` when this kind has no step out of the current state,
    /// which is every state for O pieces. The candidate's cells may overlap
    /// the stack or lie outside the board.
    #[must_use]
    pub fn rotated(&self) -> Option<Self> {
        let step = ROTATION_TABLE[self.kind as usize][self.rotation.0 as usize].as_ref()?;
        let mut cells = self.cells;
        for (cell, (dx, dy)) in cells.iter_mut().zip(step.offsets) {
            *cell = cell.offset(dx, dy);
        }
        Some(Self {
            kind: self.kind,
            rotation: Rotation(step.next),
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn spawn_layouts_are_in_bounds_on_top_rows() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            for cell in piece.cells() {
                assert!(cell.in_bounds(), "{kind:?} spawns out of bounds: {cell:?}");
                assert!(
                    cell.y == 0 || cell.y == 1,
                    "{kind:?} spawns below row 1: {cell:?}"
                );
            }
            assert_eq!(piece.rotation(), Rotation::default());
        }
    }

    #[test]
    fn spawn_cells_are_distinct() {
        for kind in PieceKind::ALL {
            let mut cells = kind.spawn_cells();
            cells.sort_unstable();
            for pair in cells.windows(2) {
                assert_ne!(pair[0], pair[1], "{kind:?} has duplicate spawn cells");
            }
        }
    }

    #[test]
    fn two_state_kinds_return_after_two_rotations() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            let piece = Piece::spawn(kind);
            let once = piece.rotated().unwrap();
            assert_ne!(once.cells(), piece.cells());
            let twice = once.rotated().unwrap();
            assert_eq!(twice.cells(), piece.cells(), "{kind:?} 2-cycle is not closed");
            assert_eq!(twice.rotation(), piece.rotation());
        }
    }

    #[test]
    fn four_state_kinds_return_after_four_rotations() {
        for kind in [PieceKind::J, PieceKind::L, PieceKind::T] {
            let mut piece = Piece::spawn(kind);
            for _ in 0..4 {
                piece = piece.rotated().unwrap();
            }
            assert_eq!(
                piece.cells(),
                Piece::spawn(kind).cells(),
                "{kind:?} 4-cycle is not closed"
            );
            assert_eq!(piece.rotation(), Rotation::default());
        }
    }

    #[test]
    fn o_piece_never_rotates() {
        let piece = Piece::spawn(PieceKind::O);
        assert!(piece.rotated().is_none());
    }

    #[test]
    fn rotation_preserves_cell_count_and_distinctness() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::spawn(kind);
            for _ in 0..4 {
                let Some(next) = piece.rotated() else { break };
                let mut cells = *next.cells();
                cells.sort_unstable();
                for pair in cells.windows(2) {
                    assert_ne!(pair[0], pair[1], "{kind:?} rotation produced duplicates");
                }
                piece = next;
            }
        }
    }

    #[test]
    fn t_rotation_walks_all_four_states() {
        let mut piece = Piece::spawn(PieceKind::T);
        let mut seen = vec![piece.rotation().index()];
        for _ in 0..3 {
            piece = piece.rotated().unwrap();
            seen.push(piece.rotation().index());
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn uniform_draw_reaches_every_kind() {
        let mut rng = Pcg32::from_seed([7; 16]);
        let mut counts = [0_u32; PieceKind::LEN];
        for _ in 0..1_000 {
            let kind: PieceKind = rng.random();
            counts[kind as usize] += 1;
        }
        assert!(
            counts.iter().all(|&count| count > 0),
            "some kind never drawn: {counts:?}"
        );
    }

    #[test]
    fn kind_char_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('i'), None);
    }

    #[test]
    fn kind_serialization() {
        let serialized = serde_json::to_string(&PieceKind::T).unwrap();
        assert_eq!(serialized, "\"T\"");
        let deserialized: PieceKind = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, PieceKind::T);

        assert!(serde_json::from_str::<PieceKind>("\"X\"").is_err());
        assert!(serde_json::from_str::<PieceKind>("\"TT\"").is_err());
        assert!(serde_json::from_str::<PieceKind>("\"\"").is_err());
    }
}
