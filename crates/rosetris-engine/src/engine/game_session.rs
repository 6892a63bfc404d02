use std::time::Duration;

use crate::{
    core::{Board, Cell, Direction, Piece, PieceKind},
    engine::{PieceQueue, QUEUE_LEN, QueueSeed, Scoring},
};

/// Gravity interval while soft-dropping, regardless of level.
const FAST_FALL_INTERVAL: Duration = Duration::from_millis(50);

/// Lifecycle of a session.
///
/// `AtRest` covers both "not started yet" and "game over";
/// [`GameSession::is_game_over`] tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    AtRest,
    Running,
    Paused,
}

/// One game, and the only mutable surface a front-end touches.
///
/// The session owns the board, the active piece, the queue, the hold slot,
/// and the score; every gravity tick and player command is a synchronous
/// mutation, so a single owner driving it from one event loop gets the whole
/// rule set with no shared state. Rejected commands - a blocked move,
/// rotating an O piece, holding twice in one turn - are silent no-ops and
/// never partially mutate anything.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active_piece: Option<Piece>,
    previous_piece_cells: [Cell; 4],
    queue: PieceQueue,
    held_piece: Option<PieceKind>,
    held_this_turn: bool,
    scoring: Scoring,
    fast_fall: bool,
    state: SessionState,
    game_over: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with a random piece sequence, in the `AtRest`
    /// state. Call [`Self::start`] to begin playing.
    #[must_use]
    pub fn new() -> Self {
        Self::from_queue(PieceQueue::new())
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(seed: QueueSeed) -> Self {
        Self::from_queue(PieceQueue::with_seed(seed))
    }

    fn from_queue(queue: PieceQueue) -> Self {
        Self {
            board: Board::new(),
            active_piece: None,
            previous_piece_cells: [Cell::new(0, 0); 4],
            queue,
            held_piece: None,
            held_this_turn: false,
            scoring: Scoring::new(),
            fast_fall: false,
            state: SessionState::AtRest,
            game_over: false,
        }
    }

    /// Begins a run: draws the first piece from the queue and starts
    /// gravity. Only meaningful from `AtRest`.
    pub fn start(&mut self) {
        if !self.state.is_at_rest() {
            return;
        }
        self.game_over = false;
        self.state = SessionState::Running;
        self.spawn_next();
    }

    /// Reinitializes every field to its start-of-game value and begins a new
    /// run. The session value itself survives, so a front-end keeps its
    /// bindings across games.
    pub fn reset(&mut self) {
        self.board.clear();
        self.active_piece = None;
        self.queue = PieceQueue::new();
        self.held_piece = None;
        self.held_this_turn = false;
        self.scoring = Scoring::new();
        self.fast_fall = false;
        self.state = SessionState::AtRest;
        self.game_over = false;
        self.start();
    }

    /// One gravity step: the active piece falls one row, or locks if it
    /// rests on the floor or the stack.
    ///
    /// Locking scores and clears full rows, applies the game-over check, and
    /// otherwise spawns the next piece from the queue and re-arms the hold.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let Some(piece) = self.active_piece else {
            return;
        };
        if self.board.touches_floor_or_stack(&piece) {
            self.lock_active(&piece);
        } else {
            self.previous_piece_cells = *piece.cells();
            self.active_piece = Some(piece.down());
        }
    }

    fn lock_active(&mut self, piece: &Piece) {
        self.board.lock(piece);
        let rows = self.board.full_rows();
        if !rows.is_empty() {
            self.scoring.record_clears(rows.len());
            self.board.clear_rows(&rows);
        }
        // Reference rule: the game ends when the locked piece still touches
        // the top row, not when the next spawn is blocked.
        if piece.cells().iter().any(|cell| cell.y == 0) {
            self.active_piece = None;
            self.state = SessionState::AtRest;
            self.game_over = true;
            return;
        }
        self.held_this_turn = false;
        self.spawn_next();
    }

    /// Shifts the active piece one column unless it is flush against that
    /// side.
    pub fn move_side(&mut self, direction: Direction) {
        if !self.state.is_running() {
            return;
        }
        let Some(piece) = self.active_piece else {
            return;
        };
        if self.board.touches_side_or_stack(&piece, direction) {
            return;
        }
        self.previous_piece_cells = *piece.cells();
        self.active_piece = Some(match direction {
            Direction::Left => piece.left(),
            Direction::Right => piece.right(),
        });
    }

    /// Advances the active piece to its next rotation state if the single
    /// fixed candidate fits the board; otherwise the attempt fails silently.
    /// There is no kick search.
    pub fn rotate(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let Some(piece) = self.active_piece else {
            return;
        };
        let Some(candidate) = piece.rotated() else {
            return;
        };
        if !self.board.can_place(candidate.cells()) {
            return;
        }
        self.previous_piece_cells = *piece.cells();
        self.active_piece = Some(candidate);
    }

    /// Stores the active piece's kind in the hold slot, at most once per
    /// turn (a turn ends when a piece locks).
    ///
    /// The first hold draws a replacement from the queue; later holds swap
    /// with the stored kind, which respawns at the top in its spawn
    /// orientation.
    pub fn hold(&mut self) {
        if !self.state.is_running() || self.held_this_turn {
            return;
        }
        let Some(piece) = self.active_piece else {
            return;
        };
        self.previous_piece_cells = *piece.cells();
        match self.held_piece.replace(piece.kind()) {
            Some(stored) => self.active_piece = Some(Piece::spawn(stored)),
            None => self.spawn_next(),
        }
        self.held_this_turn = true;
    }

    /// Suspends gravity. Only meaningful while `Running`.
    pub fn pause(&mut self) {
        if self.state.is_running() {
            self.state = SessionState::Paused;
        }
    }

    /// Resumes gravity after a pause.
    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = SessionState::Running;
        }
    }

    /// Marks or clears soft drop. The change is observed through
    /// [`Self::fall_interval`] and takes effect on the next tick boundary.
    pub fn set_fast_fall(&mut self, fast_fall: bool) {
        self.fast_fall = fast_fall;
    }

    fn spawn_next(&mut self) {
        let piece = Piece::spawn(self.queue.pop_next());
        self.previous_piece_cells = *piece.cells();
        self.active_piece = Some(piece);
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active_piece.as_ref()
    }

    /// Cells the active piece occupied before its latest successful move,
    /// for front-ends that repaint by diffing.
    #[must_use]
    pub fn previous_piece_cells(&self) -> &[Cell; 4] {
        &self.previous_piece_cells
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn queue_preview(&self) -> [PieceKind; QUEUE_LEN] {
        self.queue.preview()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held_piece
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    #[must_use]
    pub fn total_lines(&self) -> u32 {
        self.scoring.total_lines()
    }

    /// Interval until the next gravity tick under the current level and
    /// soft-drop state. Front-ends re-read this every loop iteration.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        if self.fast_fall {
            FAST_FALL_INTERVAL
        } else {
            self.scoring.fall_delay()
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_session() -> GameSession {
        let mut session = GameSession::with_seed("0123456789abcdeffedcba9876543210".parse().unwrap());
        session.start();
        session
    }

    /// Drops the active piece all the way and locks it.
    fn drop_and_lock(session: &mut GameSession) {
        for _ in 0..=20 {
            if !session.is_running() {
                return;
            }
            session.tick();
        }
    }

    #[test]
    fn start_draws_the_queue_head() {
        let seed = "0123456789abcdeffedcba9876543210".parse().unwrap();
        let mut session = GameSession::with_seed(seed);
        assert!(session.active_piece().is_none());
        let preview = session.queue_preview();

        session.start();
        let active = session.active_piece().unwrap();
        assert_eq!(active.kind(), preview[0]);
        assert_eq!(session.queue_preview()[0], preview[1]);
        assert!(session.is_running());
    }

    #[test]
    fn start_is_inert_while_running() {
        let mut session = seeded_session();
        let active = *session.active_piece().unwrap();
        session.start();
        assert_eq!(session.active_piece().unwrap(), &active);
    }

    #[test]
    fn tick_moves_the_piece_down_one_row() {
        let mut session = seeded_session();
        let before = *session.active_piece().unwrap().cells();
        session.tick();
        let after = *session.active_piece().unwrap().cells();
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(b.x, a.x);
            assert_eq!(b.y, a.y + 1);
        }
        assert_eq!(session.previous_piece_cells(), &before);
    }

    #[test]
    fn move_side_shifts_until_the_wall() {
        let mut session = seeded_session();
        session.active_piece = Some(Piece::spawn(PieceKind::O));
        for _ in 0..12 {
            session.move_side(Direction::Left);
        }
        let min_x = session
            .active_piece()
            .unwrap()
            .cells()
            .iter()
            .map(|cell| cell.x)
            .min()
            .unwrap();
        assert_eq!(min_x, 0);
    }

    #[test]
    fn rotation_is_rejected_against_the_stack() {
        let mut session = seeded_session();
        // A T piece with the cell its first rotation needs already settled:
        // the candidate moves cell 1 from (3, 1) to (4, 2).
        session.active_piece = Some(Piece::spawn(PieceKind::T));
        session.board = Board::from_ascii(
            "
            ..........
            ..........
            ....#.....
            ",
        );
        let before = *session.active_piece().unwrap();
        session.rotate();
        assert_eq!(session.active_piece().unwrap(), &before);

        session.board = Board::new();
        session.rotate();
        assert_ne!(session.active_piece().unwrap().cells(), before.cells());
    }

    #[test]
    fn locks_and_spawns_the_next_piece_on_the_floor() {
        let mut session = seeded_session();
        session.active_piece = Some(Piece::spawn(PieceKind::O));
        let next_kind = session.queue_preview()[0];

        // 18 ticks to reach the floor, one more to lock.
        for _ in 0..19 {
            session.tick();
        }
        assert!(session.is_running());
        assert_eq!(session.active_piece().unwrap().kind(), next_kind);
        assert!(session.board.is_occupied(Cell::new(4, 19)));
        assert!(session.board.is_occupied(Cell::new(5, 18)));
    }

    #[test]
    fn completed_row_scores_and_collapses() {
        let mut session = seeded_session();
        session.board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ####..####
            ",
        );
        session.active_piece = Some(Piece::spawn(PieceKind::O));
        drop_and_lock(&mut session);

        assert_eq!(session.score(), 40);
        assert_eq!(session.total_lines(), 1);
        // The O's upper half fell into the cleared bottom row.
        assert!(session.board.is_occupied(Cell::new(4, 19)));
        assert!(session.board.is_occupied(Cell::new(5, 19)));
        assert!(!session.board.is_occupied(Cell::new(0, 19)));
        assert!(session.is_running());
    }

    #[test]
    fn piece_locking_on_the_top_row_ends_the_game() {
        let mut session = seeded_session();
        // A column under the spawn area so the O locks immediately at y 0-1.
        session.board = Board::from_ascii(
            "
            ..........
            ..........
            ....##....
            ",
        );
        session.active_piece = Some(Piece::spawn(PieceKind::O));
        session.tick();

        assert!(session.is_game_over());
        assert!(session.state().is_at_rest());
        assert!(session.active_piece().is_none());

        // Terminal: nothing mutates any more.
        let board = session.board.clone();
        let score = session.score();
        session.tick();
        session.move_side(Direction::Left);
        session.rotate();
        session.hold();
        assert_eq!(session.board, board);
        assert_eq!(session.score(), score);
        assert!(session.is_game_over());
    }

    #[test]
    fn first_hold_stores_the_kind_and_advances_the_queue() {
        let mut session = seeded_session();
        let active_kind = session.active_piece().unwrap().kind();
        let next_kind = session.queue_preview()[0];

        session.hold();
        assert_eq!(session.held_piece(), Some(active_kind));
        assert_eq!(session.active_piece().unwrap().kind(), next_kind);

        // Second hold in the same turn is a no-op.
        session.hold();
        assert_eq!(session.held_piece(), Some(active_kind));
        assert_eq!(session.active_piece().unwrap().kind(), next_kind);
    }

    #[test]
    fn hold_swaps_again_after_the_next_lock() {
        let mut session = seeded_session();
        let first_kind = session.active_piece().unwrap().kind();
        session.hold();
        drop_and_lock(&mut session);
        assert!(session.is_running());

        let active_kind = session.active_piece().unwrap().kind();
        session.hold();
        assert_eq!(session.held_piece(), Some(active_kind));
        assert_eq!(session.active_piece().unwrap().kind(), first_kind);
        let spawned = Piece::spawn(first_kind);
        assert_eq!(session.active_piece().unwrap().cells(), spawned.cells());
    }

    #[test]
    fn pause_suspends_every_command_until_resume() {
        let mut session = seeded_session();
        let before = *session.active_piece().unwrap();
        session.pause();
        assert!(session.state().is_paused());

        session.tick();
        session.move_side(Direction::Right);
        session.rotate();
        session.hold();
        assert_eq!(session.active_piece().unwrap(), &before);
        assert_eq!(session.held_piece(), None);

        session.resume();
        assert!(session.is_running());
        session.tick();
        assert_ne!(session.active_piece().unwrap().cells(), before.cells());
    }

    #[test]
    fn fast_fall_shortens_the_interval_only() {
        let mut session = seeded_session();
        assert_eq!(session.fall_interval(), Duration::from_millis(1000));
        session.set_fast_fall(true);
        assert_eq!(session.fall_interval(), FAST_FALL_INTERVAL);
        session.set_fast_fall(false);
        assert_eq!(session.fall_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn reset_restores_start_of_game_state_in_place() {
        let mut session = seeded_session();
        session.board = Board::from_ascii(
            "
            ..........
            ..........
            ....##....
            ",
        );
        session.active_piece = Some(Piece::spawn(PieceKind::O));
        session.hold();
        session.set_fast_fall(true);
        session.tick();
        assert!(session.is_game_over());

        session.reset();
        assert!(session.is_running());
        assert!(!session.is_game_over());
        assert!(session.board.is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 0);
        assert_eq!(session.total_lines(), 0);
        assert_eq!(session.held_piece(), None);
        assert_eq!(session.fall_interval(), Duration::from_millis(1000));
        assert!(session.active_piece().is_some());
    }

    #[test]
    fn commands_are_inert_before_start() {
        let seed = "00000000000000000000000000000000".parse().unwrap();
        let mut session = GameSession::with_seed(seed);
        session.tick();
        session.move_side(Direction::Left);
        session.rotate();
        session.hold();
        assert!(session.active_piece().is_none());
        assert!(session.board.is_empty());
        assert!(!session.is_game_over());
    }
}
