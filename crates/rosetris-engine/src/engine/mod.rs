//! Session layer orchestrating the core types into a playable game.
//!
//! - [`GameSession`] - the one object a front-end drives: spawning, gravity,
//!   locking, line clears, hold, pause, and the game-over transition
//! - [`PieceQueue`] - the 3-piece lookahead window with uniform generation
//! - [`Scoring`] - score, level, and fall-delay progression
//! - [`QueueSeed`] - seed for deterministic piece generation
//!
//! # Game flow
//!
//! 1. Construct a [`GameSession`] (optionally with a [`QueueSeed`])
//! 2. `start()` draws the first piece from the queue
//! 3. The front-end calls `tick()` every [`GameSession::fall_interval`] and
//!    forwards player commands (move, rotate, hold, pause) between ticks
//! 4. A piece that can no longer fall locks; full rows score and clear
//! 5. Repeat until a piece locks while still touching the top row

pub use self::{game_session::*, piece_queue::*, scoring::*};

mod game_session;
mod piece_queue;
mod scoring;
