use std::time::Duration;

/// Points awarded per simultaneous line clear, indexed by line count.
///
/// The original BPS table: flat bonuses, no level multiplier.
const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Gravity delay at level 0.
const INITIAL_FALL_DELAY: Duration = Duration::from_millis(1000);

/// Lower bound on the gravity delay. The reference rule set shrinks the
/// delay forever; the clamp keeps it positive at high levels.
const MIN_FALL_DELAY: Duration = Duration::from_millis(50);

/// Score, level, and gravity progression for one game.
///
/// Levels are earned by accumulating cleared lines: 10 lines for the first
/// level, then `level * 10` for each one after. Every level-up shortens the
/// gravity delay - by 100 ms below level 10, 50 ms at level 10, and 10 ms
/// beyond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoring {
    score: u32,
    level: u32,
    cleared_lines: u32,
    required_line_clears: u32,
    total_lines: u32,
    fall_delay: Duration,
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoring {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            cleared_lines: 0,
            required_line_clears: 10,
            total_lines: 0,
            fall_delay: INITIAL_FALL_DELAY,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn total_lines(&self) -> u32 {
        self.total_lines
    }

    /// Delay between gravity ticks at the current level.
    #[must_use]
    pub const fn fall_delay(&self) -> Duration {
        self.fall_delay
    }

    /// Records `lines` rows cleared by a single lock (1..=4).
    ///
    /// Adds the fixed bonus, advances both line counters, and levels up once
    /// when the progress counter reaches the requirement.
    #[expect(clippy::cast_possible_truncation)]
    pub fn record_clears(&mut self, lines: usize) {
        debug_assert!((1..=4).contains(&lines));
        self.score += LINE_SCORES[lines];
        let lines = lines as u32;
        self.total_lines += lines;
        self.cleared_lines += lines;
        if self.cleared_lines >= self.required_line_clears {
            self.cleared_lines -= self.required_line_clears;
            self.level_up();
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        let step = if self.level < 10 {
            100
        } else if self.level == 10 {
            50
        } else {
            10
        };
        self.fall_delay = self
            .fall_delay
            .saturating_sub(Duration::from_millis(step))
            .max(MIN_FALL_DELAY);
        self.required_line_clears = self.level * 10;
    }
}
