/// Base points for line clears, multiplied by `level + 1`.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
const SCORE_TABLE: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points awarded by NES Tetris for clearing `cleared_lines` lines at `level`.
///
/// Returns 0 for counts outside `0..=4`.
#[must_use]
pub const fn line_clear_score(cleared_lines: u32, level: u32) -> u32 {
    if cleared_lines as usize >= SCORE_TABLE.len() {
        return 0;
    }
    SCORE_TABLE[cleared_lines as usize].saturating_mul(level.saturating_add(1))
}

/// Number of lines after which the first level transition happens.
///
/// NES Tetris leaves the start level after `min(L*10+10, max(100, L*10-50))`
/// lines. From then on the level increments every 10 lines.
#[must_use]
pub const fn transition_lines(start_level: u32) -> u32 {
    let a = start_level.saturating_mul(10).saturating_add(10);
    let b = start_level.saturating_mul(10).saturating_sub(50);
    let b = if b > 100 { b } else { 100 };
    if a < b { a } else { b }
}

/// Level, lines and score of a game, advanced with NES rules.
///
/// # Example
///
/// ```
/// use tetrack_engine::GameStatus;
///
/// let mut status = GameStatus::new(18);
/// status.on_line_clear(4); // Tetris at level 18
///
/// assert_eq!(status.score(), 1200 * 19);
/// assert_eq!(status.lines(), 4);
/// assert_eq!(status.level(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    start_level: u32,
    level: u32,
    lines: u32,
    score: u32,
}

impl GameStatus {
    /// Creates the status of a game that has just started at `start_level`.
    #[must_use]
    pub const fn new(start_level: u32) -> Self {
        Self {
            start_level,
            level: start_level,
            lines: 0,
            score: 0,
        }
    }

    /// Creates the status of a game already in progress.
    #[must_use]
    pub const fn with_progress(start_level: u32, level: u32, lines: u32, score: u32) -> Self {
        Self {
            start_level,
            level,
            lines,
            score,
        }
    }

    #[must_use]
    pub const fn start_level(&self) -> u32 {
        self.start_level
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn lines(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn transition_lines(&self) -> u32 {
        transition_lines(self.start_level)
    }

    /// Checks whether any line has been cleared or any point scored.
    #[must_use]
    pub const fn has_progress(&self) -> bool {
        self.lines > 0 || self.score > 0
    }

    /// Applies a line clear.
    ///
    /// Points use the level before the clear. The level goes up by one when the
    /// new line count has reached the transition threshold and the ones digit
    /// wrapped around.
    pub fn on_line_clear(&mut self, cleared_lines: u32) {
        let previous_lines = self.lines;
        self.score = self
            .score
            .saturating_add(line_clear_score(cleared_lines, self.level));
        self.lines = self.lines.saturating_add(cleared_lines);
        if self.lines >= self.transition_lines() && self.lines % 10 < previous_lines % 10 {
            self.level += 1;
        }
    }

    /// Score this status would have after clearing `cleared_lines` lines.
    #[must_use]
    pub fn score_after_line_clear(&self, cleared_lines: u32) -> u32 {
        let mut status = *self;
        status.on_line_clear(cleared_lines);
        status.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score() {
        assert_eq!(line_clear_score(0, 5), 0);
        assert_eq!(line_clear_score(1, 0), 40);
        assert_eq!(line_clear_score(2, 1), 200);
        assert_eq!(line_clear_score(3, 9), 3000);
        assert_eq!(line_clear_score(4, 18), 22800);
        assert_eq!(line_clear_score(5, 18), 0);
    }

    #[test]
    fn test_transition_lines() {
        assert_eq!(transition_lines(0), 10);
        assert_eq!(transition_lines(9), 100);
        assert_eq!(transition_lines(15), 100);
        assert_eq!(transition_lines(18), 130);
        assert_eq!(transition_lines(19), 140);
        assert_eq!(transition_lines(29), 240);
    }

    #[test]
    fn test_level_up_only_after_transition() {
        let mut status = GameStatus::new(18);
        for _ in 0..32 {
            status.on_line_clear(4);
        }
        // 128 lines: below the 130 threshold
        assert_eq!(status.lines(), 128);
        assert_eq!(status.level(), 18);

        status.on_line_clear(2);
        assert_eq!(status.level(), 19);

        status.on_line_clear(4);
        assert_eq!(status.level(), 19);
        status.on_line_clear(4);
        assert_eq!(status.level(), 19);
        status.on_line_clear(2);
        assert_eq!(status.lines(), 140);
        assert_eq!(status.level(), 20);
    }

    #[test]
    fn test_score_uses_level_before_clear() {
        let mut status = GameStatus::with_progress(0, 0, 8, 0);
        status.on_line_clear(2);
        assert_eq!(status.level(), 1);
        assert_eq!(status.score(), 100);
        assert!(status.has_progress());
        assert!(!GameStatus::new(0).has_progress());
    }

    #[test]
    fn test_score_after_line_clear_is_pure() {
        let status = GameStatus::with_progress(18, 18, 0, 1000);
        assert_eq!(status.score_after_line_clear(4), 1000 + 22800);
        assert_eq!(status.score(), 1000);
    }
}
