use tetrack_engine::{GameSession, GameStatus, ROLLOVER_SCORE};
use tracing::debug;

use crate::frame::OcrFrame;

/// Below this many lines all three digits of the lines counter are trusted.
const LINES_FULL_READ_LIMIT: u32 = 992;
/// Largest jump accepted from a full lines read.
const MAX_LINES_FULL_DELTA: u32 = 8;
/// Largest jump accepted from a two-digit lines read.
const MAX_LINES_REDUCED_DELTA: u32 = 4;
/// Below this score all six digits of the score counter are trusted.
const SCORE_FULL_READ_LIMIT: u32 = 960_000;
/// Score reads must advance by less than this.
const MAX_SCORE_DELTA: u32 = 100_000;
/// The displayed score is reliable modulo this value after a rollover.
const DISPLAYED_SCORE_LIMIT: u32 = 1_000_000;
/// Levels from which the last five score digits can no longer be trusted.
const REDUCED_SCORE_LEVEL_LIMIT: u32 = 80;

/// Outcome of the score read of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoreRead {
    Accepted,
    /// The counter shows the value already predicted.
    Unchanged,
    /// No read, an unreadable read, or an implausible value.
    Unusable,
}

/// Turns noisy, rollover-prone counter reads into a monotonic estimate.
///
/// The estimate starts from the session status when the owning state is
/// entered. Reads are only accepted when they move the counter forward by a
/// plausible amount, so a misread digit can never move the estimate backwards
/// or far ahead.
#[derive(Debug, Clone)]
pub struct CounterReconciler {
    poll_interval: u32,
    frame_index: u32,
    start_level: u32,
    level: u32,
    lines: u32,
    score: u32,
}

impl CounterReconciler {
    #[must_use]
    pub fn new(status: &GameStatus, poll_interval: u32) -> Self {
        Self {
            poll_interval: poll_interval.max(1),
            frame_index: 0,
            start_level: status.start_level(),
            level: status.level(),
            lines: status.lines(),
            score: status.score(),
        }
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn lines(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        GameStatus::with_progress(self.start_level, self.level, self.lines, self.score)
    }

    /// Counts a frame and tells whether the counters are due to be read on it.
    ///
    /// The first frame is always due, then every `poll_interval` frames.
    pub fn is_poll_frame(&mut self) -> bool {
        let due = self.frame_index % self.poll_interval == 0;
        self.frame_index = self.frame_index.wrapping_add(1);
        due
    }

    /// Reads lines then score from `frame` and folds them into the estimate.
    ///
    /// Level advances when lines reach the session's transition threshold and
    /// the ones digit wraps. When lines advanced but no score read could be
    /// used, the score is computed from the line clear. The rollover count of
    /// the session profile is updated from the resulting score.
    pub fn update_counters<F>(&mut self, frame: &F, session: &mut GameSession)
    where
        F: OcrFrame + ?Sized,
    {
        let previous = self.status();

        self.update_lines(frame);
        if self.lines >= session.transition_lines() && self.lines % 10 < previous.lines() % 10 {
            self.level += 1;
            debug!(level = self.level, "level up");
        }

        let read = self.update_score(frame, &previous, session);
        let cleared = self.lines - previous.lines();
        if read == ScoreRead::Unusable && (1..=4).contains(&cleared) {
            self.score = previous.score_after_line_clear(cleared);
            debug!(score = self.score, cleared, "new score from line clears");
        }

        session
            .profile_mut()
            .calculate_rollover_on_score(self.score);
    }

    fn update_lines<F>(&mut self, frame: &F)
    where
        F: OcrFrame + ?Sized,
    {
        if self.lines < LINES_FULL_READ_LIMIT {
            let Some(read) = frame.read_lines(false) else {
                return;
            };
            if read > self.lines && read <= self.lines + MAX_LINES_FULL_DELTA {
                self.lines = read;
                debug!(lines = self.lines, "new lines from full read");
            } else if read != self.lines {
                debug!(read, predicted = self.lines, "rejected full lines read");
            }
            return;
        }

        let Some(read) = frame.read_lines(true) else {
            return;
        };
        if read >= 100 {
            debug!(read, "rejected reduced lines read");
            return;
        }
        let mut lines = self.lines / 100 * 100 + read;
        if lines < self.lines {
            lines += 100;
        }
        if lines > self.lines && lines - self.lines <= MAX_LINES_REDUCED_DELTA {
            self.lines = lines;
            debug!(lines = self.lines, "new lines from reduced read");
        } else if lines != self.lines {
            debug!(read, reconstructed = lines, predicted = self.lines, "rejected reduced lines read");
        }
    }

    fn update_score<F>(&mut self, frame: &F, previous: &GameStatus, session: &GameSession) -> ScoreRead
    where
        F: OcrFrame + ?Sized,
    {
        let profile = session.profile();

        if self.score < SCORE_FULL_READ_LIMIT {
            let Some(read) = frame.read_score(false) else {
                return ScoreRead::Unusable;
            };
            return self.accept_score(read, "full read");
        }

        if !profile.is_maxout_capped()
            && previous.score_after_line_clear(4) % ROLLOVER_SCORE < DISPLAYED_SCORE_LIMIT
        {
            let Some(read) = frame.read_score(false) else {
                return ScoreRead::Unusable;
            };
            let score = read.saturating_add(ROLLOVER_SCORE.saturating_mul(profile.rollovers()));
            return self.accept_score(score, "full read with rollover");
        }

        if self.level < REDUCED_SCORE_LEVEL_LIMIT && !profile.is_maxout_capped() {
            let Some(read) = frame.read_score(true) else {
                return ScoreRead::Unusable;
            };
            if read >= MAX_SCORE_DELTA {
                debug!(read, "rejected reduced score read");
                return ScoreRead::Unusable;
            }
            let mut score = self.score / MAX_SCORE_DELTA * MAX_SCORE_DELTA + read;
            if score < self.score {
                score += MAX_SCORE_DELTA;
            }
            return self.accept_score(score, "last five digits");
        }

        ScoreRead::Unusable
    }

    fn accept_score(&mut self, score: u32, source: &'static str) -> ScoreRead {
        if score == self.score {
            ScoreRead::Unchanged
        } else if score > self.score && score - self.score < MAX_SCORE_DELTA {
            self.score = score;
            debug!(score, source, "new score");
            ScoreRead::Accepted
        } else {
            debug!(read = score, predicted = self.score, source, "rejected score read");
            ScoreRead::Unusable
        }
    }
}
