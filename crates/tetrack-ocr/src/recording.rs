//! Serializable recordings of recognized frames.
//!
//! A recording is a JSON-lines file with one [`RecordedFrame`] per line:
//!
//! ```json
//! {"time_ms":0,"board":["..........", "...", "....##...."],"colors":[{"x":4,"y":19,"rgb":"#0058f8"}],"next":"T","noise":0.02,"lines":{"full":0},"score":{"full":0}}
//! ```
//!
//! Reduced counter reads that are not recorded are derived from the full read.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tetrack_engine::{BitBoard, PieceKind, Rgb};

use crate::frame::OcrFrame;

/// Color sampled in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinoColor {
    pub x: usize,
    pub y: usize,
    pub rgb: Rgb,
}

/// Full and reduced readings of one counter; `None` is an unreadable read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterRead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced: Option<u32>,
}

impl CounterRead {
    #[must_use]
    pub const fn full(value: u32) -> Self {
        Self {
            full: Some(value),
            reduced: None,
        }
    }

    /// The reading in the requested mode. A missing reduced reading falls back
    /// to the last digits of the full one.
    #[must_use]
    pub fn get(&self, reduced: bool, modulus: u32) -> Option<u32> {
        if reduced {
            self.reduced.or(self.full.map(|value| value % modulus))
        } else {
            self.full
        }
    }
}

/// A recognized frame, as stored in a recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub time_ms: u64,
    pub board: BitBoard,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<MinoColor>,
    #[serde(default)]
    pub next: Option<PieceKind>,
    #[serde(default)]
    pub noise: f32,
    #[serde(default)]
    pub lines: CounterRead,
    #[serde(default)]
    pub score: CounterRead,
}

impl RecordedFrame {
    /// Sets the sampled color of the cell at `(x, y)`.
    pub fn set_color(&mut self, x: usize, y: usize, rgb: Rgb) {
        match self.colors.iter_mut().find(|c| c.x == x && c.y == y) {
            Some(color) => color.rgb = rgb,
            None => self.colors.push(MinoColor { x, y, rgb }),
        }
    }
}

impl OcrFrame for RecordedFrame {
    fn timestamp(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }

    fn binary_board(&self) -> BitBoard {
        self.board
    }

    fn raw_mino_color(&self, x: usize, y: usize) -> Rgb {
        self.colors
            .iter()
            .find(|c| c.x == x && c.y == y)
            .map(|c| c.rgb)
            .unwrap_or_default()
    }

    fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    fn board_noise(&self) -> f32 {
        self.noise
    }

    fn read_lines(&self, reduced: bool) -> Option<u32> {
        self.lines.get(reduced, 100)
    }

    fn read_score(&self, reduced: bool) -> Option<u32> {
        self.score.get(reduced, 100_000)
    }
}
