use arrayvec::ArrayVec;
use tetrack_engine::{ColorRole, DEFAULT_PRIMARY, DEFAULT_SECONDARY, DEFAULT_WHITE, Hsv, Rgb, RoleBoard};
use tetrack_stats::median::{circular_median_degrees, median};
use tracing::debug;

use crate::{error::ColorError, frame::OcrFrame};

/// Number of distinct palettes; level `n` uses bucket `n % 10`.
pub const LEVEL_BUCKETS: usize = 10;

/// Minimum number of trusted minos of a role needed to learn its color.
pub const MIN_MINOS_TO_DERIVE: usize = 5;

/// Maps a level to its palette bucket.
#[must_use]
pub const fn level_bucket(level: u32) -> usize {
    (level % 10) as usize
}

/// Best known mino colors of the current game.
///
/// Every slot starts at the NES default and is replaced at most once, by the
/// color learned from a board whose roles are known to be right. White is shared
/// by all levels.
///
/// # Example
///
/// ```
/// use tetrack_engine::{ColorRole, DEFAULT_PRIMARY, Rgb};
/// use tetrack_ocr::ColorClassifier;
///
/// let colors = ColorClassifier::new();
/// assert_eq!(colors.classify(0, Rgb::new(255, 255, 255))?, ColorRole::White);
/// assert_eq!(colors.classify(0, DEFAULT_PRIMARY[0])?, ColorRole::Primary);
/// # Ok::<(), tetrack_ocr::ColorError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorClassifier {
    white: Option<Rgb>,
    primary: [Option<Rgb>; LEVEL_BUCKETS],
    secondary: [Option<Rgb>; LEVEL_BUCKETS],
}

impl ColorClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The learned color of `role` at `level`, if it has been derived.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::RoleWithoutColor`] for [`ColorRole::Empty`].
    pub fn known_color(&self, level: u32, role: ColorRole) -> Result<Option<Rgb>, ColorError> {
        let bucket = level_bucket(level);
        match role {
            ColorRole::Empty => Err(ColorError::RoleWithoutColor(role)),
            ColorRole::White => Ok(self.white),
            ColorRole::Primary => Ok(self.primary[bucket]),
            ColorRole::Secondary => Ok(self.secondary[bucket]),
        }
    }

    /// The color `role` is expected to have at `level`, learned or default.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::RoleWithoutColor`] for [`ColorRole::Empty`].
    pub fn color_for_level(&self, level: u32, role: ColorRole) -> Result<Rgb, ColorError> {
        let bucket = level_bucket(level);
        let default = match role {
            ColorRole::Empty => return Err(ColorError::RoleWithoutColor(role)),
            ColorRole::White => DEFAULT_WHITE,
            ColorRole::Primary => DEFAULT_PRIMARY[bucket],
            ColorRole::Secondary => DEFAULT_SECONDARY[bucket],
        };
        Ok(self.known_color(level, role)?.unwrap_or(default))
    }

    /// Finds the role whose expected color at `level` is closest to `sample`.
    ///
    /// Distance is measured in HSV space. On a tie white wins over primary, and
    /// primary over secondary.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`ColorClassifier::color_for_level`].
    pub fn classify(&self, level: u32, sample: Rgb) -> Result<ColorRole, ColorError> {
        let sample = sample.to_hsv();
        let mut candidates = ArrayVec::<(ColorRole, f32), 3>::new();
        for role in ColorRole::MINO_ROLES {
            let distance = self.color_for_level(level, role)?.to_hsv().distance(sample);
            candidates.push((role, distance));
        }

        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.1 < best.1 {
                best = *candidate;
            }
        }
        Ok(best.0)
    }

    /// Learns the colors of `level` from a board whose roles are trusted.
    ///
    /// A role is learned from the cells it holds in `trusted` that are also
    /// occupied in the frame, once there are at least [`MIN_MINOS_TO_DERIVE`] of
    /// them. Slots that were already learned are never changed.
    ///
    /// # Errors
    ///
    /// Propagates structural errors of the color table or of the statistics.
    pub fn derive_from_board<F>(
        &mut self,
        frame: &F,
        trusted: &RoleBoard,
        level: u32,
    ) -> Result<(), ColorError>
    where
        F: OcrFrame + ?Sized,
    {
        let bitmap = frame.binary_board();
        for role in ColorRole::MINO_ROLES {
            if self.known_color(level, role)?.is_some() {
                continue;
            }

            let samples = trusted
                .minos()
                .filter(|&(x, y, r)| r == role && bitmap.is_occupied(x, y))
                .map(|(x, y, _)| frame.raw_mino_color(x, y).to_hsv())
                .collect::<Vec<_>>();
            if samples.len() < MIN_MINOS_TO_DERIVE {
                continue;
            }

            let rgb = median_hsv(&samples)?.to_rgb();
            debug!(?role, level, color = %rgb, samples = samples.len(), "derived mino color");
            *self.slot_mut(level, role)? = Some(rgb);
        }
        Ok(())
    }

    fn slot_mut(&mut self, level: u32, role: ColorRole) -> Result<&mut Option<Rgb>, ColorError> {
        let bucket = level_bucket(level);
        match role {
            ColorRole::Empty => Err(ColorError::RoleWithoutColor(role)),
            ColorRole::White => Ok(&mut self.white),
            ColorRole::Primary => Ok(&mut self.primary[bucket]),
            ColorRole::Secondary => Ok(&mut self.secondary[bucket]),
        }
    }
}

/// Median color of the samples, taking the hue around the color circle.
fn median_hsv(samples: &[Hsv]) -> Result<Hsv, ColorError> {
    Ok(Hsv {
        h: circular_median_degrees(samples.iter().map(|c| c.h))?,
        s: median(samples.iter().map(|c| c.s))?,
        v: median(samples.iter().map(|c| c.v))?,
    })
}

#[cfg(test)]
mod tests {
    use tetrack_engine::BitBoard;

    use super::*;
    use crate::recording::RecordedFrame;

    fn trusted_row(role: ColorRole, count: usize) -> RoleBoard {
        let mut board = RoleBoard::EMPTY;
        for x in 0..count {
            board.set(x, 19, role);
        }
        board
    }

    fn frame_with_color(board: &RoleBoard, rgb: Rgb) -> RecordedFrame {
        let mut frame = RecordedFrame {
            board: board.to_bit_board(),
            ..RecordedFrame::default()
        };
        for (x, y, _) in board.minos() {
            frame.set_color(x, y, rgb);
        }
        frame
    }

    #[test]
    fn test_empty_role_is_error() {
        let colors = ColorClassifier::new();
        assert_eq!(
            colors.color_for_level(0, ColorRole::Empty),
            Err(ColorError::RoleWithoutColor(ColorRole::Empty))
        );
        assert!(colors.known_color(3, ColorRole::Empty).is_err());
    }

    #[test]
    fn test_classify_defaults() {
        let colors = ColorClassifier::new();
        for level in [0, 7, 18, 29] {
            let bucket = level_bucket(level);
            assert_eq!(colors.classify(level, DEFAULT_WHITE), Ok(ColorRole::White));
            assert_eq!(colors.classify(level, DEFAULT_PRIMARY[bucket]), Ok(ColorRole::Primary));
            assert_eq!(
                colors.classify(level, DEFAULT_SECONDARY[bucket]),
                Ok(ColorRole::Secondary)
            );
        }
    }

    #[test]
    fn test_classify_is_pure() {
        let colors = ColorClassifier::new();
        let sample = Rgb::new(120, 40, 200);
        let first = colors.classify(5, sample);
        for _ in 0..10 {
            assert_eq!(colors.classify(5, sample), first);
        }
    }

    #[test]
    fn test_classify_tie_prefers_white() {
        // Same stored color for every role of the bucket: every distance ties.
        let gray = Rgb::new(128, 128, 128);
        let mut colors = ColorClassifier::new();
        *colors.slot_mut(4, ColorRole::White).unwrap() = Some(gray);
        *colors.slot_mut(4, ColorRole::Primary).unwrap() = Some(gray);
        *colors.slot_mut(4, ColorRole::Secondary).unwrap() = Some(gray);
        assert_eq!(colors.classify(4, Rgb::new(10, 200, 30)), Ok(ColorRole::White));

        *colors.slot_mut(4, ColorRole::White).unwrap() = Some(Rgb::new(255, 255, 255));
        assert_eq!(colors.classify(4, gray), Ok(ColorRole::Primary));
    }

    #[test]
    fn test_derive_requires_five_minos() {
        let sampled = Rgb::new(10, 100, 240);
        let mut colors = ColorClassifier::new();

        let board = trusted_row(ColorRole::Primary, 4);
        colors
            .derive_from_board(&frame_with_color(&board, sampled), &board, 18)
            .unwrap();
        assert_eq!(colors.known_color(18, ColorRole::Primary), Ok(None));

        let board = trusted_row(ColorRole::Primary, 5);
        colors
            .derive_from_board(&frame_with_color(&board, sampled), &board, 18)
            .unwrap();
        let learned = colors.known_color(8, ColorRole::Primary).unwrap().unwrap();
        assert!(learned.r.abs_diff(sampled.r) <= 1);
        assert!(learned.g.abs_diff(sampled.g) <= 1);
        assert!(learned.b.abs_diff(sampled.b) <= 1);
        assert_eq!(colors.known_color(18, ColorRole::Secondary), Ok(None));
        assert_eq!(colors.known_color(18, ColorRole::White), Ok(None));
    }

    #[test]
    fn test_derive_ignores_cells_missing_from_frame() {
        let board = trusted_row(ColorRole::Secondary, 6);
        let mut frame = frame_with_color(&board, Rgb::new(200, 20, 20));
        // Two trusted cells are empty in the frame, leaving four samples.
        let mut bitmap = BitBoard::EMPTY;
        for x in 2..6 {
            bitmap.occupy(x, 19);
        }
        frame.board = bitmap;

        let mut colors = ColorClassifier::new();
        colors.derive_from_board(&frame, &board, 0).unwrap();
        assert_eq!(colors.known_color(0, ColorRole::Secondary), Ok(None));
    }

    #[test]
    fn test_derive_is_write_once() {
        let board = trusted_row(ColorRole::White, 10);
        let mut colors = ColorClassifier::new();
        colors
            .derive_from_board(&frame_with_color(&board, Rgb::new(240, 240, 240)), &board, 0)
            .unwrap();
        let first = colors.known_color(0, ColorRole::White).unwrap();
        assert!(first.is_some());

        colors
            .derive_from_board(&frame_with_color(&board, Rgb::new(30, 30, 30)), &board, 5)
            .unwrap();
        assert_eq!(colors.known_color(5, ColorRole::White), Ok(first));
    }

    #[test]
    fn test_learned_color_changes_classification() {
        // A washed-out capture of the level 0 primary color.
        let sampled = Rgb::new(150, 160, 200);
        let mut colors = ColorClassifier::new();
        let before = colors.classify(0, sampled).unwrap();

        let board = trusted_row(ColorRole::Primary, 8);
        colors
            .derive_from_board(&frame_with_color(&board, sampled), &board, 0)
            .unwrap();
        assert_eq!(colors.classify(0, sampled), Ok(ColorRole::Primary));
        assert_ne!(before, ColorRole::Primary);
    }
}
