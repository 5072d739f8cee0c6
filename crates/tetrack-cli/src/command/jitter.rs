use std::path::PathBuf;

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg32;
use tetrack_engine::Rgb;
use tetrack_ocr::recording::{CounterRead, RecordedFrame};
use tracing::info;

use crate::util::{self, Output};

/// Digits shown by the lines counter.
const LINES_DIGITS: u32 = 3;
/// Digits shown by the score counter.
const SCORE_DIGITS: u32 = 6;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct JitterArg {
    /// Recorded frames, one JSON object per line
    recording: PathBuf,
    /// Seed of the random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Probability that a counter read gets one wrong digit
    #[arg(long, default_value_t = 0.05)]
    digit_error_rate: f64,
    /// Probability that a counter or the next piece cannot be read
    #[arg(long, default_value_t = 0.02)]
    unreadable_rate: f64,
    /// Standard deviation of the noise added to each color channel
    #[arg(long, default_value_t = 4.0)]
    color_sigma: f32,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Injects recognition errors into recorded frames.
#[derive(Debug)]
struct Jitter {
    rng: Pcg32,
    digit_error_rate: f64,
    unreadable_rate: f64,
    color_noise: Normal<f32>,
}

impl Jitter {
    fn new(arg: &JitterArg) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&arg.digit_error_rate),
            "--digit-error-rate must be within [0, 1]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&arg.unreadable_rate),
            "--unreadable-rate must be within [0, 1]"
        );
        let color_noise = Normal::new(0.0, arg.color_sigma)
            .with_context(|| format!("Invalid --color-sigma: {}", arg.color_sigma))?;
        Ok(Self {
            rng: Pcg32::seed_from_u64(arg.seed),
            digit_error_rate: arg.digit_error_rate,
            unreadable_rate: arg.unreadable_rate,
            color_noise,
        })
    }

    fn apply(&mut self, frame: &mut RecordedFrame) {
        if self.rng.random_bool(self.unreadable_rate) {
            frame.next = None;
        }
        self.apply_counter(&mut frame.lines, LINES_DIGITS);
        self.apply_counter(&mut frame.score, SCORE_DIGITS);
        for color in &mut frame.colors {
            color.rgb = self.apply_color(color.rgb);
        }
    }

    fn apply_counter(&mut self, read: &mut CounterRead, digits: u32) {
        if self.rng.random_bool(self.unreadable_rate) {
            *read = CounterRead::default();
            return;
        }
        if let Some(value) = read.full
            && self.rng.random_bool(self.digit_error_rate)
        {
            read.full = Some(corrupt_digit(&mut self.rng, value, digits));
        }
        if let Some(value) = read.reduced
            && self.rng.random_bool(self.digit_error_rate)
        {
            read.reduced = Some(corrupt_digit(&mut self.rng, value, digits - 1));
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn apply_color(&mut self, rgb: Rgb) -> Rgb {
        let mut channel = |value: u8| {
            let noisy = f32::from(value) + self.color_noise.sample(&mut self.rng);
            noisy.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(rgb.r), channel(rgb.g), channel(rgb.b))
    }
}

/// Replaces one of the lowest `digits` decimal digits of `value` with another digit.
fn corrupt_digit<R>(rng: &mut R, value: u32, digits: u32) -> u32
where
    R: Rng + ?Sized,
{
    let place = 10u32.pow(rng.random_range(0..digits));
    let digit = value / place % 10;
    let replacement = (digit + rng.random_range(1..10)) % 10;
    value - digit * place + replacement * place
}

pub(crate) fn run(arg: &JitterArg) -> anyhow::Result<()> {
    let mut jitter = Jitter::new(arg)?;
    let mut frames = util::read_recording(&arg.recording)?;
    let mut output = Output::from_output_path(arg.output.as_deref())?;

    for frame in &mut frames {
        jitter.apply(frame);
        output.write_json_line(frame)?;
    }
    output.finish()?;

    info!(
        frames = frames.len(),
        output = output_name(arg),
        "wrote jittered recording"
    );
    Ok(())
}

fn output_name(arg: &JitterArg) -> String {
    arg.output
        .as_ref()
        .map_or_else(|| "stdout".to_owned(), |path| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use tetrack_engine::BitBoard;

    use super::*;

    fn arg(seed: u64) -> JitterArg {
        JitterArg {
            recording: PathBuf::from("frames.jsonl"),
            seed,
            digit_error_rate: 0.5,
            unreadable_rate: 0.1,
            color_sigma: 6.0,
            output: None,
        }
    }

    fn frames() -> Vec<RecordedFrame> {
        (0..50)
            .map(|i| {
                let mut frame = RecordedFrame {
                    time_ms: i * 33,
                    board: BitBoard::from_ascii("##........"),
                    lines: CounterRead::full(120),
                    score: CounterRead {
                        full: Some(345_678),
                        reduced: Some(45_678),
                    },
                    ..RecordedFrame::default()
                };
                frame.set_color(0, 19, Rgb::new(0x00, 0x58, 0xf8));
                frame.set_color(1, 19, Rgb::new(250, 250, 250));
                frame
            })
            .collect()
    }

    fn jittered(arg: &JitterArg) -> Vec<RecordedFrame> {
        let mut jitter = Jitter::new(arg).unwrap();
        let mut frames = frames();
        for frame in &mut frames {
            jitter.apply(frame);
        }
        frames
    }

    #[test]
    fn test_corrupt_digit_changes_one_digit() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let value = 345_678;
            let corrupted = corrupt_digit(&mut rng, value, SCORE_DIGITS);
            assert_ne!(corrupted, value);
            let differing = (0..SCORE_DIGITS)
                .filter(|i| {
                    let place = 10u32.pow(*i);
                    value / place % 10 != corrupted / place % 10
                })
                .count();
            assert_eq!(differing, 1, "{value} -> {corrupted}");
        }
    }

    #[test]
    fn test_zero_rates_keep_frames() {
        let arg = JitterArg {
            digit_error_rate: 0.0,
            unreadable_rate: 0.0,
            color_sigma: 0.0,
            ..arg(1)
        };
        assert_eq!(jittered(&arg), frames());
    }

    #[test]
    fn test_same_seed_same_output() {
        assert_eq!(jittered(&arg(42)), jittered(&arg(42)));
        assert_ne!(jittered(&arg(42)), jittered(&arg(43)));
    }

    #[test]
    fn test_board_is_untouched() {
        for (before, after) in frames().iter().zip(jittered(&arg(3))) {
            assert_eq!(before.board, after.board);
            assert_eq!(before.time_ms, after.time_ms);
        }
    }

    #[test]
    fn test_rejects_invalid_rates() {
        let arg = JitterArg {
            unreadable_rate: 1.5,
            ..arg(0)
        };
        assert!(Jitter::new(&arg).is_err());
    }
}
