use tetrack_engine::ColorRole;
use tetrack_stats::EmptySampleError;

/// Structural misuse of the color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ColorError {
    #[display("no color is associated with the {_0:?} role")]
    RoleWithoutColor(#[error(not(source))] ColorRole),
    #[display("cannot derive a color from zero samples")]
    EmptySample(EmptySampleError),
}

impl From<EmptySampleError> for ColorError {
    fn from(err: EmptySampleError) -> Self {
        Self::EmptySample(err)
    }
}

/// Error aborting the evaluation of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum OcrError {
    #[display("color classification failed: {_0}")]
    Color(ColorError),
}
