pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a [`PieceTemplate`] cannot be turned into a [`Piece`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TemplateError {
    #[display("piece template must be between 1x1 and 4x4, got {width}x{height}")]
    InvalidSize { width: u8, height: u8 },
    #[display("piece template {width}x{height} expects {expected} cells, got {actual}")]
    PatternLength {
        width: u8,
        height: u8,
        expected: usize,
        actual: usize,
    },
    #[display("piece template has no filled cells")]
    NoFilledCells,
}

/// Error returned when spawn weights cannot form a distribution.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SpawnTableError {
    #[display("spawn table is empty")]
    Empty,
    #[display("spawn weight #{index} must be finite and non-negative, got {weight}")]
    InvalidWeight { index: usize, weight: f64 },
    #[display("spawn weights sum to zero")]
    ZeroTotal,
}

/// Error returned by [`RuleSet::new`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RuleSetError {
    #[display("field must be at least 1x1, got {width}x{height}")]
    EmptyField { width: u16, height: u16 },
    #[display("invalid piece template #{index}")]
    Template { index: usize, source: TemplateError },
    #[display("invalid spawn table")]
    SpawnTable(SpawnTableError),
    #[display("rule set has {templates} piece templates but {weights} spawn weights")]
    MisalignedWeights { templates: usize, weights: usize },
    #[display("piece template #{index} (dimension {dimension}) does not fit a field {width} cells wide")]
    TemplateTooWide {
        index: usize,
        dimension: usize,
        width: u16,
    },
}

/// Error returned when a [`PieceSeed`] cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("seed must have 1 to 32 hex digits, got {len}")]
    InvalidLength { len: usize },
    #[display("seed contains non-hex character {ch:?}")]
    InvalidDigit { ch: char },
}
