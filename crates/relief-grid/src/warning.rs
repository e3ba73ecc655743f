//! Non-fatal numeric conditions surfaced by the processing stages.

/// A non-fatal numeric condition encountered during processing.
///
/// Warnings are logged via `tracing::warn!` where they arise and also
/// returned as values so callers (and tests) can inspect them. They never
/// abort a run; the documented fallback behaviour applies instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericWarning {
    /// Non-finite samples (NaN/±Inf) were replaced by a fallback value.
    NonFiniteReplaced {
        /// How many samples were replaced.
        count: usize,
        /// The value they were replaced with.
        fallback: f64,
    },

    /// The value range collapsed to a single value; heights map to zero.
    FlatRange {
        /// The single value the grid collapsed to.
        value: f64,
    },
}

impl std::fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteReplaced { count, fallback } => {
                write!(f, "replaced {count} non-finite samples with {fallback}")
            }
            Self::FlatRange { value } => {
                write!(f, "value range is flat at {value}; surface will be a plain slab")
            }
        }
    }
}
