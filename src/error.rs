use thiserror::Error;

/// Codec failures. All of these are fatal for the message being processed;
/// recoverable oddities (absent slot discriminants, missing nested lists)
/// decode leniently instead and are tallied by `global::lenient_fallbacks`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PofError {
    /// A tag byte (or word) that is not registered in its tag space.
    #[error("unknown {space} tag {tag}")]
    UnknownTypeTag { space: &'static str, tag: u32 },

    /// The buffer ended before a fixed-layout record was complete.
    #[error("truncated input: needed {needed} bytes, had {available}")]
    TruncatedInput { needed: usize, available: usize },

    /// A declared element count is larger than the backing list or the
    /// fixed capacity of its wire region.
    #[error("{what} count {declared} exceeds {actual}")]
    CountExceedsList {
        what: &'static str,
        declared: usize,
        actual: usize,
    },

    /// A table resource record appeared out of table-type order.
    #[error("table resource at position {index} reports table type {found}")]
    TableTypeMismatch { index: usize, found: u8 },
}
