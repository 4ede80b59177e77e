//! Global Constants
//!
//! Centralized constants for scoring and analysis limits.
//! All magic numbers should be defined here with documentation.

/// Scoring constants
pub mod scoring {
    /// Lower bound of the placeholder score for an axis no rule touched
    pub const PLACEHOLDER_MIN: u8 = 70;

    /// Upper bound (inclusive) of the placeholder score
    pub const PLACEHOLDER_MAX: u8 = 90;

    /// Upper bound of every score and percentage
    pub const MAX_SCORE: u8 = 100;
}

/// Analysis constants
pub mod analysis {
    /// Maximum source size accepted by request validation (1MB)
    pub const MAX_CODE_BYTES: usize = 1024 * 1024;

    /// Maximum file size picked up by the scanner (1MB)
    pub const MAX_FILE_SIZE: u64 = 1024 * 1024;
}

/// Rewrite constants
pub mod rewrite {
    /// Indentation unit used by multi-line templates
    pub const INDENT: &str = "  ";

    /// Loop variable introduced by nested-loop flattening
    pub const FLAT_INDEX: &str = "idx";

    /// Fallback name when `idx` is already taken
    pub const FLAT_INDEX_ALT: &str = "flatIndex";

    /// Largest line diff table built when carrying touched lines across rewrites
    pub const MAX_DIFF_CELLS: usize = 4_000_000;
}
