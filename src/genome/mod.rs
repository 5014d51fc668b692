//! Genomic value types: intervals, variants and chromosome naming
//!
//! All types here are request-scoped values. They are immutable once
//! constructed; operations such as resizing produce new values.

mod chromosome;
mod interval;
mod variant;

pub use chromosome::is_valid_chromosome;
pub use interval::GenomicInterval;
pub use variant::{GenomicVariant, VariantType};
