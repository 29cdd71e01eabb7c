pub mod dispatch;
pub mod io;
pub mod legacy;
pub mod markers;
pub mod notebook;
pub mod parsing;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use dispatch::{
    MaskCounts, TransformError, TransformOptions, Transformed, UnknownCellPolicy, transform,
};
pub use legacy::{LegacyOutput, mask_raw_text};
pub use markers::{Marker, PLACEHOLDER};
pub use notebook::{Cell, CellKind, Notebook, NotebookError};
pub use parsing::{
    ErrorKind, ParseError, ParsedSource, parse_code_source, parse_narrative_source,
};
