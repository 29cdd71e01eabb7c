pub mod code;
pub mod narrative;

#[cfg(test)]
mod tests;

use crate::markers::Marker;

pub use code::{CodeSourceParser, parse_code_source};
pub use narrative::{NarrativeSourceParser, parse_narrative_source};

/// Result of masking the source lines of one cell.
///
/// The two sequences may differ in length: a masked block collapses to a
/// single placeholder in `to_complete`, and marker lines land in neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSource {
    pub solution: Vec<String>,
    pub to_complete: Vec<String>,
    /// Number of closed answer blocks.
    pub blocks: usize,
    /// Number of next-line substitutions.
    pub lines: usize,
}

impl ParsedSource {
    fn push_both(&mut self, line: &str) {
        self.solution.push(line.to_string());
        self.to_complete.push(line.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Markers out of order: nested, unopened or unterminated regions.
    State,
    /// A next-line answer that is not a single `lhs = rhs` assignment.
    Format,
}

/// Line numbers are 1-based within the cell being parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("nested block start: {marker} at line {line} while already inside a block")]
    NestedStart { marker: Marker, line: usize },

    #[error("end without start: {marker} at line {line} outside of any block")]
    EndWithoutStart { marker: Marker, line: usize },

    #[error("unterminated block: {marker} at line {line} is never closed")]
    Unterminated { marker: Marker, line: usize },

    #[error("{marker} at line {line} cannot appear inside an answer block")]
    NextLineInBlock { marker: Marker, line: usize },

    #[error(
        "{marker} at line {line} starts a block while the next-line answer marked at line {pending} is pending"
    )]
    StartWhilePending {
        marker: Marker,
        line: usize,
        pending: usize,
    },

    #[error(
        "expecting a one line answer format (i.e., `... = ...`) at line {line}, instead found the next line:\n{text}"
    )]
    OneLineFormat { line: usize, text: String },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::OneLineFormat { .. } => ErrorKind::Format,
            _ => ErrorKind::State,
        }
    }
}
