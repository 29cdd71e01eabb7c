pub mod cell;

pub use cell::{Cell, CellKind, Source, SourceRepr};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Indentation nbformat uses when writing notebooks.
pub const DEFAULT_INDENT: usize = 1;

#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("Failed to parse notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to serialize notebook: {0}")]
    Serialize(serde_json::Error),
    #[error("Invalid notebook format: top level must be a JSON object")]
    NotAnObject,
    #[error("Invalid notebook format: missing `cells` array")]
    MissingCells,
    #[error("Invalid notebook format: cell {index} is not a JSON object")]
    InvalidCell { index: usize },
}

/// A parsed `.ipynb` document.
///
/// Top-level fields (`metadata`, `nbformat`, ...) are kept untouched and in
/// their original order; only the cell list is exposed for rewriting.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    root: Map<String, Value>,
    cells: Vec<Cell>,
    indent: usize,
}

impl Notebook {
    const CELLS: &'static str = "cells";

    pub fn from_json_str(text: &str) -> Result<Self, NotebookError> {
        let Value::Object(mut root) = serde_json::from_str::<Value>(text)? else {
            return Err(NotebookError::NotAnObject);
        };

        let cells = match root.get_mut(Self::CELLS).map(Value::take) {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(fields) => Ok(Cell::from_fields(fields)),
                    _ => Err(NotebookError::InvalidCell { index }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(NotebookError::MissingCells),
        };

        Ok(Self {
            root,
            cells,
            indent: detect_indent(text).unwrap_or(DEFAULT_INDENT),
        })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// A copy of this notebook with a different cell list.
    pub fn with_cells(&self, cells: Vec<Cell>) -> Self {
        Self {
            root: self.root.clone(),
            cells,
            indent: self.indent,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    pub fn to_value(&self) -> Value {
        let mut root = self.root.clone();
        // The `cells` key is still in `root`, so insert keeps its position.
        root.insert(
            Self::CELLS.to_string(),
            Value::Array(self.cells.iter().map(Cell::to_value).collect()),
        );
        Value::Object(root)
    }

    /// Serializes the way Jupyter does: pretty printed, non-ASCII left
    /// unescaped, trailing newline.
    pub fn to_json_string(&self) -> Result<String, NotebookError> {
        let indent = vec![b' '; self.indent];
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        self.to_value()
            .serialize(&mut ser)
            .map_err(NotebookError::Serialize)?;
        buf.push(b'\n');
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl FromStr for Notebook {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

/// Width of the indentation used by a pretty-printed JSON document, taken
/// from its first indented line.
pub fn detect_indent(text: &str) -> Option<usize> {
    text.lines()
        .skip(1)
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .find(|&width| width > 0)
}
