use serde_json::{Map, Value};
use std::fmt;

/// Kind of a notebook cell, read from its `cell_type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKind {
    Code,
    Markdown,
    /// Any other `cell_type` (e.g. `raw`); empty when the field is missing.
    Unrecognized(String),
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code => f.write_str("code"),
            Self::Markdown => f.write_str("markdown"),
            Self::Unrecognized(kind) if kind.is_empty() => f.write_str("<missing cell_type>"),
            Self::Unrecognized(kind) => f.write_str(kind),
        }
    }
}

impl From<&str> for CellKind {
    fn from(cell_type: &str) -> Self {
        match cell_type {
            "code" => Self::Code,
            "markdown" => Self::Markdown,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// How a cell stored its `source` on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRepr {
    /// A list of strings, one per line (what nbformat writes).
    Lines,
    /// A single string holding the whole source.
    Joined,
}

/// The source lines of a cell, each keeping its own line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    lines: Vec<String>,
    repr: SourceRepr,
}

impl Source {
    pub fn new(lines: Vec<String>, repr: SourceRepr) -> Self {
        Self { lines, repr }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::new(
                text.split_inclusive('\n').map(str::to_string).collect(),
                SourceRepr::Joined,
            )),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(|lines| Self::new(lines, SourceRepr::Lines)),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self.repr {
            SourceRepr::Lines => Value::Array(
                self.lines
                    .iter()
                    .map(|line| Value::String(line.clone()))
                    .collect(),
            ),
            SourceRepr::Joined => Value::String(self.lines.concat()),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn repr(&self) -> SourceRepr {
        self.repr
    }

    /// Same on-disk representation, different lines.
    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        Self::new(lines, self.repr)
    }
}

/// One notebook cell.
///
/// Every field other than `source` is opaque: it is kept as parsed, in its
/// original key order, and copied verbatim by [`Cell::with_source`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    fields: Map<String, Value>,
}

impl Cell {
    pub const CELL_TYPE: &'static str = "cell_type";
    pub const SOURCE: &'static str = "source";

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn kind(&self) -> CellKind {
        self.fields
            .get(Self::CELL_TYPE)
            .and_then(Value::as_str)
            .map_or_else(|| CellKind::Unrecognized(String::new()), CellKind::from)
    }

    /// The cell source, or `None` when it is missing or not made of strings.
    pub fn source(&self) -> Option<Source> {
        self.fields.get(Self::SOURCE).and_then(Source::from_value)
    }

    /// Builds a new cell with the same fields and `source` replaced.
    pub fn with_source(&self, source: &Source) -> Cell {
        let mut fields = self.fields.clone();
        fields.insert(Self::SOURCE.to_string(), source.to_value());
        Cell { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
