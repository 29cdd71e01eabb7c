use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::notebook::{Cell, CellKind, Notebook};
use crate::parsing::{ParseError, ParsedSource, parse_code_source, parse_narrative_source};

/// What to do with a cell that is neither a code nor a markdown cell, or
/// whose `source` is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCellPolicy {
    /// Abort the transformation.
    #[default]
    Strict,
    /// Copy the cell unchanged into both outputs.
    Passthrough,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub unknown_cells: UnknownCellPolicy,
}

/// Totals reported after masking a notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskCounts {
    pub code_blocks: usize,
    pub narrative_blocks: usize,
    pub lines: usize,
    pub passed_through: usize,
}

impl AddAssign for MaskCounts {
    fn add_assign(&mut self, other: Self) {
        self.code_blocks += other.code_blocks;
        self.narrative_blocks += other.narrative_blocks;
        self.lines += other.lines;
        self.passed_through += other.passed_through;
    }
}

impl fmt::Display for MaskCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "substituted {} blocks - {} out of code blocks - and {} lines",
            self.code_blocks, self.narrative_blocks, self.lines
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub solution: Notebook,
    pub to_complete: Notebook,
    pub counts: MaskCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("cell {index} ({kind}): {source}")]
    Cell {
        index: usize,
        kind: CellKind,
        source: ParseError,
    },
    #[error("cell {index}: unrecognized cell ({kind}) - expected a code or markdown cell with a source")]
    UnrecognizedCell { index: usize, kind: CellKind },
}

/// Splits every cell of `notebook` into its solution and exercise versions.
///
/// Cells are independent: each produces two fresh cells, and both output
/// notebooks keep the input's cell order and every non-source field.
pub fn transform(
    notebook: &Notebook,
    options: &TransformOptions,
) -> Result<Transformed, TransformError> {
    let mut solution = Vec::with_capacity(notebook.cells().len());
    let mut to_complete = Vec::with_capacity(notebook.cells().len());
    let mut counts = MaskCounts::default();

    for (index, cell) in notebook.cells().iter().enumerate() {
        let (sol, todo, cell_counts) = transform_cell(index, cell, options)?;
        solution.push(sol);
        to_complete.push(todo);
        counts += cell_counts;
    }

    log::debug!("{} cells processed: {counts:?}", notebook.cells().len());
    Ok(Transformed {
        solution: notebook.with_cells(solution),
        to_complete: notebook.with_cells(to_complete),
        counts,
    })
}

fn transform_cell(
    index: usize,
    cell: &Cell,
    options: &TransformOptions,
) -> Result<(Cell, Cell, MaskCounts), TransformError> {
    let kind = cell.kind();
    let parser: fn(&[String]) -> Result<ParsedSource, ParseError> = match kind {
        CellKind::Code => parse_code_source,
        CellKind::Markdown => parse_narrative_source,
        CellKind::Unrecognized(_) => return unrecognized(index, cell, kind, options),
    };
    let Some(source) = cell.source() else {
        return unrecognized(index, cell, kind, options);
    };

    let parsed = parser(source.lines()).map_err(|source| TransformError::Cell {
        index,
        kind: kind.clone(),
        source,
    })?;
    log::debug!(
        "cell {index} ({kind}): {} blocks, {} lines masked",
        parsed.blocks,
        parsed.lines
    );

    let counts = match kind {
        CellKind::Code => MaskCounts {
            code_blocks: parsed.blocks,
            lines: parsed.lines,
            ..MaskCounts::default()
        },
        _ => MaskCounts {
            narrative_blocks: parsed.blocks,
            ..MaskCounts::default()
        },
    };
    let solution = cell.with_source(&source.with_lines(parsed.solution));
    let to_complete = cell.with_source(&source.with_lines(parsed.to_complete));
    Ok((solution, to_complete, counts))
}

fn unrecognized(
    index: usize,
    cell: &Cell,
    kind: CellKind,
    options: &TransformOptions,
) -> Result<(Cell, Cell, MaskCounts), TransformError> {
    match options.unknown_cells {
        UnknownCellPolicy::Strict => Err(TransformError::UnrecognizedCell { index, kind }),
        UnknownCellPolicy::Passthrough => {
            log::debug!("cell {index} ({kind}): passed through unchanged");
            let counts = MaskCounts {
                passed_through: 1,
                ..MaskCounts::default()
            };
            Ok((cell.clone(), cell.clone(), counts))
        }
    }
}
