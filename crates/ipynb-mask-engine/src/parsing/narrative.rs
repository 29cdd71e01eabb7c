use crate::markers::{Marker, PLACEHOLDER, split_line_ending};

use super::{ParseError, ParsedSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NarrativeState {
    Outside,
    Inside { opened_at: usize },
}

/// Incremental parser for the source lines of one markdown cell.
///
/// Only the out-of-code marker pair is recognized. Lines of a region go to
/// the solution verbatim; the exercise gets a single placeholder line.
pub struct NarrativeSourceParser {
    state: NarrativeState,
    line_no: usize,
    out: ParsedSource,
}

impl NarrativeSourceParser {
    pub fn new() -> Self {
        Self {
            state: NarrativeState::Outside,
            line_no: 0,
            out: ParsedSource::default(),
        }
    }

    pub fn push(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        let line_no = self.line_no;
        let marker = Marker::detect(line).filter(|m| !m.is_code_marker());
        log::trace!("markdown line {line_no} ({:?}): {line:?}", self.state);

        match (self.state, marker) {
            (NarrativeState::Outside, Some(Marker::StartOutOfCode)) => {
                let (_, eol) = split_line_ending(line);
                self.out.to_complete.push(format!("{PLACEHOLDER}{eol}"));
                self.state = NarrativeState::Inside { opened_at: line_no };
            }
            (NarrativeState::Inside { .. }, Some(marker @ Marker::StartOutOfCode)) => {
                return Err(ParseError::NestedStart {
                    marker,
                    line: line_no,
                });
            }
            (NarrativeState::Inside { .. }, Some(Marker::EndOutOfCode)) => {
                self.state = NarrativeState::Outside;
                self.out.blocks += 1;
            }
            (NarrativeState::Outside, Some(marker)) => {
                return Err(ParseError::EndWithoutStart {
                    marker,
                    line: line_no,
                });
            }
            (NarrativeState::Inside { .. }, _) => self.out.solution.push(line.to_string()),
            (NarrativeState::Outside, None) => self.out.push_both(line),
        }
        Ok(())
    }

    pub fn finish(self) -> Result<ParsedSource, ParseError> {
        match self.state {
            NarrativeState::Inside { opened_at } => Err(ParseError::Unterminated {
                marker: Marker::StartOutOfCode,
                line: opened_at,
            }),
            NarrativeState::Outside => Ok(self.out),
        }
    }
}

impl Default for NarrativeSourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Masks the lines of one markdown cell.
pub fn parse_narrative_source<S: AsRef<str>>(lines: &[S]) -> Result<ParsedSource, ParseError> {
    let mut parser = NarrativeSourceParser::new();
    for line in lines {
        parser.push(line.as_ref())?;
    }
    parser.finish()
}
