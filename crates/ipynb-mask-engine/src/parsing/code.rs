use crate::markers::{Marker, PLACEHOLDER, leading_whitespace, split_line_ending};

use super::{ParseError, ParsedSource};

const ASSIGNMENT: &str = " = ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeState {
    Normal,
    InBlock { opened_at: usize },
    PendingNextLine { marked_at: usize },
}

/// Incremental parser for the source lines of one code cell.
///
/// Feed lines in order with [`push`](Self::push), then call
/// [`finish`](Self::finish) to check that no block is left open.
pub struct CodeSourceParser {
    state: CodeState,
    line_no: usize,
    out: ParsedSource,
}

impl CodeSourceParser {
    pub fn new() -> Self {
        Self {
            state: CodeState::Normal,
            line_no: 0,
            out: ParsedSource::default(),
        }
    }

    pub fn push(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        let line_no = self.line_no;
        let marker = Marker::detect(line).filter(|m| m.is_code_marker());
        log::trace!("code line {line_no} ({:?}): {line:?}", self.state);

        match (self.state, marker) {
            (CodeState::Normal, Some(Marker::StartBlock)) => {
                let (_, eol) = split_line_ending(line);
                let indent = leading_whitespace(line);
                self.out
                    .to_complete
                    .push(format!("{indent}{PLACEHOLDER}{eol}"));
                self.state = CodeState::InBlock { opened_at: line_no };
            }
            (CodeState::InBlock { .. }, Some(marker @ Marker::StartBlock)) => {
                return Err(ParseError::NestedStart {
                    marker,
                    line: line_no,
                });
            }
            (CodeState::PendingNextLine { marked_at }, Some(marker @ Marker::StartBlock)) => {
                return Err(ParseError::StartWhilePending {
                    marker,
                    line: line_no,
                    pending: marked_at,
                });
            }
            (CodeState::InBlock { .. }, Some(Marker::EndBlock)) => {
                self.state = CodeState::Normal;
                self.out.blocks += 1;
            }
            (_, Some(marker @ Marker::EndBlock)) => {
                return Err(ParseError::EndWithoutStart {
                    marker,
                    line: line_no,
                });
            }
            (CodeState::InBlock { .. }, Some(marker @ Marker::NextLine)) => {
                return Err(ParseError::NextLineInBlock {
                    marker,
                    line: line_no,
                });
            }
            (_, Some(Marker::NextLine)) => {
                // Repeated markers collapse onto the same following line.
                self.state = CodeState::PendingNextLine { marked_at: line_no };
            }
            (CodeState::InBlock { .. }, _) => {
                self.out.solution.push(line.to_string());
            }
            (CodeState::PendingNextLine { .. }, _) => {
                let masked = mask_assignment(line, line_no)?;
                self.out.to_complete.push(masked);
                self.out.solution.push(line.to_string());
                self.out.lines += 1;
                self.state = CodeState::Normal;
            }
            (CodeState::Normal, _) => self.out.push_both(line),
        }
        Ok(())
    }

    pub fn finish(self) -> Result<ParsedSource, ParseError> {
        match self.state {
            CodeState::InBlock { opened_at } => Err(ParseError::Unterminated {
                marker: Marker::StartBlock,
                line: opened_at,
            }),
            // A trailing next-line marker has nothing left to hide.
            CodeState::PendingNextLine { .. } | CodeState::Normal => Ok(self.out),
        }
    }
}

impl Default for CodeSourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Masks the lines of one code cell.
pub fn parse_code_source<S: AsRef<str>>(lines: &[S]) -> Result<ParsedSource, ParseError> {
    let mut parser = CodeSourceParser::new();
    for line in lines {
        parser.push(line.as_ref())?;
    }
    parser.finish()
}

/// Keeps everything up to and including the single `" = "` of `line` and
/// replaces the right-hand side with the placeholder.
fn mask_assignment(line: &str, line_no: usize) -> Result<String, ParseError> {
    let (body, eol) = split_line_ending(line);
    let mut found = body.match_indices(ASSIGNMENT);
    match (found.next(), found.next()) {
        (Some((at, _)), None) => {
            let lhs = &body[..at + ASSIGNMENT.len()];
            Ok(format!("{lhs}{PLACEHOLDER}{eol}"))
        }
        _ => Err(ParseError::OneLineFormat {
            line: line_no,
            text: line.to_string(),
        }),
    }
}
