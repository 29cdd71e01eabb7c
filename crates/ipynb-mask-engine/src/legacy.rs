//! Masking applied to the raw text of an `.ipynb` file.
//!
//! This mode never parses JSON. It walks the serialized notebook line by
//! line, which only works for notebooks written one source line per JSON
//! line (the nbformat layout). Code markers must sit in a `#` comment inside
//! a JSON string; replacement lines are written as JSON string items.

use regex::Regex;
use std::sync::OnceLock;

use crate::dispatch::MaskCounts;
use crate::markers::{Marker, PLACEHOLDER};
use crate::parsing::ParseError;

struct Patterns {
    start_block: Regex,
    end_block: Regex,
    next_line: Regex,
    start_out_of_code: Regex,
    end_out_of_code: Regex,
    before_equal: Regex,
    quote_indent: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("invalid legacy marker regex");
        Patterns {
            start_block: compile(r#"".*# *__START_BLOCK_ANSWER__.*""#),
            end_block: compile(r#"".*# *__END_BLOCK_ANSWER__.*""#),
            next_line: compile(r#"".*# *__NEXT_LINE_ANSWER__.*""#),
            start_out_of_code: compile("__START_OUT_OF_CODE_ANSWER__"),
            end_out_of_code: compile("__END_OUT_OF_CODE_ANSWER__"),
            before_equal: compile(r"^.* = "),
            quote_indent: compile(r#"" *"#),
        }
    })
}

impl Patterns {
    fn detect(&self, line: &str) -> Option<Marker> {
        [
            (&self.start_block, Marker::StartBlock),
            (&self.end_block, Marker::EndBlock),
            (&self.start_out_of_code, Marker::StartOutOfCode),
            (&self.end_out_of_code, Marker::EndOutOfCode),
            (&self.next_line, Marker::NextLine),
        ]
        .into_iter()
        .find(|(re, _)| re.is_match(line))
        .map(|(_, marker)| marker)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyState {
    Normal,
    InBlock { opened_at: usize },
    InOutOfCode { opened_at: usize },
    PendingNextLine { marked_at: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyOutput {
    pub solution: String,
    pub to_complete: String,
    pub counts: MaskCounts,
}

/// Masks a serialized notebook without parsing it.
///
/// Out-of-code regions are removed from the exercise without a placeholder.
pub fn mask_raw_text(text: &str) -> Result<LegacyOutput, ParseError> {
    let patterns = patterns();
    let mut out = LegacyOutput::default();
    let mut state = LegacyState::Normal;

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        log::trace!("raw line {line_no} ({state:?}): {line:?}");

        state = match (state, patterns.detect(line)) {
            (LegacyState::Normal, Some(Marker::StartBlock)) => {
                let indent = patterns
                    .quote_indent
                    .find(line)
                    .map_or("\"", |m| m.as_str());
                out.to_complete
                    .push_str(&format!("    {indent}{PLACEHOLDER}\\n\",\n"));
                LegacyState::InBlock { opened_at: line_no }
            }
            (LegacyState::Normal, Some(Marker::StartOutOfCode)) => {
                LegacyState::InOutOfCode { opened_at: line_no }
            }
            (LegacyState::PendingNextLine { marked_at }, Some(marker))
                if matches!(marker, Marker::StartBlock | Marker::StartOutOfCode) =>
            {
                return Err(ParseError::StartWhilePending {
                    marker,
                    line: line_no,
                    pending: marked_at,
                });
            }
            (_, Some(marker @ (Marker::StartBlock | Marker::StartOutOfCode))) => {
                return Err(ParseError::NestedStart {
                    marker,
                    line: line_no,
                });
            }
            (LegacyState::InBlock { .. }, Some(Marker::EndBlock)) => {
                out.counts.code_blocks += 1;
                LegacyState::Normal
            }
            (LegacyState::InOutOfCode { .. }, Some(Marker::EndOutOfCode)) => {
                out.counts.narrative_blocks += 1;
                LegacyState::Normal
            }
            (_, Some(marker @ (Marker::EndBlock | Marker::EndOutOfCode))) => {
                return Err(ParseError::EndWithoutStart {
                    marker,
                    line: line_no,
                });
            }
            (LegacyState::InBlock { .. } | LegacyState::InOutOfCode { .. }, Some(marker)) => {
                return Err(ParseError::NextLineInBlock {
                    marker,
                    line: line_no,
                });
            }
            (_, Some(_)) => LegacyState::PendingNextLine { marked_at: line_no },
            (LegacyState::PendingNextLine { .. }, None) => {
                let kept = patterns.before_equal.find(line).ok_or_else(|| {
                    ParseError::OneLineFormat {
                        line: line_no,
                        text: line.to_string(),
                    }
                })?;
                let ending = if line.ends_with("\",\n") {
                    "\\n\","
                } else {
                    "\""
                };
                out.to_complete
                    .push_str(&format!("{}{PLACEHOLDER}{ending}\n", kept.as_str()));
                out.solution.push_str(line);
                out.counts.lines += 1;
                LegacyState::Normal
            }
            (LegacyState::InBlock { .. } | LegacyState::InOutOfCode { .. }, None) => {
                out.solution.push_str(line);
                state
            }
            (LegacyState::Normal, None) => {
                out.to_complete.push_str(line);
                out.solution.push_str(line);
                state
            }
        };
    }

    match state {
        LegacyState::InBlock { opened_at } => Err(ParseError::Unterminated {
            marker: Marker::StartBlock,
            line: opened_at,
        }),
        LegacyState::InOutOfCode { opened_at } => Err(ParseError::Unterminated {
            marker: Marker::StartOutOfCode,
            line: opened_at,
        }),
        LegacyState::Normal | LegacyState::PendingNextLine { .. } => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ErrorKind;
    use pretty_assertions::assert_eq;

    const RAW: &str = r##"  {
   "cell_type": "code",
   "source": [
    "before\n",
    "# __START_BLOCK_ANSWER__\n",
    "secret()\n",
    "# __END_BLOCK_ANSWER__\n",
    "# __NEXT_LINE_ANSWER__\n",
    "x, y = my_function(a, b)\n",
    "# __NEXT_LINE_ANSWER__\n",
    "z = 3"
   ]
  },
"##;

    #[test]
    fn masks_blocks_and_next_lines_in_raw_json() {
        let out = mask_raw_text(RAW).unwrap();

        assert_eq!(
            out.to_complete,
            r#"  {
   "cell_type": "code",
   "source": [
    "before\n",
    "... # To complete.\n",
    "x, y = ... # To complete.\n",
    "z = ... # To complete."
   ]
  },
"#
        );
        assert_eq!(
            out.solution,
            r#"  {
   "cell_type": "code",
   "source": [
    "before\n",
    "secret()\n",
    "x, y = my_function(a, b)\n",
    "z = 3"
   ]
  },
"#
        );
        assert_eq!(out.counts.code_blocks, 1);
        assert_eq!(out.counts.lines, 2);
    }

    #[test]
    fn code_markers_outside_comments_are_ignored() {
        let text = "    \"__START_BLOCK_ANSWER__\\n\",\n";

        let out = mask_raw_text(text).unwrap();

        assert_eq!(out.to_complete, text);
        assert_eq!(out.solution, text);
    }

    #[test]
    fn out_of_code_region_is_dropped_from_exercise() {
        let text = concat!(
            "    \"Question\\n\",\n",
            "    \"__START_OUT_OF_CODE_ANSWER__\\n\",\n",
            "    \"Answer\\n\",\n",
            "    \"__END_OUT_OF_CODE_ANSWER__\\n\",\n",
        );

        let out = mask_raw_text(text).unwrap();

        assert_eq!(out.to_complete, "    \"Question\\n\",\n");
        assert_eq!(
            out.solution,
            "    \"Question\\n\",\n    \"Answer\\n\",\n"
        );
        assert_eq!(out.counts.narrative_blocks, 1);
    }

    #[test]
    fn next_line_without_assignment_fails() {
        let text = "    \"# __NEXT_LINE_ANSWER__\\n\",\n    \"print(x)\\n\",\n";

        let err = mask_raw_text(text).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("print(x)"));
    }

    #[test]
    fn unterminated_block_fails() {
        let text = "    \"# __START_BLOCK_ANSWER__\\n\",\n    \"x\\n\",\n";

        let err = mask_raw_text(text).unwrap_err();

        assert!(matches!(err, ParseError::Unterminated { line: 1, .. }));
    }

    #[test]
    fn end_without_start_fails() {
        let err = mask_raw_text("    \"# __END_BLOCK_ANSWER__\\n\",\n").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::State);
    }
}
