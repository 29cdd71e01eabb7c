use std::fmt;

/// A sentinel an author places in a cell to mark answer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Opens a multi-line answer region in a code cell.
    StartBlock,
    /// Closes a multi-line answer region in a code cell.
    EndBlock,
    /// The next line's right-hand side is the answer.
    NextLine,
    /// Opens an answer region in a markdown cell.
    StartOutOfCode,
    /// Closes an answer region in a markdown cell.
    EndOutOfCode,
}

/// Sentinel text for each marker. Sentinels never contain one another, so a
/// line matches at most one entry regardless of table order.
pub const MARKERS: [(&str, Marker); 5] = [
    ("__START_BLOCK_ANSWER__", Marker::StartBlock),
    ("__END_BLOCK_ANSWER__", Marker::EndBlock),
    ("__NEXT_LINE_ANSWER__", Marker::NextLine),
    ("__START_OUT_OF_CODE_ANSWER__", Marker::StartOutOfCode),
    ("__END_OUT_OF_CODE_ANSWER__", Marker::EndOutOfCode),
];

/// Text written in place of hidden answer content.
pub const PLACEHOLDER: &str = "... # To complete.";

impl Marker {
    /// Returns the marker whose sentinel occurs anywhere in `line`.
    pub fn detect(line: &str) -> Option<Marker> {
        MARKERS
            .iter()
            .find(|(sentinel, _)| line.contains(sentinel))
            .map(|(_, marker)| *marker)
    }

    pub fn sentinel(self) -> &'static str {
        MARKERS
            .iter()
            .find(|(_, marker)| *marker == self)
            .map(|(sentinel, _)| *sentinel)
            .unwrap_or_default()
    }

    /// Whether this marker belongs to code cells (as opposed to markdown cells).
    pub fn is_code_marker(self) -> bool {
        matches!(
            self,
            Marker::StartBlock | Marker::EndBlock | Marker::NextLine
        )
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentinel())
    }
}

/// Splits a line into its content and its terminator (`"\n"`, `"\r\n"` or `""`).
pub fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Leading spaces and tabs of a line.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("__START_BLOCK_ANSWER__\n", Some(Marker::StartBlock))]
    #[case("    # __END_BLOCK_ANSWER__\n", Some(Marker::EndBlock))]
    #[case("# __NEXT_LINE_ANSWER__", Some(Marker::NextLine))]
    #[case("<!-- __START_OUT_OF_CODE_ANSWER__ -->\n", Some(Marker::StartOutOfCode))]
    #[case("__END_OUT_OF_CODE_ANSWER__\n", Some(Marker::EndOutOfCode))]
    #[case("x = 1\n", None)]
    #[case("__start_block_answer__\n", None)]
    #[case("__START_BLOCK__\n", None)]
    fn detect_marker(#[case] line: &str, #[case] expected: Option<Marker>) {
        assert_eq!(Marker::detect(line), expected);
    }

    #[test]
    fn sentinel_matches_table() {
        for (sentinel, marker) in MARKERS {
            assert_eq!(marker.sentinel(), sentinel);
            assert_eq!(marker.to_string(), sentinel);
        }
    }

    #[test]
    fn code_markers() {
        assert!(Marker::StartBlock.is_code_marker());
        assert!(Marker::NextLine.is_code_marker());
        assert!(!Marker::StartOutOfCode.is_code_marker());
        assert!(!Marker::EndOutOfCode.is_code_marker());
    }

    #[rstest]
    #[case("abc\n", ("abc", "\n"))]
    #[case("abc\r\n", ("abc", "\r\n"))]
    #[case("abc", ("abc", ""))]
    #[case("", ("", ""))]
    fn line_endings(#[case] line: &str, #[case] expected: (&str, &str)) {
        assert_eq!(split_line_ending(line), expected);
    }

    #[test]
    fn indentation() {
        assert_eq!(leading_whitespace("    x = 1"), "    ");
        assert_eq!(leading_whitespace("\t\tx"), "\t\t");
        assert_eq!(leading_whitespace("x"), "");
        assert_eq!(leading_whitespace("   "), "   ");
    }
}
