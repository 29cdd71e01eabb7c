//! Property tests shared by the code and markdown parsers.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::markers::Marker;
use crate::parsing::{parse_code_source, parse_narrative_source};

const PLAIN_CODE: &[&str] = &[
    "import numpy as np\n",
    "\n",
    "x = np.arange(10)  # values\n",
    "print(x == 3)",
];

const MARKED_CODE: &[&str] = &[
    "import numpy as np\n",
    "# __NEXT_LINE_ANSWER__\n",
    "x = np.arange(10)\n",
    "def f(y):\n",
    "    # __START_BLOCK_ANSWER__\n",
    "    z = y + 1\n",
    "    return z\n",
    "    # __END_BLOCK_ANSWER__\n",
    "# __NEXT_LINE_ANSWER__\n",
    "a, b = f(1), f(2)\n",
    "print(a, b)",
];

const MARKED_MARKDOWN: &[&str] = &[
    "# Exercise\n",
    "What is the output?\n",
    "__START_OUT_OF_CODE_ANSWER__\n",
    "It prints `2 3`.\n",
    "__END_OUT_OF_CODE_ANSWER__\n",
];

#[test]
fn unmarked_code_is_identity() {
    let parsed = parse_code_source(PLAIN_CODE).unwrap();

    assert_eq!(parsed.solution, PLAIN_CODE);
    assert_eq!(parsed.to_complete, PLAIN_CODE);
    assert_eq!((parsed.blocks, parsed.lines), (0, 0));
}

#[test]
fn unmarked_markdown_is_identity() {
    let input = ["# Title\n", "Some *text* with x = 1.\n"];
    let parsed = parse_narrative_source(&input).unwrap();

    assert_eq!(parsed.solution, input);
    assert_eq!(parsed.to_complete, input);
}

#[rstest]
#[case::plain(PLAIN_CODE)]
#[case::marked(MARKED_CODE)]
fn solution_drops_only_marker_lines(#[case] input: &[&str]) {
    let parsed = parse_code_source(input).unwrap();
    let marker_lines = input
        .iter()
        .filter(|line| Marker::detect(line).is_some())
        .count();

    assert_eq!(parsed.solution.len(), input.len() - marker_lines);
    invariants::check(input, &parsed);
}

#[test]
fn marked_code_exercise() {
    let parsed = parse_code_source(MARKED_CODE).unwrap();

    invariants::check(MARKED_CODE, &parsed);
    assert_eq!((parsed.blocks, parsed.lines), (1, 2));
    insta::assert_snapshot!(parsed.to_complete.concat(), @r"
    import numpy as np
    x = ... # To complete.
    def f(y):
        ... # To complete.
    a, b = ... # To complete.
    print(a, b)
    ");
}

#[test]
fn marked_markdown_exercise() {
    let parsed = parse_narrative_source(MARKED_MARKDOWN).unwrap();

    invariants::check(MARKED_MARKDOWN, &parsed);
    assert_eq!(parsed.blocks, 1);
    assert_eq!(
        parsed.to_complete,
        ["# Exercise\n", "What is the output?\n", "... # To complete.\n"]
    );
}
