// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_notebook(cells: usize) -> String {
    let code = r##"{"cell_type": "code", "execution_count": null, "metadata": {}, "outputs": [], "source": ["import numpy as np\n", "# __NEXT_LINE_ANSWER__\n", "x = np.arange(10)\n", "def f(y):\n", "    # __START_BLOCK_ANSWER__\n", "    return y + 1\n", "    # __END_BLOCK_ANSWER__\n"]}"##;
    let markdown = r###"{"cell_type": "markdown", "metadata": {}, "source": ["## Question\n", "__START_OUT_OF_CODE_ANSWER__\n", "Because.\n", "__END_OUT_OF_CODE_ANSWER__\n"]}"###;

    let cells: Vec<&str> = (0..cells)
        .map(|i| if i % 2 == 0 { code } else { markdown })
        .collect();
    format!(
        "{{\"cells\": [{}], \"metadata\": {{}}, \"nbformat\": 4, \"nbformat_minor\": 5}}",
        cells.join(", ")
    )
}
