//! Generate the to-complete and the solution version of a notebook.
//!
//! The source notebook marks answers with sentinels:
//!
//! ```text
//! code_before
//! # __START_BLOCK_ANSWER__
//! lot of stuff
//! # __END_BLOCK_ANSWER__
//! # __NEXT_LINE_ANSWER__
//! x, y = my_function(a, b, c)
//! ```
//!
//! becomes, in the to-complete notebook:
//!
//! ```text
//! code_before
//! ... # To complete.
//! x, y = ... # To complete.
//! ```
//!
//! # Usage
//!
//! ```bash
//! ipynb-mask --input-file lesson.ipynb
//! ipynb-mask --input-file lesson.ipynb --to-complete-file out/lesson.ipynb --solution-file sol/lesson.ipynb
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ipynb_mask_config::Config;
use ipynb_mask_engine::io::{self, OutputPaths};
use ipynb_mask_engine::{
    MaskCounts, Notebook, TransformOptions, UnknownCellPolicy, mask_raw_text, transform,
};
use std::path::PathBuf;

/// Mask answers in a notebook, writing a to-complete and a solution copy
#[derive(Parser, Debug)]
#[command(name = "ipynb-mask")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the input notebook (source)
    #[arg(long)]
    input_file: PathBuf,

    /// Path to the output notebook (to complete)
    #[arg(long)]
    to_complete_file: Option<PathBuf>,

    /// Path to the output notebook (solution)
    #[arg(long)]
    solution_file: Option<PathBuf>,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    /// Mask the raw notebook text line by line instead of parsing cells
    #[arg(long)]
    legacy: bool,

    /// Copy cells that are neither code nor markdown unchanged
    #[arg(long)]
    passthrough_unknown: bool,

    /// Configuration file (defaults to ~/.config/ipynb-mask/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// The two rendered notebooks, ready to be written.
#[derive(Debug)]
struct Rendered {
    to_complete: String,
    solution: String,
    counts: MaskCounts,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logger(args.debug, std::env::var("RUST_LOG").ok().as_deref()).init();

    run(&args)
}

/// Info by default, trace with `--debug`; `RUST_LOG` directives override both.
fn logger(debug: bool, env_filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if debug {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    });
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }
    builder
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let outputs = output_paths(args, &config)?;

    log::info!(
        "masking file {} - writing output (to complete) into {} - writing output (solution) into {}",
        args.input_file.display(),
        outputs.to_complete.display(),
        outputs.solution.display()
    );

    let text = io::read_notebook(&args.input_file)
        .with_context(|| format!("Failed to read {}", args.input_file.display()))?;

    let rendered = if args.legacy {
        render_legacy(&text)?
    } else {
        let options = TransformOptions {
            unknown_cells: if args.passthrough_unknown {
                UnknownCellPolicy::Passthrough
            } else {
                config.unknown_cells
            },
        };
        render(&text, &options, config.indent)?
    };

    // Outputs are written only once masking succeeded, and both or neither.
    io::write_output(&outputs.to_complete, &rendered.to_complete)
        .with_context(|| format!("Failed to write {}", outputs.to_complete.display()))?;
    if let Err(err) = io::write_output(&outputs.solution, &rendered.solution) {
        if let Err(cleanup) = std::fs::remove_file(&outputs.to_complete) {
            log::warn!(
                "could not remove {}: {cleanup}",
                outputs.to_complete.display()
            );
        }
        return Err(err)
            .with_context(|| format!("Failed to write {}", outputs.solution.display()));
    }

    log::info!("{}", rendered.counts);
    if rendered.counts.passed_through > 0 {
        log::warn!(
            "{} unrecognized cells copied unchanged",
            rendered.counts.passed_through
        );
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let loaded = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    match loaded {
        Some(config) => {
            log::debug!("Loaded config: {config:?}");
            Ok(config)
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn output_paths(args: &Args, config: &Config) -> Result<OutputPaths> {
    let defaults = io::default_output_paths(&args.input_file, config.output_dir.as_deref())?;
    Ok(OutputPaths {
        to_complete: args
            .to_complete_file
            .clone()
            .unwrap_or(defaults.to_complete),
        solution: args.solution_file.clone().unwrap_or(defaults.solution),
    })
}

fn render(text: &str, options: &TransformOptions, indent: Option<usize>) -> Result<Rendered> {
    let mut notebook = Notebook::from_json_str(text)?;
    if let Some(indent) = indent {
        notebook.set_indent(indent);
    }
    let out = transform(&notebook, options).context("Failed to mask notebook")?;
    Ok(Rendered {
        to_complete: out.to_complete.to_json_string()?,
        solution: out.solution.to_json_string()?,
        counts: out.counts,
    })
}

fn render_legacy(text: &str) -> Result<Rendered> {
    let out = mask_raw_text(text).context("Failed to mask notebook text")?;
    Ok(Rendered {
        to_complete: out.to_complete,
        solution: out.solution,
        counts: out.counts,
    })
}
