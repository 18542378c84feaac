// Copyright 2025 Oxide Computer Company

use crate::compare::render_report;
use crate::load::{ErrorAccumulator, LoadedSpec};
use crate::problems::ProblemReport;
use anyhow::bail;
use clap::{Args, ColorChoice};
use headers::*;
use owo_colors::{OwoColorize, Style};

#[derive(Debug, Args)]
#[clap(next_help_heading = "Global options")]
pub struct OutputOpts {
    /// Color output
    #[clap(long, value_enum, global = true, default_value_t)]
    pub(crate) color: ColorChoice,
}

impl OutputOpts {
    /// Returns true if color should be used for the stream.
    pub(crate) fn use_color(&self, stream: supports_color::Stream) -> bool {
        match self.color {
            ColorChoice::Auto => supports_color::on_cached(stream).is_some(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Styles {
    pub(crate) bold: Style,
    pub(crate) success_header: Style,
    pub(crate) failure_header: Style,
    pub(crate) warning_header: Style,
    pub(crate) filename: Style,
}

impl Styles {
    pub(crate) fn colorize(&mut self) {
        self.bold = Style::new().bold();
        self.success_header = Style::new().green().bold();
        self.failure_header = Style::new().red().bold();
        self.warning_header = Style::new().yellow().bold();
        self.filename = Style::new().cyan();
    }
}

/// Print warnings and errors found while loading, failing if there were any
/// errors
pub fn display_load_problems(
    error_accumulator: &ErrorAccumulator,
    styles: &Styles,
) -> anyhow::Result<()> {
    let more_indent = " ".repeat(HEADER_WIDTH + 1);
    for w in error_accumulator.iter_warnings() {
        let initial_indent = format!(
            "{:>HEADER_WIDTH$} ",
            WARNING.style(styles.warning_header)
        );
        eprintln!(
            "{}",
            textwrap::fill(
                &format!("{:#}", w),
                textwrap::Options::with_termwidth()
                    .initial_indent(&initial_indent)
                    .subsequent_indent(&more_indent)
            )
        );
    }

    let mut nerrors = 0;
    for e in error_accumulator.iter_errors() {
        nerrors += 1;
        eprintln!(
            "{:>HEADER_WIDTH$} {:#}",
            FAILURE.style(styles.failure_header),
            e
        );
    }

    if nerrors > 0 {
        bail!(
            "bailing out after {} {} above",
            nerrors,
            plural::errors(nerrors)
        );
    }

    Ok(())
}

/// Announce the documents being compared
pub(crate) fn display_comparing(
    spec1: &LoadedSpec,
    spec2: &LoadedSpec,
    styles: &Styles,
) {
    for (n, spec) in [(1, spec1), (2, spec2)] {
        eprintln!(
            "{:>HEADER_WIDTH$} specification {}: {} ({}, v{})",
            COMPARING.style(styles.success_header),
            n,
            spec.path.style(styles.filename),
            spec.openapi().info.title,
            spec.openapi().info.version,
        );
    }
}

/// Print the report on stdout and a summary on stderr
pub fn display_comparison(
    problems: &[ProblemReport],
    styles: &Styles,
) -> CompareResult {
    print!("{}", render_report(problems));

    eprintln!("{:>HEADER_WIDTH$}", SEPARATOR);
    if problems.is_empty() {
        eprintln!(
            "{:>HEADER_WIDTH$} no differences found",
            EQUIVALENT.style(styles.success_header),
        );
        CompareResult::Equivalent
    } else {
        let count = problems.len();
        eprintln!(
            "{:>HEADER_WIDTH$} {} {} found",
            DIFFERENT.style(styles.failure_header),
            count.style(styles.bold),
            plural::problems(count),
        );
        CompareResult::Differences
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareResult {
    Equivalent,
    Differences,
}

/// Output headers.
pub(crate) mod headers {
    // Same width as Cargo's output.
    pub(crate) const HEADER_WIDTH: usize = 12;

    pub(crate) static SEPARATOR: &str = "-------";

    pub(crate) static COMPARING: &str = "Comparing";

    pub(crate) static EQUIVALENT: &str = "Equivalent";
    pub(crate) static DIFFERENT: &str = "Different";

    pub(crate) static FAILURE: &str = "Failure";
    pub(crate) static WARNING: &str = "Warning";
}

pub(crate) mod plural {
    pub(crate) fn errors(count: usize) -> &'static str {
        if count == 1 {
            "error"
        } else {
            "errors"
        }
    }

    pub(crate) fn problems(count: usize) -> &'static str {
        if count == 1 {
            "problem"
        } else {
            "problems"
        }
    }
}
