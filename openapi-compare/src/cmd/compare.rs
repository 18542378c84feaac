// Copyright 2025 Oxide Computer Company

use crate::{
    compare::{compare_specs, load_pair},
    output::{
        display_comparing, display_comparison, display_load_problems,
        headers::*, CompareResult, OutputOpts, Styles,
    },
    registry::ComparatorRegistry,
    DIFFERENCES_EXIT_CODE,
};
use anyhow::Context;
use slog::Logger;
use std::process::ExitCode;

impl CompareResult {
    /// With `exit_zero`, differences are reported but don't fail the process.
    pub fn to_exit_code(self, exit_zero: bool) -> ExitCode {
        match self {
            CompareResult::Equivalent => ExitCode::SUCCESS,
            CompareResult::Differences if exit_zero => ExitCode::SUCCESS,
            CompareResult::Differences => DIFFERENCES_EXIT_CODE.into(),
        }
    }
}

pub(crate) fn compare_impl(
    log: &Logger,
    registry: &ComparatorRegistry,
    source1: &str,
    source2: &str,
    output: &OutputOpts,
) -> anyhow::Result<CompareResult> {
    let mut styles = Styles::default();
    if output.use_color(supports_color::Stream::Stderr) {
        styles.colorize();
    }

    let pair = load_pair(log, source1, source2)?;
    display_load_problems(&pair.errors, &styles)?;
    display_comparing(&pair.spec1, &pair.spec2, &styles);
    eprintln!("{:>HEADER_WIDTH$}", SEPARATOR);

    let problems = compare_specs(
        log,
        registry,
        pair.spec1.openapi(),
        pair.spec2.openapi(),
    )
    .context("comparing specifications")?;
    Ok(display_comparison(&problems, &styles))
}
