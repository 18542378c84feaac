// Copyright 2025 Oxide Computer Company

use crate::{
    cmd::compare::compare_impl, config::ConfigCompare, output::OutputOpts,
    registry::ComparatorRegistry,
};
use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use slog::debug;
use std::process::ExitCode;

/// Check whether two OpenAPI documents describe the same API.
///
/// Paths are paired up even when the documents mount the API under different
/// prefixes (e.g. `/zaken` and `/api/v2/zaken`). The differences found are
/// printed on stdout, one per line.
#[derive(Debug, Parser)]
pub struct App {
    #[clap(flatten)]
    output_opts: OutputOpts,

    /// Read logging and comparison settings from this TOML file.
    #[clap(long, env("OPENAPI_COMPARE_CONFIG"), value_name("FILE"))]
    config: Option<Utf8PathBuf>,

    /// Exit with status 0 even if differences were found.
    ///
    /// By default, finding differences exits with status 4.
    #[clap(long)]
    exit_zero: bool,

    /// First OpenAPI document (local path or file:// URI).
    #[clap(value_name("SPEC1"))]
    spec1: String,

    /// Second OpenAPI document (local path or file:// URI).
    #[clap(value_name("SPEC2"))]
    spec2: String,
}

impl App {
    /// Run the comparison with the built-in comparators
    pub fn exec(self) -> ExitCode {
        self.exec_with_registry(&ComparatorRegistry::standard())
    }

    /// Run the comparison with the comparators in `registry`
    pub fn exec_with_registry(self, registry: &ComparatorRegistry) -> ExitCode {
        match self.exec_impl(registry) {
            Ok(exit_code) => exit_code,
            Err(error) => {
                eprintln!("failure: {:#}", error);
                ExitCode::FAILURE
            }
        }
    }

    fn exec_impl(
        &self,
        registry: &ComparatorRegistry,
    ) -> anyhow::Result<ExitCode> {
        let config = match &self.config {
            Some(path) => ConfigCompare::from_file(path)?,
            None => ConfigCompare::default(),
        };
        let log = config
            .log
            .to_logger("openapi-compare")
            .context("failed to create logger")?;
        debug!(log, "starting"; "config" => ?config);

        let exit_zero = self.exit_zero || config.compare.exit_zero;
        let result = compare_impl(
            &log,
            registry,
            &self.spec1,
            &self.spec2,
            &self.output_opts,
        )?;
        Ok(result.to_exit_code(exit_zero))
    }
}

// This code is not 0 or 1 (general anyhow errors) and indicates that the
// documents differ.
pub const DIFFERENCES_EXIT_CODE: u8 = 4;
