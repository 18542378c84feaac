// Copyright 2025 Oxide Computer Company

use clap::Parser;
use openapi_compare::App;
use std::process::ExitCode;

fn main() -> ExitCode {
    App::parse().exec()
}
