// Copyright 2025 Oxide Computer Company

//! Functional comparison of OpenAPI documents.
//!
//! Two documents are compared by a [`ComparatorRegistry`]: a set of
//! comparators keyed by the kind of entity (specification, path, operation)
//! they look at.  Comparators at one level hand pairs of sub-entities back to
//! the registry, so comparing two specifications walks down into the paths
//! the documents have in common and then into their operations.  Paths are
//! paired up with a [`PathMatcher`], which tolerates the same API being
//! mounted under different prefixes.
//!
//! The `openapi-compare` binary wraps this in a command-line tool; see
//! [`App`].

mod cmd;
pub mod compare;
pub mod comparators;
pub mod config;
pub mod entity;
pub mod load;
pub mod logging;
mod output;
pub mod path_matcher;
pub mod problems;
pub mod registry;
pub mod test_util;

pub use cmd::dispatch::*;
pub use compare::{compare_specs, render_report, EQUIVALENT_MESSAGE};
pub use entity::{Entity, EntityKind};
pub use load::{load_spec, LoadError, LoadedSpec};
pub use output::CompareResult;
pub use path_matcher::PathMatcher;
pub use problems::ProblemReport;
pub use registry::{CompareError, Comparator, ComparatorRegistry, Comparison};
