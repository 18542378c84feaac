// Copyright 2025 Oxide Computer Company

//! Discrepancies found between two OpenAPI documents

use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Display;
use thiserror::Error;

/// Which of the two documents being compared something belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpecLabel {
    First,
    Second,
}

impl SpecLabel {
    /// Returns the label of the other document
    pub fn other(self) -> SpecLabel {
        match self {
            SpecLabel::First => SpecLabel::Second,
            SpecLabel::Second => SpecLabel::First,
        }
    }
}

impl Display for SpecLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecLabel::First => f.write_str("specification 1"),
            SpecLabel::Second => f.write_str("specification 2"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct DisplayableVec<T>(pub Vec<T>);
impl<T> Display for DisplayableVec<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(item) = iter.next() {
            write!(f, "'{item}'")?;
        }

        for item in iter {
            write!(f, ", '{item}'")?;
        }

        Ok(())
    }
}

/// Describes one discrepancy between the two documents
///
/// These are not errors (a comparison that finds them succeeded), but like
/// the other notes this workspace prints, each carries its own message.  The
/// `Display` impl is the one-line message; [`ProblemReport::render()`] adds
/// any structured payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProblemReport {
    #[error("Version '{version1}' is different from '{version2}'")]
    VersionMismatch { version1: String, version2: String },

    #[error(
        "Path '{url}' from {present_in} is missing in {}",
        .present_in.other(),
    )]
    PathMissing { url: String, present_in: SpecLabel },

    #[error(
        "Path '{url}' from {side} was paired with '{chosen}' in {} by \
         suffix, but it also matches {candidates}",
        .side.other(),
    )]
    AmbiguousPathMatch {
        url: String,
        side: SpecLabel,
        chosen: String,
        candidates: DisplayableVec<String>,
    },

    #[error(
        "Operation IDs mismatch for path '{url}' - {missing_in} is missing:"
    )]
    OperationIdsMissing {
        url: String,
        missing_in: SpecLabel,
        operation_ids: BTreeSet<String>,
    },

    #[error(
        "Operation '{operation_id}' uses method '{method1}' in specification 1 \
         but '{method2}' in specification 2"
    )]
    OperationMethodMismatch {
        operation_id: String,
        method1: String,
        method2: String,
    },
}

impl ProblemReport {
    pub fn operation_ids_missing<I>(
        url: &str,
        missing_in: SpecLabel,
        operation_ids: I,
    ) -> ProblemReport
    where
        I: IntoIterator<Item = String>,
    {
        ProblemReport::OperationIdsMissing {
            url: url.to_owned(),
            missing_in,
            operation_ids: operation_ids.into_iter().collect(),
        }
    }

    /// Returns the one-line summary of this problem
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the text printed for this problem
    pub fn render(&self) -> String {
        match self {
            ProblemReport::OperationIdsMissing { operation_ids, .. } => {
                let mut rendered = self.message();
                for operation_id in operation_ids {
                    rendered.push_str("\n- ");
                    rendered.push_str(operation_id);
                }
                rendered
            }
            _ => self.message(),
        }
    }
}
