// Copyright 2025 Oxide Computer Company

//! Registry of comparators, keyed by the kind of entity they compare

use crate::comparators::{
    OperationIdsComparator, OperationMethodComparator, OperationsComparator,
    VersionComparator,
};
use crate::entity::{Entity, EntityKind};
use crate::problems::ProblemReport;
use slog::{debug, Logger};
use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// A rule comparing two entities of the same kind
///
/// Comparators don't call back into the registry.  Anything that needs a
/// deeper look (e.g. the paths two documents have in common) is returned as a
/// nested pair in the [`Comparison`], and the registry dispatches those pairs
/// itself.
pub trait Comparator: Debug + Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// The kind of entity this comparator is registered under
    fn target(&self) -> EntityKind;

    fn compare<'a>(
        &self,
        log: &Logger,
        input1: &Entity<'a>,
        input2: &Entity<'a>,
    ) -> Result<Comparison<'a>, CompareError>;
}

/// Result of running a single comparator
#[derive(Debug, Default)]
pub struct Comparison<'a> {
    problems: Vec<ProblemReport>,
    nested: Vec<(Entity<'a>, Entity<'a>)>,
}

impl<'a> Comparison<'a> {
    pub fn new() -> Comparison<'a> {
        Comparison { problems: Vec::new(), nested: Vec::new() }
    }

    /// Record a discrepancy found by this comparator
    pub fn problem(&mut self, problem: ProblemReport) {
        self.problems.push(problem);
    }

    /// Record a pair of sub-entities that still needs to be compared
    pub fn nested(&mut self, input1: Entity<'a>, input2: Entity<'a>) {
        self.nested.push((input1, input2));
    }

    pub fn problems(&self) -> &[ProblemReport] {
        &self.problems
    }

    pub fn nested_pairs(&self) -> &[(Entity<'a>, Entity<'a>)] {
        &self.nested
    }
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("can't compare different types: {left} and {right}")]
    KindMismatch { left: EntityKind, right: EntityKind },

    #[error(
        "comparator {comparator:?} (registered for {expected}) was handed \
         a {found}"
    )]
    UnexpectedKind {
        comparator: &'static str,
        expected: EntityKind,
        found: EntityKind,
    },
}

impl CompareError {
    pub(crate) fn unexpected(
        comparator: &dyn Comparator,
        input1: &Entity<'_>,
        input2: &Entity<'_>,
    ) -> CompareError {
        let expected = comparator.target();
        let found = if input1.kind() != expected {
            input1.kind()
        } else {
            input2.kind()
        };
        CompareError::UnexpectedKind {
            comparator: comparator.name(),
            expected,
            found,
        }
    }
}

/// Comparators indexed by [`EntityKind`]
///
/// The registry is filled in once, before any comparison, and only read
/// afterwards.
#[derive(Debug, Default)]
pub struct ComparatorRegistry {
    comparators: BTreeMap<EntityKind, Vec<Box<dyn Comparator>>>,
}

impl ComparatorRegistry {
    /// Returns a registry with nothing registered
    pub fn new() -> ComparatorRegistry {
        ComparatorRegistry::default()
    }

    /// Returns a registry with the built-in comparators
    pub fn standard() -> ComparatorRegistry {
        let mut registry = ComparatorRegistry::new();
        registry
            .register(VersionComparator)
            .register(OperationsComparator)
            .register(OperationIdsComparator)
            .register(OperationMethodComparator);
        registry
    }

    /// Append `comparator` to the list for its target kind
    pub fn register<C: Comparator + 'static>(
        &mut self,
        comparator: C,
    ) -> &mut Self {
        self.comparators
            .entry(comparator.target())
            .or_default()
            .push(Box::new(comparator));
        self
    }

    /// Iterate the comparators registered for `kind`, in registration order
    pub fn comparators_for(
        &self,
        kind: EntityKind,
    ) -> impl Iterator<Item = &dyn Comparator> + '_ {
        self.comparators
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|comparator| &**comparator)
    }

    /// Run every comparator registered for the kind of the inputs
    ///
    /// Problems come back in registration order.  The nested pairs returned
    /// by a comparator are compared (depth first) right after that
    /// comparator's own problems, before the next comparator runs.
    pub fn compare<'a>(
        &self,
        log: &Logger,
        input1: Entity<'a>,
        input2: Entity<'a>,
    ) -> Result<Vec<ProblemReport>, CompareError> {
        let mut problems = Vec::new();
        self.compare_into(log, input1, input2, &mut problems)?;
        Ok(problems)
    }

    fn compare_into<'a>(
        &self,
        log: &Logger,
        input1: Entity<'a>,
        input2: Entity<'a>,
        problems: &mut Vec<ProblemReport>,
    ) -> Result<(), CompareError> {
        let kind = input1.kind();
        if kind != input2.kind() {
            return Err(CompareError::KindMismatch {
                left: kind,
                right: input2.kind(),
            });
        }

        for comparator in self.comparators_for(kind) {
            let comparison = comparator.compare(log, &input1, &input2)?;
            debug!(
                log,
                "ran comparator";
                "comparator" => comparator.name(),
                "kind" => %kind,
                "problems" => comparison.problems.len(),
                "nested" => comparison.nested.len(),
            );
            problems.extend(comparison.problems);
            for (nested1, nested2) in comparison.nested {
                self.compare_into(log, nested1, nested2, problems)?;
            }
        }

        Ok(())
    }
}
