// Copyright 2025 Oxide Computer Company

//! Built-in comparators

use crate::entity::{
    spec_paths, Entity, EntityKind, OperationEntry, PathEntry,
};
use crate::path_matcher::PathMatcher;
use crate::problems::{DisplayableVec, ProblemReport, SpecLabel};
use crate::registry::{CompareError, Comparator, Comparison};
use openapiv3::OpenAPI;
use slog::Logger;
use std::collections::BTreeMap;

fn expect_specifications<'a>(
    comparator: &dyn Comparator,
    input1: &Entity<'a>,
    input2: &Entity<'a>,
) -> Result<(&'a OpenAPI, &'a OpenAPI), CompareError> {
    match (input1, input2) {
        (Entity::Specification(spec1), Entity::Specification(spec2)) => {
            Ok((*spec1, *spec2))
        }
        _ => Err(CompareError::unexpected(comparator, input1, input2)),
    }
}

fn expect_paths<'a>(
    comparator: &dyn Comparator,
    input1: &Entity<'a>,
    input2: &Entity<'a>,
) -> Result<(PathEntry<'a>, PathEntry<'a>), CompareError> {
    match (input1, input2) {
        (Entity::Path(path1), Entity::Path(path2)) => Ok((*path1, *path2)),
        _ => Err(CompareError::unexpected(comparator, input1, input2)),
    }
}

fn expect_operations<'a>(
    comparator: &dyn Comparator,
    input1: &Entity<'a>,
    input2: &Entity<'a>,
) -> Result<(OperationEntry<'a>, OperationEntry<'a>), CompareError> {
    match (input1, input2) {
        (Entity::Operation(op1), Entity::Operation(op2)) => Ok((*op1, *op2)),
        _ => Err(CompareError::unexpected(comparator, input1, input2)),
    }
}

/// Checks that `info.version` is identical
#[derive(Clone, Copy, Debug, Default)]
pub struct VersionComparator;

impl Comparator for VersionComparator {
    fn name(&self) -> &'static str {
        "version"
    }

    fn target(&self) -> EntityKind {
        EntityKind::Specification
    }

    fn compare<'a>(
        &self,
        _log: &Logger,
        input1: &Entity<'a>,
        input2: &Entity<'a>,
    ) -> Result<Comparison<'a>, CompareError> {
        let (spec1, spec2) = expect_specifications(self, input1, input2)?;
        let mut comparison = Comparison::new();
        if spec1.info.version != spec2.info.version {
            comparison.problem(ProblemReport::VersionMismatch {
                version1: spec1.info.version.clone(),
                version2: spec2.info.version.clone(),
            });
        }
        Ok(comparison)
    }
}

/// Aligns the paths of both documents
///
/// Paths without a counterpart are reported here.  Paths that were paired up
/// are handed back to the registry so that their operations get compared.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperationsComparator;

impl Comparator for OperationsComparator {
    fn name(&self) -> &'static str {
        "operations"
    }

    fn target(&self) -> EntityKind {
        EntityKind::Specification
    }

    fn compare<'a>(
        &self,
        log: &Logger,
        input1: &Entity<'a>,
        input2: &Entity<'a>,
    ) -> Result<Comparison<'a>, CompareError> {
        let (spec1, spec2) = expect_specifications(self, input1, input2)?;
        let matcher =
            PathMatcher::new(log, spec_paths(spec1), spec_paths(spec2));

        let mut comparison = Comparison::new();
        for label in [SpecLabel::First, SpecLabel::Second] {
            for path in matcher.unmatched(label) {
                comparison.problem(ProblemReport::PathMissing {
                    url: path.url().to_owned(),
                    present_in: label,
                });
            }
        }

        for ambiguity in matcher.ambiguities() {
            comparison.problem(ProblemReport::AmbiguousPathMatch {
                url: ambiguity.url.to_owned(),
                side: ambiguity.side,
                chosen: ambiguity.chosen.to_owned(),
                candidates: DisplayableVec(
                    ambiguity
                        .candidates
                        .iter()
                        .map(|candidate| candidate.to_string())
                        .collect(),
                ),
            });
        }

        for path_match in matcher.matches() {
            comparison.nested(
                Entity::Path(path_match.first),
                Entity::Path(path_match.second),
            );
        }

        Ok(comparison)
    }
}

/// Compares the operations available at a pair of matched paths
///
/// Operations are identified by `operationId`.  For operations without one,
/// the identity is derived from the shorter of the two URL templates (the
/// part both documents agree on) and the method.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperationIdsComparator;

impl Comparator for OperationIdsComparator {
    fn name(&self) -> &'static str {
        "operation-ids"
    }

    fn target(&self) -> EntityKind {
        EntityKind::Path
    }

    fn compare<'a>(
        &self,
        _log: &Logger,
        input1: &Entity<'a>,
        input2: &Entity<'a>,
    ) -> Result<Comparison<'a>, CompareError> {
        let (path1, path2) = expect_paths(self, input1, input2)?;
        let shared_url = if path1.url().len() <= path2.url().len() {
            path1.url()
        } else {
            path2.url()
        };

        let operations1 = by_identity(path1, shared_url);
        let mut operations2 = by_identity(path2, shared_url);

        // An identity can belong to several operations of one path (a shared
        // operationId, for instance), so each side is a multiset.
        let mut pairs = Vec::new();
        let mut missing_in_first = Vec::new();
        let mut missing_in_second = Vec::new();
        for (id, ops1) in operations1 {
            let ops2 = operations2.remove(&id).unwrap_or_default();
            let (paired, surplus1, surplus2) = pair_operations(ops1, ops2);
            pairs.extend(paired);
            if surplus1 {
                missing_in_second.push(id.clone());
            }
            if surplus2 {
                missing_in_first.push(id);
            }
        }
        missing_in_first.extend(operations2.into_keys());

        let mut comparison = Comparison::new();
        if !missing_in_first.is_empty() {
            comparison.problem(ProblemReport::operation_ids_missing(
                path2.url(),
                SpecLabel::First,
                missing_in_first,
            ));
        }
        if !missing_in_second.is_empty() {
            comparison.problem(ProblemReport::operation_ids_missing(
                path1.url(),
                SpecLabel::Second,
                missing_in_second,
            ));
        }

        for (operation1, operation2) in pairs {
            comparison.nested(
                Entity::Operation(operation1),
                Entity::Operation(operation2),
            );
        }

        Ok(comparison)
    }
}

fn by_identity<'a>(
    path: PathEntry<'a>,
    shared_url: &str,
) -> BTreeMap<String, Vec<OperationEntry<'a>>> {
    let mut operations: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for operation in path.operations() {
        operations
            .entry(operation.identity(shared_url))
            .or_default()
            .push(operation);
    }
    operations
}

/// Pairs up operations sharing one identity
///
/// Operations with the same method are paired first, then whatever is left
/// in document order.  Also returns whether either side had operations left
/// over.
fn pair_operations<'a>(
    ops1: Vec<OperationEntry<'a>>,
    mut ops2: Vec<OperationEntry<'a>>,
) -> (Vec<(OperationEntry<'a>, OperationEntry<'a>)>, bool, bool) {
    let mut pairs = Vec::new();
    let mut leftover1 = Vec::new();
    for op1 in ops1 {
        match ops2.iter().position(|op2| op2.method() == op1.method()) {
            Some(index) => pairs.push((op1, ops2.remove(index))),
            None => leftover1.push(op1),
        }
    }

    let surplus1 = leftover1.len() > ops2.len();
    let surplus2 = ops2.len() > leftover1.len();
    pairs.extend(leftover1.into_iter().zip(ops2));
    (pairs, surplus1, surplus2)
}

/// Checks that operations paired by identity use the same HTTP method
#[derive(Clone, Copy, Debug, Default)]
pub struct OperationMethodComparator;

impl Comparator for OperationMethodComparator {
    fn name(&self) -> &'static str {
        "operation-method"
    }

    fn target(&self) -> EntityKind {
        EntityKind::Operation
    }

    fn compare<'a>(
        &self,
        _log: &Logger,
        input1: &Entity<'a>,
        input2: &Entity<'a>,
    ) -> Result<Comparison<'a>, CompareError> {
        let (operation1, operation2) =
            expect_operations(self, input1, input2)?;
        let mut comparison = Comparison::new();
        if operation1.method() != operation2.method() {
            comparison.problem(ProblemReport::OperationMethodMismatch {
                operation_id: operation1.identity(operation1.url()),
                method1: operation1.method().to_owned(),
                method2: operation2.method().to_owned(),
            });
        }
        Ok(comparison)
    }
}
