// Copyright 2025 Oxide Computer Company

//! Pair up the paths of two OpenAPI documents
//!
//! Two documents describing the same API may mount it under different roots,
//! so `/zaken` in one can be `/api/v2/zaken` in the other.  Matching works in
//! two passes over the first document's paths:
//!
//! 1. identical URL templates are paired up;
//! 2. each remaining template is paired with the first remaining template on
//!    the other side where one ends with the other.
//!
//! Both sides are considered most-specific (longest) first so that a short,
//! generic template can't take a suffix match that a longer one should get.
//! This is a heuristic.  When more than one template qualifies in the second
//! pass the first one still wins, but the other candidates are recorded so
//! the ambiguity can be reported.  That works in both directions: a template
//! from the second document that could have been paired with several from
//! the first is recorded too.

use crate::entity::PathEntry;
use crate::problems::SpecLabel;
use indexmap::IndexMap;
use slog::{debug, warn, Logger};
use std::cell::OnceCell;

/// How a [`PathMatch`] was established
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// both templates are identical
    Exact,
    /// one template ends with the other
    Suffix,
}

/// A path from each document, considered to be the same logical path
#[derive(Clone, Copy, Debug)]
pub struct PathMatch<'a> {
    pub first: PathEntry<'a>,
    pub second: PathEntry<'a>,
    pub kind: MatchKind,
}

/// A suffix match that had more than one candidate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbiguousMatch<'a> {
    /// document that `url` comes from
    pub side: SpecLabel,
    /// URL template that had several candidates
    pub url: &'a str,
    /// URL template from the other document that it was paired with
    pub chosen: &'a str,
    /// other templates from the other document that would also have matched
    pub candidates: Vec<&'a str>,
}

#[derive(Debug)]
struct MatchResult<'a> {
    matches: Vec<PathMatch<'a>>,
    unmatched_first: Vec<PathEntry<'a>>,
    unmatched_second: Vec<PathEntry<'a>>,
    ambiguities: Vec<AmbiguousMatch<'a>>,
}

/// Computes (once) and caches the pairing between two sets of paths
#[derive(Debug)]
pub struct PathMatcher<'a> {
    log: Logger,
    first: Vec<PathEntry<'a>>,
    second: Vec<PathEntry<'a>>,
    result: OnceCell<MatchResult<'a>>,
}

impl<'a> PathMatcher<'a> {
    pub fn new(
        log: &Logger,
        first: Vec<PathEntry<'a>>,
        second: Vec<PathEntry<'a>>,
    ) -> PathMatcher<'a> {
        PathMatcher {
            log: log.clone(),
            first,
            second,
            result: OnceCell::new(),
        }
    }

    /// Returns the matched pairs
    ///
    /// Exact matches come first, in the order the first document's paths
    /// were considered, followed by suffix matches.
    pub fn matches(&self) -> &[PathMatch<'a>] {
        &self.result().matches
    }

    /// Returns the paths from document `label` that weren't paired
    pub fn unmatched(&self, label: SpecLabel) -> &[PathEntry<'a>] {
        let result = self.result();
        match label {
            SpecLabel::First => &result.unmatched_first,
            SpecLabel::Second => &result.unmatched_second,
        }
    }

    pub fn ambiguities(&self) -> &[AmbiguousMatch<'a>] {
        &self.result().ambiguities
    }

    fn result(&self) -> &MatchResult<'a> {
        self.result.get_or_init(|| self.compute())
    }

    fn compute(&self) -> MatchResult<'a> {
        let first = by_specificity(&self.first);
        let mut second: IndexMap<&'a str, PathEntry<'a>> =
            by_specificity(&self.second)
                .into_iter()
                .map(|entry| (entry.url(), entry))
                .collect();

        let mut matches = Vec::new();
        let mut remaining = Vec::new();
        for entry in first {
            match second.shift_remove(entry.url()) {
                Some(other) => matches.push(PathMatch {
                    first: entry,
                    second: other,
                    kind: MatchKind::Exact,
                }),
                None => remaining.push(entry),
            }
        }

        let mut unmatched_first = Vec::new();
        let mut ambiguities = Vec::new();
        for (index, entry) in remaining.iter().enumerate() {
            let url = entry.url();
            let mut candidates: Vec<&'a str> = second
                .keys()
                .copied()
                .filter(|other| is_suffix_match(url, other))
                .collect();
            if candidates.is_empty() {
                unmatched_first.push(*entry);
                continue;
            }

            let chosen = candidates.remove(0);
            if !candidates.is_empty() {
                ambiguities.push(self.ambiguity(
                    SpecLabel::First,
                    url,
                    chosen,
                    candidates,
                ));
            }

            // Templates from the first document that haven't been considered
            // yet (they're shorter) but would also have matched `chosen`.
            let rivals: Vec<&'a str> = remaining[index + 1..]
                .iter()
                .map(|other| other.url())
                .filter(|other| is_suffix_match(chosen, other))
                .collect();
            if !rivals.is_empty() {
                ambiguities.push(self.ambiguity(
                    SpecLabel::Second,
                    chosen,
                    url,
                    rivals,
                ));
            }

            if let Some(other) = second.shift_remove(chosen) {
                debug!(
                    self.log,
                    "paired paths by suffix";
                    "first" => url,
                    "second" => chosen,
                );
                matches.push(PathMatch {
                    first: *entry,
                    second: other,
                    kind: MatchKind::Suffix,
                });
            }
        }

        MatchResult {
            matches,
            unmatched_first,
            unmatched_second: second.into_values().collect(),
            ambiguities,
        }
    }
}

impl<'a> PathMatcher<'a> {
    fn ambiguity(
        &self,
        side: SpecLabel,
        url: &'a str,
        chosen: &'a str,
        candidates: Vec<&'a str>,
    ) -> AmbiguousMatch<'a> {
        warn!(
            self.log,
            "ambiguous suffix match";
            "side" => %side,
            "url" => url,
            "chosen" => chosen,
            "candidates" => ?candidates,
        );
        AmbiguousMatch { side, url, chosen, candidates }
    }
}

/// Returns `paths` ordered longest URL template first
///
/// The sort is stable, so templates of equal length keep document order.
fn by_specificity<'a>(paths: &[PathEntry<'a>]) -> Vec<PathEntry<'a>> {
    let mut sorted = paths.to_vec();
    sorted.sort_by(|a, b| b.url().len().cmp(&a.url().len()));
    sorted
}

/// Returns whether one template is the other with an extra prefix
///
/// The shorter template must start with `/`, so this only ever matches whole
/// segments: `/zaken` is a suffix of `/api/zaken` but not of
/// `/api/statuszaken`.  The root template `/` is a suffix of every template
/// ending in `/` and is never matched this way.
fn is_suffix_match(url1: &str, url2: &str) -> bool {
    let (shorter, longer) =
        if url1.len() <= url2.len() { (url1, url2) } else { (url2, url1) };
    shorter != "/" && shorter.starts_with('/') && longer.ends_with(shorter)
}
