// Copyright 2025 Oxide Computer Company

//! Top-level comparison of two OpenAPI documents

use crate::entity::Entity;
use crate::load::{load_spec, ErrorAccumulator, LoadedSpec};
use crate::problems::ProblemReport;
use crate::registry::{CompareError, ComparatorRegistry};
use anyhow::Context;
use openapiv3::OpenAPI;
use slog::{info, Logger};

/// Printed when no problems were found
pub const EQUIVALENT_MESSAGE: &str = "API specs are functionally equivalent!";

/// Compare two parsed documents using the comparators in `registry`
pub fn compare_specs(
    log: &Logger,
    registry: &ComparatorRegistry,
    spec1: &OpenAPI,
    spec2: &OpenAPI,
) -> Result<Vec<ProblemReport>, CompareError> {
    let problems = registry.compare(
        log,
        Entity::Specification(spec1),
        Entity::Specification(spec2),
    )?;
    info!(log, "comparison done"; "problems" => problems.len());
    Ok(problems)
}

/// Both loaded documents, plus anything worth telling the user about them
#[derive(Debug)]
pub struct LoadedPair {
    pub spec1: LoadedSpec,
    pub spec2: LoadedSpec,
    pub errors: ErrorAccumulator,
}

/// Load both documents named by the user
pub fn load_pair(
    log: &Logger,
    source1: &str,
    source2: &str,
) -> anyhow::Result<LoadedPair> {
    let (spec1, mut errors) = load_spec(log, source1)
        .with_context(|| format!("loading specification 1 ({source1})"))?;
    let (spec2, errors2) = load_spec(log, source2)
        .with_context(|| format!("loading specification 2 ({source2})"))?;
    errors.extend(errors2);
    Ok(LoadedPair { spec1, spec2, errors })
}

/// The report printed for a list of problems
///
/// One rendered problem per line, or [`EQUIVALENT_MESSAGE`] if there are
/// none.
pub fn render_report(problems: &[ProblemReport]) -> String {
    if problems.is_empty() {
        return format!("{EQUIVALENT_MESSAGE}\n");
    }

    let mut out = String::new();
    for problem in problems {
        out.push_str(&problem.render());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{test_logger, SpecBuilder};
    use camino_tempfile::Utf8TempDir;

    fn zaken(version: &str) -> SpecBuilder {
        SpecBuilder::new(version)
            .operation("/zaken", "get", Some("list"))
            .operation("/zaken/{id}", "get", Some("get"))
    }

    fn report(spec1: &OpenAPI, spec2: &OpenAPI) -> String {
        let log = test_logger();
        let problems =
            compare_specs(&log, &ComparatorRegistry::standard(), spec1, spec2)
                .unwrap();
        render_report(&problems)
    }

    #[test]
    fn test_equivalent() {
        let spec1 = zaken("1.0.0").build();
        let spec2 = zaken("1.0.0").build();
        assert_eq!(
            report(&spec1, &spec2),
            "API specs are functionally equivalent!\n"
        );
    }

    #[test]
    fn test_version_only() {
        let spec1 = zaken("1.0.0").build();
        let spec2 = zaken("1.0.1").build();
        assert_eq!(
            report(&spec1, &spec2),
            "Version '1.0.0' is different from '1.0.1'\n"
        );
    }

    #[test]
    fn test_missing_operation() {
        let spec1 = zaken("1.0.0")
            .operation("/zaken", "post", Some("createZaak"))
            .build();
        let spec2 = zaken("1.0.0").build();
        assert_eq!(
            report(&spec1, &spec2),
            "Operation IDs mismatch for path '/zaken' - specification 2 is \
             missing:\n- createZaak\n"
        );
    }

    #[test]
    fn test_problem_order() {
        // Version problems first, then unmatched paths, then per-path
        // findings.
        let spec1 = zaken("1.0.0")
            .operation("/zaken", "post", Some("createZaak"))
            .operation("/besluiten", "get", Some("besluitList"))
            .build();
        let spec2 = SpecBuilder::new("2.0.0")
            .operation("/api/zaken", "get", Some("list"))
            .operation("/api/zaken/{id}", "get", Some("get"))
            .build();
        assert_eq!(
            report(&spec1, &spec2),
            "Version '1.0.0' is different from '2.0.0'\n\
             Path '/besluiten' from specification 1 is missing in \
             specification 2\n\
             Operation IDs mismatch for path '/zaken' - specification 2 is \
             missing:\n- createZaak\n"
        );
    }

    #[test]
    fn test_load_pair() {
        let log = test_logger();
        let dir = Utf8TempDir::new().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(
            &path,
            r#"{
                "openapi": "3.0.3",
                "info": { "title": "Zaken", "version": "1.0.0" },
                "paths": {}
            }"#,
        )
        .unwrap();

        let pair = load_pair(&log, path.as_str(), path.as_str()).unwrap();
        assert_eq!(pair.spec1.openapi().info.version, "1.0.0");
        assert_eq!(pair.errors.iter_errors().count(), 0);

        let missing = dir.path().join("missing.yaml");
        let error =
            load_pair(&log, path.as_str(), missing.as_str()).unwrap_err();
        assert_eq!(
            format!("{:#}", error).split(": ").take(2).collect::<Vec<_>>(),
            [
                format!("loading specification 2 ({missing})"),
                format!("failed to read {missing}"),
            ]
        );
    }
}
