// Copyright 2025 Oxide Computer Company

//! Facilities for tests of this crate and of consumers that register their own
//! comparators

use openapiv3::{Info, OpenAPI, Operation, PathItem, ReferenceOr};
use serde::de::DeserializeOwned;
use slog::Logger;
use std::fmt::Debug;

/// Parse a TOML configuration, printing the outcome so that failing tests
/// show what was attempted
pub fn read_config<T: DeserializeOwned + Debug>(
    label: &str,
    contents: &str,
) -> Result<T, toml::de::Error> {
    let result = toml::from_str(contents);
    eprintln!("config \"{}\": {:?}", label, result);
    result
}

/// Returns a logger that throws everything away
pub fn test_logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}

/// Builds small in-memory OpenAPI documents
#[derive(Clone, Debug)]
pub struct SpecBuilder {
    openapi: OpenAPI,
}

impl SpecBuilder {
    pub fn new(version: &str) -> SpecBuilder {
        SpecBuilder {
            openapi: OpenAPI {
                openapi: "3.0.3".to_owned(),
                info: Info {
                    title: "test API".to_owned(),
                    version: version.to_owned(),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    /// Add an operation with the given method (lowercase, e.g. `"get"`)
    ///
    /// Panics on an unknown method.
    pub fn operation(
        mut self,
        url: &str,
        method: &str,
        operation_id: Option<&str>,
    ) -> SpecBuilder {
        let operation = Operation {
            operation_id: operation_id.map(str::to_owned),
            ..Default::default()
        };
        let entry = self
            .openapi
            .paths
            .paths
            .entry(url.to_owned())
            .or_insert_with(|| ReferenceOr::Item(PathItem::default()));
        let ReferenceOr::Item(item) = entry else {
            panic!("path {url:?} is a reference");
        };
        let slot = match method {
            "get" => &mut item.get,
            "put" => &mut item.put,
            "post" => &mut item.post,
            "delete" => &mut item.delete,
            "options" => &mut item.options,
            "head" => &mut item.head,
            "patch" => &mut item.patch,
            "trace" => &mut item.trace,
            other => panic!("unsupported method {other:?}"),
        };
        *slot = Some(operation);
        self
    }

    pub fn build(self) -> OpenAPI {
        self.openapi
    }
}
