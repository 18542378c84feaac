// Copyright 2025 Oxide Computer Company

//! Loading OpenAPI documents from disk

use anyhow::anyhow;
use camino::{Utf8Path, Utf8PathBuf};
use debug_ignore::DebugIgnore;
use openapiv3::{OpenAPI, ReferenceOr};
use percent_encoding::percent_decode_str;
use slog::{debug, Logger};
use std::collections::BTreeMap;
use thiserror::Error;

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "unsupported URI scheme {scheme:?} in {source_uri:?} \
         (only local files can be compared)"
    )]
    UnsupportedScheme { source_uri: String, scheme: String },

    #[error("file URI {source_uri:?} is not valid UTF-8 once decoded")]
    BadFileUri {
        source_uri: String,
        #[source]
        error: std::str::Utf8Error,
    },

    #[error("failed to read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to parse {path} as JSON OpenAPI document")]
    Json {
        path: Utf8PathBuf,
        #[source]
        error: serde_json::Error,
    },

    #[error("failed to parse {path} as YAML OpenAPI document")]
    Yaml {
        path: Utf8PathBuf,
        #[source]
        error: serde_yaml::Error,
    },
}

/// Structural problems found in a document that parsed successfully
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationProblem {
    #[error("path {url:?} does not start with \"/\"")]
    RelativePath { url: String },

    #[error(
        "path {url:?} is a reference ({reference:?}), which is not supported"
    )]
    PathReference { url: String, reference: String },

    #[error(
        "operation id {operation_id:?} is used more than once \
         (first by {first}, again by {second})"
    )]
    DuplicateOperationId {
        operation_id: String,
        first: String,
        second: String,
    },
}

/// Stores errors and warnings accumulated during loading
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    /// problems that make the document unsuitable for comparison
    errors: Vec<anyhow::Error>,
    /// problems that may make the comparison less meaningful
    warnings: Vec<anyhow::Error>,
}

impl ErrorAccumulator {
    pub fn new() -> ErrorAccumulator {
        ErrorAccumulator { errors: Vec::new(), warnings: Vec::new() }
    }

    /// Record an error
    pub fn error(&mut self, error: anyhow::Error) {
        self.errors.push(error);
    }

    /// Record a warning
    pub fn warning(&mut self, error: anyhow::Error) {
        self.warnings.push(error);
    }

    pub fn iter_errors(&self) -> impl Iterator<Item = &'_ anyhow::Error> + '_ {
        self.errors.iter()
    }

    pub fn iter_warnings(
        &self,
    ) -> impl Iterator<Item = &'_ anyhow::Error> + '_ {
        self.warnings.iter()
    }

    /// Move everything recorded in `other` into this accumulator
    pub fn extend(&mut self, other: ErrorAccumulator) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// A parsed OpenAPI document and where it came from
#[derive(Debug)]
pub struct LoadedSpec {
    /// the source as given by the user (path or URI)
    pub source: String,
    /// local path the document was read from
    pub path: Utf8PathBuf,
    pub openapi: DebugIgnore<OpenAPI>,
}

impl LoadedSpec {
    pub fn openapi(&self) -> &OpenAPI {
        &self.openapi
    }
}

/// Turn a local path or `file://` URI into a local path
pub fn source_path(source: &str) -> Result<Utf8PathBuf, LoadError> {
    if let Some(rest) = source.strip_prefix(FILE_SCHEME) {
        let decoded = percent_decode_str(rest).decode_utf8().map_err(
            |error| LoadError::BadFileUri {
                source_uri: source.to_owned(),
                error,
            },
        )?;
        return Ok(Utf8PathBuf::from(decoded.as_ref()));
    }

    if let Some((scheme, _)) = source.split_once("://") {
        return Err(LoadError::UnsupportedScheme {
            source_uri: source.to_owned(),
            scheme: scheme.to_owned(),
        });
    }

    Ok(Utf8PathBuf::from(source))
}

/// Read and parse an OpenAPI document
///
/// `.json` files are parsed as JSON, everything else as YAML.  Problems with a
/// document that parsed fine are returned in the [`ErrorAccumulator`] rather
/// than as an error.
pub fn load_spec(
    log: &Logger,
    source: &str,
) -> Result<(LoadedSpec, ErrorAccumulator), LoadError> {
    let path = source_path(source)?;
    let contents = std::fs::read_to_string(&path)
        .map_err(|error| LoadError::Read { path: path.clone(), error })?;
    let openapi = parse_spec(&path, &contents)?;
    debug!(
        log,
        "loaded OpenAPI document";
        "path" => %path,
        "title" => &openapi.info.title,
        "version" => &openapi.info.version,
        "paths" => openapi.paths.paths.len(),
    );

    let errors = validate_spec(&path, &openapi);
    let loaded = LoadedSpec {
        source: source.to_owned(),
        path,
        openapi: DebugIgnore(openapi),
    };
    Ok((loaded, errors))
}

fn parse_spec(path: &Utf8Path, contents: &str) -> Result<OpenAPI, LoadError> {
    if path.extension() == Some("json") {
        serde_json::from_str(contents)
            .map_err(|error| LoadError::Json { path: path.to_owned(), error })
    } else {
        serde_yaml::from_str(contents)
            .map_err(|error| LoadError::Yaml { path: path.to_owned(), error })
    }
}

/// Check the structure that comparisons rely on
pub fn validate_spec(path: &Utf8Path, openapi: &OpenAPI) -> ErrorAccumulator {
    let mut errors = ErrorAccumulator::new();
    let mut operation_ids: BTreeMap<&str, String> = BTreeMap::new();

    for (url, item) in &openapi.paths.paths {
        if !url.starts_with('/') {
            errors.error(
                anyhow!(ValidationProblem::RelativePath { url: url.clone() })
                    .context(path.to_string()),
            );
        }

        let item = match item {
            ReferenceOr::Item(item) => item,
            ReferenceOr::Reference { reference } => {
                errors.error(
                    anyhow!(ValidationProblem::PathReference {
                        url: url.clone(),
                        reference: reference.clone(),
                    })
                    .context(path.to_string()),
                );
                continue;
            }
        };

        for (method, operation) in item.iter() {
            let Some(operation_id) = operation.operation_id.as_deref() else {
                continue;
            };
            let location = format!("{} {}", method.to_uppercase(), url);
            match operation_ids.get(operation_id) {
                Some(first) => errors.warning(
                    anyhow!(ValidationProblem::DuplicateOperationId {
                        operation_id: operation_id.to_owned(),
                        first: first.clone(),
                        second: location,
                    })
                    .context(path.to_string()),
                ),
                None => {
                    operation_ids.insert(operation_id, location);
                }
            }
        }
    }

    errors
}
