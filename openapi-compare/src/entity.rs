// Copyright 2025 Oxide Computer Company

//! Borrowed views over the parts of an OpenAPI document that get compared
//!
//! Comparators never see `openapiv3` types directly except for the document
//! root.  Paths and operations are wrapped in [`PathEntry`] and
//! [`OperationEntry`] so that the URL a given operation lives under travels
//! along with it.

use openapiv3::{OpenAPI, Operation, PathItem};
use std::fmt;

/// Marker placed at the front of identities derived for operations that
/// don't declare an `operationId`
pub const GENERATED_MARKER: &str = "generated";

/// Separator between the components of a derived operation identity
pub const IDENTITY_SEPARATOR: &str = "::";

/// Tag identifying what kind of [`Entity`] a value is
///
/// The registry keys comparators by this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Specification,
    Path,
    Operation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Specification => "specification",
            EntityKind::Path => "path",
            EntityKind::Operation => "operation",
        })
    }
}

/// Something that can be handed to the comparator registry
#[derive(Clone, Copy, Debug)]
pub enum Entity<'a> {
    Specification(&'a OpenAPI),
    Path(PathEntry<'a>),
    Operation(OperationEntry<'a>),
}

impl Entity<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Specification(_) => EntityKind::Specification,
            Entity::Path(_) => EntityKind::Path,
            Entity::Operation(_) => EntityKind::Operation,
        }
    }
}

/// One entry of a document's `paths` object
#[derive(Clone, Copy, Debug)]
pub struct PathEntry<'a> {
    url: &'a str,
    item: &'a PathItem,
}

impl<'a> PathEntry<'a> {
    pub fn new(url: &'a str, item: &'a PathItem) -> PathEntry<'a> {
        PathEntry { url, item }
    }

    /// Returns the URL template, e.g. `/zaken/{id}`
    pub fn url(&self) -> &'a str {
        self.url
    }

    pub fn item(&self) -> &'a PathItem {
        self.item
    }

    /// Iterate the operations defined at this path, in the fixed method order
    /// used by `openapiv3`
    pub fn operations(&self) -> impl Iterator<Item = OperationEntry<'a>> + 'a {
        let url = self.url;
        self.item.iter().map(move |(method, operation)| OperationEntry {
            url,
            method,
            operation,
        })
    }
}

/// Returns the paths of `spec` in document order
///
/// `$ref` path items are skipped.  Documents produced by
/// [`crate::load_spec`] never contain them because loading rejects them.
pub fn spec_paths(spec: &OpenAPI) -> Vec<PathEntry<'_>> {
    spec.paths
        .paths
        .iter()
        .filter_map(|(url, item)| {
            item.as_item().map(|item| PathEntry::new(url, item))
        })
        .collect()
}

/// One HTTP method handler at a path
#[derive(Clone, Copy, Debug)]
pub struct OperationEntry<'a> {
    url: &'a str,
    method: &'a str,
    operation: &'a Operation,
}

impl<'a> OperationEntry<'a> {
    /// URL template of the path this operation belongs to
    pub fn url(&self) -> &'a str {
        self.url
    }

    /// lowercase HTTP method name, as used for keys in an OpenAPI path item
    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn operation_id(&self) -> Option<&'a str> {
        self.operation.operation_id.as_deref()
    }

    pub fn operation(&self) -> &'a Operation {
        self.operation
    }

    /// Returns the identity used to pair this operation with one from the
    /// other document
    ///
    /// This is the explicit `operationId` when there is one.  Otherwise it's
    /// derived from `url` and the method; callers pass the URL both sides
    /// agree on so that prefix differences don't change the identity.
    pub fn identity(&self, url: &str) -> String {
        match self.operation_id() {
            Some(operation_id) => operation_id.to_owned(),
            None => derived_identity(url, self.method),
        }
    }
}

/// Builds the identity of an operation without an `operationId`
///
/// e.g. `/zaken/{id}` with `get` becomes `generated::zaken::{id}::get`.
pub fn derived_identity(url: &str, method: &str) -> String {
    std::iter::once(GENERATED_MARKER)
        .chain(url.split('/').filter(|segment| !segment.is_empty()))
        .chain(std::iter::once(method))
        .collect::<Vec<_>>()
        .join(IDENTITY_SEPARATOR)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::SpecBuilder;

    #[test]
    fn test_derived_identity() {
        assert_eq!(
            derived_identity("/zaken/{id}", "get"),
            "generated::zaken::{id}::get"
        );
        assert_eq!(derived_identity("/", "post"), "generated::post");
        assert_ne!(
            derived_identity("/zaken", "get"),
            derived_identity("/zaken", "post")
        );
        assert_ne!(
            derived_identity("/a/b", "get"),
            derived_identity("/a", "get")
        );
    }

    #[test]
    fn test_spec_paths_and_operations() {
        let spec = SpecBuilder::new("1.0.0")
            .operation("/zaken", "post", Some("createZaak"))
            .operation("/zaken", "get", Some("list"))
            .operation("/zaken/{id}", "get", None)
            .build();

        let paths = spec_paths(&spec);
        let urls: Vec<_> = paths.iter().map(|p| p.url()).collect();
        assert_eq!(urls, ["/zaken", "/zaken/{id}"]);

        // openapiv3 yields operations in its own method order, not in the
        // order they were added.
        let operations: Vec<_> = paths[0]
            .operations()
            .map(|op| (op.method(), op.operation_id()))
            .collect();
        assert_eq!(
            operations,
            [("get", Some("list")), ("post", Some("createZaak"))]
        );

        let anonymous = paths[1].operations().next().unwrap();
        assert_eq!(anonymous.url(), "/zaken/{id}");
        assert_eq!(anonymous.operation_id(), None);
        assert_eq!(
            anonymous.identity("/zaken/{id}"),
            "generated::zaken::{id}::get"
        );
        assert_eq!(
            paths[0].operations().next().unwrap().identity("/ignored"),
            "list"
        );
    }

    #[test]
    fn test_entity_kind() {
        let spec = SpecBuilder::new("1.0.0")
            .operation("/zaken", "get", Some("list"))
            .build();
        let path = spec_paths(&spec)[0];
        let operation = path.operations().next().unwrap();

        assert_eq!(
            Entity::Specification(&spec).kind(),
            EntityKind::Specification
        );
        assert_eq!(Entity::Path(path).kind(), EntityKind::Path);
        assert_eq!(Entity::Operation(operation).kind(), EntityKind::Operation);
        assert_eq!(EntityKind::Path.to_string(), "path");
    }
}
