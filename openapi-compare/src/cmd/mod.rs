// Copyright 2025 Oxide Computer Company

//! openapi-compare library facilities for implementing the openapi-compare
//! command-line tool

// helpers
pub mod dispatch;

pub(crate) mod compare;
