// Copyright 2025 Oxide Computer Company

//! Configuration file for the command-line tool

use crate::logging::ConfigLogging;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Contents of the (optional) TOML configuration file
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigCompare {
    /// where log records go
    pub log: ConfigLogging,
    pub compare: ConfigCompareOptions,
}

/// The `[compare]` table
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigCompareOptions {
    /// exit with status 0 even when differences were found
    pub exit_zero: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        error: toml::de::Error,
    },
}

impl ConfigCompare {
    pub fn from_file(path: &Utf8Path) -> Result<ConfigCompare, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|error| {
            ConfigError::Read { path: path.to_owned(), error }
        })?;
        toml::from_str(&contents).map_err(|error| ConfigError::Parse {
            path: path.to_owned(),
            error,
        })
    }
}
