//! Market data files
//!
//! Loads markets recorded elsewhere so they can be replayed in place of the
//! synthetic generator, and saves generated batches for later replay. The
//! file is JSON: either a bare array of markets or an object with a `markets`
//! array. Saved files are always a bare array.

use crate::market::Market;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Market file errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode markets: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MarketFile {
    List(Vec<Market>),
    Wrapped { markets: Vec<Market> },
}

/// Parse markets from a JSON string
pub fn parse_markets(json: &str) -> Result<Vec<Market>, serde_json::Error> {
    let file: MarketFile = serde_json::from_str(json)?;
    Ok(match file {
        MarketFile::List(markets) | MarketFile::Wrapped { markets } => markets,
    })
}

/// Load markets from a JSON file
pub fn load_markets(path: impl AsRef<Path>) -> Result<Vec<Market>, DataError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let markets = parse_markets(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), markets = markets.len(), "Loaded market file");
    Ok(markets)
}

/// Save markets as a pretty JSON array, creating parent directories
pub fn save_markets(path: impl AsRef<Path>, markets: &[Market]) -> Result<(), DataError> {
    let path = path.as_ref();
    let write_err = |source| DataError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string_pretty(markets).map_err(DataError::Encode)?;
    std::fs::write(path, json).map_err(write_err)?;

    tracing::info!(path = %path.display(), markets = markets.len(), "Saved market file");
    Ok(())
}
