//! One-shot loading of a JSON seed document into the graph store.

use std::path::{Path, PathBuf};

use thiserror::Error;

use assetviz_core::ValidationError;
use assetviz_graph::load::{SeedFile, SeedSummary};
use assetviz_graph::{GraphClient, GraphConfig, GraphError};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Read, parse and validate a seed document without touching the store.
pub fn read_seed(path: &Path) -> Result<SeedFile, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let seed = SeedFile::from_json(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    seed.validate()?;
    Ok(seed)
}

/// Connect to the configured store and write the document at `path`.
pub async fn load(config: &GraphConfig, path: &Path) -> Result<SeedSummary, SeedError> {
    let seed = read_seed(path)?;
    let client = GraphClient::connect(config).await?;
    Ok(client.load_seed(&config.namespace, &seed).await?)
}
