//! Route layer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
