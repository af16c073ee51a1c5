pub mod client;
pub mod record;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
    #[error("decode error: {0}")]
    Decode(String),
}
