use thiserror::Error;

/// Errors from the core crate.
///
/// Store operations never fail; only encoding the persisted record can.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to encode menu state: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
