use thiserror::Error;

pub type Result<T, E = IntentError> = core::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("catalog has no products")]
    EmptyCatalog,
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),
    #[error("product {0} lists no sizes")]
    NoSizes(String),
    #[error("unknown size code: {0}")]
    UnknownSize(String),
}
