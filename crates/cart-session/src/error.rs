use intent_parser::Size;
use thiserror::Error;

pub type Result<T, E = CartError> = core::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("no cart line for {name} ({size})")]
    LineNotFound { name: String, size: Size },
    #[error("unknown product: {0}")]
    UnknownProduct(String),
}
