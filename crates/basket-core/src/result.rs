//! Result type aliases for the basket service.

use crate::BasketError;

/// A specialized `Result` type for basket operations.
pub type BasketResult<T> = Result<T, BasketError>;
