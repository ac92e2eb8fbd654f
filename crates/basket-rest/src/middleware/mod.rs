//! HTTP middleware.

mod logging;

pub use logging::{current_request_id, logging_middleware, REQUEST_ID_HEADER};
