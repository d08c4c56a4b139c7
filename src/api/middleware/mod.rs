//! API middleware components

pub mod logging;
pub mod panic;

pub use logging::{logging_middleware, truncate_for_log};
pub use panic::panic_response;
