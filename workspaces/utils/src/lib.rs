pub mod logging;

pub use logging::{init_tracing, DEFAULT_LOG_FILTER};
