mod http_cache;
#[cfg(feature = "slowdown")]
mod random_slowdown;
mod requests_logging;
mod security_headers;

pub use http_cache::http_cache;
#[cfg(feature = "slowdown")]
pub use random_slowdown::slowdown_request;
pub use requests_logging::{log_requests, RequestsLoggingLevel};
pub use security_headers::security_headers;
