//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors)
//! 2. `TraceLayer` (request span with method, URI, and request ID)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
