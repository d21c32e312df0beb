//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS (only when app origins are configured)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the request span and the Sentry scope)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
