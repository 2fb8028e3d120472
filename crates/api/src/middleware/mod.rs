//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//! 5. Rate limiting on credential endpoints (governor)
//!
//! Bearer authentication is an extractor ([`RequireAuth`]) rather than a
//! layer, so public and protected routes can share a path prefix.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::RequireAuth;
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
