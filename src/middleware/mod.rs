//! Middleware components for HTTP request processing.
//!
//! Cross-cutting concerns layered around the router: caller identity and role, client IP
//! resolution, per-IP rate limiting and security headers.

pub mod auth;
pub mod ip;
pub mod rate_limit;
pub mod security_headers;

pub use auth::{LoginShelter, LoginUser, LoginVolunteer, Role};
pub use rate_limit::{EndpointRateLimiter, RateLimiter};
