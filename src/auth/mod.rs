//! # Auth Module
//!
//! This module handles identity resolution for incoming requests:
//! - Bearer ID tokens verified against Google's tokeninfo endpoint
//! - Cloudflare Access JWTs carried in the `CF_Authorization` cookie
//! - Legacy `google_token` / `authToken` cookies
//! - AuthedUser extractor for protected routes

pub mod access_token;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod resolver;
pub mod routes;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
