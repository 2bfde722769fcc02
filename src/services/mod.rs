// src/services/mod.rs
//
// Shared services used across domain modules

pub mod google;
pub mod monitoring;

pub use google::{GoogleTokenVerifier, TokenVerifier};
