//! # Recipes Module
//!
//! Public recipe submission, listing and lookup. Each recipe is stored as
//! an indexed title plus a JSON blob with every submitted field.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::recipes_routes;
