//! Custom Axum extractors.

pub mod app_json;
pub mod uuid_path;

pub use app_json::AppJson;
pub use uuid_path::UuidPath;
