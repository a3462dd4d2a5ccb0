//! Course catalog sources and search.
//!
//! The matching engine only ever reads a `Vec<Course>`. Where it comes from (Postgres,
//! a JSON file, or the built-in list) is decided once in `main`.

pub mod fallback;
pub mod json_file;
pub mod postgres;
pub mod search;

use async_trait::async_trait;

use crate::errors::CollaboratorError;
use crate::models::course::Course;

pub use fallback::StaticCatalog;
pub use json_file::JsonFileCatalog;
pub use postgres::PgCourseCatalog;

/// Read-only access to the full course catalog, skills pre-extracted.
#[async_trait]
pub trait CourseCatalogSource: Send + Sync {
    async fn all(&self) -> Result<Vec<Course>, CollaboratorError>;

    /// Short label for logs and the capabilities endpoint.
    fn describe(&self) -> &'static str;
}
