use async_trait::async_trait;
use sqlx::PgPool;

use crate::catalog::CourseCatalogSource;
use crate::errors::CollaboratorError;
use crate::models::course::{Course, CourseRow};

/// Reads the `courses` table:
///
/// ```sql
/// CREATE TABLE courses (
///     code          TEXT PRIMARY KEY,
///     title         TEXT NOT NULL,
///     description   TEXT,
///     department    TEXT,
///     skills        TEXT[] NOT NULL DEFAULT '{}',
///     prerequisites TEXT[] NOT NULL DEFAULT '{}',
///     credit_hours  INTEGER
/// );
/// ```
pub struct PgCourseCatalog {
    pool: PgPool,
}

impl PgCourseCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseCatalogSource for PgCourseCatalog {
    async fn all(&self) -> Result<Vec<Course>, CollaboratorError> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT code, title, description, department, skills, prerequisites, credit_hours
            FROM courses
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    fn describe(&self) -> &'static str {
        "postgres"
    }
}
