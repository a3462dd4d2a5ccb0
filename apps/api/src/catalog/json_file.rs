use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::catalog::CourseCatalogSource;
use crate::errors::CollaboratorError;
use crate::models::course::Course;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { courses: Vec<Course> },
    Bare(Vec<Course>),
}

/// A catalog exported to JSON, either `{"courses": [...]}` or a bare array.
/// Re-read on every call so an updated export is picked up without a restart.
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CourseCatalogSource for JsonFileCatalog {
    async fn all(&self) -> Result<Vec<Course>, CollaboratorError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CollaboratorError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;

        let file: CatalogFile = serde_json::from_str(&raw).map_err(|e| {
            CollaboratorError::Malformed(format!("{}: {e}", self.path.display()))
        })?;

        Ok(match file {
            CatalogFile::Wrapped { courses } | CatalogFile::Bare(courses) => courses,
        })
    }

    fn describe(&self) -> &'static str {
        "json_file"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_wrapped_catalog_with_legacy_code_field() {
        let file = write_temp(
            r#"{"courses":[
                {"course_code":"CS 4375","title":"Intro to Machine Learning","skills":["Python"]},
                {"code":"FIN 3320","title":"Business Finance","credit_hours":3}
            ]}"#,
        );
        let courses = JsonFileCatalog::new(file.path()).all().await.unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code, "CS 4375");
        assert_eq!(courses[0].skills, vec!["Python"]);
        assert!(courses[1].skills.is_empty());
    }

    #[tokio::test]
    async fn test_reads_bare_array() {
        let file = write_temp(r#"[{"code":"MATH 2418","title":"Linear Algebra"}]"#);
        let courses = JsonFileCatalog::new(file.path()).all().await.unwrap();
        assert_eq!(courses[0].title, "Linear Algebra");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonFileCatalog::new(dir.path().join("nope.json")).all().await;
        assert!(matches!(result, Err(CollaboratorError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_bad_json_is_malformed() {
        let file = write_temp("{ not json");
        let result = JsonFileCatalog::new(file.path()).all().await;
        assert!(matches!(result, Err(CollaboratorError::Malformed(_))));
    }
}
