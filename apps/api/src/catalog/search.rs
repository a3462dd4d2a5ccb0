//! Catalog search: by term, department or skill, plus the relationships among the hits.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::course::Course;

/// Courses sharing at least this many skills are reported as related.
const RELATED_MIN_SHARED_SKILLS: usize = 3;

/// Search criteria. When several are set, the first in field order wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(default, alias = "search_term")]
    pub term: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
}

impl CatalogQuery {
    pub fn is_empty(&self) -> bool {
        [&self.term, &self.department, &self.skill]
            .iter()
            .all(|c| c.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Prerequisite,
    Related,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRelationship {
    pub kind: RelationshipKind,
    /// For prerequisites: the course that requires `to`.
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub shared_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSearchResult {
    pub courses: Vec<Course>,
    pub skills: BTreeMap<String, Vec<String>>,
    pub relationships: Vec<CourseRelationship>,
}

/// Lowercase skill → course codes, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl SkillIndex {
    pub fn build(courses: &[Course]) -> Self {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for course in courses {
            for skill in &course.skills {
                let key = skill.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                let codes = entries.entry(key).or_default();
                if !codes.contains(&course.code) {
                    codes.push(course.code.clone());
                }
            }
        }
        Self { entries }
    }

    /// Codes of courses teaching `skill`: exact index hits, then partial matches in
    /// either direction.
    pub fn lookup(&self, skill: &str) -> BTreeSet<String> {
        let needle = skill.trim().to_lowercase();
        if needle.is_empty() {
            return BTreeSet::new();
        }
        self.entries
            .iter()
            .filter(|(indexed, _)| indexed.contains(&needle) || needle.contains(indexed.as_str()))
            .flat_map(|(_, codes)| codes.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub fn search(courses: &[Course], index: &SkillIndex, query: &CatalogQuery) -> CatalogSearchResult {
    let criterion = |c: &Option<String>| {
        c.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    };

    let hits: Vec<Course> = if let Some(term) = criterion(&query.term) {
        courses
            .iter()
            .filter(|c| {
                c.title.to_lowercase().contains(&term)
                    || c.description.to_lowercase().contains(&term)
                    || c.code.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    } else if let Some(department) = criterion(&query.department) {
        courses
            .iter()
            .filter(|c| {
                c.department_prefix().to_lowercase() == department
                    || c.department.to_lowercase().contains(&department)
            })
            .cloned()
            .collect()
    } else if let Some(skill) = criterion(&query.skill) {
        let codes = index.lookup(&skill);
        courses
            .iter()
            .filter(|c| codes.contains(&c.code))
            .cloned()
            .collect()
    } else {
        vec![]
    };

    CatalogSearchResult {
        skills: hits
            .iter()
            .map(|c| (c.code.clone(), c.skills.clone()))
            .collect(),
        relationships: relationships(&hits),
        courses: hits,
    }
}

/// Prerequisite edges of every course, then "related" pairs sharing enough skills.
pub fn relationships(courses: &[Course]) -> Vec<CourseRelationship> {
    let mut out: Vec<CourseRelationship> = courses
        .iter()
        .flat_map(|course| {
            course.prerequisites.iter().map(move |prereq| CourseRelationship {
                kind: RelationshipKind::Prerequisite,
                from: course.code.clone(),
                to: prereq.clone(),
                shared_skills: vec![],
            })
        })
        .collect();

    let skill_sets: Vec<HashSet<String>> = courses
        .iter()
        .map(|c| c.skills.iter().map(|s| s.to_lowercase()).collect())
        .collect();

    for i in 0..courses.len() {
        for j in (i + 1)..courses.len() {
            let mut shared: Vec<String> = courses[i]
                .skills
                .iter()
                .filter(|s| skill_sets[j].contains(&s.to_lowercase()))
                .cloned()
                .collect();
            if shared.len() >= RELATED_MIN_SHARED_SKILLS {
                shared.sort();
                out.push(CourseRelationship {
                    kind: RelationshipKind::Related,
                    from: courses[i].code.clone(),
                    to: courses[j].code.clone(),
                    shared_skills: shared,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn course(code: &str, dept: &str, skills: &[&str], prereqs: &[&str]) -> Course {
        Course {
            code: code.to_string(),
            title: format!("{code} title"),
            description: String::new(),
            department: dept.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            prerequisites: prereqs.iter().map(|s| s.to_string()).collect(),
            credit_hours: None,
        }
    }

    fn query(term: Option<&str>, department: Option<&str>, skill: Option<&str>) -> CatalogQuery {
        CatalogQuery {
            term: term.map(str::to_string),
            department: department.map(str::to_string),
            skill: skill.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_query_detection() {
        assert!(CatalogQuery::default().is_empty());
        assert!(query(Some("  "), None, Some("")).is_empty());
        assert!(!query(None, None, Some("sql")).is_empty());
    }

    #[test]
    fn test_search_by_term_matches_title_and_code() {
        let catalog = StaticCatalog::new();
        let courses = catalog.courses();
        let index = SkillIndex::build(courses);

        let result = search(courses, &index, &query(Some("database"), None, None));
        assert_eq!(result.courses.len(), 1);
        assert_eq!(result.courses[0].code, "CS 4347");

        let result = search(courses, &index, &query(Some("fin 43"), None, None));
        assert_eq!(result.courses[0].code, "FIN 4300");
    }

    #[test]
    fn test_search_by_department() {
        let catalog = StaticCatalog::new();
        let courses = catalog.courses();
        let index = SkillIndex::build(courses);

        let result = search(courses, &index, &query(None, Some("mktg"), None));
        let codes: Vec<&str> = result.courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["MKTG 3300", "MKTG 4360"]);
        assert_eq!(result.skills["MKTG 4360"][0], "Marketing Analytics");
    }

    #[test]
    fn test_search_by_skill_exact_and_partial() {
        let courses = vec![
            course("CS 1", "CS", &["SQL"], &[]),
            course("CS 2", "CS", &["PostgreSQL"], &[]),
            course("CS 3", "CS", &["Python"], &[]),
        ];
        let index = SkillIndex::build(&courses);
        assert_eq!(index.len(), 3);

        let result = search(&courses, &index, &query(None, None, Some("sql")));
        let codes: Vec<&str> = result.courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CS 1", "CS 2"]);
    }

    #[test]
    fn test_term_takes_precedence_over_other_criteria() {
        let courses = vec![
            course("CS 1", "CS", &["SQL"], &[]),
            course("FIN 1", "FIN", &["Excel"], &[]),
        ];
        let index = SkillIndex::build(&courses);
        let result = search(&courses, &index, &query(Some("fin"), Some("CS"), Some("sql")));
        assert_eq!(result.courses.len(), 1);
        assert_eq!(result.courses[0].code, "FIN 1");
    }

    #[test]
    fn test_relationships_prerequisites_and_related() {
        let courses = vec![
            course("CS 1", "CS", &["Python", "SQL", "Spark", "Git"], &[]),
            course("CS 2", "CS", &["python", "sql", "spark"], &["CS 1"]),
            course("CS 3", "CS", &["Python", "SQL"], &[]),
        ];
        let rels = relationships(&courses);

        assert_eq!(
            rels[0],
            CourseRelationship {
                kind: RelationshipKind::Prerequisite,
                from: "CS 2".to_string(),
                to: "CS 1".to_string(),
                shared_skills: vec![],
            }
        );
        let related: Vec<&CourseRelationship> = rels
            .iter()
            .filter(|r| r.kind == RelationshipKind::Related)
            .collect();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].from, "CS 1");
        assert_eq!(related[0].to, "CS 2");
        assert_eq!(related[0].shared_skills, vec!["Python", "SQL", "Spark"]);
    }
}
