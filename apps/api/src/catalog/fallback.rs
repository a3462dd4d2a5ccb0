use async_trait::async_trait;

use crate::catalog::CourseCatalogSource;
use crate::errors::CollaboratorError;
use crate::models::course::Course;

/// Built-in course list. Served when no catalog is configured and substituted by the
/// orchestrator whenever the configured catalog fails or comes back empty.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    courses: Vec<Course>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self {
            courses: builtin_courses(),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseCatalogSource for StaticCatalog {
    async fn all(&self) -> Result<Vec<Course>, CollaboratorError> {
        Ok(self.courses.clone())
    }

    fn describe(&self) -> &'static str {
        "static"
    }
}

fn course(
    code: &str,
    title: &str,
    department: &str,
    description: &str,
    skills: &[&str],
    prerequisites: &[&str],
) -> Course {
    Course {
        code: code.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        department: department.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        credit_hours: Some(3),
    }
}

fn builtin_courses() -> Vec<Course> {
    vec![
        course(
            "CS 1337",
            "Computer Science I",
            "CS",
            "Introduction to programming, problem solving and object-oriented design.",
            &["Programming", "C++", "Problem Solving", "Git"],
            &[],
        ),
        course(
            "CS 2336",
            "Computer Science II",
            "CS",
            "Object-oriented programming in Java with data abstraction.",
            &["Java", "Programming", "Object-Oriented Design"],
            &["CS 1337"],
        ),
        course(
            "CS 3345",
            "Data Structures and Introduction to Algorithmic Analysis",
            "CS",
            "Analysis of algorithms, lists, trees, graphs, sorting and searching.",
            &["Algorithms", "Data Structures", "Java", "Problem Solving"],
            &["CS 2336"],
        ),
        course(
            "CS 4347",
            "Database Systems",
            "CS",
            "Relational model, SQL, schema design and transaction processing.",
            &["SQL", "Database Design", "PostgreSQL", "Data Modeling"],
            &["CS 3345"],
        ),
        course(
            "CS 4375",
            "Introduction to Machine Learning",
            "CS",
            "Supervised and unsupervised learning, model evaluation and neural networks.",
            &["Machine Learning", "Python", "Statistics", "Pandas", "Scikit-learn"],
            &["CS 3345", "STAT 3360"],
        ),
        course(
            "CS 4485",
            "Computer Science Project",
            "CS",
            "Team software project using agile practices, Git and CI/CD.",
            &["Agile", "Git", "CI/CD", "Software Engineering", "Docker"],
            &["CS 3345"],
        ),
        course(
            "CS 6350",
            "Big Data Management and Analytics",
            "CS",
            "Distributed data processing with Hadoop, Spark and cloud data platforms.",
            &["Spark", "Hadoop", "SQL", "Python", "Cloud", "ETL"],
            &["CS 4347"],
        ),
        course(
            "CS 6385",
            "Cloud Computing and DevOps",
            "CS",
            "Containers, orchestration, infrastructure as code and cloud deployment.",
            &["Docker", "Kubernetes", "AWS", "Terraform", "Linux", "CI/CD"],
            &["CS 3345"],
        ),
        course(
            "SE 3354",
            "Software Engineering",
            "SE",
            "Requirements, design, testing and maintenance of software systems.",
            &["Software Engineering", "Agile", "Testing", "JavaScript"],
            &["CS 2336"],
        ),
        course(
            "STAT 3360",
            "Probability and Statistics for Management",
            "STAT",
            "Descriptive statistics, probability, distributions and hypothesis testing.",
            &["Statistics", "Probability", "Excel", "Data Analysis"],
            &[],
        ),
        course(
            "STAT 4355",
            "Applied Linear Statistical Models",
            "STAT",
            "Regression, model selection and statistical computing in R.",
            &["Regression", "R", "Statistics", "Statistical Modeling"],
            &["STAT 3360"],
        ),
        course(
            "MATH 2418",
            "Linear Algebra",
            "MATH",
            "Vector spaces, matrices, eigenvalues and applications.",
            &["Linear Algebra", "Mathematics"],
            &[],
        ),
        course(
            "BA 3351",
            "Business Analytics and Visualization",
            "BA",
            "Business intelligence, dashboards and data visualization with Tableau.",
            &["Tableau", "Data Visualization", "Excel", "Data Analysis", "Power BI"],
            &["STAT 3360"],
        ),
        course(
            "FIN 3320",
            "Business Finance",
            "FIN",
            "Corporate financial management, valuation and capital budgeting.",
            &["Financial Analysis", "Valuation", "Excel", "Corporate Finance"],
            &["ACCT 2301"],
        ),
        course(
            "FIN 4300",
            "Investment Management",
            "FIN",
            "Portfolio theory, securities valuation and risk management.",
            &["Portfolio Analysis", "Risk Management", "Financial Modeling", "Valuation"],
            &["FIN 3320"],
        ),
        course(
            "ACCT 2301",
            "Introductory Financial Accounting",
            "ACCT",
            "Financial statements, accrual accounting and reporting.",
            &["Accounting", "Financial Reporting", "Excel"],
            &[],
        ),
        course(
            "MKTG 3300",
            "Principles of Marketing",
            "MKTG",
            "Consumer behavior, market research and digital marketing strategy.",
            &["Marketing Strategy", "Market Research", "Digital Marketing", "SEO"],
            &[],
        ),
        course(
            "MKTG 4360",
            "Marketing Analytics",
            "MKTG",
            "Web analytics, A/B testing and campaign measurement.",
            &["Marketing Analytics", "Google Analytics", "A/B Testing", "SQL"],
            &["MKTG 3300", "STAT 3360"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[tokio::test]
    async fn test_static_catalog_is_non_empty_and_unique() {
        let courses = StaticCatalog::new().all().await.unwrap();
        assert!(courses.len() >= 15);

        let codes: HashSet<&str> = courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes.len(), courses.len());
        assert!(courses.iter().all(|c| !c.skills.is_empty()));
    }

    #[test]
    fn test_prerequisites_reference_catalog_courses() {
        let catalog = StaticCatalog::new();
        let codes: HashSet<&str> = catalog.courses().iter().map(|c| c.code.as_str()).collect();
        for course in catalog.courses() {
            for prereq in &course.prerequisites {
                assert!(codes.contains(prereq.as_str()), "{} -> {prereq}", course.code);
            }
        }
    }
}
