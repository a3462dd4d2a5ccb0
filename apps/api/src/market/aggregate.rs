//! Turns raw job postings into a `JobMarketSnapshot`.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::contains_term;
use crate::models::market::{JobMarketSnapshot, JobPosting, SalaryStats, SnapshotSource, TrendEntry};

const MAX_TRENDS: usize = 10;
const MAX_TREND_SCORE: u32 = 10;

/// Technical keywords scanned for in posting descriptions.
const DESCRIPTION_SKILLS: &[&str] = &[
    "Python", "Java", "JavaScript", "React", "Angular", "Vue", "Node.js",
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "Git",
    "SQL", "MongoDB", "PostgreSQL", "MySQL", "Redis",
    "Machine Learning", "AI", "Data Science", "Pandas", "NumPy",
    "TensorFlow", "PyTorch", "Scikit-learn", "Spark", "Hadoop",
    "DevOps", "CI/CD", "Terraform", "Ansible", "Linux", "Bash",
];

static SALARY_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$£€]?\s*(\d[\d,]*(?:\.\d+)?)\s*([kK])?").expect("salary regex")
});

/// Aggregates postings fetched at `fetched_at` into a live snapshot.
pub fn build_snapshot(
    title: &str,
    location: &str,
    postings: &[JobPosting],
    fetched_at: DateTime<Utc>,
) -> JobMarketSnapshot {
    let skills = extract_skills(postings);
    JobMarketSnapshot {
        title: title.to_string(),
        location: location.to_string(),
        job_count: u32::try_from(postings.len()).unwrap_or(u32::MAX),
        salary_stats: salary_stats(postings),
        trends: trends(&skills),
        skills,
        fetched_at,
        source: SnapshotSource::Live,
    }
}

/// Counts, per skill, the postings that mention it either in their explicit skill list
/// or in the description. Each posting counts at most once per skill; the first spelling
/// seen is kept.
pub fn extract_skills(postings: &[JobPosting]) -> BTreeMap<String, u32> {
    let mut counts: HashMap<String, (String, u32)> = HashMap::new();

    for posting in postings {
        let mut seen: HashSet<String> = HashSet::new();
        let explicit = posting
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        let scanned = DESCRIPTION_SKILLS
            .iter()
            .copied()
            .filter(|skill| contains_term(&posting.description, skill));

        for skill in explicit.chain(scanned) {
            let key = skill.to_lowercase();
            if !seen.insert(key.clone()) {
                continue;
            }
            counts
                .entry(key)
                .or_insert_with(|| (skill.to_string(), 0))
                .1 += 1;
        }
    }

    counts.into_values().collect()
}

/// Parses "$60,000 - $90,000", "80k-120k", "$95K" and similar into (min, max).
pub fn parse_salary(text: &str) -> Option<(f64, f64)> {
    let mut thousands = false;
    let values: Vec<f64> = SALARY_NUMBER
        .captures_iter(text)
        .filter_map(|cap| {
            if cap.get(2).is_some() {
                thousands = true;
            }
            cap.get(1)?.as_str().replace(',', "").parse::<f64>().ok()
        })
        .filter(|v| *v > 0.0)
        .take(2)
        .collect();

    let scale = if thousands { 1000.0 } else { 1.0 };
    match values.as_slice() {
        [single] => Some((single * scale, single * scale)),
        [low, high] => {
            let (low, high) = (low * scale, high * scale);
            Some((low.min(high), low.max(high)))
        }
        _ => None,
    }
}

pub fn salary_stats(postings: &[JobPosting]) -> SalaryStats {
    let ranges: Vec<(f64, f64)> = postings
        .iter()
        .filter_map(|p| p.salary.as_deref())
        .filter_map(parse_salary)
        .collect();

    if ranges.is_empty() {
        return SalaryStats::default();
    }

    let n = ranges.len() as f64;
    let average_min = ranges.iter().map(|r| r.0).sum::<f64>() / n;
    let average_max = ranges.iter().map(|r| r.1).sum::<f64>() / n;

    SalaryStats {
        count: ranges.len() as u32,
        average_min: round2(average_min),
        average_max: round2(average_max),
        overall_average: round2((average_min + average_max) / 2.0),
    }
}

/// Top skills by frequency, scored min(10, count).
pub fn trends(skills: &BTreeMap<String, u32>) -> Vec<TrendEntry> {
    let mut ranked: Vec<(&String, &u32)> = skills.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(MAX_TRENDS)
        .map(|(skill, count)| TrendEntry {
            skill: skill.clone(),
            count: *count,
            score: (*count).min(MAX_TREND_SCORE),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(description: &str, skills: &[&str], salary: Option<&str>) -> JobPosting {
        JobPosting {
            title: "Data Engineer".to_string(),
            description: description.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            salary: salary.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_skills_from_lists_and_descriptions() {
        let postings = vec![
            posting("Build pipelines in Python and Spark on AWS.", &["Python", "SQL"], None),
            posting("Maintain SQL warehouses.", &["sql", "ETL"], None),
            posting("Strong JavaScript required.", &[], None),
        ];
        let skills = extract_skills(&postings);

        assert_eq!(skills.get("Python"), Some(&1));
        assert_eq!(skills.get("SQL"), Some(&2));
        assert_eq!(skills.get("Spark"), Some(&1));
        assert_eq!(skills.get("AWS"), Some(&1));
        assert_eq!(skills.get("ETL"), Some(&1));
        assert_eq!(skills.get("JavaScript"), Some(&1));
        assert!(!skills.contains_key("Java"));
        assert!(!skills.contains_key("sql"));
    }

    #[test]
    fn test_parse_salary_formats() {
        assert_eq!(parse_salary("$60,000 - $90,000"), Some((60_000.0, 90_000.0)));
        assert_eq!(parse_salary("80k-120k"), Some((80_000.0, 120_000.0)));
        assert_eq!(parse_salary("$95K"), Some((95_000.0, 95_000.0)));
        assert_eq!(parse_salary("$120,000 - $100,000"), Some((100_000.0, 120_000.0)));
        assert_eq!(parse_salary("Not specified"), None);
        assert_eq!(parse_salary("Market rate"), None);
    }

    #[test]
    fn test_salary_stats_average_and_round() {
        let postings = vec![
            posting("", &[], Some("$60,000 - $90,000")),
            posting("", &[], Some("$70,001 - $100,000")),
            posting("", &[], Some("Competitive")),
            posting("", &[], None),
        ];
        let stats = salary_stats(&postings);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_min, 65_000.5);
        assert_eq!(stats.average_max, 95_000.0);
        assert_eq!(stats.overall_average, 80_000.25);
    }

    #[test]
    fn test_salary_stats_zero_when_none_parse() {
        let stats = salary_stats(&[posting("", &[], Some("DOE"))]);
        assert_eq!(stats, SalaryStats::default());
    }

    #[test]
    fn test_trends_top_ten_with_capped_score() {
        let mut skills: BTreeMap<String, u32> = (0..12).map(|i| (format!("S{i:02}"), 1)).collect();
        skills.insert("Python".to_string(), 14);

        let trends = trends(&skills);
        assert_eq!(trends.len(), 10);
        assert_eq!(trends[0].skill, "Python");
        assert_eq!(trends[0].count, 14);
        assert_eq!(trends[0].score, 10);
        assert_eq!(trends[1].skill, "S00");
    }

    #[test]
    fn test_build_snapshot_counts_postings() {
        let now = Utc::now();
        let postings = vec![
            posting("Python everywhere", &[], Some("$100k")),
            posting("", &["Python"], None),
        ];
        let snapshot = build_snapshot("data engineer", "Austin, TX", &postings, now);
        assert_eq!(snapshot.job_count, 2);
        assert_eq!(snapshot.skills.get("Python"), Some(&2));
        assert_eq!(snapshot.salary_stats.count, 1);
        assert_eq!(snapshot.source, SnapshotSource::Live);
        assert_eq!(snapshot.fetched_at, now);
    }
}
