//! Deterministic synthetic snapshots, used whenever live market data is unavailable.

use chrono::{DateTime, Utc};

use crate::matching::archetypes::ArchetypeTable;
use crate::models::market::{JobMarketSnapshot, SalaryStats, SnapshotSource};

/// Job count reported by synthetic snapshots.
pub const SYNTHETIC_JOB_COUNT: u32 = 20;

/// Builds a snapshot from the archetype matching `title`, or the default archetype.
///
/// Never empty: every archetype carries at least one weighted skill. Trends are left
/// empty since nothing was observed; insight extraction substitutes its reference table.
pub fn synthesize_snapshot(
    archetypes: &ArchetypeTable,
    title: &str,
    location: &str,
    now: DateTime<Utc>,
) -> JobMarketSnapshot {
    let archetype = archetypes.resolve(title);
    let band = archetype.salary;

    JobMarketSnapshot {
        title: title.to_string(),
        location: location.to_string(),
        job_count: SYNTHETIC_JOB_COUNT,
        skills: archetype
            .skills
            .iter()
            .map(|s| (s.name.clone(), s.frequency))
            .collect(),
        salary_stats: SalaryStats {
            count: 1,
            average_min: band.min,
            average_max: band.max,
            overall_average: (band.min + band.max) / 2.0,
        },
        trends: vec![],
        fetched_at: now,
        source: SnapshotSource::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_snapshot_uses_matching_archetype() {
        let table = ArchetypeTable::builtin();
        let now = Utc::now();
        let snapshot = synthesize_snapshot(&table, "Senior Data Scientist", "Remote", now);

        assert_eq!(snapshot.source, SnapshotSource::Synthetic);
        assert_eq!(snapshot.job_count, SYNTHETIC_JOB_COUNT);
        assert_eq!(snapshot.skills.get("Python"), Some(&5));
        assert_eq!(snapshot.skills.get("Machine Learning"), Some(&4));
        assert_eq!(snapshot.salary_stats.overall_average, 105_000.0);
        assert_eq!(snapshot.fetched_at, now);
        assert!(snapshot.trends.is_empty());
    }

    #[test]
    fn test_unknown_title_gets_default_archetype() {
        let table = ArchetypeTable::builtin();
        let snapshot = synthesize_snapshot(&table, "Pastry Chef", "", Utc::now());
        assert!(!snapshot.skills.is_empty());
        assert!(snapshot.skills.contains_key("Communication"));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let table = ArchetypeTable::builtin();
        let now = Utc::now();
        let a = synthesize_snapshot(&table, "devops engineer", "Denver", now);
        let b = synthesize_snapshot(&table, "devops engineer", "Denver", now);
        assert_eq!(a, b);
    }
}
