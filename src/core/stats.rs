//! Aggregates shown on the recap page and the admin dashboard

use chrono::{Duration, NaiveDate};

use crate::core::models::{PollutionDeclaration, PollutionLevel, PollutionType, User};

/// Window counted as "this week" on the dashboard
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Totals over a list of declarations
#[derive(Debug, Clone, PartialEq)]
pub struct PollutionStats {
    pub total: usize,
    /// Every type, including those with no declaration
    pub by_type: Vec<(PollutionType, usize)>,
    pub by_level: Vec<(PollutionLevel, usize)>,
}

impl PollutionStats {
    pub fn compute(declarations: &[PollutionDeclaration]) -> Self {
        Self {
            total: declarations.len(),
            by_type: PollutionType::ALL
                .into_iter()
                .map(|t| (t, declarations.iter().filter(|d| d.pollution_type == t).count()))
                .collect(),
            by_level: count_by_level(declarations),
        }
    }

    pub fn count_type(&self, pollution_type: PollutionType) -> usize {
        lookup(&self.by_type, pollution_type)
    }

    pub fn count_level(&self, level: PollutionLevel) -> usize {
        lookup(&self.by_level, level)
    }

    /// Share of `count` in the total, as a whole percentage
    pub fn percent(&self, count: usize) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((count as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

/// Admin dashboard figures
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_pollutions: usize,
    pub by_level: Vec<(PollutionLevel, usize)>,
    /// Declarations observed within the last [`RECENT_WINDOW_DAYS`] days
    pub recent_pollutions: usize,
}

impl DashboardStats {
    pub fn compute(users: &[User], declarations: &[PollutionDeclaration], today: NaiveDate) -> Self {
        let since = today - Duration::days(RECENT_WINDOW_DAYS);
        Self {
            total_users: users.len(),
            total_pollutions: declarations.len(),
            by_level: count_by_level(declarations),
            recent_pollutions: declarations
                .iter()
                .filter(|d| d.observation_date().is_some_and(|day| day >= since))
                .count(),
        }
    }

    pub fn count_level(&self, level: PollutionLevel) -> usize {
        lookup(&self.by_level, level)
    }
}

fn count_by_level(declarations: &[PollutionDeclaration]) -> Vec<(PollutionLevel, usize)> {
    PollutionLevel::ALL
        .into_iter()
        .map(|l| (l, declarations.iter().filter(|d| d.niveau == l).count()))
        .collect()
}

fn lookup<K: PartialEq>(counts: &[(K, usize)], key: K) -> usize {
    counts
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(t: PollutionType, l: PollutionLevel, date: &str) -> PollutionDeclaration {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "titre": "x",
            "type": t,
            "description": "description",
            "dateObservation": date,
            "niveau": l,
            "adresse": "Rue"
        }))
        .unwrap()
    }

    #[test]
    fn test_recap_counts_every_category() {
        let list = vec![
            declaration(PollutionType::Eau, PollutionLevel::Faible, "2024-01-01"),
            declaration(PollutionType::Eau, PollutionLevel::Eleve, "2024-01-02"),
            declaration(PollutionType::Air, PollutionLevel::Eleve, "2024-01-03"),
        ];
        let stats = PollutionStats::compute(&list);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_type.len(), 6);
        assert_eq!(stats.count_type(PollutionType::Eau), 2);
        assert_eq!(stats.count_type(PollutionType::DepotSauvage), 0);
        assert_eq!(stats.count_level(PollutionLevel::Eleve), 2);
        assert_eq!(stats.count_level(PollutionLevel::Moyen), 0);
        assert_eq!(stats.percent(2), 67);
    }

    #[test]
    fn test_empty_recap() {
        let stats = PollutionStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percent(0), 0);
    }

    #[test]
    fn test_dashboard_recent_window() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let list = vec![
            declaration(PollutionType::Eau, PollutionLevel::Eleve, "2024-06-14"),
            declaration(PollutionType::Air, PollutionLevel::Moyen, "2024-06-08"),
            declaration(PollutionType::Air, PollutionLevel::Moyen, "2024-06-07"),
            declaration(PollutionType::Autre, PollutionLevel::Faible, "invalide"),
        ];

        let stats = DashboardStats::compute(&[], &list, today);

        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_pollutions, 4);
        assert_eq!(stats.recent_pollutions, 2);
        assert_eq!(stats.count_level(PollutionLevel::Eleve), 1);
    }
}
