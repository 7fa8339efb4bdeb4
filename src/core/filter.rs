//! Client-side filtering of declarations and users

use chrono::NaiveDate;

use crate::core::api::PollutionQuery;
use crate::core::models::{PollutionDeclaration, PollutionLevel, PollutionType, User, parse_day};

/// Filter applied to the declaration list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationFilter {
    /// Matched against title, address and description
    pub search_text: String,
    pub pollution_type: Option<PollutionType>,
    pub level: Option<PollutionLevel>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl DeclarationFilter {
    /// Build from raw form inputs; empty or unknown values do not filter
    pub fn from_inputs(search: &str, type_label: &str, level_label: &str, from: &str, to: &str) -> Self {
        Self {
            search_text: search.trim().to_string(),
            pollution_type: PollutionType::from_label(type_label),
            level: PollutionLevel::from_label(level_label),
            date_from: parse_day(from),
            date_to: parse_day(to),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.pollution_type.is_none()
            && self.level.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    pub fn matches(&self, declaration: &PollutionDeclaration) -> bool {
        self.matches_text(declaration)
            && self
                .pollution_type
                .is_none_or(|t| declaration.pollution_type == t)
            && self.level.is_none_or(|l| declaration.niveau == l)
            && self.matches_dates(declaration)
    }

    fn matches_text(&self, declaration: &PollutionDeclaration) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(declaration.titre.as_str()),
            declaration.adresse.as_deref(),
            Some(declaration.description.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_dates(&self, declaration: &PollutionDeclaration) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        // An unreadable date cannot satisfy a bound
        let Some(day) = declaration.observation_date() else {
            return false;
        };
        self.date_from.is_none_or(|from| day >= from) && self.date_to.is_none_or(|to| day <= to)
    }

    /// Declarations that pass the filter, in their original order
    pub fn apply(&self, declarations: &[PollutionDeclaration]) -> Vec<PollutionDeclaration> {
        declarations
            .iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect()
    }

    /// Server-side part of the filter (text search stays local)
    pub fn to_query(&self) -> PollutionQuery {
        PollutionQuery {
            pollution_type: self.pollution_type,
            niveau: self.level,
            date_from: self.date_from.map(|d| d.format("%Y-%m-%d").to_string()),
            date_to: self.date_to.map(|d| d.format("%Y-%m-%d").to_string()),
            utilisateur_id: None,
        }
    }
}

/// Admin user search over names, email and username
pub fn filter_users(users: &[User], query: &str) -> Vec<User> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| {
            [&u.nom, &u.prenom, &u.email, &u.nom_utilisateur]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
