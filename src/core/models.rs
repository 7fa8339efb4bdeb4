//! Domain models exchanged with the pollution REST backend
//!
//! Field names follow the backend JSON contract (camelCase, French vocabulary).

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Helper module for Option<Option<T>> fields in partial updates:
/// - `None` -> field omitted (leave unchanged)
/// - `Some(None)` -> field sent as null (clear it)
/// - `Some(Some(value))` -> field sent with the value
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        // Only called when the field is present
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Access role. A user without an explicit role is a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[display("user")]
    User,
    #[display("admin")]
    Admin,
}

impl Role {
    /// The role an admin toggle switches to
    pub fn toggled(self) -> Self {
        match self {
            Role::User => Role::Admin,
            Role::Admin => Role::User,
        }
    }
}

/// User account as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub nom_utilisateur: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modification: Option<String>,
}

impl User {
    /// Effective role (missing role means `user`)
    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// "Prénom Nom"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

/// Registration payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub mot_de_passe: String,
    pub nom_utilisateur: String,
}

/// Partial user update (profile edit or admin role change)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom_utilisateur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserUpdate {
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifiant: String,
    pub mot_de_passe: String,
}

/// Login and register response. The refresh token never appears here:
/// the backend sets it as an HTTP-only cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub access_token_expires_in: String,
}

/// Refresh response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub access_token_expires_in: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Generic `{ "message": ... }` body used by the backend for errors and acks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Pollution declarations
// ============================================================================

/// Pollution category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum PollutionType {
    #[display("Plastique")]
    Plastique,
    #[display("Chimique")]
    Chimique,
    #[serde(rename = "Dépôt sauvage")]
    #[display("Dépôt sauvage")]
    DepotSauvage,
    #[display("Eau")]
    Eau,
    #[display("Air")]
    Air,
    #[display("Autre")]
    Autre,
}

impl PollutionType {
    pub const ALL: [PollutionType; 6] = [
        PollutionType::Plastique,
        PollutionType::Chimique,
        PollutionType::DepotSauvage,
        PollutionType::Eau,
        PollutionType::Air,
        PollutionType::Autre,
    ];

    /// Parse the wire label (as shown in select inputs)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.to_string() == label)
    }
}

/// Severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum PollutionLevel {
    #[display("Faible")]
    Faible,
    #[display("Moyen")]
    Moyen,
    #[serde(rename = "Élevé")]
    #[display("Élevé")]
    Eleve,
}

impl PollutionLevel {
    pub const ALL: [PollutionLevel; 3] = [
        PollutionLevel::Faible,
        PollutionLevel::Moyen,
        PollutionLevel::Eleve,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.to_string() == label)
    }

    /// CSS modifier used by level badges
    pub fn css_class(self) -> &'static str {
        match self {
            PollutionLevel::Faible => "level-faible",
            PollutionLevel::Moyen => "level-moyen",
            PollutionLevel::Eleve => "level-eleve",
        }
    }
}

/// Which location signals a declaration carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Gps,
    Address,
    Both,
}

/// Where a declaration photo comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoSource {
    #[default]
    Url,
    Upload,
}

/// Prefix of photo paths uploaded to the backend
pub const UPLOADS_PREFIX: &str = "/uploads/";

impl PhotoSource {
    pub fn detect(photo_url: Option<&str>) -> Self {
        match photo_url {
            Some(url) if url.starts_with(UPLOADS_PREFIX) => PhotoSource::Upload,
            _ => PhotoSource::Url,
        }
    }
}

fn has_address(adresse: Option<&str>) -> bool {
    adresse.is_some_and(|a| !a.trim().is_empty())
}

fn has_gps(latitude: Option<f64>, longitude: Option<f64>) -> bool {
    matches!((latitude, longitude), (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite())
}

/// Classify the location signals; `None` means the declaration has no usable location
pub fn location_kind(
    adresse: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Option<LocationKind> {
    match (has_address(adresse), has_gps(latitude, longitude)) {
        (true, true) => Some(LocationKind::Both),
        (false, true) => Some(LocationKind::Gps),
        (true, false) => Some(LocationKind::Address),
        (false, false) => None,
    }
}

/// Creation / full update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionPayload {
    pub titre: String,
    #[serde(rename = "type")]
    pub pollution_type: PollutionType,
    pub description: String,
    pub date_observation: String,
    pub niveau: PollutionLevel,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl PollutionPayload {
    pub fn location_kind(&self) -> Option<LocationKind> {
        location_kind(self.adresse.as_deref(), self.latitude, self.longitude)
    }

    /// At least one usable location signal is present
    pub fn has_valid_location(&self) -> bool {
        self.location_kind().is_some()
    }
}

/// Partial update payload; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titre: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pollution_type: Option<PollutionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_observation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niveau: Option<PollutionLevel>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option::deserialize"
    )]
    pub adresse: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option::deserialize"
    )]
    pub latitude: Option<Option<f64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option::deserialize"
    )]
    pub longitude: Option<Option<f64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option::deserialize"
    )]
    pub photo_url: Option<Option<String>>,
}

impl From<PollutionPayload> for PollutionUpdate {
    fn from(p: PollutionPayload) -> Self {
        Self {
            titre: Some(p.titre),
            pollution_type: Some(p.pollution_type),
            description: Some(p.description),
            date_observation: Some(p.date_observation),
            niveau: Some(p.niveau),
            adresse: Some(p.adresse),
            latitude: Some(p.latitude),
            longitude: Some(p.longitude),
            photo_url: Some(p.photo_url),
        }
    }
}

/// Author summary embedded in declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationAuthor {
    pub id: i64,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub nom_utilisateur: String,
}

impl DeclarationAuthor {
    pub fn display_name(&self) -> String {
        if !self.prenom.is_empty() && !self.nom.is_empty() {
            format!("{} {}", self.prenom, self.nom)
        } else if !self.nom_utilisateur.is_empty() {
            self.nom_utilisateur.clone()
        } else {
            "Utilisateur inconnu".to_string()
        }
    }
}

/// A pollution declaration as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionDeclaration {
    pub id: i64,
    pub titre: String,
    #[serde(rename = "type")]
    pub pollution_type: PollutionType,
    pub description: String,
    pub date_observation: String,
    pub niveau: PollutionLevel,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub utilisateur_id: Option<i64>,
    #[serde(default)]
    pub utilisateur: Option<DeclarationAuthor>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl PollutionDeclaration {
    pub fn location_kind(&self) -> Option<LocationKind> {
        location_kind(self.adresse.as_deref(), self.latitude, self.longitude)
    }

    pub fn has_valid_location(&self) -> bool {
        self.location_kind().is_some()
    }

    /// Address if present, otherwise formatted coordinates
    pub fn location_display(&self) -> String {
        if let Some(adresse) = self.adresse.as_deref().filter(|a| !a.trim().is_empty()) {
            return adresse.to_string();
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => format!("📍 {lat:.4}, {lon:.4}"),
            _ => "Non spécifié".to_string(),
        }
    }

    pub fn author_display(&self) -> String {
        self.utilisateur
            .as_ref()
            .map(DeclarationAuthor::display_name)
            .unwrap_or_else(|| "Anonyme".to_string())
    }

    /// Owner id, from the flat field or the embedded author
    pub fn owner_id(&self) -> Option<i64> {
        self.utilisateur_id
            .or_else(|| self.utilisateur.as_ref().map(|u| u.id))
    }

    /// Owners and admins may edit or delete
    pub fn can_be_managed_by(&self, user: &User) -> bool {
        user.is_admin() || self.owner_id() == Some(user.id)
    }

    /// Observation day, tolerant of both `YYYY-MM-DD` and full RFC 3339 timestamps
    pub fn observation_date(&self) -> Option<NaiveDate> {
        parse_day(&self.date_observation)
    }

    pub fn photo_source(&self) -> PhotoSource {
        PhotoSource::detect(self.photo_url.as_deref())
    }

    /// Payload used to prefill the edit form
    pub fn to_payload(&self) -> PollutionPayload {
        PollutionPayload {
            titre: self.titre.clone(),
            pollution_type: self.pollution_type,
            description: self.description.clone(),
            date_observation: self
                .observation_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| self.date_observation.clone()),
            niveau: self.niveau,
            adresse: self.adresse.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            photo_url: self.photo_url.clone(),
        }
    }
}

/// Parse a day from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Response of the photo upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoResponse {
    pub photo_url: String,
}
