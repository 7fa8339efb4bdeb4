//! Form validation for declarations and accounts
//!
//! Rules mirror what the backend enforces so that most mistakes are caught
//! before a request is sent.

use chrono::NaiveDate;

use crate::core::models::{
    LocationKind, PollutionLevel, PollutionPayload, PollutionType, RegisterPayload, UPLOADS_PREFIX,
    location_kind, parse_day,
};

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Largest photo accepted for upload (5 MiB)
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Prefixes of photo URLs the form can preview
pub const PREVIEWABLE_PREFIXES: [&str; 4] = ["http://", "https://", "data:image/", UPLOADS_PREFIX];

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field left empty
    Required { field: &'static str },
    /// Field shorter than allowed
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },
    /// Neither an address nor a complete pair of coordinates
    MissingLocation,
    /// A coordinate that is not a number
    InvalidCoordinate { field: &'static str },
    InvalidDate,
    InvalidEmail,
    PasswordMismatch,
    /// Upload is not an image
    NotAnImage,
    /// Upload exceeds [`MAX_PHOTO_BYTES`]
    PhotoTooLarge { actual: u64 },
    /// Photo URL the form cannot preview
    UnpreviewablePhotoUrl,
}

impl ValidationError {
    /// Form field the error belongs to, for inline messages
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::InvalidCoordinate { field } => field,
            ValidationError::MissingLocation => "location",
            ValidationError::InvalidDate => "dateObservation",
            ValidationError::InvalidEmail => "email",
            ValidationError::PasswordMismatch => "confirmPassword",
            ValidationError::NotAnImage
            | ValidationError::PhotoTooLarge { .. }
            | ValidationError::UnpreviewablePhotoUrl => "photoUrl",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required { .. } => write!(f, "Ce champ est requis"),
            ValidationError::TooShort { min, .. } => {
                write!(f, "Au moins {} caractères requis", min)
            }
            ValidationError::MissingLocation => write!(
                f,
                "Veuillez fournir une adresse ou des coordonnées GPS"
            ),
            ValidationError::InvalidCoordinate { .. } => {
                write!(f, "Coordonnée invalide")
            }
            ValidationError::InvalidDate => write!(f, "Date invalide"),
            ValidationError::InvalidEmail => write!(f, "Adresse email invalide"),
            ValidationError::PasswordMismatch => {
                write!(f, "Les mots de passe ne correspondent pas")
            }
            ValidationError::NotAnImage => write!(f, "Veuillez sélectionner une image valide"),
            ValidationError::PhotoTooLarge { .. } => {
                write!(f, "L'image ne doit pas dépasser 5 Mo")
            }
            ValidationError::UnpreviewablePhotoUrl => {
                write!(f, "Aperçu indisponible pour cette URL")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validation result containing errors and warnings
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Errors that block submission
    pub errors: Vec<ValidationError>,
    /// Non-blocking remarks
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// First error reported for a field
    pub fn error_for(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    /// Convert to Result, returning first error if any
    pub fn to_result(&self) -> Result<(), ValidationError> {
        match self.errors.first() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn require_min(result: &mut ValidationResult, field: &'static str, value: &str, min: usize) {
    let actual = value.trim().chars().count();
    if actual == 0 {
        result.add_error(ValidationError::Required { field });
    } else if actual < min {
        result.add_error(ValidationError::TooShort { field, min, actual });
    }
}

fn require(result: &mut ValidationResult, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        result.add_error(ValidationError::Required { field });
    }
}

/// Parsed coordinate input: `Ok(None)` when blank, `Err` when not a number
type Coordinate = Result<Option<f64>, ()>;

pub(crate) fn parse_coordinate(value: &str) -> Coordinate {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.replace(',', ".").parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(()),
    }
}

/// Whether the form can show a preview for this photo URL
pub fn is_previewable_photo_url(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && PREVIEWABLE_PREFIXES.iter().any(|p| url.starts_with(p))
}

/// Check a file picked for upload
pub fn validate_photo_file(content_type: &str, size: u64) -> Result<(), ValidationError> {
    if !content_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    if size > MAX_PHOTO_BYTES {
        return Err(ValidationError::PhotoTooLarge { actual: size });
    }
    Ok(())
}

/// Raw state of the declaration form
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationForm {
    pub titre: String,
    pub type_label: String,
    pub description: String,
    pub date_observation: String,
    pub niveau_label: String,
    pub location_mode: LocationKind,
    pub adresse: String,
    pub latitude: String,
    pub longitude: String,
    pub photo_url: String,
}

impl DeclarationForm {
    /// Empty form observed today, located by address
    pub fn new(today: NaiveDate) -> Self {
        Self {
            titre: String::new(),
            type_label: String::new(),
            description: String::new(),
            date_observation: today.format("%Y-%m-%d").to_string(),
            niveau_label: String::new(),
            location_mode: LocationKind::Address,
            adresse: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            photo_url: String::new(),
        }
    }

    /// Prefill from an existing declaration
    pub fn from_payload(payload: &PollutionPayload) -> Self {
        Self {
            titre: payload.titre.clone(),
            type_label: payload.pollution_type.to_string(),
            description: payload.description.clone(),
            date_observation: payload.date_observation.clone(),
            niveau_label: payload.niveau.to_string(),
            location_mode: payload.location_kind().unwrap_or(LocationKind::Address),
            adresse: payload.adresse.clone().unwrap_or_default(),
            latitude: payload.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: payload.longitude.map(|v| v.to_string()).unwrap_or_default(),
            photo_url: payload.photo_url.clone().unwrap_or_default(),
        }
    }

    /// Switch location mode, clearing the fields it does not use
    pub fn set_location_mode(&mut self, mode: LocationKind) {
        self.location_mode = mode;
        match mode {
            LocationKind::Gps => self.adresse.clear(),
            LocationKind::Address => {
                self.latitude.clear();
                self.longitude.clear();
            }
            LocationKind::Both => {}
        }
    }

    pub fn shows_address(&self) -> bool {
        matches!(self.location_mode, LocationKind::Address | LocationKind::Both)
    }

    pub fn shows_gps(&self) -> bool {
        matches!(self.location_mode, LocationKind::Gps | LocationKind::Both)
    }

    /// Coordinates of the current mode; hidden fields count as absent
    fn coordinates(&self) -> (Coordinate, Coordinate) {
        if self.shows_gps() {
            (
                parse_coordinate(&self.latitude),
                parse_coordinate(&self.longitude),
            )
        } else {
            (Ok(None), Ok(None))
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        require_min(&mut result, "titre", &self.titre, MIN_TITLE_LENGTH);
        if PollutionType::from_label(&self.type_label).is_none() {
            result.add_error(ValidationError::Required { field: "type" });
        }
        require_min(
            &mut result,
            "description",
            &self.description,
            MIN_DESCRIPTION_LENGTH,
        );
        if self.date_observation.trim().is_empty() {
            result.add_error(ValidationError::Required {
                field: "dateObservation",
            });
        } else if parse_day(&self.date_observation).is_none() {
            result.add_error(ValidationError::InvalidDate);
        }
        if PollutionLevel::from_label(&self.niveau_label).is_none() {
            result.add_error(ValidationError::Required { field: "niveau" });
        }

        let (latitude, longitude) = self.coordinates();
        if latitude.is_err() {
            result.add_error(ValidationError::InvalidCoordinate { field: "latitude" });
        }
        if longitude.is_err() {
            result.add_error(ValidationError::InvalidCoordinate { field: "longitude" });
        }
        let adresse = self.shows_address().then_some(self.adresse.as_str());
        if location_kind(adresse, latitude.ok().flatten(), longitude.ok().flatten()).is_none() {
            result.add_error(ValidationError::MissingLocation);
        }

        if !self.photo_url.trim().is_empty() && !is_previewable_photo_url(&self.photo_url) {
            result.add_warning(ValidationError::UnpreviewablePhotoUrl);
        }

        result
    }

    /// Validated payload; blank address and photo become `null`
    pub fn to_payload(&self) -> Result<PollutionPayload, ValidationResult> {
        let result = self.validate();
        let (Some(pollution_type), Some(niveau)) = (
            PollutionType::from_label(&self.type_label),
            PollutionLevel::from_label(&self.niveau_label),
        ) else {
            return Err(result);
        };
        if !result.is_valid() {
            return Err(result);
        }

        let (latitude, longitude) = self.coordinates();
        let non_blank = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        Ok(PollutionPayload {
            titre: self.titre.trim().to_string(),
            pollution_type,
            description: self.description.trim().to_string(),
            date_observation: parse_day(&self.date_observation)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| self.date_observation.trim().to_string()),
            niveau,
            adresse: non_blank(&self.adresse).filter(|_| self.shows_address()),
            latitude: latitude.ok().flatten(),
            longitude: longitude.ok().flatten(),
            photo_url: non_blank(&self.photo_url),
        })
    }
}

/// Raw state of the registration form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub nom: String,
    pub prenom: String,
    pub nom_utilisateur: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Loose email shape check: something@something.something
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

impl RegisterForm {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        require(&mut result, "nom", &self.nom);
        require(&mut result, "prenom", &self.prenom);
        require_min(
            &mut result,
            "nomUtilisateur",
            &self.nom_utilisateur,
            MIN_USERNAME_LENGTH,
        );
        if self.email.trim().is_empty() {
            result.add_error(ValidationError::Required { field: "email" });
        } else if !is_valid_email(&self.email) {
            result.add_error(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            result.add_error(ValidationError::Required { field: "password" });
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            result.add_error(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LENGTH,
                actual: self.password.chars().count(),
            });
        }
        if self.password != self.confirm_password {
            result.add_error(ValidationError::PasswordMismatch);
        }

        result
    }

    pub fn to_payload(&self) -> Result<RegisterPayload, ValidationResult> {
        let result = self.validate();
        if !result.is_valid() {
            return Err(result);
        }
        Ok(RegisterPayload {
            nom: self.nom.trim().to_string(),
            prenom: self.prenom.trim().to_string(),
            email: self.email.trim().to_string(),
            mot_de_passe: self.password.clone(),
            nom_utilisateur: self.nom_utilisateur.trim().to_string(),
        })
    }
}

/// Login form: both fields are required
pub fn validate_login(identifier: &str, password: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    require(&mut result, "identifiant", identifier);
    if password.is_empty() {
        result.add_error(ValidationError::Required { field: "password" });
    }
    result
}

/// Profile edit: names, a valid email and a username
pub fn validate_profile(
    nom: &str,
    prenom: &str,
    email: &str,
    nom_utilisateur: &str,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    require(&mut result, "nom", nom);
    require(&mut result, "prenom", prenom);
    if !is_valid_email(email) {
        result.add_error(ValidationError::InvalidEmail);
    }
    require_min(&mut result, "nomUtilisateur", nom_utilisateur, MIN_USERNAME_LENGTH);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DeclarationForm {
        DeclarationForm {
            titre: "Décharge".to_string(),
            type_label: "Dépôt sauvage".to_string(),
            description: "Déchets de chantier abandonnés".to_string(),
            niveau_label: "Moyen".to_string(),
            adresse: "Chemin des Vignes".to_string(),
            ..DeclarationForm::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        }
    }

    #[test]
    fn test_valid_declaration() {
        let payload = valid_form().to_payload().unwrap();
        assert_eq!(payload.pollution_type, PollutionType::DepotSauvage);
        assert_eq!(payload.date_observation, "2024-05-01");
        assert_eq!(payload.adresse.as_deref(), Some("Chemin des Vignes"));
        assert_eq!(payload.photo_url, None);
        assert_eq!(payload.latitude, None);
    }

    #[test]
    fn test_short_fields() {
        let form = DeclarationForm {
            titre: "ab".to_string(),
            description: "court".to_string(),
            ..valid_form()
        };
        let result = form.validate();

        assert_eq!(
            result.error_for("titre"),
            Some(&ValidationError::TooShort {
                field: "titre",
                min: 3,
                actual: 2
            })
        );
        assert!(result.error_for("description").is_some());
    }

    #[test]
    fn test_location_required() {
        let mut form = valid_form();
        form.location_mode = LocationKind::Both;
        form.adresse = "   ".to_string();
        assert_eq!(
            form.validate().error_for("location"),
            Some(&ValidationError::MissingLocation)
        );

        // Latitude alone is not a location
        form.latitude = "48.85".to_string();
        assert!(!form.validate().is_valid());

        form.longitude = "2,35".to_string();
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.adresse, None);
        assert_eq!(payload.latitude, Some(48.85));
        assert_eq!(payload.longitude, Some(2.35));
    }

    #[test]
    fn test_non_numeric_coordinates() {
        let form = DeclarationForm {
            location_mode: LocationKind::Gps,
            latitude: "nord".to_string(),
            longitude: "2.3".to_string(),
            ..valid_form()
        };
        let result = form.validate();
        assert_eq!(
            result.error_for("latitude"),
            Some(&ValidationError::InvalidCoordinate { field: "latitude" })
        );
        assert!(parse_coordinate("inf").is_err());
        assert_eq!(parse_coordinate(""), Ok(None));
    }

    #[test]
    fn test_location_mode_clears_fields() {
        let mut form = valid_form();
        form.latitude = "1".to_string();
        form.longitude = "2".to_string();

        form.set_location_mode(LocationKind::Gps);
        assert!(form.adresse.is_empty());
        assert_eq!(form.latitude, "1");
        assert!(form.shows_gps() && !form.shows_address());

        form.adresse = "Rue".to_string();
        form.set_location_mode(LocationKind::Address);
        assert!(form.latitude.is_empty() && form.longitude.is_empty());
        assert_eq!(form.adresse, "Rue");
    }

    #[test]
    fn test_missing_type_and_level() {
        let form = DeclarationForm {
            type_label: String::new(),
            niveau_label: "Extrême".to_string(),
            ..valid_form()
        };
        let err = form.to_payload().unwrap_err();
        assert!(err.error_for("type").is_some());
        assert!(err.error_for("niveau").is_some());
    }

    #[test]
    fn test_photo_url_preview() {
        assert!(is_previewable_photo_url("https://img.example/a.jpg"));
        assert!(is_previewable_photo_url("http://img.example/a.jpg"));
        assert!(is_previewable_photo_url("data:image/png;base64,AAA"));
        assert!(is_previewable_photo_url("/uploads/a.jpg"));
        assert!(!is_previewable_photo_url("ftp://img.example/a.jpg"));
        assert!(!is_previewable_photo_url("  "));

        let form = DeclarationForm {
            photo_url: "ftp://x".to_string(),
            ..valid_form()
        };
        let result = form.validate();
        assert!(result.is_valid());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_photo_file_rules() {
        assert!(validate_photo_file("image/jpeg", 1024).is_ok());
        assert!(validate_photo_file("image/png", MAX_PHOTO_BYTES).is_ok());
        assert_eq!(
            validate_photo_file("image/png", MAX_PHOTO_BYTES + 1),
            Err(ValidationError::PhotoTooLarge {
                actual: MAX_PHOTO_BYTES + 1
            })
        );
        assert_eq!(
            validate_photo_file("application/pdf", 10),
            Err(ValidationError::NotAnImage)
        );
    }

    #[test]
    fn test_register_rules() {
        let form = RegisterForm {
            nom: "Roux".to_string(),
            prenom: "Inès".to_string(),
            nom_utilisateur: "ir".to_string(),
            email: "ines@exemple".to_string(),
            password: "court".to_string(),
            confirm_password: "autre".to_string(),
        };
        let result = form.validate();

        assert!(result.error_for("nomUtilisateur").is_some());
        assert_eq!(result.error_for("email"), Some(&ValidationError::InvalidEmail));
        assert!(result.error_for("password").is_some());
        assert_eq!(
            result.error_for("confirmPassword"),
            Some(&ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_register_payload() {
        let form = RegisterForm {
            nom: " Roux ".to_string(),
            prenom: "Inès".to_string(),
            nom_utilisateur: "iroux".to_string(),
            email: "ines@exemple.fr".to_string(),
            password: "motdepasse".to_string(),
            confirm_password: "motdepasse".to_string(),
        };
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.nom, "Roux");
        assert_eq!(payload.mot_de_passe, "motdepasse");
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.fr"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.fr"));
        assert!(!is_valid_email("ab.fr"));
    }

    #[test]
    fn test_login_and_profile() {
        assert!(validate_login("lea", "x").is_valid());
        assert_eq!(validate_login(" ", "").errors.len(), 2);
        assert!(validate_profile("Martin", "Léa", "lea@x.fr", "lea").is_valid());
        assert!(!validate_profile("Martin", "", "lea@x.fr", "le").is_valid());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::TooShort {
                field: "titre",
                min: 3,
                actual: 1
            }
            .to_string(),
            "Au moins 3 caractères requis"
        );
        assert_eq!(
            ValidationError::MissingLocation.to_string(),
            "Veuillez fournir une adresse ou des coordonnées GPS"
        );
    }
}
