//! Typed REST endpoints for declarations and users

use crate::core::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::models::{
    PollutionDeclaration, PollutionLevel, PollutionPayload, PollutionType, PollutionUpdate, Role,
    UploadPhotoResponse, User, UserUpdate,
};
use crate::core::transport::{ApiRequest, FilePart, HttpTransport};

/// Multipart field expected by the upload endpoint
pub const PHOTO_FIELD: &str = "photo";

/// Server-side filters for `GET /pollution`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollutionQuery {
    pub pollution_type: Option<PollutionType>,
    pub niveau: Option<PollutionLevel>,
    /// `YYYY-MM-DD`
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub utilisateur_id: Option<i64>,
}

impl PollutionQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query(
                "type",
                self.pollution_type.map(|t| t.to_string()).unwrap_or_default(),
            )
            .query(
                "niveau",
                self.niveau.map(|n| n.to_string()).unwrap_or_default(),
            )
            .query("dateFrom", self.date_from.clone().unwrap_or_default())
            .query("dateTo", self.date_to.clone().unwrap_or_default())
            .query(
                "utilisateurId",
                self.utilisateur_id.map(|id| id.to_string()).unwrap_or_default(),
            )
    }

    pub fn request(&self) -> ApiRequest {
        self.apply(ApiRequest::get("/pollution"))
    }
}

impl<T: HttpTransport> ApiClient<T> {
    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub async fn list_pollutions(
        &self,
        query: &PollutionQuery,
    ) -> Result<Vec<PollutionDeclaration>, ApiError> {
        self.fetch_json(query.request()).await
    }

    /// Declarations of the logged-in user
    pub async fn list_my_pollutions(&self) -> Result<Vec<PollutionDeclaration>, ApiError> {
        self.get_json("/pollution/user/me").await
    }

    pub async fn get_pollution(&self, id: i64) -> Result<PollutionDeclaration, ApiError> {
        self.get_json(&format!("/pollution/{id}")).await
    }

    pub async fn create_pollution(
        &self,
        payload: &PollutionPayload,
    ) -> Result<PollutionDeclaration, ApiError> {
        let created: PollutionDeclaration = self.post_json("/pollution", payload).await?;
        tracing::info!(id = created.id, "Declaration created");
        Ok(created)
    }

    pub async fn update_pollution(
        &self,
        id: i64,
        update: &PollutionUpdate,
    ) -> Result<PollutionDeclaration, ApiError> {
        let updated = self.put_json(&format!("/pollution/{id}"), update).await?;
        tracing::info!(id, "Declaration updated");
        Ok(updated)
    }

    pub async fn delete_pollution(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/pollution/{id}")).await?;
        tracing::info!(id, "Declaration deleted");
        Ok(())
    }

    /// Upload a photo and return the stored path (`/uploads/...`)
    pub async fn upload_photo(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let request = ApiRequest::post("/pollution/upload-photo").multipart(FilePart {
            field: PHOTO_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        let uploaded: UploadPhotoResponse = self.fetch_json(request).await?;
        Ok(uploaded.photo_url)
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// All users, optionally narrowed by a server-side search
    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>, ApiError> {
        let request = ApiRequest::get("/users").query("q", search.unwrap_or_default().trim());
        self.fetch_json(request).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        self.get_json(&format!("/users/{id}")).await
    }

    /// Update a user; the session follows when it is the logged-in user
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        let user: User = self.put_json(&format!("/users/{id}"), update).await?;
        if self.session().snapshot().user().is_some_and(|u| u.id == id) {
            self.update_profile(user.clone());
        }
        Ok(user)
    }

    pub async fn set_user_role(&self, id: i64, role: Role) -> Result<User, ApiError> {
        let user = self.update_user(id, &UserUpdate::role(role)).await?;
        tracing::info!(id, %role, "User role changed");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/users/{id}")).await?;
        tracing::info!(id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::tests::{MockTransport, stale_client, user};
    use crate::core::transport::RequestBody;

    #[test]
    fn test_query_pairs() {
        let query = PollutionQuery {
            pollution_type: Some(PollutionType::Eau),
            date_from: Some("2024-01-01".into()),
            utilisateur_id: Some(4),
            ..Default::default()
        };

        assert_eq!(
            query.request().url("/api"),
            "/api/pollution?type=Eau&dateFrom=2024-01-01&utilisateurId=4"
        );
        assert_eq!(PollutionQuery::default().request().url("/api"), "/api/pollution");
        assert!(PollutionQuery::default().is_empty());
    }

    #[test]
    fn test_level_query_is_encoded() {
        let query = PollutionQuery {
            niveau: Some(PollutionLevel::Eleve),
            ..Default::default()
        };
        assert_eq!(query.request().url(""), "/pollution?niveau=%C3%89lev%C3%A9");
    }

    #[tokio::test]
    async fn test_list_pollutions_after_refresh() {
        let body = serde_json::json!([{
            "id": 1,
            "titre": "Sacs plastiques",
            "type": "Plastique",
            "description": "Sacs sur la plage",
            "dateObservation": "2024-03-02",
            "niveau": "Moyen",
            "adresse": "Plage du Prado"
        }])
        .to_string();
        let client = stale_client(MockTransport::new().with_body("/api/pollution", &body));

        let list = client
            .list_pollutions(&PollutionQuery::default())
            .await
            .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].pollution_type, PollutionType::Plastique);
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_photo_field() {
        let client = stale_client(
            MockTransport::new().with_body(
                "/api/pollution/upload-photo",
                r#"{"photoUrl":"/uploads/a.png"}"#,
            ),
        );

        let path = client
            .upload_photo("a.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(path, "/uploads/a.png");
        let calls = client.transport().calls.lock().unwrap();
        let RequestBody::Multipart(part) = &calls.last().unwrap().body else {
            panic!("expected multipart body");
        };
        assert_eq!(part.field, "photo");
        assert_eq!(part.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_update_self_updates_session() {
        let mut renamed = user(7);
        renamed.nom = "Martin".into();
        let body = serde_json::to_string(&renamed).unwrap();
        let client = stale_client(MockTransport::new().with_body("/api/users/7", &body));

        client
            .update_user(
                7,
                &UserUpdate {
                    nom: Some("Martin".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            client.session().snapshot().user().map(|u| u.nom.clone()),
            Some("Martin".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_declaration_is_not_found() {
        let client = stale_client(MockTransport::new());
        assert_eq!(client.get_pollution(404).await, Err(ApiError::NotFound));
    }
}
