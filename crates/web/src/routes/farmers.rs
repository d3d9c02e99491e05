//! Farmer route handlers.
//!
//! The form-post endpoints keep the names the cooperative's clients already
//! call (`/saveFarmer`, `/dropOutFarmer`, `/readFarmer`) and answer with JSON.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cooperativa_core::PersonId;

use crate::db::FarmerStore;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{Farmer, FarmerListing, FarmerProfile, NewPerson, PersonInput};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Query parameters for the farmer list.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "textToSearch")]
    pub text_to_search: Option<String>,
}

/// Form carrying only a person id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonIdForm {
    pub person_id: PersonId,
}

/// Response of `POST /saveFarmer`.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
}

/// Response of `POST /dropOutFarmer`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOutResponse {
    pub dropped_out: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Farmer list page template.
#[derive(Template, WebTemplate)]
#[template(path = "farmers/list.html")]
pub struct FarmerListTemplate {
    pub text_to_search: String,
    pub farmers: Vec<FarmerListing>,
}

/// Farmer detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "farmers/show.html")]
pub struct FarmerShowTemplate {
    pub profile: FarmerProfile,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the farmer list, filtered by `textToSearch` when present.
#[instrument(skip(state))]
pub async fn list<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<FarmerListTemplate> {
    let farmers = state
        .farmers()
        .farmers_list(query.text_to_search.as_deref())
        .await?;

    Ok(FarmerListTemplate {
        text_to_search: query.text_to_search.unwrap_or_default(),
        farmers,
    })
}

/// Same rows as [`list`], as JSON.
#[instrument(skip(state))]
pub async fn api_list<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FarmerListing>>> {
    let farmers = state
        .farmers()
        .farmers_list(query.text_to_search.as_deref())
        .await?;
    Ok(Json(farmers))
}

/// Create a farmer for an existing person.
#[instrument(skip(state))]
pub async fn save<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Form(farmer): Form<Farmer>,
) -> Result<Json<SaveResponse>> {
    let saved = state.farmers().create(&farmer).await?;
    Ok(Json(SaveResponse { saved }))
}

/// Mark a farmer as dropped out.
#[instrument(skip(state))]
pub async fn drop_out<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Form(farmer): Form<Farmer>,
) -> Result<Json<DropOutResponse>> {
    let dropped_out = state.farmers().drop_out(&farmer).await?;
    if dropped_out {
        let person_id = farmer.person_id.to_string();
        add_breadcrumb(
            "farmers",
            "Farmer dropped out",
            Some(&[("person_id", person_id.as_str())]),
        );
    }
    Ok(Json(DropOutResponse { dropped_out }))
}

/// Read one farmer as JSON.
#[instrument(skip(state))]
pub async fn read<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Form(form): Form<PersonIdForm>,
) -> Result<Json<Farmer>> {
    let farmer = state.farmers().read(form.person_id).await?;
    Ok(Json(farmer))
}

/// Display one farmer with its person data.
#[instrument(skip(state))]
pub async fn show<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Path(person_id): Path<PersonId>,
) -> Result<FarmerShowTemplate> {
    let profile = state.farmers().read_profile(person_id).await?;
    Ok(FarmerShowTemplate { profile })
}

/// Enroll a new person as a farmer and redirect to its detail page.
#[instrument(skip(state, input))]
pub async fn enroll<S: FarmerStore>(
    State(state): State<AppState<S>>,
    Form(input): Form<PersonInput>,
) -> Result<Redirect> {
    let person = NewPerson::try_from(input)?;
    let profile = state.farmers().enroll(&person).await?;

    let person_id = profile.person.id.to_string();
    add_breadcrumb(
        "farmers",
        "Farmer enrolled",
        Some(&[("person_id", person_id.as_str())]),
    );
    Ok(Redirect::to(&format!("/farmers/{person_id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use askama::Template;
    use cooperativa_core::{MemberNumber, PersonId};

    use super::FarmerListTemplate;
    use crate::models::FarmerListing;
    use crate::test_support::{InMemoryFarmerStore, sample_person};

    fn app(store: InMemoryFarmerStore) -> Router {
        crate::app(crate::state::AppState::new(store))
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_read() {
        let store = InMemoryFarmerStore::default();
        let person = store.insert_person(&sample_person("54129784S", "Juan"));
        let app = app(store);

        let response = app
            .clone()
            .oneshot(form(
                "/saveFarmer",
                &format!("personId={}&dropOut=false", person.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"saved": true}));

        let response = app
            .oneshot(form("/readFarmer", &format!("personId={}", person.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"personId": person.id.as_i32(), "dropOut": false})
        );
    }

    #[tokio::test]
    async fn test_drop_out_then_read() {
        let store = InMemoryFarmerStore::default();
        let person = store.insert_person(&sample_person("54129784S", "Juan"));
        let app = app(store);

        app.clone()
            .oneshot(form("/saveFarmer", &format!("personId={}", person.id)))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(form("/dropOutFarmer", &format!("personId={}", person.id)))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"droppedOut": true})
        );

        let response = app
            .oneshot(form("/readFarmer", &format!("personId={}", person.id)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["dropOut"], true);
    }

    #[tokio::test]
    async fn test_drop_out_unknown_farmer_is_false() {
        let response = app(InMemoryFarmerStore::default())
            .oneshot(form("/dropOutFarmer", "personId=99"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"droppedOut": false})
        );
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let response = app(InMemoryFarmerStore::default())
            .oneshot(form("/readFarmer", "personId=20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_without_person_is_conflict() {
        let response = app(InMemoryFarmerStore::default())
            .oneshot(form("/saveFarmer", "personId=7"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_api_list_filters_by_term() {
        let store = InMemoryFarmerStore::default();
        let app = app(store);
        for body in [
            "taxId=54129784S&name=Juan&lastName=Troya",
            "taxId=X1234567L&name=Ana&lastName=Ruiz",
        ] {
            let response = app.clone().oneshot(form("/enrollFarmer", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }

        let response = app.clone().oneshot(get("/api/farmers")).await.unwrap();
        let all = body_json(response).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["n_socio"], 1);
        assert_eq!(all[0]["nombre_razon_social"], "Juan");

        let response = app
            .oneshot(get("/api/farmers?textToSearch=Ruiz"))
            .await
            .unwrap();
        let found = body_json(response).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["cif_nif"], "X1234567L");
    }

    #[tokio::test]
    async fn test_list_page_renders_rows() {
        let store = InMemoryFarmerStore::default();
        let app = app(store);
        app.clone()
            .oneshot(form(
                "/enrollFarmer",
                "taxId=54129784s&name=Juan&lastName=Troya&phone=956123456",
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(get("/farmerList?textToSearch=Troya"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("54129784S"));
        assert!(html.contains("956123456"));
    }

    #[test]
    fn test_list_page_flags_rows_with_invalid_data() {
        let valid = FarmerListing {
            person_id: PersonId::new(1),
            member_number: MemberNumber::new(1),
            drop_out: false,
            tax_id: "54129784S".to_string(),
            name: "Juan".to_string(),
            last_name: None,
            address: None,
            phone: Some("956123456".to_string()),
            email: Some("meritorio@meritocracia.es".to_string()),
        };
        let page = FarmerListTemplate {
            text_to_search: String::new(),
            farmers: vec![valid.clone()],
        };
        assert!(!page.render().unwrap().contains("invalid-data"));

        let broken = FarmerListing {
            email: Some("not-an-email".to_string()),
            drop_out: true,
            ..valid
        };
        let page = FarmerListTemplate {
            text_to_search: String::new(),
            farmers: vec![broken],
        };
        let html = page.render().unwrap();
        assert!(html.contains(r#"class="dropped-out invalid-data""#));
        assert!(html.contains("Revisar: email"));
    }

    #[tokio::test]
    async fn test_enroll_rejects_overlong_name() {
        let body = format!("taxId=54129784S&name={}", "a".repeat(256));
        let response = app(InMemoryFarmerStore::default())
            .oneshot(form("/enrollFarmer", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Invalid input: name cannot be longer than 255 characters"
        );
    }

    #[tokio::test]
    async fn test_enroll_redirects_to_detail() {
        let app = app(InMemoryFarmerStore::default());
        let response = app
            .clone()
            .oneshot(form(
                "/enrollFarmer",
                "taxId=54129784S&name=Juan&email=meritorio%40meritocracia.es",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_owned();
        assert_eq!(location, "/farmers/1");

        let response = app.oneshot(get(&location)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("meritorio@meritocracia.es"));
    }

    #[tokio::test]
    async fn test_enroll_rejects_invalid_fields() {
        let app = app(InMemoryFarmerStore::default());
        let response = app
            .clone()
            .oneshot(form("/enrollFarmer", "taxId=54129784S&name=Juan&phone=123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(form("/enrollFarmer", "taxId=54129784S&name=Juan&email=juan"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enroll_duplicate_tax_id_is_conflict() {
        let app = app(InMemoryFarmerStore::default());
        let body = "taxId=54129784S&name=Juan";
        app.clone().oneshot(form("/enrollFarmer", body)).await.unwrap();
        let response = app.oneshot(form("/enrollFarmer", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_show_missing_is_not_found() {
        let response = app(InMemoryFarmerStore::default())
            .oneshot(get("/farmers/42"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let response = app(InMemoryFarmerStore::unavailable())
            .oneshot(get("/api/farmers"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal server error");
    }
}
