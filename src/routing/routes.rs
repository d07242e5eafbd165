//! HTTP surface — REST endpoints plus the navigation routes the guards
//! and root router enforce.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::error::ProfileError;
use crate::identity::IdentityProvider;
use crate::profile::forms::RoleForm;
use crate::profile::hint::HintSlot;
use crate::profile::model::Role;
use crate::profile::query::ProfileQuery;
use crate::resolution::controller::RoleResolver;
use crate::routing::guard::{GuardDecision, SectionGuard};
use crate::routing::root::{RootDecision, RootRouter};

/// Shared state for the portal routes.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn IdentityProvider>,
    pub query: Arc<ProfileQuery>,
    pub resolver: Arc<RoleResolver>,
    pub hints: Arc<HintSlot>,
    guards: Arc<HashMap<Role, Mutex<SectionGuard>>>,
    root: Arc<Mutex<RootRouter>>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        query: Arc<ProfileQuery>,
        resolver: Arc<RoleResolver>,
        hints: Arc<HintSlot>,
    ) -> Self {
        let guards = [Role::Startup, Role::Mentor, Role::Professor]
            .into_iter()
            .map(|role| (role, Mutex::new(SectionGuard::new(role))))
            .collect();
        Self {
            provider,
            query,
            resolver,
            hints,
            guards: Arc::new(guards),
            root: Arc::new(Mutex::new(RootRouter::new())),
        }
    }

    /// Re-read the provider and settle the profile fetch.
    ///
    /// `set_identity` is a no-op for an unchanged identity, so the store
    /// is hit once per identity change, not once per request.
    async fn sync(&self) {
        let identity = self.provider.current().await;
        self.query.set_identity(identity).await;
        self.query.fetch_current().await;
    }
}

/// GET /api/profile
///
/// Returns the current profile in wire format, or 404 if no profile has
/// been persisted for the identity (or there is no identity). A not-found
/// fetch materializes a role-less in-memory profile for the resolution
/// machinery; that placeholder is not a persisted record, so it stays 404
/// here until the first role write.
async fn get_profile(State(state): State<AppState>) -> Response {
    state.sync().await;
    let view = state.query.snapshot().await;
    match view.profile {
        Some(profile) if profile.has_role() => Json(profile.to_record()).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No profile exists yet"})),
        )
            .into_response(),
    }
}

/// GET /api/resolution
///
/// Returns the resolution state and the single step to present.
async fn get_resolution(State(state): State<AppState>) -> Response {
    state.sync().await;
    Json(state.resolver.evaluate().await).into_response()
}

#[derive(serde::Deserialize)]
struct RoleChoice {
    role: Role,
}

/// POST /api/role — explicit role selection from the prompt.
async fn post_role(State(state): State<AppState>, Json(choice): Json<RoleChoice>) -> Response {
    state.sync().await;
    match state.resolver.choose_role(choice.role).await {
        Ok(profile) => Json(profile.to_record()).into_response(),
        Err(e) => profile_error_response(e),
    }
}

/// POST /api/onboarding — role-specific onboarding form submission.
async fn post_onboarding(State(state): State<AppState>, Json(form): Json<RoleForm>) -> Response {
    state.sync().await;
    match state.resolver.submit_details(form).await {
        Ok(profile) => Json(profile.to_record()).into_response(),
        Err(e) => profile_error_response(e),
    }
}

/// GET / — root dashboard route.
///
/// Resolved non-student roles are redirected to their section; students
/// and role-less identities get the dashboard body, which carries the
/// resolution step so onboarding can take over when a role is missing.
async fn get_root(State(state): State<AppState>) -> Response {
    state.sync().await;
    let view = state.query.snapshot().await;
    let decision = state.root.lock().await.evaluate(&view);
    match decision {
        RootDecision::Loading => loading_response(),
        RootDecision::RedirectTo(role) => Redirect::to(role.section_path()).into_response(),
        RootDecision::Hold => StatusCode::NO_CONTENT.into_response(),
        RootDecision::RenderDashboard => {
            let evaluation = state.resolver.evaluate().await;
            Json(serde_json::json!({
                "dashboard": "student",
                "resolution": evaluation,
            }))
            .into_response()
        }
    }
}

async fn get_section(state: AppState, role: Role) -> Response {
    state.sync().await;
    let view = state.query.snapshot().await;
    let decision = {
        let mut guard = state.guards[&role].lock().await;
        guard.evaluate(&view)
    };
    match decision {
        GuardDecision::Loading => loading_response(),
        GuardDecision::Redirect => Redirect::to("/").into_response(),
        GuardDecision::Hold => StatusCode::NO_CONTENT.into_response(),
        GuardDecision::Render => {
            // An incomplete profile reaches its dashboard only through the
            // onboarding form, never the main content.
            if view.role_completed() {
                Json(serde_json::json!({"section": role})).into_response()
            } else {
                let evaluation = state.resolver.evaluate().await;
                Json(serde_json::json!({
                    "section": role,
                    "resolution": evaluation,
                }))
                .into_response()
            }
        }
    }
}

async fn get_mentor_section(State(state): State<AppState>) -> Response {
    get_section(state, Role::Mentor).await
}

async fn get_startup_section(State(state): State<AppState>) -> Response {
    get_section(state, Role::Startup).await
}

async fn get_professor_section(State(state): State<AppState>) -> Response {
    get_section(state, Role::Professor).await
}

/// GET /login and /register — capture the role hint, if any, and send the
/// user to the root route. Sign-in itself happens at the external
/// identity service.
async fn get_entry(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(raw) = params.get("role") {
        state.hints.set(raw.clone()).await;
    }
    Redirect::to("/").into_response()
}

fn loading_response() -> Response {
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"status": "loading"})),
    )
        .into_response()
}

fn profile_error_response(error: ProfileError) -> Response {
    match error {
        ProfileError::NoIdentity => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": error.to_string()})),
        )
            .into_response(),
        ProfileError::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": "validation failed", "fields": errors.fields})),
        )
            .into_response(),
        ProfileError::RoleMismatch { .. } | ProfileError::NoRole => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": error.to_string()})),
        )
            .into_response(),
        ProfileError::Store(crate::error::StoreError::RoleChange { .. }) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": error.to_string()})),
        )
            .into_response(),
        ProfileError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": error.to_string()})),
        )
            .into_response(),
    }
}

/// Build the portal routes.
pub fn portal_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/resolution", get(get_resolution))
        .route("/api/role", post(post_role))
        .route("/api/onboarding", post(post_onboarding))
        .route("/", get(get_root))
        .route("/mentor", get(get_mentor_section))
        .route("/startup", get(get_startup_section))
        .route("/professor", get(get_professor_section))
        .route("/login", get(get_entry))
        .route("/register", get(get_entry))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
