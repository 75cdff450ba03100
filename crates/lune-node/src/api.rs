//! HTTP API server for the Lune node.
//!
//! Exposes wallet management, issuance, revocation, verification and
//! shareable presentations over REST.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use lune_credentials::{CredentialError, ShareablePresentation, VerificationResult, Wallet};
use lune_identity::{AchievementClaims, VerifiableCredential};

use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

// --- Request / response types ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub version: String,
    pub issuer_did: String,
    pub network: String,
    pub wallets: usize,
    pub presentations: usize,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub owner_id: String,
}

/// Public view of a wallet. Never carries the private key.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub wallet_id: String,
    pub owner_id: String,
    pub did: String,
    pub public_key: String,
    pub credentials: Vec<VerifiableCredential>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            wallet_id: wallet.wallet_id.clone(),
            owner_id: wallet.owner_id.clone(),
            did: wallet.did.to_string(),
            public_key: wallet.public_key.clone(),
            credentials: wallet.credentials.clone(),
            created_at: wallet.created_at,
            last_updated: wallet.last_updated,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub wallet_id: String,
    pub did: String,
    pub credentials: usize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCredentialRequest {
    pub subject_name: String,
    pub skill: String,
    pub score: u32,
    pub level: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
pub struct RevokeResponse {
    pub revoked: bool,
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub holder: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ExplorerResponse {
    pub url: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresentationRequest {
    pub owner_id: String,
    pub credential_ids: Vec<String>,
    #[serde(default)]
    pub expires_in_hours: Option<u32>,
    #[serde(default)]
    pub require_access_code: bool,
}

#[derive(Deserialize)]
pub struct PresentationQuery {
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn map_error(e: CredentialError) -> ApiError {
    let status = match &e {
        CredentialError::InvalidOwner(_)
        | CredentialError::InvalidClaims(_)
        | CredentialError::InvalidRequest(_)
        | CredentialError::ImportValidation(_) => StatusCode::BAD_REQUEST,
        CredentialError::WalletNotFound(_) | CredentialError::CredentialNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        CredentialError::IssuanceFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => {
            tracing::error!(error = %e, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error(status, e.to_string())
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let service = &state.service;
    Ok(Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        issuer_did: service.issuer_did().to_string(),
        network: state.ledger_network.clone(),
        wallets: service.wallet_count().await.map_err(map_error)?,
        presentations: service.presentation_count().await.map_err(map_error)?,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

async fn handle_create_wallet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWalletRequest>,
) -> ApiResult<WalletResponse> {
    let wallet = state
        .service
        .get_or_create_wallet(&req.owner_id)
        .await
        .map_err(map_error)?;
    Ok(Json(wallet.into()))
}

async fn handle_get_wallet(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> ApiResult<WalletResponse> {
    match state.service.find_wallet(&owner_id).await.map_err(map_error)? {
        Some(wallet) => Ok(Json(wallet.into())),
        None => Err(error(StatusCode::NOT_FOUND, format!("no wallet for {}", owner_id))),
    }
}

async fn handle_export_wallet(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> Result<String, ApiError> {
    match state.service.find_wallet(&owner_id).await.map_err(map_error)? {
        Some(wallet) => state.service.export_wallet(&wallet).map_err(map_error),
        None => Err(error(StatusCode::NOT_FOUND, format!("no wallet for {}", owner_id))),
    }
}

/// Validate an exported wallet document. Nothing is persisted.
async fn handle_import_wallet(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<ImportResponse> {
    match state.service.import_wallet(&body) {
        Some(wallet) => Ok(Json(ImportResponse {
            wallet_id: wallet.wallet_id.clone(),
            did: wallet.did.to_string(),
            credentials: wallet.credentials.len(),
        })),
        None => Err(error(StatusCode::BAD_REQUEST, "invalid wallet document")),
    }
}

async fn handle_issue_credential(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
    Json(req): Json<IssueCredentialRequest>,
) -> ApiResult<VerifiableCredential> {
    let service = &state.service;
    let mut wallet = service
        .get_or_create_wallet(&owner_id)
        .await
        .map_err(map_error)?;

    let credential = match req.expires_at {
        Some(expiration) => {
            let claims = AchievementClaims::skill(&req.skill, req.score, &req.level)
                .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;
            service
                .issue_with_expiration(&mut wallet, &req.subject_name, claims, expiration)
                .await
        }
        None => {
            service
                .issue_credential(&mut wallet, &req.subject_name, &req.skill, req.score, &req.level)
                .await
        }
    }
    .map_err(map_error)?;

    Ok(Json(credential))
}

async fn handle_revoke(
    State(state): State<Arc<AppState>>,
    Path((owner_id, credential_id)): Path<(String, String)>,
) -> ApiResult<RevokeResponse> {
    let Some(mut wallet) = state.service.find_wallet(&owner_id).await.map_err(map_error)? else {
        return Ok(Json(RevokeResponse { revoked: false }));
    };
    let revoked = state
        .service
        .revoke(&mut wallet, &credential_id)
        .await
        .map_err(map_error)?;
    Ok(Json(RevokeResponse { revoked }))
}

async fn handle_verify(
    State(state): State<Arc<AppState>>,
    Path(credential_id): Path<String>,
    Query(query): Query<VerifyQuery>,
) -> ApiResult<VerificationResult> {
    let result = state
        .service
        .verify(&credential_id, query.holder.as_deref())
        .await
        .map_err(map_error)?;
    Ok(Json(result))
}

async fn handle_explorer(
    State(state): State<Arc<AppState>>,
    Path(credential_id): Path<String>,
) -> ApiResult<ExplorerResponse> {
    match state
        .service
        .find_credential(&credential_id)
        .await
        .map_err(map_error)?
    {
        Some(credential) => Ok(Json(ExplorerResponse {
            url: state.service.explorer_url(&credential),
        })),
        None => Err(error(
            StatusCode::NOT_FOUND,
            format!("credential not found: {}", credential_id),
        )),
    }
}

async fn handle_create_presentation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePresentationRequest>,
) -> ApiResult<ShareablePresentation> {
    let Some(wallet) = state
        .service
        .find_wallet(&req.owner_id)
        .await
        .map_err(map_error)?
    else {
        return Err(error(
            StatusCode::NOT_FOUND,
            format!("no wallet for {}", req.owner_id),
        ));
    };
    let presentation = state
        .service
        .create_presentation(
            &wallet,
            &req.credential_ids,
            req.expires_in_hours,
            req.require_access_code,
        )
        .await
        .map_err(map_error)?;
    Ok(Json(presentation))
}

async fn handle_get_presentation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PresentationQuery>,
) -> ApiResult<ShareablePresentation> {
    match state
        .service
        .get_presentation(&id, query.code.as_deref())
        .await
        .map_err(map_error)?
    {
        Some(presentation) => Ok(Json(presentation)),
        None => Err(error(StatusCode::NOT_FOUND, "presentation not found")),
    }
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/wallets", post(handle_create_wallet))
        .route("/api/v1/wallets/import", post(handle_import_wallet))
        .route("/api/v1/wallets/{owner_id}", get(handle_get_wallet))
        .route("/api/v1/wallets/{owner_id}/export", get(handle_export_wallet))
        .route(
            "/api/v1/wallets/{owner_id}/credentials",
            post(handle_issue_credential),
        )
        .route(
            "/api/v1/wallets/{owner_id}/credentials/{credential_id}/revoke",
            post(handle_revoke),
        )
        .route("/api/v1/credentials/{credential_id}/verify", get(handle_verify))
        .route(
            "/api/v1/credentials/{credential_id}/explorer",
            get(handle_explorer),
        )
        .route("/api/v1/presentations", post(handle_create_presentation))
        .route("/api/v1/presentations/{id}", get(handle_get_presentation))
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use lune_core::{AnchorConfig, ServiceConfig};
    use lune_credentials::{CheckStatus, CredentialService};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = ServiceConfig {
            anchor: AnchorConfig {
                simulated_latency_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let service = Arc::new(CredentialService::in_memory(config).unwrap());
        build_router(Arc::new(AppState::new(service, "polygon-amoy")))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn issue(app: &Router, owner: &str) -> VerifiableCredential {
        let (status, body) = send(
            app,
            post_json(
                &format!("/api/v1/wallets/{}/credentials", owner),
                serde_json::json!({
                    "subjectName": "Ada",
                    "skill": "React",
                    "score": 85,
                    "level": "Advanced"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app, get_req("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_create_wallet_hides_private_key() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json("/api/v1/wallets", serde_json::json!({"ownerId": "ada"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["did"].as_str().unwrap().starts_with("did:lune:"));
        assert!(json.get("privateKey").is_none());

        let (status, _) = send(&app, get_req("/api/v1/wallets/ada")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, get_req("/api/v1/wallets/nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_owner_is_bad_request() {
        let app = app();
        let (status, _) = send(
            &app,
            post_json("/api/v1/wallets", serde_json::json!({"ownerId": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_issue_verify_revoke() {
        let app = app();
        let vc = issue(&app, "ada").await;
        assert!(vc.has_type("SkillCertification"));

        let (status, body) =
            send(&app, get_req(&format!("/api/v1/credentials/{}/verify", vc.id))).await;
        assert_eq!(status, StatusCode::OK);
        let result: VerificationResult = serde_json::from_slice(&body).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.checks.len(), 6);

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/wallets/ada/credentials/{}/revoke", vc.id),
                serde_json::json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let revoke: RevokeResponse = serde_json::from_slice(&body).unwrap();
        assert!(revoke.revoked);

        let (_, body) = send(&app, get_req(&format!("/api/v1/credentials/{}/verify", vc.id))).await;
        let result: VerificationResult = serde_json::from_slice(&body).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.check("Not Revoked").unwrap().status, CheckStatus::Failed);
    }

    #[tokio::test]
    async fn test_verify_with_holder_mismatch() {
        let app = app();
        let vc = issue(&app, "ada").await;
        let uri = format!(
            "/api/v1/credentials/{}/verify?holder=did:lune:{}",
            vc.id,
            "0".repeat(40)
        );
        let (_, body) = send(&app, get_req(&uri)).await;
        let result: VerificationResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.check("Holder Match").unwrap().status, CheckStatus::Failed);
    }

    #[tokio::test]
    async fn test_verify_unknown_is_negative_result() {
        let app = app();
        let (status, body) = send(&app, get_req("/api/v1/credentials/nonexistent/verify")).await;
        assert_eq!(status, StatusCode::OK);
        let result: VerificationResult = serde_json::from_slice(&body).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.checks.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_score_is_bad_request() {
        let app = app();
        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/wallets/ada/credentials",
                serde_json::json!({
                    "subjectName": "Ada",
                    "skill": "React",
                    "score": 140,
                    "level": "Advanced"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_revoke_unknown_is_false() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/wallets/ghost/credentials/urn:uuid:x/revoke",
                serde_json::json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let revoke: RevokeResponse = serde_json::from_slice(&body).unwrap();
        assert!(!revoke.revoked);
    }

    #[tokio::test]
    async fn test_export_and_import() {
        let app = app();
        issue(&app, "ada").await;
        let (status, body) = send(&app, get_req("/api/v1/wallets/ada/export")).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/wallets/import")
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let imported: ImportResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(imported.credentials, 1);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/wallets/import")
            .body(Body::from("{\"walletId\": \"x\"}"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_explorer_link() {
        let app = app();
        let vc = issue(&app, "ada").await;
        let (status, body) =
            send(&app, get_req(&format!("/api/v1/credentials/{}/explorer", vc.id))).await;
        assert_eq!(status, StatusCode::OK);
        let link: ExplorerResponse = serde_json::from_slice(&body).unwrap();
        assert!(link.url.starts_with("https://amoy.polygonscan.com/tx/"));

        let (status, _) = send(&app, get_req("/api/v1/credentials/missing/explorer")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_presentation_flow() {
        let app = app();
        let vc = issue(&app, "ada").await;
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/presentations",
                serde_json::json!({
                    "ownerId": "ada",
                    "credentialIds": [vc.id],
                    "expiresInHours": 48,
                    "requireAccessCode": true
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: ShareablePresentation = serde_json::from_slice(&body).unwrap();
        let code = created.access_code.clone().unwrap();

        let (status, _) =
            send(&app, get_req(&format!("/api/v1/presentations/{}", created.id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            get_req(&format!("/api/v1/presentations/{}?code={}", created.id, code)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let viewed: ShareablePresentation = serde_json::from_slice(&body).unwrap();
        assert_eq!(viewed.views, 1);
        assert_eq!(viewed.credentials.len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_expiry_is_bad_request() {
        let app = app();
        let vc = issue(&app, "ada").await;
        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/presentations",
                serde_json::json!({
                    "ownerId": "ada",
                    "credentialIds": [vc.id],
                    "expiresInHours": u32::MAX,
                    "requireAccessCode": false
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status() {
        let app = app();
        issue(&app, "ada").await;
        let (status, body) = send(&app, get_req("/api/v1/status")).await;
        assert_eq!(status, StatusCode::OK);
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(status.wallets, 1);
        assert_eq!(status.network, "polygon-amoy");
    }
}
