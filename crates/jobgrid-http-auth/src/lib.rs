//! Request authorization middleware.
//!
//! Gates protected endpoints behind a valid session token and,
//! optionally, a required subject kind. Extracts the bearer credential
//! from the `Authorization` header, validates it, and makes the
//! authenticated subject available to handlers via request extensions.
//!
//! Layering order matters: [`require_auth`] must be the outermost
//! layer so identity is established before a kind check runs:
//!
//! ```ignore
//! Router::new()
//!     .route("/companies/jobs", post(create_job))
//!     .layer(middleware::from_fn(require_company))
//!     .layer(middleware::from_fn_with_state(state, require_auth))
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use jobgrid_auth::AuthConfig;
use jobgrid_auth::token::validate_session_token;
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::subject::SubjectKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hard cap on the authorization header length.
const MAX_HEADER_LEN: usize = 1024;

/// Error body returned on rejected requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Authenticated subject extracted from a validated session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSubject {
    pub id: ObjectId,
    pub kind: SubjectKind,
}

/// Token validation state shared across middleware instances.
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

type Rejection = (StatusCode, Json<ErrorBody>);

fn unauthorized(message: &str) -> Rejection {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn forbidden(message: &str) -> Rejection {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// Authentication middleware.
///
/// Rejects with 401 when the authorization header is missing,
/// oversized, not exactly `Bearer <token>`, carries a token that is
/// empty after trimming (reported distinctly from a missing header),
/// or the token fails validation — in which case the reason is not
/// disclosed. On success an [`AuthSubject`] is inserted into request
/// extensions before the inner handler runs.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Rejection> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("authentication token not provided"))?;

    if auth_header.len() > MAX_HEADER_LEN {
        return Err(unauthorized("authorization header too large"));
    }

    let auth_header = auth_header
        .to_str()
        .map_err(|_| unauthorized("invalid token format"))?;

    let token = match auth_header.split_once(' ') {
        Some(("Bearer", rest)) => rest.trim(),
        _ => return Err(unauthorized("invalid token format")),
    };
    if token.is_empty() {
        return Err(unauthorized("empty bearer token"));
    }

    let claims = validate_session_token(token, &state.config).map_err(|e| {
        debug!(error = %e, "session token rejected");
        unauthorized("invalid or expired token")
    })?;
    let id = claims
        .subject_id()
        .map_err(|_| unauthorized("invalid or expired token"))?;

    request.extensions_mut().insert(AuthSubject {
        id,
        kind: claims.kind,
    });

    Ok(next.run(request).await)
}

/// Authorization middleware requiring a company subject.
///
/// Mount inside [`require_auth`]; a request without an authenticated
/// subject is rejected as unauthenticated.
pub async fn require_company(request: Request, next: Next) -> Result<Response, Rejection> {
    require_kind(SubjectKind::Company, request, next).await
}

/// Authorization middleware requiring a candidate subject.
pub async fn require_candidate(request: Request, next: Next) -> Result<Response, Rejection> {
    require_kind(SubjectKind::Candidate, request, next).await
}

async fn require_kind(
    required: SubjectKind,
    request: Request,
    next: Next,
) -> Result<Response, Rejection> {
    let subject = request
        .extensions()
        .get::<AuthSubject>()
        .ok_or_else(|| unauthorized("authentication token not provided"))?;

    if subject.kind != required {
        let message = match required {
            SubjectKind::Company => "access restricted to companies",
            SubjectKind::Candidate => "access restricted to candidates",
        };
        return Err(forbidden(message));
    }

    Ok(next.run(request).await)
}
