//! End-to-end tests for the password-reset lifecycle using in-memory
//! SurrealDB repositories.

use chrono::{Duration, Utc};
use jobgrid_auth::config::AuthConfig;
use jobgrid_auth::reset::{PasswordResetService, generate_reset_token, validate_reset_token};
use jobgrid_auth::service::{AuthService, RegisterCandidateInput};
use jobgrid_auth::token::issue_session_token;
use jobgrid_core::error::JobgridError;
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::subject::SubjectKind;
use jobgrid_core::repository::{CandidateRepository, PasswordResetRepository};
use jobgrid_db::repository::{
    SurrealCandidateRepository, SurrealCompanyRepository, SurrealPasswordResetRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;

struct TestEnv {
    auth: AuthService<SurrealCompanyRepository<Db>, SurrealCandidateRepository<Db>>,
    reset: PasswordResetService<
        SurrealCompanyRepository<Db>,
        SurrealCandidateRepository<Db>,
        SurrealPasswordResetRepository<Db>,
    >,
    candidate_repo: SurrealCandidateRepository<Db>,
    reset_repo: SurrealPasswordResetRepository<Db>,
}

fn test_config() -> AuthConfig {
    AuthConfig::from_secret("0123456789abcdef0123456789abcdef").unwrap()
}

async fn setup() -> TestEnv {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    jobgrid_db::run_migrations(&db).await.unwrap();

    let company_repo = SurrealCompanyRepository::new(db.clone());
    let candidate_repo = SurrealCandidateRepository::new(db.clone());
    let reset_repo = SurrealPasswordResetRepository::new(db);

    TestEnv {
        auth: AuthService::new(
            company_repo.clone(),
            candidate_repo.clone(),
            test_config(),
        ),
        reset: PasswordResetService::new(
            company_repo,
            candidate_repo.clone(),
            reset_repo.clone(),
            test_config(),
        ),
        candidate_repo,
        reset_repo,
    }
}

async fn register_alice(env: &TestEnv) {
    env.auth
        .register_candidate(RegisterCandidateInput {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "Old!Pass1".into(),
            phone: "555-0101".into(),
            location: "Springfield".into(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn request_for_unknown_account_looks_like_success() {
    let env = setup().await;

    // No error, no artifacts — indistinguishable from any internal
    // failure for an existing account.
    let outcome = env
        .reset
        .request_reset("ghost@example.com", SubjectKind::Candidate)
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn request_normalizes_email_and_persists_record() {
    let env = setup().await;
    register_alice(&env).await;

    let issued = env
        .reset
        .request_reset("alice@Example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .expect("account exists");

    let claims = validate_reset_token(&issued.signed_token, &test_config()).unwrap();
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.kind, SubjectKind::Candidate);

    let record = env
        .reset_repo
        .get_active_by_token_hash(&issued.token_hash)
        .await
        .unwrap();
    assert_eq!(record.email, "alice@example.com");
    assert!(!record.used);

    // Record expiry is 15 minutes out (within a minute of slack).
    let remaining = record.expires_at - Utc::now();
    assert!(remaining <= Duration::minutes(15));
    assert!(remaining > Duration::minutes(14));
}

#[tokio::test]
async fn request_for_wrong_kind_is_anonymous_no() {
    let env = setup().await;
    register_alice(&env).await;

    // Alice is a candidate; a company reset for her email must look
    // exactly like the unknown-account case.
    let outcome = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Company)
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn complete_reset_happy_path_changes_password_once() {
    let env = setup().await;
    register_alice(&env).await;

    let issued = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();

    env.reset
        .complete_reset(&issued.signed_token, "Str0ng!Pass")
        .await
        .unwrap();

    // New password works, old one does not.
    env.auth
        .login("alice@example.com", "Str0ng!Pass", SubjectKind::Candidate)
        .await
        .unwrap();
    assert!(
        env.auth
            .login("alice@example.com", "Old!Pass1", SubjectKind::Candidate)
            .await
            .is_err()
    );

    // Second redemption of the same token fails with the uniform
    // invalid-or-expired outcome, even though the JWT is still valid.
    let err = env
        .reset
        .complete_reset(&issued.signed_token, "An0ther!Pass")
        .await
        .unwrap_err();
    assert!(matches!(err, JobgridError::AuthenticationFailed { .. }));
    assert!(err.to_string().contains("invalid or expired token"));
}

#[tokio::test]
async fn complete_reset_invalidates_older_outstanding_tokens() {
    let env = setup().await;
    register_alice(&env).await;

    let first = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();
    let second = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();

    env.reset
        .complete_reset(&second.signed_token, "Str0ng!Pass")
        .await
        .unwrap();

    // The older link is dead at the store.
    assert!(
        env.reset_repo
            .get_active_by_token_hash(&first.token_hash)
            .await
            .is_err()
    );
    let err = env
        .reset
        .complete_reset(&first.signed_token, "An0ther!Pass")
        .await
        .unwrap_err();
    assert!(matches!(err, JobgridError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let env = setup().await;
    register_alice(&env).await;

    let issued = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();

    let mut tampered = issued.signed_token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let err = env
        .reset
        .complete_reset(&tampered, "Str0ng!Pass")
        .await
        .unwrap_err();
    assert!(matches!(err, JobgridError::AuthenticationFailed { .. }));

    // The record is untouched and still redeemable.
    assert!(
        env.reset_repo
            .get_active_by_token_hash(&issued.token_hash)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn weak_new_password_is_a_descriptive_validation_error() {
    let env = setup().await;
    register_alice(&env).await;

    let issued = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();

    let err = env
        .reset
        .complete_reset(&issued.signed_token, "weak")
        .await
        .unwrap_err();
    assert!(matches!(err, JobgridError::Validation { .. }));
    assert!(err.to_string().contains("at least 8 characters"));
}

#[tokio::test]
async fn session_token_cannot_complete_a_reset() {
    let env = setup().await;
    register_alice(&env).await;

    let session = issue_session_token(&ObjectId::new(), SubjectKind::Candidate, &test_config())
        .unwrap();

    let err = env
        .reset
        .complete_reset(&session, "Str0ng!Pass")
        .await
        .unwrap_err();
    assert!(matches!(err, JobgridError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn zero_lifetime_reset_token_is_already_expired() {
    // Exercises the explicit expiry re-check on top of standard claim
    // validation.
    let mut config = test_config();
    config.reset_token_lifetime_secs = 0;

    let issued = generate_reset_token("a@b.com", SubjectKind::Candidate, &config).unwrap();
    assert!(validate_reset_token(&issued.signed_token, &config).is_err());
}

#[tokio::test]
async fn account_missing_at_completion_is_not_found() {
    let env = setup().await;
    register_alice(&env).await;

    let issued = env
        .reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();

    // The account vanishes between request and completion.
    let alice = env
        .candidate_repo
        .get_by_email("alice@example.com")
        .await
        .unwrap();
    env.candidate_repo.delete(&alice.id).await.unwrap();

    let err = env
        .reset
        .complete_reset(&issued.signed_token, "Str0ng!Pass")
        .await
        .unwrap_err();
    assert!(matches!(err, JobgridError::NotFound { .. }));
}

#[tokio::test]
async fn purge_expired_delegates_to_store_cleanup() {
    let env = setup().await;
    register_alice(&env).await;

    // An already-dead record alongside a live one.
    env.reset_repo
        .create(jobgrid_core::models::password_reset::CreatePasswordReset {
            email: "alice@example.com".into(),
            kind: SubjectKind::Candidate,
            token: "signed.jwt.token".into(),
            token_hash: "dead-hash".into(),
            expires_at: Utc::now() - Duration::minutes(5),
        })
        .await
        .unwrap();
    env.reset
        .request_reset("alice@example.com", SubjectKind::Candidate)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(env.reset.purge_expired().await.unwrap(), 1);
}
