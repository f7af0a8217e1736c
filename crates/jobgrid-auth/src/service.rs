//! Authentication service — registration and login orchestration.

use jobgrid_core::error::{JobgridError, JobgridResult};
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::candidate::CreateCandidate;
use jobgrid_core::models::company::CreateCompany;
use jobgrid_core::models::subject::SubjectKind;
use jobgrid_core::repository::{CandidateRepository, CompanyRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::{hash_password, normalize_email, validate_password_strength, verify_password};
use crate::token::issue_session_token;

/// Input for company registration.
#[derive(Debug)]
pub struct RegisterCompanyInput {
    pub name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
}

/// Input for candidate registration.
#[derive(Debug)]
pub struct RegisterCandidateInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
}

/// Successful authentication result.
#[derive(Debug)]
pub struct AuthOutput {
    /// Signed session token.
    pub token: String,
    /// Account the token was issued for.
    pub subject_id: ObjectId,
    pub kind: SubjectKind,
    /// Session token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<C: CompanyRepository, A: CandidateRepository> {
    company_repo: C,
    candidate_repo: A,
    config: AuthConfig,
}

impl<C: CompanyRepository, A: CandidateRepository> AuthService<C, A> {
    pub fn new(company_repo: C, candidate_repo: A, config: AuthConfig) -> Self {
        Self {
            company_repo,
            candidate_repo,
            config,
        }
    }

    /// Register a company account and issue its first session token.
    pub async fn register_company(
        &self,
        input: RegisterCompanyInput,
    ) -> JobgridResult<AuthOutput> {
        validate_password_strength(&input.password)?;
        let email = normalize_email(&input.email);
        self.ensure_email_unused(&email).await?;

        let password_hash = hash_password(&input.password)?;
        let company = self
            .company_repo
            .create(CreateCompany {
                name: input.name,
                legal_name: input.legal_name,
                tax_id: input.tax_id,
                email,
                password_hash,
                phone: input.phone,
                website: None,
                location: input.location,
                sector: None,
            })
            .await?;

        self.issue(company.id, SubjectKind::Company)
    }

    /// Register a candidate account and issue its first session token.
    pub async fn register_candidate(
        &self,
        input: RegisterCandidateInput,
    ) -> JobgridResult<AuthOutput> {
        validate_password_strength(&input.password)?;
        let email = normalize_email(&input.email);
        self.ensure_email_unused(&email).await?;

        let password_hash = hash_password(&input.password)?;
        let candidate = self
            .candidate_repo
            .create(CreateCandidate {
                name: input.name,
                email,
                password_hash,
                phone: input.phone,
                location: input.location,
            })
            .await?;

        self.issue(candidate.id, SubjectKind::Candidate)
    }

    /// Authenticate with email + password and issue a session token.
    ///
    /// An unknown account and a wrong password produce the same
    /// failure.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        kind: SubjectKind,
    ) -> JobgridResult<AuthOutput> {
        let email = normalize_email(email);

        let (id, stored_hash) = match kind {
            SubjectKind::Company => {
                let company = self
                    .company_repo
                    .get_by_email(&email)
                    .await
                    .map_err(not_found_to_invalid_credentials)?;
                (company.id, company.password_hash)
            }
            SubjectKind::Candidate => {
                let candidate = self
                    .candidate_repo
                    .get_by_email(&email)
                    .await
                    .map_err(not_found_to_invalid_credentials)?;
                (candidate.id, candidate.password_hash)
            }
        };

        if !verify_password(password, &stored_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.issue(id, kind)
    }

    fn issue(&self, subject_id: ObjectId, kind: SubjectKind) -> JobgridResult<AuthOutput> {
        let token = issue_session_token(&subject_id, kind, &self.config)?;
        Ok(AuthOutput {
            token,
            subject_id,
            kind,
            expires_in: self.config.session_token_lifetime_secs,
        })
    }

    /// Cross-kind uniqueness: an email may exist in at most one of the
    /// two account collections.
    async fn ensure_email_unused(&self, email: &str) -> JobgridResult<()> {
        if self.company_repo.count_by_email(email).await? > 0
            || self.candidate_repo.count_by_email(email).await? > 0
        {
            return Err(JobgridError::AlreadyExists {
                entity: "account".into(),
            });
        }
        Ok(())
    }
}

fn not_found_to_invalid_credentials(err: JobgridError) -> JobgridError {
    match err {
        JobgridError::NotFound { .. } => AuthError::InvalidCredentials.into(),
        other => other,
    }
}
