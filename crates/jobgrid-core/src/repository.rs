//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in the
//! database crate; the auth core is generic over these traits and never
//! sees a concrete store. The operation set per record kind is insert,
//! find-by-id, find-by-filter, count-by-filter, update-by-id, and
//! delete-by-id.

use crate::error::JobgridResult;
use crate::id::ObjectId;
use crate::models::{
    candidate::{Candidate, CreateCandidate, UpdateCandidate},
    company::{Company, CreateCompany, UpdateCompany},
    password_reset::{CreatePasswordReset, PasswordReset},
    subject::SubjectKind,
};

pub trait CompanyRepository: Send + Sync {
    fn create(&self, input: CreateCompany) -> impl Future<Output = JobgridResult<Company>> + Send;
    fn get_by_id(&self, id: &ObjectId) -> impl Future<Output = JobgridResult<Company>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = JobgridResult<Company>> + Send;
    fn count_by_email(&self, email: &str) -> impl Future<Output = JobgridResult<u64>> + Send;
    fn update(
        &self,
        id: &ObjectId,
        input: UpdateCompany,
    ) -> impl Future<Output = JobgridResult<Company>> + Send;
    fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
    ) -> impl Future<Output = JobgridResult<()>> + Send;
    fn delete(&self, id: &ObjectId) -> impl Future<Output = JobgridResult<()>> + Send;
}

pub trait CandidateRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCandidate,
    ) -> impl Future<Output = JobgridResult<Candidate>> + Send;
    fn get_by_id(&self, id: &ObjectId) -> impl Future<Output = JobgridResult<Candidate>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = JobgridResult<Candidate>> + Send;
    fn count_by_email(&self, email: &str) -> impl Future<Output = JobgridResult<u64>> + Send;
    fn update(
        &self,
        id: &ObjectId,
        input: UpdateCandidate,
    ) -> impl Future<Output = JobgridResult<Candidate>> + Send;
    fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
    ) -> impl Future<Output = JobgridResult<()>> + Send;
    fn delete(&self, id: &ObjectId) -> impl Future<Output = JobgridResult<()>> + Send;
}

pub trait PasswordResetRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePasswordReset,
    ) -> impl Future<Output = JobgridResult<PasswordReset>> + Send;

    /// Fetch the record for `token_hash` that is still unused and
    /// unexpired at the store.
    fn get_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = JobgridResult<PasswordReset>> + Send;

    /// Atomically mark the active record for `token_hash` as used.
    ///
    /// The mutation is conditional on `used = false` at the store, so
    /// of two concurrent redemption attempts exactly one succeeds; the
    /// loser observes not-found.
    fn consume(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = JobgridResult<PasswordReset>> + Send;

    /// Mark every outstanding unused record for the identity as used.
    /// Returns how many records were invalidated.
    fn invalidate_all_for_subject(
        &self,
        email: &str,
        kind: SubjectKind,
    ) -> impl Future<Output = JobgridResult<u64>> + Send;

    /// Remove expired records. Returns how many were deleted.
    fn delete_expired(&self) -> impl Future<Output = JobgridResult<u64>> + Send;
}
