//! Jobgrid Core — domain models, error taxonomy, record identifiers,
//! and repository trait definitions.

pub mod error;
pub mod id;
pub mod models;
pub mod repository;

pub use error::{JobgridError, JobgridResult};
pub use id::ObjectId;
pub use models::subject::SubjectKind;
