//! Subject kind discriminator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two account categories.
///
/// Carried explicitly in every token claim and checked again at
/// authorization time; never inferred from anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Company,
    Candidate,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Company => "company",
            SubjectKind::Candidate => "candidate",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
