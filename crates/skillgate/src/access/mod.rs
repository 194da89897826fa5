//! Recruiter code issuance, student linking, and assessment scope resolution.
//!
//! A recruiter-facing account receives a unique eight-character code when it is
//! registered. A student who presents that code is linked to the recruiter, and the
//! link makes every assessment the recruiter owns visible to the student alongside
//! the student's own direct assignments. Storage is abstracted behind traits so the
//! service can run against the in-memory stores used by the API binary and the
//! tests, or against a database-backed implementation.

pub mod domain;
pub mod generator;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountId, AccountRecord, AccountRole, AssessmentId, CodeValidation, LinkOutcome, LinkRecord,
    NewAccount, RecruiterCode, RecruiterSummary, CODE_ALPHABET, CODE_LENGTH,
};
pub use generator::CodeGenerator;
pub use repository::{AccountRepository, AssessmentCatalog, LinkRepository, RepositoryError};
pub use resolver::ScopeResolver;
pub use router::{access_router, CodePayload};
pub use service::{AccessError, AccessService};
