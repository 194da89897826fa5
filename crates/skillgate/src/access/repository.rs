use super::domain::{AccountId, AccountRecord, AssessmentId, LinkRecord, RecruiterCode};

/// Storage abstraction for account rows so the service can be exercised in
/// isolation.
///
/// `insert` must be atomic with respect to both account constraints: an
/// implementation checks the id and the recruiter code and writes the row under a
/// single synchronization scope, signalling violations through [`RepositoryError`].
/// Two racing inserts must never both observe "no conflict".
pub trait AccountRepository: Send + Sync {
    fn insert(&self, record: AccountRecord) -> Result<AccountRecord, RepositoryError>;
    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError>;
    fn find_by_code(&self, code: &RecruiterCode)
        -> Result<Option<AccountRecord>, RepositoryError>;
}

/// Storage abstraction for student-recruiter links. `insert` is atomic with respect
/// to the (student, recruiter) pair constraint. There is no removal operation;
/// unlinking is out of scope for this subsystem.
pub trait LinkRepository: Send + Sync {
    fn insert(&self, record: LinkRecord) -> Result<LinkRecord, RepositoryError>;
    fn find(
        &self,
        student: &AccountId,
        recruiter: &AccountId,
    ) -> Result<Option<LinkRecord>, RepositoryError>;
    fn for_student(&self, student: &AccountId) -> Result<Vec<LinkRecord>, RepositoryError>;
}

/// Read-only view of assessment ownership and direct assignments, maintained by the
/// assessment engine outside this subsystem.
pub trait AssessmentCatalog: Send + Sync {
    /// Assessments created and owned by the given account.
    fn owned_by(&self, account: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError>;
    /// Assessments assigned directly to the given student.
    fn assigned_to(&self, student: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError>;
}

/// Error enumeration for repository failures. The conflict variants mirror the
/// store-level uniqueness constraints one to one.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("account id already registered")]
    DuplicateAccount,
    #[error("recruiter code already issued")]
    CodeTaken,
    #[error("link already recorded for this student and recruiter")]
    DuplicateLink,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
