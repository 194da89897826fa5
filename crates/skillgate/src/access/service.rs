use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    AccountId, AccountRecord, AccountRole, AssessmentId, CodeValidation, LinkOutcome, LinkRecord,
    NewAccount, RecruiterCode, RecruiterSummary,
};
use super::generator::CodeGenerator;
use super::repository::{AccountRepository, AssessmentCatalog, LinkRepository, RepositoryError};
use super::resolver::ScopeResolver;

/// Service composing the code generator, the account and link stores, and the
/// assessment scope resolver.
pub struct AccessService<A, L, C> {
    accounts: Arc<A>,
    links: Arc<L>,
    catalog: Arc<C>,
    generator: CodeGenerator,
    resolver: ScopeResolver<L, C>,
}

impl<A, L, C> AccessService<A, L, C>
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    pub fn new(
        accounts: Arc<A>,
        links: Arc<L>,
        catalog: Arc<C>,
        generator: CodeGenerator,
    ) -> Self {
        let resolver = ScopeResolver::new(links.clone(), catalog.clone());

        Self {
            accounts,
            links,
            catalog,
            generator,
            resolver,
        }
    }

    /// Register an account, issuing a recruiter code when the role is eligible.
    ///
    /// The store's code constraint is the source of truth for uniqueness: each
    /// attempt inserts the complete row and a `CodeTaken` signal triggers a retry
    /// with a fresh candidate, up to the generator's attempt budget. A separate
    /// lookup before the write would race against concurrent registrations.
    pub fn register_account(&self, account: NewAccount) -> Result<AccountRecord, AccessError> {
        let NewAccount {
            id,
            display_name,
            role,
        } = account;

        if !role.issues_code() {
            let record = AccountRecord {
                id,
                display_name,
                role,
                recruiter_code: None,
                created_at: Utc::now(),
            };
            return Ok(self.accounts.insert(record)?);
        }

        let budget = self.generator.max_attempts();
        for _ in 0..budget {
            let record = AccountRecord {
                id: id.clone(),
                display_name: display_name.clone(),
                role,
                recruiter_code: Some(self.generator.candidate()),
                created_at: Utc::now(),
            };

            match self.accounts.insert(record) {
                Ok(stored) => return Ok(stored),
                Err(RepositoryError::CodeTaken) => continue,
                Err(other) => return Err(other.into()),
            }
        }

        Err(AccessError::CodeSpaceExhausted { attempts: budget })
    }

    /// Check a presented code without linking. Side-effect free; an unknown or
    /// ineligible code produces a negative validation, never an error.
    pub fn validate_code(&self, raw: &str) -> Result<CodeValidation, AccessError> {
        match self.lookup_code_owner(raw)? {
            Some(owner) if owner.role.issues_code() => Ok(CodeValidation::valid(&owner)),
            _ => Ok(CodeValidation::invalid()),
        }
    }

    /// Link the calling student to the recruiter owning the presented code.
    ///
    /// Presenting an already-activated code is a no-op: the store's pair constraint
    /// rejects the duplicate row and the existing link's data is returned, so a
    /// stale email link or a racing second request observes the same success as the
    /// first.
    pub fn link(
        &self,
        student_id: &AccountId,
        raw_code: &str,
    ) -> Result<LinkOutcome, AccessError> {
        let student = self.require_student(student_id)?;

        let owner = self
            .lookup_code_owner(raw_code)?
            .ok_or(AccessError::InvalidCode)?;
        // Self check before the role screen, so an account that ever holds both a
        // code and the student role gets the specific rejection.
        if owner.id == student.id {
            return Err(AccessError::SelfLinkNotAllowed);
        }
        if !owner.role.issues_code() {
            return Err(AccessError::InvalidCode);
        }

        let link = match self.links.insert(LinkRecord {
            student: student.id.clone(),
            recruiter: owner.id.clone(),
            linked_at: Utc::now(),
        }) {
            Ok(inserted) => inserted,
            Err(RepositoryError::DuplicateLink) => self
                .links
                .find(&student.id, &owner.id)?
                .ok_or(RepositoryError::NotFound)?,
            Err(other) => return Err(other.into()),
        };

        Ok(LinkOutcome {
            recruiter_id: owner.id,
            recruiter_name: owner.display_name,
            linked_at: link.linked_at,
            linked_assessment_ids: self.catalog.owned_by(&link.recruiter)?,
        })
    }

    /// All recruiters the student holds a link to, oldest link first.
    pub fn recruiters_for(
        &self,
        student_id: &AccountId,
    ) -> Result<Vec<RecruiterSummary>, AccessError> {
        self.require_student(student_id)?;

        let mut links = self.links.for_student(student_id)?;
        links.sort_by_key(|link| link.linked_at);

        let mut recruiters = Vec::with_capacity(links.len());
        for link in links {
            // A recruiter account removed after linking drops out of the view.
            if let Some(account) = self.accounts.fetch(&link.recruiter)? {
                recruiters.push(RecruiterSummary {
                    recruiter_id: account.id,
                    display_name: account.display_name,
                    linked_at: link.linked_at,
                });
            }
        }

        Ok(recruiters)
    }

    /// Assessments the student may access, directly or through recruiter links.
    pub fn visible_assessments(
        &self,
        student_id: &AccountId,
    ) -> Result<Vec<AssessmentId>, AccessError> {
        self.require_student(student_id)?;
        Ok(self.resolver.visible_to(student_id)?)
    }

    fn require_student(&self, id: &AccountId) -> Result<AccountRecord, AccessError> {
        let account = self.accounts.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if account.role != AccountRole::Student {
            return Err(AccessError::NotAStudent { role: account.role });
        }
        Ok(account)
    }

    fn lookup_code_owner(&self, raw: &str) -> Result<Option<AccountRecord>, AccessError> {
        let Some(code) = RecruiterCode::parse(raw) else {
            return Ok(None);
        };
        Ok(self.accounts.find_by_code(&code)?)
    }
}

/// Error raised by the access service.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("recruiter code is not recognized")]
    InvalidCode,
    #[error("an account may not link to its own recruiter code")]
    SelfLinkNotAllowed,
    #[error("only student accounts may link to a recruiter (caller role: {})", .role.label())]
    NotAStudent { role: AccountRole },
    #[error("recruiter code space exhausted after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
