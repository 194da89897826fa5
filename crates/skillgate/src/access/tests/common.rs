use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::access::domain::{
    AccountId, AccountRecord, AccountRole, AssessmentId, LinkRecord, NewAccount, RecruiterCode,
};
use crate::access::generator::CodeGenerator;
use crate::access::repository::{
    AccountRepository, AssessmentCatalog, LinkRepository, RepositoryError,
};
use crate::access::router::access_router;
use crate::access::service::AccessService;

pub(super) type MemoryService = AccessService<MemoryAccounts, MemoryLinks, MemoryCatalog>;

pub(super) fn new_student(id: &str, name: &str) -> NewAccount {
    NewAccount {
        id: AccountId(id.to_string()),
        display_name: name.to_string(),
        role: AccountRole::Student,
    }
}

pub(super) fn new_recruiter(id: &str, name: &str) -> NewAccount {
    NewAccount {
        id: AccountId(id.to_string()),
        display_name: name.to_string(),
        role: AccountRole::Recruiter,
    }
}

pub(super) fn new_admin(id: &str, name: &str) -> NewAccount {
    NewAccount {
        id: AccountId(id.to_string()),
        display_name: name.to_string(),
        role: AccountRole::Admin,
    }
}

pub(super) fn timestamp(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset_secs, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryAccounts>,
    Arc<MemoryLinks>,
    Arc<MemoryCatalog>,
) {
    let accounts = Arc::new(MemoryAccounts::default());
    let links = Arc::new(MemoryLinks::default());
    let catalog = Arc::new(MemoryCatalog::default());
    let service = AccessService::new(
        accounts.clone(),
        links.clone(),
        catalog.clone(),
        CodeGenerator::default(),
    );
    (service, accounts, links, catalog)
}

/// Insert an account row that holds a code despite carrying the student role, to
/// exercise the self-link guard. The store does not police roles, so this is the
/// shape a future role overlap would take.
pub(super) fn insert_student_with_code(accounts: &MemoryAccounts, id: &str, code: &str) {
    let record = AccountRecord {
        id: AccountId(id.to_string()),
        display_name: "Hybrid Account".to_string(),
        role: AccountRole::Student,
        recruiter_code: Some(RecruiterCode::parse(code).expect("well-formed code")),
        created_at: Utc::now(),
    };
    accounts.insert(record).expect("hybrid account inserts");
}

#[derive(Default)]
struct AccountsState {
    by_id: HashMap<AccountId, AccountRecord>,
    code_index: HashMap<String, AccountId>,
}

/// Account store double enforcing both uniqueness constraints under one lock.
#[derive(Default, Clone)]
pub(super) struct MemoryAccounts {
    state: Arc<Mutex<AccountsState>>,
}

impl MemoryAccounts {
    pub(super) fn account_count(&self) -> usize {
        self.state.lock().expect("account mutex poisoned").by_id.len()
    }
}

impl AccountRepository for MemoryAccounts {
    fn insert(&self, record: AccountRecord) -> Result<AccountRecord, RepositoryError> {
        let mut state = self.state.lock().expect("account mutex poisoned");
        if state.by_id.contains_key(&record.id) {
            return Err(RepositoryError::DuplicateAccount);
        }
        if let Some(code) = &record.recruiter_code {
            if state.code_index.contains_key(code.as_str()) {
                return Err(RepositoryError::CodeTaken);
            }
            state
                .code_index
                .insert(code.as_str().to_string(), record.id.clone());
        }
        state.by_id.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        let state = self.state.lock().expect("account mutex poisoned");
        Ok(state.by_id.get(id).cloned())
    }

    fn find_by_code(
        &self,
        code: &RecruiterCode,
    ) -> Result<Option<AccountRecord>, RepositoryError> {
        let state = self.state.lock().expect("account mutex poisoned");
        Ok(state
            .code_index
            .get(code.as_str())
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }
}

/// Link store double enforcing the (student, recruiter) pair constraint.
#[derive(Default, Clone)]
pub(super) struct MemoryLinks {
    rows: Arc<Mutex<Vec<LinkRecord>>>,
}

impl MemoryLinks {
    pub(super) fn row_count(&self) -> usize {
        self.rows.lock().expect("link mutex poisoned").len()
    }
}

impl LinkRepository for MemoryLinks {
    fn insert(&self, record: LinkRecord) -> Result<LinkRecord, RepositoryError> {
        let mut rows = self.rows.lock().expect("link mutex poisoned");
        if rows
            .iter()
            .any(|row| row.student == record.student && row.recruiter == record.recruiter)
        {
            return Err(RepositoryError::DuplicateLink);
        }
        rows.push(record.clone());
        Ok(record)
    }

    fn find(
        &self,
        student: &AccountId,
        recruiter: &AccountId,
    ) -> Result<Option<LinkRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("link mutex poisoned");
        Ok(rows
            .iter()
            .find(|row| &row.student == student && &row.recruiter == recruiter)
            .cloned())
    }

    fn for_student(&self, student: &AccountId) -> Result<Vec<LinkRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("link mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| &row.student == student)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct CatalogState {
    owned: HashMap<AccountId, Vec<AssessmentId>>,
    assigned: HashMap<AccountId, Vec<AssessmentId>>,
}

/// Catalog double seeded directly by tests.
#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl MemoryCatalog {
    pub(super) fn set_owned(&self, account: &AccountId, ids: &[&str]) {
        let mut state = self.state.lock().expect("catalog mutex poisoned");
        state.owned.insert(
            account.clone(),
            ids.iter().map(|id| AssessmentId(id.to_string())).collect(),
        );
    }

    pub(super) fn assign_direct(&self, student: &AccountId, ids: &[&str]) {
        let mut state = self.state.lock().expect("catalog mutex poisoned");
        state.assigned.insert(
            student.clone(),
            ids.iter().map(|id| AssessmentId(id.to_string())).collect(),
        );
    }
}

impl AssessmentCatalog for MemoryCatalog {
    fn owned_by(&self, account: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError> {
        let state = self.state.lock().expect("catalog mutex poisoned");
        Ok(state.owned.get(account).cloned().unwrap_or_default())
    }

    fn assigned_to(&self, student: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError> {
        let state = self.state.lock().expect("catalog mutex poisoned");
        Ok(state.assigned.get(student).cloned().unwrap_or_default())
    }
}

/// Account store double whose code constraint always fires, for exhaustion tests.
pub(super) struct ExhaustedAccounts;

impl AccountRepository for ExhaustedAccounts {
    fn insert(&self, _record: AccountRecord) -> Result<AccountRecord, RepositoryError> {
        Err(RepositoryError::CodeTaken)
    }

    fn fetch(&self, _id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        Ok(None)
    }

    fn find_by_code(
        &self,
        _code: &RecruiterCode,
    ) -> Result<Option<AccountRecord>, RepositoryError> {
        Ok(None)
    }
}

/// Account store double rejecting the first N inserts with a code conflict before
/// delegating to a real memory store.
pub(super) struct CollidingAccounts {
    rejections: AtomicU32,
    pub(super) attempts: AtomicU32,
    inner: MemoryAccounts,
}

impl CollidingAccounts {
    pub(super) fn rejecting(rejections: u32) -> Self {
        Self {
            rejections: AtomicU32::new(rejections),
            attempts: AtomicU32::new(0),
            inner: MemoryAccounts::default(),
        }
    }
}

impl AccountRepository for CollidingAccounts {
    fn insert(&self, record: AccountRecord) -> Result<AccountRecord, RepositoryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.rejections.load(Ordering::SeqCst);
        if remaining > 0 {
            self.rejections.store(remaining - 1, Ordering::SeqCst);
            return Err(RepositoryError::CodeTaken);
        }
        self.inner.insert(record)
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_code(
        &self,
        code: &RecruiterCode,
    ) -> Result<Option<AccountRecord>, RepositoryError> {
        self.inner.find_by_code(code)
    }
}

/// Link store double standing in for an offline database.
pub(super) struct UnavailableLinks;

impl LinkRepository for UnavailableLinks {
    fn insert(&self, _record: LinkRecord) -> Result<LinkRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(
        &self,
        _student: &AccountId,
        _recruiter: &AccountId,
    ) -> Result<Option<LinkRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_student(&self, _student: &AccountId) -> Result<Vec<LinkRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn access_router_with_service(service: MemoryService) -> axum::Router {
    access_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
