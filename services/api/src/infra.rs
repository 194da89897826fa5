use metrics_exporter_prometheus::PrometheusHandle;
use skillgate::access::{
    AccountId, AccountRecord, AccountRepository, AssessmentCatalog, AssessmentId, LinkRecord,
    LinkRepository, RecruiterCode, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct AccountsState {
    by_id: HashMap<AccountId, AccountRecord>,
    code_index: HashMap<String, AccountId>,
}

/// In-memory account store backing the service binary. Both uniqueness constraints
/// (account id, recruiter code) are checked and written under one lock so racing
/// registrations resolve the same way they would against a database unique index.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountRepository {
    state: Arc<Mutex<AccountsState>>,
}

impl AccountRepository for InMemoryAccountRepository {
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

/// In-memory link store enforcing the (student, recruiter) pair constraint.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLinkRepository {
    rows: Arc<Mutex<Vec<LinkRecord>>>,
}

impl InMemoryLinkRepository {
    pub(crate) fn row_count(&self) -> usize {
        self.rows.lock().expect("link mutex poisoned").len()
    }
}

impl LinkRepository for InMemoryLinkRepository {
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

/// In-memory assessment catalog. The assessment engine owns this data in
/// production; the binary seeds it for demos and keeps it otherwise empty.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryAssessmentCatalog {
    pub(crate) fn set_owned(&self, account: &AccountId, ids: &[&str]) {
        let mut state = self.state.lock().expect("catalog mutex poisoned");
        state.owned.insert(
            account.clone(),
            ids.iter().map(|id| AssessmentId(id.to_string())).collect(),
        );
    }

    pub(crate) fn assign_direct(&self, student: &AccountId, ids: &[&str]) {
        let mut state = self.state.lock().expect("catalog mutex poisoned");
        state.assigned.insert(
            student.clone(),
            ids.iter().map(|id| AssessmentId(id.to_string())).collect(),
        );
    }
}

impl AssessmentCatalog for InMemoryAssessmentCatalog {
    fn owned_by(&self, account: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError> {
        let state = self.state.lock().expect("catalog mutex poisoned");
        Ok(state.owned.get(account).cloned().unwrap_or_default())
    }

    fn assigned_to(&self, student: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError> {
        let state = self.state.lock().expect("catalog mutex poisoned");
        Ok(state.assigned.get(student).cloned().unwrap_or_default())
    }
}
