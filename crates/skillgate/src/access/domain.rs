use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for platform accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Identifier wrapper for assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Platform roles. Only recruiter-facing roles are issued share codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Student,
    Recruiter,
    Admin,
}

impl AccountRole {
    /// Whether accounts of this role receive a recruiter code at registration.
    /// Eligibility is decided once, here, rather than re-derived by callers.
    pub const fn issues_code(self) -> bool {
        matches!(self, AccountRole::Recruiter | AccountRole::Admin)
    }

    pub const fn label(self) -> &'static str {
        match self {
            AccountRole::Student => "student",
            AccountRole::Recruiter => "recruiter",
            AccountRole::Admin => "admin",
        }
    }
}

/// Characters a recruiter code may contain. `I`, `O`, `0`, and `1` are excluded so
/// codes survive being read aloud or retyped from a printout.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every issued code.
pub const CODE_LENGTH: usize = 8;

/// Canonical form of a shareable recruiter code.
///
/// Codes are stored and compared trimmed and ASCII-uppercased. [`RecruiterCode::parse`]
/// folds presented input into that form, which is what makes code entry
/// case-insensitive end to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecruiterCode(String);

impl RecruiterCode {
    pub(crate) fn from_canonical(code: String) -> Self {
        Self(code)
    }

    /// Normalize presented input. Input that cannot possibly be a code (wrong
    /// length after trimming) yields `None` so callers can fail before touching
    /// storage.
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = raw.trim().to_ascii_uppercase();
        if canonical.len() != CODE_LENGTH {
            return None;
        }
        Some(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecruiterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration payload accepted from the account-management collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub id: AccountId,
    pub display_name: String,
    pub role: AccountRole,
}

/// Stored account row. `recruiter_code` is present iff the role issues codes and is
/// immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub display_name: String,
    pub role: AccountRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_code: Option<RecruiterCode>,
    pub created_at: DateTime<Utc>,
}

/// Stored association between a student and a recruiter. At most one row may exist
/// per (student, recruiter) pair; a student may hold links to several recruiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub student: AccountId,
    pub recruiter: AccountId,
    pub linked_at: DateTime<Utc>,
}

/// Outcome of presenting a code for validation. The message strings are part of the
/// response contract rendered by the student UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_name: Option<String>,
    pub message: String,
}

impl CodeValidation {
    pub(crate) fn valid(recruiter: &AccountRecord) -> Self {
        Self {
            is_valid: true,
            recruiter_id: Some(recruiter.id.clone()),
            recruiter_name: Some(recruiter.display_name.clone()),
            message: "Valid recruiter code.".to_string(),
        }
    }

    pub(crate) fn invalid() -> Self {
        Self {
            is_valid: false,
            recruiter_id: None,
            recruiter_name: None,
            message: "Invalid recruiter code. Please check and try again.".to_string(),
        }
    }
}

/// Result of a successful link, including the assessments the link unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub recruiter_id: AccountId,
    pub recruiter_name: String,
    pub linked_at: DateTime<Utc>,
    pub linked_assessment_ids: Vec<AssessmentId>,
}

/// One linked recruiter, for the student's "my recruiters" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterSummary {
    pub recruiter_id: AccountId,
    pub display_name: String,
    pub linked_at: DateTime<Utc>,
}
