use std::collections::BTreeSet;
use std::sync::Arc;

use super::domain::{AccountId, AssessmentId};
use super::repository::{AssessmentCatalog, LinkRepository, RepositoryError};

/// Computes the set of assessments a student may access: direct assignments
/// unioned with the owned set of every recruiter the student is linked to.
pub struct ScopeResolver<L, C> {
    links: Arc<L>,
    catalog: Arc<C>,
}

impl<L, C> ScopeResolver<L, C>
where
    L: LinkRepository,
    C: AssessmentCatalog,
{
    pub fn new(links: Arc<L>, catalog: Arc<C>) -> Self {
        Self { links, catalog }
    }

    /// Pure read; the result is sorted and free of duplicates. A linked recruiter
    /// with no assessments contributes nothing.
    pub fn visible_to(&self, student: &AccountId) -> Result<Vec<AssessmentId>, RepositoryError> {
        let mut visible: BTreeSet<AssessmentId> =
            self.catalog.assigned_to(student)?.into_iter().collect();

        for link in self.links.for_student(student)? {
            visible.extend(self.catalog.owned_by(&link.recruiter)?);
        }

        Ok(visible.into_iter().collect())
    }
}
