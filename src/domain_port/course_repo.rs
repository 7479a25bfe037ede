use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait CourseRepo: Send + Sync {
    async fn exists_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        course_id: CourseId,
    ) -> Result<bool, BuddyError>;

    async fn list_enrollee_ids_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        course_id: CourseId,
    ) -> Result<Vec<UserId>, BuddyError>;
}
