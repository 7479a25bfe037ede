use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryCourseRepo;

#[async_trait::async_trait]
impl CourseRepo for MemoryCourseRepo {
    async fn exists_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        course_id: CourseId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx.state().courses.contains_key(&course_id))
    }

    async fn list_enrollee_ids_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        course_id: CourseId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx
            .state()
            .enrollments
            .range((course_id, UserId(i64::MIN))..=(course_id, UserId(i64::MAX)))
            .map(|&(_, user_id)| user_id)
            .collect())
    }
}
