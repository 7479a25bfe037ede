use super::util::{downcast, store_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MySqlCourseRepo;

#[async_trait::async_trait]
impl CourseRepo for MySqlCourseRepo {
    async fn exists_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        course_id: CourseId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM course WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(tx.conn())
            .await
            .map_err(store_err("check course"))?;

        Ok(count > 0)
    }

    async fn list_enrollee_ids_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        course_id: CourseId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx);

        sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM enrollment WHERE course_id = ? ORDER BY user_id ASC",
        )
        .bind(course_id)
        .fetch_all(tx.conn())
        .await
        .map_err(store_err("list enrollees"))
    }
}
