use super::util::{downcast, store_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MySqlBuddyRepo;

#[async_trait::async_trait]
impl BuddyRepo for MySqlBuddyRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        let result = sqlx::query("INSERT IGNORE INTO buddy_link (user_min, user_max) VALUES (?, ?)")
            .bind(pair.low())
            .bind(pair.high())
            .execute(tx.conn())
            .await
            .map_err(store_err("insert buddy link"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        let result = sqlx::query("DELETE FROM buddy_link WHERE user_min = ? AND user_max = ?")
            .bind(pair.low())
            .bind(pair.high())
            .execute(tx.conn())
            .await
            .map_err(store_err("delete buddy link"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_neighbor_ids_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx);

        sqlx::query_scalar::<_, UserId>(
            r#"
SELECT IF(user_min = ?, user_max, user_min) AS other_user
FROM buddy_link
WHERE user_min = ? OR user_max = ?
ORDER BY other_user ASC
"#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(tx.conn())
        .await
        .map_err(store_err("list buddy links"))
    }
}
