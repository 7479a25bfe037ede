use super::util::{downcast, store_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MySqlBlockRepo;

#[async_trait::async_trait]
impl BlockRepo for MySqlBlockRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
        blocked: UserId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        let result = sqlx::query("INSERT IGNORE INTO user_block (blocker, blocked) VALUES (?, ?)")
            .bind(blocker)
            .bind(blocked)
            .execute(tx.conn())
            .await
            .map_err(store_err("insert block"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
        blocked: UserId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        let result = sqlx::query("DELETE FROM user_block WHERE blocker = ? AND blocked = ?")
            .bind(blocker)
            .bind(blocked)
            .execute(tx.conn())
            .await
            .map_err(store_err("delete block"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_blocked_either_way_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        let count: i64 = sqlx::query_scalar(
            r#"
SELECT COUNT(1)
FROM user_block
WHERE (blocker = ? AND blocked = ?)
   OR (blocker = ? AND blocked = ?)
"#,
        )
        .bind(pair.low())
        .bind(pair.high())
        .bind(pair.high())
        .bind(pair.low())
        .fetch_one(tx.conn())
        .await
        .map_err(store_err("check block"))?;

        Ok(count > 0)
    }

    async fn list_counterparts_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx);

        sqlx::query_scalar::<_, UserId>(
            r#"
SELECT blocked AS other_user FROM user_block WHERE blocker = ?
UNION
SELECT blocker AS other_user FROM user_block WHERE blocked = ?
ORDER BY other_user ASC
"#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(tx.conn())
        .await
        .map_err(store_err("list block counterparts"))
    }

    async fn list_blocked_by_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx);

        sqlx::query_scalar::<_, UserId>(
            "SELECT blocked FROM user_block WHERE blocker = ? ORDER BY blocked ASC",
        )
        .bind(blocker)
        .fetch_all(tx.conn())
        .await
        .map_err(store_err("list blocked users"))
    }
}
