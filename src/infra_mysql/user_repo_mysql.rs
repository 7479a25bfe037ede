use super::util::{downcast, store_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlConnection, QueryBuilder, Row};

pub struct MySqlUserRepo;

fn user_from_row(row: &MySqlRow) -> Result<UserRecord, BuddyError> {
    Ok(UserRecord {
        user_id: row.try_get("user_id").map_err(store_err("decode user_id"))?,
        name: row.try_get("name").map_err(store_err("decode name"))?,
        email: row.try_get("email").map_err(store_err("decode email"))?,
        pairing_enabled: row
            .try_get("pairing_enabled")
            .map_err(store_err("decode pairing_enabled"))?,
    })
}

/// Takes the row lock that serializes mutations touching `user_id`.
async fn lock_user_row(conn: &mut MySqlConnection, user_id: UserId) -> Result<bool, BuddyError> {
    let row = sqlx::query("SELECT user_id FROM user WHERE user_id = ? FOR UPDATE")
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(store_err("lock user"))?;

    Ok(row.is_some())
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, BuddyError> {
        let tx = downcast(tx);

        let row = sqlx::query(
            "SELECT user_id, name, email, pairing_enabled FROM user WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(tx.conn())
        .await
        .map_err(store_err("query user"))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_many_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_ids: &[UserId],
    ) -> Result<Vec<UserRecord>, BuddyError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let tx = downcast(tx);

        let mut query: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT user_id, name, email, pairing_enabled FROM user WHERE user_id IN (",
        );
        {
            let mut ids = query.separated(", ");
            for id in user_ids {
                ids.push_bind(*id);
            }
        }
        query.push(") ORDER BY user_id ASC");

        let rows = query
            .build()
            .fetch_all(tx.conn())
            .await
            .map_err(store_err("query users"))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn lock_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);
        lock_user_row(tx.conn(), user_id).await
    }

    async fn set_pairing_enabled_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        enabled: bool,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx);

        // affected rows is 0 for an unchanged value, so existence is checked separately
        if !lock_user_row(tx.conn(), user_id).await? {
            return Ok(false);
        }

        sqlx::query("UPDATE user SET pairing_enabled = ? WHERE user_id = ?")
            .bind(enabled)
            .bind(user_id)
            .execute(tx.conn())
            .await
            .map_err(store_err("update pairing_enabled"))?;

        Ok(true)
    }
}
