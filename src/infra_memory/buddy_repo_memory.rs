use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryBuddyRepo;

#[async_trait::async_trait]
impl BuddyRepo for MemoryBuddyRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx.state().links.insert(pair))
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx.state().links.remove(&pair))
    }

    async fn list_neighbor_ids_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx)?;
        let mut out: Vec<UserId> = tx
            .state()
            .links
            .iter()
            .filter_map(|pair| pair.other(user_id))
            .collect();
        out.sort();
        Ok(out)
    }
}
