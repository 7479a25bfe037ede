use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryBlockRepo;

#[async_trait::async_trait]
impl BlockRepo for MemoryBlockRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
        blocked: UserId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx.state().blocks.insert((blocker, blocked)))
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
        blocked: UserId,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx.state().blocks.remove(&(blocker, blocked)))
    }

    async fn is_blocked_either_way_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        let blocks = &tx.state().blocks;
        Ok(blocks.contains(&(pair.low(), pair.high())) || blocks.contains(&(pair.high(), pair.low())))
    }

    async fn list_counterparts_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx)?;
        let mut out: Vec<UserId> = tx
            .state()
            .blocks
            .iter()
            .filter_map(|&(blocker, blocked)| {
                if blocker == user_id {
                    Some(blocked)
                } else if blocked == user_id {
                    Some(blocker)
                } else {
                    None
                }
            })
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }

    async fn list_blocked_by_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let tx = downcast(tx)?;
        // BTreeSet order keeps the result ascending
        Ok(tx
            .state()
            .blocks
            .iter()
            .filter(|(b, _)| *b == blocker)
            .map(|&(_, blocked)| blocked)
            .collect())
    }
}
