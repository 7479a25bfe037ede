use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RealBuddyService {
    user_repo: Arc<dyn UserRepo>,
    buddy_repo: Arc<dyn BuddyRepo>,
    block_repo: Arc<dyn BlockRepo>,
    course_repo: Arc<dyn CourseRepo>,
    event_sink: Arc<dyn BuddyEventSink>,
    tx_manager: Arc<dyn TxManager>,
}

fn store_err(e: anyhow::Error) -> BuddyError {
    BuddyError::Store(e.to_string())
}

impl RealBuddyService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        buddy_repo: Arc<dyn BuddyRepo>,
        block_repo: Arc<dyn BlockRepo>,
        course_repo: Arc<dyn CourseRepo>,
        event_sink: Arc<dyn BuddyEventSink>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            user_repo,
            buddy_repo,
            block_repo,
            course_repo,
            event_sink,
            tx_manager,
        }
    }

    /// Neighbours of `user_id` minus anyone blocked in either direction, ascending.
    async fn active_buddies_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError> {
        let mut neighbors = self
            .buddy_repo
            .list_neighbor_ids_in_tx(&mut *tx, user_id)
            .await?;
        let blocked: HashSet<UserId> = self
            .block_repo
            .list_counterparts_in_tx(&mut *tx, user_id)
            .await?
            .into_iter()
            .collect();

        neighbors.retain(|other| *other != user_id && !blocked.contains(other));
        neighbors.sort();
        neighbors.dedup();
        Ok(neighbors)
    }

    /// Each view carries the target's own block-filtered buddy count.
    async fn views_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user_ids: &[UserId],
    ) -> Result<Vec<UserView>, BuddyError> {
        let records = self.user_repo.get_many_in_tx(&mut *tx, user_ids).await?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let count = self
                .active_buddies_in_tx(&mut *tx, record.user_id)
                .await?
                .len();
            views.push(UserView::new(record, count as u32));
        }
        Ok(views)
    }

    async fn require_user_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user_id: UserId,
    ) -> Result<(), BuddyError> {
        match self.user_repo.get_in_tx(tx, user_id).await? {
            Some(_) => Ok(()),
            None => Err(BuddyError::UserNotFound),
        }
    }

    /// Row-locks both users in ascending id order so concurrent mutations of the
    /// same pair serialize and opposite-direction requests cannot deadlock.
    async fn lock_pair_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<(), BuddyError> {
        for user_id in [pair.low(), pair.high()] {
            if !self.user_repo.lock_in_tx(&mut *tx, user_id).await? {
                return Err(BuddyError::UserNotFound);
            }
        }
        Ok(())
    }

    async fn notify(&self, event: BuddyEvent) {
        if let Err(e) = self.event_sink.publish(&event).await {
            warn!(?event, "publish buddy event: {e:#}");
        }
    }
}

#[async_trait::async_trait]
impl BuddyService for RealBuddyService {
    async fn get_user(&self, user_id: UserId) -> Result<UserView, BuddyError> {
        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        let record = self
            .user_repo
            .get_in_tx(&mut *tx, user_id)
            .await?
            .ok_or(BuddyError::UserNotFound)?;
        let count = self.active_buddies_in_tx(&mut *tx, user_id).await?.len();

        tx.commit().await.map_err(store_err)?;

        Ok(UserView::new(record, count as u32))
    }

    async fn list_buddies(&self, me: UserId) -> Result<Vec<UserView>, BuddyError> {
        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        self.require_user_in_tx(&mut *tx, me).await?;
        let buddies = self.active_buddies_in_tx(&mut *tx, me).await?;
        let views = self.views_in_tx(&mut *tx, &buddies).await?;

        tx.commit().await.map_err(store_err)?;

        Ok(views)
    }

    async fn list_buddies_in_course(
        &self,
        me: UserId,
        course_id: CourseId,
    ) -> Result<Vec<UserView>, BuddyError> {
        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        self.require_user_in_tx(&mut *tx, me).await?;
        if !self.course_repo.exists_in_tx(&mut *tx, course_id).await? {
            return Err(BuddyError::CourseNotFound);
        }

        let enrolled: HashSet<UserId> = self
            .course_repo
            .list_enrollee_ids_in_tx(&mut *tx, course_id)
            .await?
            .into_iter()
            .collect();
        let mut buddies = self.active_buddies_in_tx(&mut *tx, me).await?;
        buddies.retain(|other| enrolled.contains(other));
        let views = self.views_in_tx(&mut *tx, &buddies).await?;

        tx.commit().await.map_err(store_err)?;

        Ok(views)
    }

    async fn list_blocked(&self, me: UserId) -> Result<Vec<UserView>, BuddyError> {
        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        self.require_user_in_tx(&mut *tx, me).await?;
        let blocked = self.block_repo.list_blocked_by_in_tx(&mut *tx, me).await?;
        let views = self.views_in_tx(&mut *tx, &blocked).await?;

        tx.commit().await.map_err(store_err)?;

        Ok(views)
    }

    async fn add_buddy(&self, me: UserId, other: UserId) -> Result<(), BuddyError> {
        let pair = UserPair::new(me, other).ok_or(BuddyError::SelfTarget)?;

        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        self.lock_pair_in_tx(&mut *tx, pair).await?;
        if self
            .block_repo
            .is_blocked_either_way_in_tx(&mut *tx, pair)
            .await?
        {
            debug!(%me, %other, "add buddy refused: pair is blocked");
            return Err(BuddyError::Blocked);
        }
        let created = self.buddy_repo.insert_in_tx(&mut *tx, pair).await?;

        tx.commit().await.map_err(store_err)?;

        if created {
            info!(%me, %other, "buddy added");
            self.notify(BuddyEvent::BuddyAdded {
                requester: me,
                buddy: other,
            })
            .await;
        } else {
            debug!(%me, %other, "buddy link already present");
        }
        Ok(())
    }

    async fn remove_buddy(&self, me: UserId, other: UserId) -> Result<(), BuddyError> {
        let Some(pair) = UserPair::new(me, other) else {
            // nobody is their own buddy, so there is nothing to remove
            let mut tx = self.tx_manager.begin().await.map_err(store_err)?;
            self.require_user_in_tx(&mut *tx, me).await?;
            tx.commit().await.map_err(store_err)?;
            return Ok(());
        };

        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        self.lock_pair_in_tx(&mut *tx, pair).await?;
        let removed = self.buddy_repo.delete_in_tx(&mut *tx, pair).await?;

        tx.commit().await.map_err(store_err)?;

        if removed {
            info!(%me, %other, "buddy removed");
            self.notify(BuddyEvent::BuddyRemoved {
                requester: me,
                buddy: other,
            })
            .await;
        } else {
            debug!(%me, %other, "no buddy link to remove");
        }
        Ok(())
    }

    async fn block(&self, me: UserId, other: UserId) -> Result<(), BuddyError> {
        let pair = UserPair::new(me, other).ok_or(BuddyError::SelfTarget)?;

        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        // block and link dissolution commit together or not at all
        self.lock_pair_in_tx(&mut *tx, pair).await?;
        let created = self.block_repo.insert_in_tx(&mut *tx, me, other).await?;
        let link_dissolved = self.buddy_repo.delete_in_tx(&mut *tx, pair).await?;

        tx.commit().await.map_err(store_err)?;

        if created || link_dissolved {
            info!(%me, %other, link_dissolved, "user blocked");
            self.notify(BuddyEvent::UserBlocked {
                blocker: me,
                blocked: other,
                link_dissolved,
            })
            .await;
        } else {
            debug!(%me, %other, "user already blocked");
        }
        Ok(())
    }

    async fn unblock(&self, me: UserId, other: UserId) -> Result<(), BuddyError> {
        let pair = UserPair::new(me, other).ok_or(BuddyError::SelfTarget)?;

        let mut tx = self.tx_manager.begin().await.map_err(store_err)?;

        self.lock_pair_in_tx(&mut *tx, pair).await?;
        let removed = self.block_repo.delete_in_tx(&mut *tx, me, other).await?;

        tx.commit().await.map_err(store_err)?;

        if removed {
            info!(%me, %other, "user unblocked");
            self.notify(BuddyEvent::UserUnblocked {
                blocker: me,
                blocked: other,
            })
            .await;
        } else {
            debug!(%me, %other, "no block to lift");
        }
        Ok(())
    }
}
