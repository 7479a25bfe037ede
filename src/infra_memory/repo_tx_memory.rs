use crate::domain_model::*;
use crate::domain_port::{StorageTx, TxManager};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Whole-database snapshot. Transactions copy it and swap it back on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: BTreeMap<UserId, UserRecord>,
    pub courses: BTreeMap<CourseId, String>,
    /// `(course, user)`
    pub enrollments: BTreeSet<(CourseId, UserId)>,
    pub links: BTreeSet<UserPair>,
    /// `(blocker, blocked)`
    pub blocks: BTreeSet<(UserId, UserId)>,
}

impl MemoryState {
    pub fn from_seed(seed: &Seed) -> anyhow::Result<Self> {
        seed.validate()?;

        let mut state = MemoryState::default();
        for user in &seed.users {
            state.users.insert(user.id, UserRecord::from(user));
        }
        for course in &seed.courses {
            state.courses.insert(course.id, course.name.clone());
        }
        for e in &seed.enrollments {
            state.enrollments.insert((e.course_id, e.user_id));
        }
        for &(a, b) in &seed.buddies {
            state.links.extend(UserPair::new(a, b));
        }
        state.blocks.extend(seed.blocks.iter().copied());
        Ok(state)
    }
}

#[derive(Clone, Default)]
pub struct MemoryTxManager {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTxManager {
    pub fn new(state: MemoryState) -> Self {
        MemoryTxManager {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Copy of the last committed state.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTx::new(guard)))
    }
}

/// Holds the store lock for its whole life, so memory transactions never interleave.
pub struct MemoryTx {
    committed: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryTx {
    fn new(committed: OwnedMutexGuard<MemoryState>) -> Self {
        let working = committed.clone();
        MemoryTx { committed, working }
    }

    pub fn state(&mut self) -> &mut MemoryState {
        &mut self.working
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryTx {
            mut committed,
            working,
        } = *self;
        *committed = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryTxManager {
        let mut state = MemoryState::default();
        state.users.insert(
            UserId(1),
            UserRecord {
                user_id: UserId(1),
                name: "a".into(),
                email: "a@example.com".into(),
                pairing_enabled: false,
            },
        );
        MemoryTxManager::new(state)
    }

    #[tokio::test]
    async fn commit_publishes_writes() {
        let manager = seeded();
        let mut tx = manager.begin().await.unwrap();
        let memory = super::super::util::downcast(&mut *tx).unwrap();
        memory.state().users.clear();
        tx.commit().await.unwrap();

        assert!(manager.snapshot().await.users.is_empty());
    }

    #[tokio::test]
    async fn dropped_tx_discards_writes() {
        let manager = seeded();
        {
            let mut tx = manager.begin().await.unwrap();
            let memory = super::super::util::downcast(&mut *tx).unwrap();
            memory.state().users.clear();
        }
        assert_eq!(manager.snapshot().await.users.len(), 1);

        let mut tx = manager.begin().await.unwrap();
        let memory = super::super::util::downcast(&mut *tx).unwrap();
        memory.state().users.clear();
        tx.rollback().await.unwrap();
        assert_eq!(manager.snapshot().await.users.len(), 1);
    }
}
