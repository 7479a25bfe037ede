use crate::domain_model::UserId;
use serde::Serialize;

/// Emitted after a buddy or block mutation has committed and changed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuddyEvent {
    BuddyAdded {
        requester: UserId,
        buddy: UserId,
    },
    BuddyRemoved {
        requester: UserId,
        buddy: UserId,
    },
    UserBlocked {
        blocker: UserId,
        blocked: UserId,
        link_dissolved: bool,
    },
    UserUnblocked {
        blocker: UserId,
        blocked: UserId,
    },
}

impl BuddyEvent {
    /// Users whose open sockets should hear about the event.
    /// The blocked side of a block is never told.
    pub fn receivers(&self) -> Vec<UserId> {
        match *self {
            BuddyEvent::BuddyAdded { requester, buddy }
            | BuddyEvent::BuddyRemoved { requester, buddy } => vec![requester, buddy],
            BuddyEvent::UserBlocked { blocker, .. } | BuddyEvent::UserUnblocked { blocker, .. } => {
                vec![blocker]
            }
        }
    }
}
