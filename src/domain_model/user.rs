use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId)
    }
}

/// Unordered pair of distinct users, stored smaller id first.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct UserPair(UserId, UserId);

impl UserPair {
    /// Returns `None` when both sides are the same user.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> UserId {
        self.0
    }

    pub fn high(&self) -> UserId {
        self.1
    }

    /// The member of the pair that is not `user`.
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if self.0 == user {
            Some(self.1)
        } else if self.1 == user {
            Some(self.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub pairing_enabled: bool,
}

/// Public projection of a user. `buddy_count` is derived from the live link set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub pairing_enabled: bool,
    pub buddy_count: u32,
}

impl UserView {
    pub fn new(record: UserRecord, buddy_count: u32) -> Self {
        UserView {
            id: record.user_id,
            name: record.name,
            email: record.email,
            pairing_enabled: record.pairing_enabled,
            buddy_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_canonical() {
        let a = UserPair::new(UserId(7), UserId(3)).unwrap();
        let b = UserPair::new(UserId(3), UserId(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.low(), UserId(3));
        assert_eq!(a.high(), UserId(7));
        assert_eq!(a.other(UserId(3)), Some(UserId(7)));
        assert_eq!(a.other(UserId(5)), None);
    }

    #[test]
    fn pair_rejects_self() {
        assert!(UserPair::new(UserId(4), UserId(4)).is_none());
    }

    #[test]
    fn view_serializes_camel_case() {
        let view = UserView::new(
            UserRecord {
                user_id: UserId(1),
                name: "Pink Elephant".into(),
                email: "pink.elephant@gmail.com".into(),
                pairing_enabled: false,
            },
            3,
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["pairingEnabled"], false);
        assert_eq!(json["buddyCount"], 3);
    }
}
