use crate::domain_model::{CourseId, UserId, UserPair, UserRecord};
use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Initial data for the in-memory store. Mirrors `sql/user_data.sql`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub courses: Vec<SeedCourse>,
    #[serde(default)]
    pub enrollments: Vec<SeedEnrollment>,
    /// Unordered pairs.
    #[serde(default)]
    pub buddies: Vec<(UserId, UserId)>,
    /// `(blocker, blocked)`.
    #[serde(default)]
    pub blocks: Vec<(UserId, UserId)>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub pairing_enabled: bool,
}

impl From<&SeedUser> for UserRecord {
    fn from(user: &SeedUser) -> Self {
        UserRecord {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            pairing_enabled: user.pairing_enabled,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCourse {
    pub id: CourseId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEnrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
}

impl Seed {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("read seed {}: {e}", path.display()))?;
        let seed: Seed = serde_json::from_str(&raw)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Rejects seeds that would break the buddy invariants on load.
    pub fn validate(&self) -> Result<()> {
        let users: BTreeSet<UserId> = self.users.iter().map(|u| u.id).collect();
        if users.len() != self.users.len() {
            bail!("duplicate user id in seed");
        }
        let courses: BTreeSet<CourseId> = self.courses.iter().map(|c| c.id).collect();

        for e in &self.enrollments {
            if !users.contains(&e.user_id) || !courses.contains(&e.course_id) {
                bail!("enrollment ({}, {}) references unknown row", e.user_id, e.course_id);
            }
        }

        let mut blocked = BTreeSet::new();
        for &(blocker, target) in &self.blocks {
            if blocker == target {
                bail!("user {blocker} blocks themselves");
            }
            if !users.contains(&blocker) || !users.contains(&target) {
                bail!("block ({blocker}, {target}) references unknown user");
            }
            if let Some(pair) = UserPair::new(blocker, target) {
                blocked.insert(pair);
            }
        }

        for &(a, b) in &self.buddies {
            let pair = UserPair::new(a, b).ok_or_else(|| anyhow!("user {a} buddies themselves"))?;
            if !users.contains(&a) || !users.contains(&b) {
                bail!("buddy link ({a}, {b}) references unknown user");
            }
            if blocked.contains(&pair) {
                bail!("buddy link ({a}, {b}) coexists with a block");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> SeedUser {
        SeedUser {
            id: UserId(id),
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            pairing_enabled: false,
        }
    }

    #[test]
    fn linked_and_blocked_pair_is_rejected() {
        let seed = Seed {
            users: vec![user(1), user(2)],
            buddies: vec![(UserId(2), UserId(1))],
            blocks: vec![(UserId(1), UserId(2))],
            ..Default::default()
        };
        assert!(seed.validate().is_err());
    }

    #[test]
    fn self_link_is_rejected() {
        let seed = Seed {
            users: vec![user(1)],
            buddies: vec![(UserId(1), UserId(1))],
            ..Default::default()
        };
        assert!(seed.validate().is_err());
    }

    #[test]
    fn bundled_fixture_is_valid() {
        let seed = Seed::from_json_file("fixtures/user_data.json").unwrap();
        assert_eq!(seed.users.len(), 5);
    }
}
