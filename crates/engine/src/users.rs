//! Users table.
//!
//! Donations reference their donor by `user_id`, which is the username.
//! Superusers administer charity projects.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub is_superuser: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donations::Entity")]
    Donations,
}

impl Related<super::donations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            username: model.username,
            is_superuser: model.is_superuser,
        }
    }
}

/// Hex encoded SHA-256 of the password, salted with the username.
pub(crate) fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_depends_on_username() {
        let a = hash_password("alice", "secret");
        assert_eq!(a, hash_password("alice", "secret"));
        assert_ne!(a, hash_password("bob", "secret"));
        assert_ne!(a, hash_password("alice", "Secret"));
        assert_eq!(a.len(), 64);
    }
}
