use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User,
    users::{self, hash_password},
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Creates a user. Fails with `ExistingKey` if the username is taken.
    pub async fn new_user(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password_hash: ActiveValue::Set(hash_password(&username, password)),
                is_superuser: ActiveValue::Set(is_superuser),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!("created user {username} (superuser: {is_superuser})");
            Ok(User::from(model))
        })
    }

    /// Return a user.
    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {username}")))
    }

    /// Checks the credentials, returning the user when they match.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;

        Ok(user
            .filter(|model| model.password_hash == hash_password(username, password))
            .map(User::from))
    }
}
