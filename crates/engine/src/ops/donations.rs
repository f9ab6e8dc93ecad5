use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Donation, DonationNew, EngineError, Funding, ResultEngine, donations, users};

use super::{Engine, normalize_optional_text, require_positive_amount, with_tx};

impl Engine {
    /// Lists every donation, oldest first.
    pub async fn donations(&self) -> ResultEngine<Vec<Donation>> {
        let models = donations::Entity::find()
            .order_by_asc(donations::Column::CreatedAt)
            .order_by_asc(donations::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Donation::from).collect())
    }

    /// Lists the donations made by `user_id`, oldest first.
    pub async fn user_donations(&self, user_id: &str) -> ResultEngine<Vec<Donation>> {
        let models = donations::Entity::find()
            .filter(donations::Column::UserId.eq(user_id))
            .order_by_asc(donations::Column::CreatedAt)
            .order_by_asc(donations::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Donation::from).collect())
    }

    /// Records a donation and invests it into the open projects.
    ///
    /// Returns the donation as stored after the allocation pass.
    pub async fn new_donation(&self, cmd: DonationNew) -> ResultEngine<Donation> {
        require_positive_amount(cmd.target_amount)?;
        let comment = normalize_optional_text(cmd.comment.as_deref());
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(cmd.user_id.clone())
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Err(EngineError::KeyNotFound(format!("user {}", cmd.user_id)));
            }

            let funding = Funding::new(cmd.target_amount, now)?;
            let model = donations::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(cmd.user_id.clone()),
                comment: ActiveValue::Set(comment),
                target_amount: ActiveValue::Set(funding.target_amount),
                invested_amount: ActiveValue::Set(funding.invested_amount),
                is_closed: ActiveValue::Set(funding.is_closed),
                created_at: ActiveValue::Set(funding.created_at),
                closed_at: ActiveValue::Set(funding.closed_at),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(
                "donation {} of {} from {}",
                model.id,
                model.target_amount,
                model.user_id
            );

            self.invest(&db_tx, now).await?;
            donations::Entity::find_by_id(model.id)
                .one(&db_tx)
                .await?
                .map(Donation::from)
                .ok_or_else(|| EngineError::KeyNotFound(format!("donation {}", model.id)))
        })
    }
}
