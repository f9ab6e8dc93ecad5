//! The module contains `Donation` struct and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

use crate::{Funding, Investable};

/// A donation.
///
/// The money a donor gives to the fund. It is spread over the open projects
/// until all of it is invested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Donation {
    pub id: i64,
    /// Username of the donor.
    pub user_id: String,
    pub comment: Option<String>,
    pub funding: Funding,
}

impl Investable for Donation {
    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub comment: Option<String>,
    pub target_amount: i64,
    pub invested_amount: i64,
    pub is_closed: bool,
    pub created_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Donation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            comment: model.comment,
            funding: Funding {
                target_amount: model.target_amount,
                invested_amount: model.invested_amount,
                is_closed: model.is_closed,
                created_at: model.created_at,
                closed_at: model.closed_at,
            },
        }
    }
}

/// Only the columns an allocation pass changes.
pub(crate) fn funding_update(donation: &Donation) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Unchanged(donation.id),
        invested_amount: ActiveValue::Set(donation.funding.invested_amount),
        is_closed: ActiveValue::Set(donation.funding.is_closed),
        closed_at: ActiveValue::Set(donation.funding.closed_at),
        ..Default::default()
    }
}
