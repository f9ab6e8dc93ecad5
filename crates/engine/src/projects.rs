//! The module contains `Project` struct and its storage model.

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

use crate::{Funding, Investable};

/// A charity project.
///
/// A project is a fundraising goal: it collects donations until its
/// `target_amount` is fully invested, then it is closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,
    /// Unique among all projects.
    pub name: String,
    pub description: String,
    pub funding: Funding,
}

impl Project {
    /// Time it took to collect the whole target, if the project is closed.
    #[must_use]
    pub fn fundraising_time(&self) -> Option<Duration> {
        self.funding
            .closed_at
            .map(|closed_at| closed_at - self.funding.created_at)
    }
}

impl Investable for Project {
    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

/// A closed project and how long it took to fund it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FundraisingTime {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    #[serde(skip)]
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "charity_projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub target_amount: i64,
    pub invested_amount: i64,
    pub is_closed: bool,
    pub created_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Project {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
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

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id),
            name: ActiveValue::Set(project.name.clone()),
            description: ActiveValue::Set(project.description.clone()),
            target_amount: ActiveValue::Set(project.funding.target_amount),
            invested_amount: ActiveValue::Set(project.funding.invested_amount),
            is_closed: ActiveValue::Set(project.funding.is_closed),
            created_at: ActiveValue::Set(project.funding.created_at),
            closed_at: ActiveValue::Set(project.funding.closed_at),
        }
    }
}

/// Only the columns an allocation pass changes.
pub(crate) fn funding_update(project: &Project) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Unchanged(project.id),
        invested_amount: ActiveValue::Set(project.funding.invested_amount),
        is_closed: ActiveValue::Set(project.funding.is_closed),
        closed_at: ActiveValue::Set(project.funding.closed_at),
        ..Default::default()
    }
}
