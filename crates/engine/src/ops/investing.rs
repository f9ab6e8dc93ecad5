use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Donation, EngineError, Project, ResultEngine,
    allocation::{Allocation, allocate},
    donations, projects,
};

use super::{Engine, with_tx};

impl Engine {
    /// Runs an allocation pass over every open project and donation.
    ///
    /// Projects and donations are read in creation order, filled greedily and
    /// the touched rows are written back in the same DB transaction.
    pub async fn run_investing(&self) -> ResultEngine<Allocation> {
        let now = Utc::now();
        with_tx!(self, |db_tx| self.invest(&db_tx, now).await)
    }

    pub(super) async fn invest(
        &self,
        db: &DatabaseTransaction,
        now: DateTime<Utc>,
    ) -> ResultEngine<Allocation> {
        let mut open_projects = open_projects(db).await?;
        let mut open_donations = open_donations(db).await?;

        for project in &open_projects {
            project.funding.validate().map_err(|err| {
                EngineError::InvalidAmount(format!("charity project {}: {err}", project.id))
            })?;
        }
        for donation in &open_donations {
            donation.funding.validate().map_err(|err| {
                EngineError::InvalidAmount(format!("donation {}: {err}", donation.id))
            })?;
        }

        let allocation = allocate(&mut open_projects, &mut open_donations, now);
        for transfer in &allocation.transfers {
            tracing::debug!(
                "invested {} from donation {} into project {}",
                transfer.amount,
                open_donations[transfer.donation].id,
                open_projects[transfer.project].id
            );
        }

        for index in allocation.funded_projects() {
            projects::funding_update(&open_projects[index])
                .update(db)
                .await?;
        }
        for index in allocation.spent_donations() {
            donations::funding_update(&open_donations[index])
                .update(db)
                .await?;
        }

        if !allocation.is_empty() {
            tracing::info!(
                "allocation pass moved {} over {} transfers, closed {} projects and {} donations",
                allocation.total(),
                allocation.transfers.len(),
                allocation.closed_projects.len(),
                allocation.closed_donations.len()
            );
        }

        Ok(allocation)
    }
}

async fn open_projects(db: &DatabaseTransaction) -> ResultEngine<Vec<Project>> {
    let models = projects::Entity::find()
        .filter(projects::Column::IsClosed.eq(false))
        .order_by_asc(projects::Column::CreatedAt)
        .order_by_asc(projects::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Project::from).collect())
}

async fn open_donations(db: &DatabaseTransaction) -> ResultEngine<Vec<Donation>> {
    let models = donations::Entity::find()
        .filter(donations::Column::IsClosed.eq(false))
        .order_by_asc(donations::Column::CreatedAt)
        .order_by_asc(donations::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Donation::from).collect())
}
