use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{FundraisingTime, Project, ResultEngine, projects};

use super::Engine;

impl Engine {
    /// Closed projects, fastest funded first.
    ///
    /// Projects with the same fundraising time keep their creation order.
    pub async fn closed_projects_by_fundraising_time(&self) -> ResultEngine<Vec<FundraisingTime>> {
        let models = projects::Entity::find()
            .filter(projects::Column::IsClosed.eq(true))
            .order_by_asc(projects::Column::CreatedAt)
            .order_by_asc(projects::Column::Id)
            .all(&self.database)
            .await?;

        let mut rows: Vec<FundraisingTime> = models
            .into_iter()
            .map(Project::from)
            .filter_map(|project| {
                let elapsed = project.fundraising_time()?;
                let closed_at = project.funding.closed_at?;
                Some(FundraisingTime {
                    name: project.name,
                    description: project.description,
                    created_at: project.funding.created_at,
                    closed_at,
                    elapsed,
                })
            })
            .collect();
        rows.sort_by_key(|row| row.elapsed);

        Ok(rows)
    }
}
