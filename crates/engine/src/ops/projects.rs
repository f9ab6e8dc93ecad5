use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Funding, Project, ProjectNew, ProjectUpdate, ResultEngine, projects,
};

use super::{
    Engine, normalize_project_name, normalize_required_text, require_positive_amount, with_tx,
};

impl Engine {
    /// Lists every charity project, oldest first.
    pub async fn projects(&self) -> ResultEngine<Vec<Project>> {
        let models = projects::Entity::find()
            .order_by_asc(projects::Column::CreatedAt)
            .order_by_asc(projects::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Project::from).collect())
    }

    /// Return a charity project.
    pub async fn project(&self, project_id: i64) -> ResultEngine<Project> {
        projects::Entity::find_by_id(project_id)
            .one(&self.database)
            .await?
            .map(Project::from)
            .ok_or_else(|| EngineError::KeyNotFound(format!("charity project {project_id}")))
    }

    /// Creates a charity project and invests the waiting donations into it.
    ///
    /// Returns the project as stored after the allocation pass.
    pub async fn new_project(&self, cmd: ProjectNew) -> ResultEngine<Project> {
        let name = normalize_project_name(&cmd.name)?;
        let description = normalize_required_text(&cmd.description, "project description")?;
        require_positive_amount(cmd.target_amount)?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_unique_project_name(&db_tx, &name, None)
                .await?;

            let funding = Funding::new(cmd.target_amount, now)?;
            let model = projects::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.clone()),
                description: ActiveValue::Set(description),
                target_amount: ActiveValue::Set(funding.target_amount),
                invested_amount: ActiveValue::Set(funding.invested_amount),
                is_closed: ActiveValue::Set(funding.is_closed),
                created_at: ActiveValue::Set(funding.created_at),
                closed_at: ActiveValue::Set(funding.closed_at),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!("created charity project {} \"{name}\"", model.id);

            self.invest(&db_tx, now).await?;
            require_project(&db_tx, model.id).await
        })
    }

    /// Partially updates an open charity project.
    ///
    /// A closed project cannot be changed and the target can never drop below
    /// the amount already invested. Raising the target reopens capacity, so the
    /// waiting donations are invested right away.
    pub async fn update_project(
        &self,
        project_id: i64,
        cmd: ProjectUpdate,
    ) -> ResultEngine<Project> {
        if cmd.is_empty() {
            return Err(EngineError::InvalidName(
                "provide at least one of name, description or target_amount".to_string(),
            ));
        }
        let name = cmd
            .name
            .as_deref()
            .map(normalize_project_name)
            .transpose()?;
        let description = cmd
            .description
            .as_deref()
            .map(|description| normalize_required_text(description, "project description"))
            .transpose()?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let mut project = require_project(&db_tx, project_id).await?;
            if project.funding.is_closed {
                return Err(EngineError::Closed(project.name));
            }

            if let Some(name) = name {
                self.require_unique_project_name(&db_tx, &name, Some(project_id))
                    .await?;
                project.name = name;
            }
            if let Some(description) = description {
                project.description = description;
            }
            let raised = match cmd.target_amount {
                Some(target_amount) => {
                    let raised = target_amount > project.funding.target_amount;
                    project.funding.retarget(target_amount, now)?;
                    raised
                }
                None => false,
            };

            projects::ActiveModel::from(&project).update(&db_tx).await?;
            tracing::info!("updated charity project {project_id}");

            if raised {
                self.invest(&db_tx, now).await?;
            }
            require_project(&db_tx, project_id).await
        })
    }

    /// Removes a charity project that has not received any money yet.
    ///
    /// Returns the removed project.
    pub async fn remove_project(&self, project_id: i64) -> ResultEngine<Project> {
        with_tx!(self, |db_tx| {
            let project = require_project(&db_tx, project_id).await?;
            if project.funding.invested_amount > 0 || project.funding.is_closed {
                return Err(EngineError::AlreadyInvested(project.name));
            }

            projects::Entity::delete_by_id(project_id)
                .exec(&db_tx)
                .await?;
            tracing::info!("removed charity project {project_id}");
            Ok(project)
        })
    }

    async fn require_unique_project_name(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        except: Option<i64>,
    ) -> ResultEngine<()> {
        let mut query = projects::Entity::find().filter(projects::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(projects::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}

async fn require_project(db: &DatabaseTransaction, project_id: i64) -> ResultEngine<Project> {
    projects::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .map(Project::from)
        .ok_or_else(|| EngineError::KeyNotFound(format!("charity project {project_id}")))
}
