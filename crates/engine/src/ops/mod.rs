use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod donations;
mod investing;
mod projects;
mod reports;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Charity fund service.
///
/// Owns the database connection and enforces the lifecycle rules of projects
/// and donations. Every write runs in its own DB transaction together with the
/// allocation pass it triggers, so concurrent requests never allocate the same
/// capacity twice.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Matches the `charity_projects.name` column width.
const MAX_PROJECT_NAME_LEN: usize = 100;

fn normalize_project_name(value: &str) -> ResultEngine<String> {
    let name = normalize_required_text(value, "project name")?;
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "project name must be at most {MAX_PROJECT_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn require_positive_amount(amount: i64) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "target_amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
