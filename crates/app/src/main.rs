use engine::EngineError;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "qrkot={level},server={level},engine={level},sheets={level}",
            level = settings.app.level
        ))
        .init();

    let db = match parse_database(&settings.server.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let engine = engine::Engine::builder().database(db).build().await?;
    if let Some(superuser) = &settings.superuser {
        match engine
            .new_user(&superuser.username, &superuser.password, true)
            .await
        {
            Ok(_) | Err(EngineError::ExistingKey(_)) => {}
            Err(err) => {
                tracing::error!("failed to create superuser {}: {err}", superuser.username);
                return Err(err.into());
            }
        }
    }

    let reporting = match settings.google {
        Some(google) => Some(reporting(google)?),
        None => {
            tracing::info!("no google settings, report export disabled");
            None
        }
    };

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return Err(err.into());
        }
    };

    let state = server::ServerState::new(engine, reporting);
    if let Err(err) = server::run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

fn reporting(
    google: settings::Google,
) -> Result<server::Reporting, Box<dyn std::error::Error + Send + Sync>> {
    let share_with = google.share_with.clone();
    let locale = google.locale.clone();
    let client = match sheets::GoogleSheetsClient::new(google.into()) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("failed to set up google sheets client: {err}");
            return Err(err.into());
        }
    };
    tracing::info!("google report export enabled");

    Ok(server::Reporting {
        client,
        share_with,
        locale,
    })
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
