use chrono::{Duration, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{DonationNew, Engine, EngineError, ProjectNew, ProjectUpdate};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.new_user("alice", "password", false).await.unwrap();
    engine.new_user("admin", "password", true).await.unwrap();
    (engine, db)
}

async fn insert_closed_project(db: &DatabaseConnection, name: &str, created: i64, elapsed: Duration) {
    let created_at = Utc.timestamp_opt(created, 0).unwrap();
    let closed_at = created_at + elapsed;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO charity_projects \
         (name, description, target_amount, invested_amount, is_closed, created_at, closed_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            name.into(),
            format!("about {name}").into(),
            10i64.into(),
            10i64.into(),
            true.into(),
            created_at.into(),
            closed_at.into(),
        ],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn donation_fills_projects_in_creation_order() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .new_project(ProjectNew::new("Shelter", "Roof repair", 100))
        .await
        .unwrap();
    let second = engine
        .new_project(ProjectNew::new("Food", "Winter food", 50))
        .await
        .unwrap();
    assert_eq!(first.funding.invested_amount, 0);
    assert!(!second.funding.is_closed);

    let donation = engine
        .new_donation(DonationNew::new("alice", 120).comment("for the cats"))
        .await
        .unwrap();
    assert_eq!(donation.funding.invested_amount, 120);
    assert!(donation.funding.is_closed);
    assert!(donation.funding.closed_at.is_some());
    assert_eq!(donation.comment.as_deref(), Some("for the cats"));

    let first = engine.project(first.id).await.unwrap();
    let second = engine.project(second.id).await.unwrap();
    assert_eq!(first.funding.invested_amount, 100);
    assert!(first.funding.is_closed);
    assert!(first.funding.closed_at.is_some());
    assert_eq!(second.funding.invested_amount, 20);
    assert!(!second.funding.is_closed);
    assert_eq!(second.funding.closed_at, None);
}

#[tokio::test]
async fn new_project_collects_waiting_donations() {
    let (engine, _db) = engine_with_db().await;

    let d1 = engine.new_donation(DonationNew::new("alice", 40)).await.unwrap();
    let d2 = engine.new_donation(DonationNew::new("alice", 90)).await.unwrap();
    assert_eq!(d1.funding.invested_amount, 0);
    assert_eq!(d2.funding.invested_amount, 0);

    let project = engine
        .new_project(ProjectNew::new("Shelter", "Roof repair", 100))
        .await
        .unwrap();
    assert_eq!(project.funding.invested_amount, 100);
    assert!(project.funding.is_closed);

    let donations = engine.user_donations("alice").await.unwrap();
    assert_eq!(donations.len(), 2);
    assert_eq!(donations[0].funding.invested_amount, 40);
    assert!(donations[0].funding.is_closed);
    assert_eq!(donations[1].funding.invested_amount, 60);
    assert!(!donations[1].funding.is_closed);
}

#[tokio::test]
async fn exact_fit_closes_project_and_donation() {
    let (engine, _db) = engine_with_db().await;

    let project = engine
        .new_project(ProjectNew::new("Vet", "Vaccines", 30))
        .await
        .unwrap();
    let donation = engine.new_donation(DonationNew::new("alice", 30)).await.unwrap();

    let project = engine.project(project.id).await.unwrap();
    assert!(project.funding.is_closed);
    assert!(donation.funding.is_closed);
    assert_eq!(project.funding.closed_at, donation.funding.closed_at);
}

#[tokio::test]
async fn run_investing_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_project(ProjectNew::new("Shelter", "Roof repair", 100))
        .await
        .unwrap();
    engine.new_donation(DonationNew::new("alice", 70)).await.unwrap();

    let before = engine.projects().await.unwrap();
    let allocation = engine.run_investing().await.unwrap();
    assert!(allocation.is_empty());
    assert_eq!(engine.projects().await.unwrap(), before);
}

#[tokio::test]
async fn duplicate_project_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_project(ProjectNew::new("Shelter", "Roof repair", 100))
        .await
        .unwrap();

    let err = engine
        .new_project(ProjectNew::new(" Shelter ", "Another roof", 10))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Shelter".to_string()));
    assert_eq!(engine.projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_project_input_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.new_project(ProjectNew::new("", "desc", 10)).await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine.new_project(ProjectNew::new("Name", "  ", 10)).await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine.new_project(ProjectNew::new("Name", "desc", 0)).await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn update_project_rules() {
    let (engine, _db) = engine_with_db().await;
    let project = engine
        .new_project(ProjectNew::new("Shelter", "Roof repair", 100))
        .await
        .unwrap();
    engine
        .new_project(ProjectNew::new("Food", "Winter food", 100))
        .await
        .unwrap();
    engine.new_donation(DonationNew::new("alice", 60)).await.unwrap();

    let err = engine
        .update_project(project.id, ProjectUpdate::new().target_amount(50))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .update_project(project.id, ProjectUpdate::new().name("Food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Food".to_string()));

    let err = engine
        .update_project(project.id, ProjectUpdate::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let updated = engine
        .update_project(
            project.id,
            ProjectUpdate::new()
                .name("Big shelter")
                .description("Roof and walls"),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Big shelter");
    assert_eq!(updated.description, "Roof and walls");
    assert_eq!(updated.funding.invested_amount, 60);

    let closed = engine
        .update_project(project.id, ProjectUpdate::new().target_amount(60))
        .await
        .unwrap();
    assert!(closed.funding.is_closed);
    assert!(closed.funding.closed_at.is_some());

    let err = engine
        .update_project(project.id, ProjectUpdate::new().target_amount(500))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Closed("Big shelter".to_string()));
}

#[tokio::test]
async fn raised_target_takes_more_money() {
    let (engine, _db) = engine_with_db().await;
    let project = engine
        .new_project(ProjectNew::new("Food", "Winter food", 10))
        .await
        .unwrap();
    engine.new_donation(DonationNew::new("alice", 5)).await.unwrap();

    let project = engine
        .update_project(project.id, ProjectUpdate::new().target_amount(40))
        .await
        .unwrap();
    assert_eq!(project.funding.target_amount, 40);
    assert_eq!(project.funding.invested_amount, 5);
    assert!(!project.funding.is_closed);

    let donation = engine.new_donation(DonationNew::new("alice", 50)).await.unwrap();
    assert_eq!(donation.funding.invested_amount, 35);
    assert!(!donation.funding.is_closed);

    let project = engine.project(project.id).await.unwrap();
    assert_eq!(project.funding.invested_amount, 40);
    assert!(project.funding.is_closed);
}

#[tokio::test]
async fn remove_project_only_without_investments() {
    let (engine, _db) = engine_with_db().await;
    let funded = engine
        .new_project(ProjectNew::new("Shelter", "Roof repair", 100))
        .await
        .unwrap();
    engine.new_donation(DonationNew::new("alice", 10)).await.unwrap();
    let empty = engine
        .new_project(ProjectNew::new("Food", "Winter food", 100))
        .await
        .unwrap();

    let err = engine.remove_project(funded.id).await.unwrap_err();
    assert_eq!(err, EngineError::AlreadyInvested("Shelter".to_string()));

    let removed = engine.remove_project(empty.id).await.unwrap();
    assert_eq!(removed.name, "Food");
    assert!(matches!(
        engine.project(empty.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.remove_project(empty.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn donation_requires_known_user_and_positive_amount() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.new_donation(DonationNew::new("mallory", 10)).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.new_donation(DonationNew::new("alice", -5)).await,
        Err(EngineError::InvalidAmount(_))
    ));
    let donation = engine
        .new_donation(DonationNew::new("alice", 5).comment("   "))
        .await
        .unwrap();
    assert_eq!(donation.comment, None);
}

#[tokio::test]
async fn user_donations_are_scoped() {
    let (engine, _db) = engine_with_db().await;
    engine.new_donation(DonationNew::new("alice", 10)).await.unwrap();
    engine.new_donation(DonationNew::new("admin", 20)).await.unwrap();

    assert_eq!(engine.donations().await.unwrap().len(), 2);
    let mine = engine.user_donations("alice").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].funding.target_amount, 10);
}

#[tokio::test]
async fn users_authenticate() {
    let (engine, _db) = engine_with_db().await;

    let admin = engine.authenticate("admin", "password").await.unwrap().unwrap();
    assert!(admin.is_superuser);
    assert!(engine.authenticate("admin", "wrong").await.unwrap().is_none());
    assert!(engine.authenticate("nobody", "password").await.unwrap().is_none());

    assert_eq!(
        engine.new_user("alice", "other", false).await.unwrap_err(),
        EngineError::ExistingKey("alice".to_string())
    );
    assert!(!engine.user("alice").await.unwrap().is_superuser);
}

#[tokio::test]
async fn report_orders_closed_projects_by_fundraising_time() {
    let (engine, db) = engine_with_db().await;
    insert_closed_project(&db, "Slow", 0, Duration::days(3)).await;
    insert_closed_project(&db, "Fast", 100, Duration::minutes(5)).await;
    insert_closed_project(&db, "Medium", 200, Duration::hours(7)).await;
    engine
        .new_project(ProjectNew::new("Open", "Still collecting", 100))
        .await
        .unwrap();

    let rows = engine.closed_projects_by_fundraising_time().await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Fast", "Medium", "Slow"]);
    assert_eq!(rows[0].elapsed, Duration::minutes(5));
    assert_eq!(rows[2].description, "about Slow");
}

#[tokio::test]
async fn report_keeps_creation_order_for_equal_fundraising_time() {
    let (engine, db) = engine_with_db().await;
    // Inserted first but created last, so neither id nor name order matches.
    insert_closed_project(&db, "Alpha", 300, Duration::hours(1)).await;
    insert_closed_project(&db, "Gamma", 100, Duration::hours(1)).await;
    insert_closed_project(&db, "Beta", 200, Duration::hours(1)).await;
    insert_closed_project(&db, "Quick", 400, Duration::minutes(1)).await;

    let rows = engine.closed_projects_by_fundraising_time().await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Quick", "Gamma", "Beta", "Alpha"]);
}

#[tokio::test]
async fn project_name_length_is_limited() {
    let (engine, _db) = engine_with_db().await;
    let longest = "n".repeat(100);

    let err = engine
        .new_project(ProjectNew::new("n".repeat(101), "desc", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
    assert!(engine.projects().await.unwrap().is_empty());

    let project = engine
        .new_project(ProjectNew::new(longest.clone(), "desc", 10))
        .await
        .unwrap();
    assert_eq!(project.name, longest);

    let err = engine
        .update_project(project.id, ProjectUpdate::new().name("m".repeat(101)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
    assert_eq!(engine.project(project.id).await.unwrap().name, longest);
}
