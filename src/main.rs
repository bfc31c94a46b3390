use dotenvy::dotenv;
use medistock::{
    config::{database, settings},
    core::{aisle, report},
    errors::Result,
    viewmodel::SessionStore,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the configured aisles
    let seeded = aisle::seed_aisles(&db, &app_config.aisles)
        .await
        .inspect_err(|e| error!("Failed to seed aisles: {}", e))?;
    info!("Seeded {} aisle(s).", seeded);

    // 6. Report stock levels
    let stock = report::generate_stock_report(&db).await?;
    info!(
        "{} medicine(s), {} empty, {} in alert, {} in warning.",
        stock.total,
        stock.empty.len(),
        stock.alerts.len(),
        stock.warnings.len()
    );
    for medicine in &stock.empty {
        warn!("EMPTY {}", report::format_stock_line(medicine));
    }
    for medicine in &stock.alerts {
        warn!("ALERT {}", report::format_stock_line(medicine));
    }
    for medicine in &stock.warnings {
        info!("LOW {}", report::format_stock_line(medicine));
    }

    // 7. Build the session over the configured auth limits and blob storage
    let session = SessionStore::from_settings(db, &app_config.storage, &app_config.auth);
    info!(
        "Session ready ({:?}), profile pictures under {}.",
        session.state,
        app_config.storage.root.display()
    );

    Ok(())
}
