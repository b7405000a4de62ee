use cshop::{
    config::{catalog, database},
    core::{
        catalog::{fetch_all_colleges, fetch_categories_for_college, seed_products},
        report::{format_summary, generate_inventory_report},
        session::Session,
    },
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the catalog layout
    let layout = catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load catalog layout: {}", e))?;

    // 4. Connect and ensure tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed products listed in the layout
    let seeded = seed_products(&db, &layout)
        .await
        .inspect_err(|e| error!("Failed to seed products: {}", e))?;
    info!("Seeded {} products.", seeded);

    // 6. Report the storefront state
    let session = Session::from_env();
    info!("Active cart: {}", cshop::store::cart_path(session.cart_id()));

    for college in fetch_all_colleges(&layout) {
        let categories = fetch_categories_for_college(&layout, &college);
        let summary = generate_inventory_report(&db, &layout, &college).await?;
        info!(
            college = %college,
            categories = categories.len(),
            products = summary.products.len(),
            "{}",
            format_summary(&summary)
        );
    }

    Ok(())
}
