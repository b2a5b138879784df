//! Utility to inspect the leads table: column layout, row count and the
//! most recent submissions.

use rust_leads_api::config::Config;
use rust_leads_api::db::Database;
use rust_leads_api::db_storage::LeadStore;

const RECENT_LIMIT: i64 = 20;

/// Main entry point for the inspection utility.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let store = LeadStore::new(db.pool.clone());
    store.ensure_schema().await?;

    let columns: Vec<(i64, String, String)> =
        sqlx::query_as("SELECT cid, name, type FROM pragma_table_info('leads') ORDER BY cid")
            .fetch_all(&db.pool)
            .await?;

    println!("Table leads:");
    for (_, name, type_) in columns {
        println!("  - {}: {}", name, type_);
    }
    println!();

    println!("Total leads: {}", store.count().await?);
    println!();

    println!("Most recent {}:", RECENT_LIMIT);
    for lead in store.recent(RECENT_LIMIT).await? {
        println!("{}", serde_json::to_string(&lead)?);
    }

    Ok(())
}
