//! SeaORM entities. Each one also registers itself via `#[derive(SiteEntity)]`,
//! so `db.get_schema_registry("learnsite::entity")` picks both tables up.

pub mod app_variety;
pub mod todo;

use sea_orm::DbErr;

use crate::SiteDb;

pub use app_variety::{AppType, NewAppVariety};
pub use todo::Importance;

/// Every table the views read or write, ordered by name.
pub const SITE_TABLES: &[&str] = &["app_variety", "todo"];

/// Create every table the site uses, if missing, and check they are recorded.
pub async fn migrate(db: &SiteDb) -> Result<(), DbErr> {
    // Discovered entities depend on the linker keeping each inventory
    // submission, so both are also named here; the builder skips duplicates.
    db.get_schema_registry(module_path!())
        .register(app_variety::Entity)
        .register(todo::Entity)
        .sync()
        .await?;
    db.registry().require(SITE_TABLES)?;

    for table in db.registry().all_tables() {
        log::debug!(
            "Table {} ready with columns {}",
            table.table_name,
            table.columns.join(", ")
        );
    }
    Ok(())
}
