//! Seeding the catalog from JSON fixtures.
//!
//! Catalog entries have no create view; they arrive through this loader. A
//! fixture is a JSON array of [`NewAppVariety`] objects:
//!
//! ```json
//! [{ "name": "Shop", "image": "shop.png", "email": "shop@example.com",
//!    "type": "ALL", "description": "Storefront", "price": "12.50" }]
//! ```

use std::path::Path;

use sea_orm::{ActiveModelTrait, ConnectionTrait};
use validator::Validate;

use crate::SiteError;
use crate::entity::{NewAppVariety, app_variety};

/// Insert every record in order and return the stored rows.
///
/// Every record is validated first; one bad record means nothing is inserted.
pub async fn load_catalog(
    db: &impl ConnectionTrait,
    records: Vec<NewAppVariety>,
) -> Result<Vec<app_variety::Model>, SiteError> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|source| SiteError::InvalidRecord { index, source })?;
    }

    let mut inserted = Vec::with_capacity(records.len());
    for record in records {
        let model = record.into_active_model().insert(db).await?;
        log::debug!("Loaded app variety {} ({})", model.id, model);
        inserted.push(model);
    }
    Ok(inserted)
}

pub fn parse_fixture(json: &str) -> Result<Vec<NewAppVariety>, SiteError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a fixture file and load it.
pub async fn load_catalog_file(
    db: &impl ConnectionTrait,
    path: impl AsRef<Path>,
) -> Result<Vec<app_variety::Model>, SiteError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await?;
    let records = parse_fixture(&json)?;
    log::info!("Loading {} app varieties from {}", records.len(), path.display());
    load_catalog(db, records).await
}
