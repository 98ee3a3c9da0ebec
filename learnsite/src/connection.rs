use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait};

use crate::registry::{self, SiteEntityInfo, TableMeta, TableRegistry};

/// A SeaORM connection wrapper that also tracks which entity tables exist.
///
/// Pass [`inner()`](SiteDb::inner) to SeaORM queries:
/// `todo::Entity::find().all(db.inner())`.
pub struct SiteDb {
    inner: DatabaseConnection,
    registry: Arc<TableRegistry>,
}

impl SiteDb {
    /// Get a reference to the underlying SeaORM connection.
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Get a reference to the table registry.
    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    /// Start building the schema.
    ///
    /// Returns a [`SchemaBuilder`] that lets you register multiple entities
    /// and then create them all at once with `.sync().await`.
    pub fn schema(&self) -> SchemaBuilder<'_> {
        SchemaBuilder {
            db: self,
            entries: Vec::new(),
        }
    }

    /// Auto-discover entities registered via `#[derive(SiteEntity)]` and build a
    /// [`SchemaBuilder`] populated with all matching entities.
    ///
    /// `prefix` is matched against each entity's `module_path!()`. Typically you
    /// pass a crate name:
    ///
    /// ```ignore
    /// db.get_schema_registry("learnsite").sync().await?;
    /// ```
    pub fn get_schema_registry(&self, prefix: &str) -> SchemaBuilder<'_> {
        let mut builder = self.schema();
        let backend = self.inner.get_database_backend();
        let prefix = registry::normalize_prefix(prefix);

        for info in inventory::iter::<SiteEntityInfo> {
            if info.module_path.starts_with(prefix.as_str()) {
                let (create_sql, meta) = (info.schema_fn)(backend);
                builder.entries.push(EntityEntry { create_sql, meta });
            }
        }
        builder
    }
}

/// Builder for creating entity tables.
///
/// Created via [`SiteDb::schema()`] or [`SiteDb::get_schema_registry()`].
///
/// # Example
///
/// ```ignore
/// db.schema()
///     .register(app_variety::Entity)
///     .register(todo::Entity)
///     .sync()
///     .await?;
/// ```
pub struct SchemaBuilder<'a> {
    db: &'a SiteDb,
    entries: Vec<EntityEntry>,
}

struct EntityEntry {
    create_sql: String,
    meta: TableMeta,
}

impl<'a> SchemaBuilder<'a> {
    /// Register a SeaORM entity.
    ///
    /// The entity's table is created (if not exists) when
    /// [`sync()`](SchemaBuilder::sync) is called. A table already in the
    /// builder, explicit or discovered, is not added twice.
    pub fn register<E>(mut self, _entity: E) -> Self
    where
        E: EntityTrait,
        <E::Column as std::str::FromStr>::Err: std::fmt::Debug,
    {
        let (create_sql, meta) = registry::entity_schema::<E>(self.db.inner.get_database_backend());
        if !self.table_names().contains(&meta.table_name.as_str()) {
            self.entries.push(EntityEntry { create_sql, meta });
        }
        self
    }

    /// Names of the tables this builder will create, in registration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.meta.table_name.as_str())
            .collect()
    }

    /// Create all registered tables and record them in the registry.
    pub async fn sync(self) -> Result<(), DbErr> {
        for entry in self.entries {
            self.db.inner.execute_unprepared(&entry.create_sql).await?;
            log::debug!("Ensured table {}", entry.meta.table_name);
            self.db.registry.register(entry.meta);
        }
        Ok(())
    }
}

/// Builder for `SiteDb`.
pub struct SiteDbBuilder {
    database_url: String,
    sqlx_logging: bool,
}

impl SiteDbBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            database_url: url.to_string(),
            sqlx_logging: false,
        }
    }

    /// Log every SQL statement through the `log` facade.
    pub fn with_sqlx_logging(mut self, enabled: bool) -> Self {
        self.sqlx_logging = enabled;
        self
    }

    pub async fn build(self) -> Result<SiteDb, DbErr> {
        let mut opts = ConnectOptions::new(&self.database_url);
        opts.sqlx_logging(self.sqlx_logging);
        // An in-memory SQLite database lives and dies with its connection
        if self.database_url.contains(":memory:") {
            opts.max_connections(1).min_connections(1);
        }

        let inner = Database::connect(opts).await?;
        log::info!(
            "Connected to {:?} database at {}",
            inner.get_database_backend(),
            self.database_url
        );

        Ok(SiteDb {
            inner,
            registry: Arc::new(TableRegistry::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{app_variety, todo};

    async fn memory_db() -> SiteDb {
        SiteDbBuilder::new("sqlite::memory:")
            .build()
            .await
            .expect("Failed to open in-memory database")
    }

    #[tokio::test]
    async fn test_site_entities_are_discovered() {
        let db = memory_db().await;

        let builder = db.get_schema_registry("learnsite::entity::*");
        let mut tables = builder.table_names();
        tables.sort();
        assert_eq!(tables, vec!["app_variety", "todo"]);

        builder.sync().await.expect("Failed to create tables");
        assert!(db.registry().is_registered("app_variety"));
        assert!(db.registry().is_registered("todo"));
        assert_eq!(todo::Entity::find().all(db.inner()).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_unmatched_prefix_discovers_nothing() {
        let db = memory_db().await;
        assert!(db.get_schema_registry("someone_else").table_names().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_register_is_idempotent() {
        let db = memory_db().await;
        for _ in 0..2 {
            db.schema()
                .register(app_variety::Entity)
                .sync()
                .await
                .expect("CREATE TABLE IF NOT EXISTS should not fail twice");
        }
        assert_eq!(db.registry().all_tables().len(), 1);
        assert!(app_variety::Entity::find().all(db.inner()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_skips_tables_already_in_builder() {
        let db = memory_db().await;
        let builder = db
            .get_schema_registry("learnsite::entity")
            .register(todo::Entity)
            .register(todo::Entity);
        let mut tables = builder.table_names();
        tables.sort();
        assert_eq!(tables, vec!["app_variety", "todo"]);
    }

    #[tokio::test]
    async fn test_migrate_records_every_site_table() {
        let db = memory_db().await;
        crate::entity::migrate(&db).await.expect("Failed to migrate");

        let names: Vec<_> = db
            .registry()
            .all_tables()
            .into_iter()
            .map(|t| t.table_name)
            .collect();
        assert_eq!(names, crate::entity::SITE_TABLES);
        db.registry()
            .require(crate::entity::SITE_TABLES)
            .expect("every site table should be recorded");
    }
}
