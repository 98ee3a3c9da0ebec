//! Table registry for tracking which entity tables the site has created.
//!
//! Tables land here through [`SchemaBuilder::sync()`](crate::SchemaBuilder::sync),
//! either from explicit [`register`](crate::SchemaBuilder::register) calls or
//! from entities auto-discovered via `#[derive(SiteEntity)]`.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sea_orm::{DatabaseBackend, DbErr, EntityName, EntityTrait, Iterable, PrimaryKeyToColumn, Schema};

/// Metadata about a created table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    /// The SQL table name (e.g., `"todo"`).
    pub table_name: String,
    /// Name of the primary key column (e.g., `"id"`).
    pub primary_key_column: String,
    /// All column names in the table.
    pub columns: Vec<String>,
}

/// Metadata submitted by `#[derive(SiteEntity)]` at link time.
///
/// [`SiteDb::get_schema_registry`](crate::SiteDb::get_schema_registry)
/// iterates these to pick up entities whose `module_path` matches a prefix.
pub struct SiteEntityInfo {
    /// The `module_path!()` of the entity, used for prefix matching.
    pub module_path: &'static str,
    /// Generates the CREATE TABLE SQL and [`TableMeta`] for a given backend.
    pub schema_fn: fn(DatabaseBackend) -> (String, TableMeta),
}

inventory::collect!(SiteEntityInfo);

/// Build the `CREATE TABLE IF NOT EXISTS` statement and metadata for an entity.
///
/// This is the function `#[derive(SiteEntity)]` points its `schema_fn` at.
pub fn entity_schema<E>(backend: DatabaseBackend) -> (String, TableMeta)
where
    E: EntityTrait,
    <E::Column as std::str::FromStr>::Err: std::fmt::Debug,
{
    let mut create = Schema::new(backend).create_table_from_entity(E::default());
    create.if_not_exists();
    let create_sql = backend.build(&create).sql;

    let entity = E::default();
    let table_name = entity.table_name().to_string();
    let columns: Vec<String> = E::Column::iter()
        .map(|c| sea_orm::IdenStatic::as_str(&c).to_string())
        .collect();
    let primary_key_column = E::PrimaryKey::iter()
        .next()
        .map(|pk| sea_orm::IdenStatic::as_str(&pk.into_column()).to_string())
        .unwrap_or_default();

    (
        create_sql,
        TableMeta {
            table_name,
            primary_key_column,
            columns,
        },
    )
}

/// Normalize a crate or module prefix for matching against `module_path!()`.
///
/// Trims a trailing `::*` or `::` and converts hyphens in the crate segment to
/// underscores, so `"learn-site::entity::*"` matches `learn_site::entity::todo`.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let p = prefix.trim_end_matches('*').trim_end_matches("::");
    match p.split_once("::") {
        Some((krate, rest)) => format!("{}::{}", krate.replace('-', "_"), rest),
        None => p.replace('-', "_"),
    }
}

/// The tables `sync()` has created on one connection, keyed by name.
///
/// Startup reads it back through [`require`](TableRegistry::require) to make
/// sure every table the views query exists before serving.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<BTreeMap<String, TableMeta>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written map behind.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, TableMeta>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, TableMeta>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a table, replacing an earlier entry of the same name.
    pub fn register(&self, meta: TableMeta) {
        self.write().insert(meta.table_name.clone(), meta);
    }

    pub fn get(&self, table_name: &str) -> Option<TableMeta> {
        self.read().get(table_name).cloned()
    }

    /// Every recorded table, ordered by name.
    pub fn all_tables(&self) -> Vec<TableMeta> {
        self.read().values().cloned().collect()
    }

    pub fn is_registered(&self, table_name: &str) -> bool {
        self.read().contains_key(table_name)
    }

    /// Fail unless every table in `expected` has been recorded.
    pub fn require(&self, expected: &[&str]) -> Result<(), DbErr> {
        let tables = self.read();
        let missing: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|name| !tables.contains_key(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DbErr::Custom(format!(
                "Tables were never created: {}",
                missing.join(", ")
            )))
        }
    }
}
