use learnsite::SiteDbBuilder;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

mod note {
    use learnsite::SiteEntity;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, SiteEntity)]
    #[sea_orm(table_name = "note")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub body: String,
        pub pinned: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[tokio::test]
async fn test_site_entity_is_discovered_by_module_path() {
    let db = SiteDbBuilder::new("sqlite::memory:")
        .build()
        .await
        .expect("Failed to open database");

    let builder = db.get_schema_registry(module_path!());
    assert_eq!(builder.table_names(), vec!["note"]);
    builder.sync().await.expect("Failed to create discovered tables");

    let meta = db.registry().get("note").expect("note should be registered");
    assert_eq!(meta.primary_key_column, "id");
    assert_eq!(meta.columns, vec!["id", "body", "pinned"]);

    let inserted = note::ActiveModel {
        body: Set("Remember the milk".into()),
        pinned: Set(true),
        ..Default::default()
    }
    .insert(db.inner())
    .await
    .expect("Failed to insert into discovered table");
    assert_eq!(inserted.body, "Remember the milk");
    assert_eq!(note::Entity::find().count(db.inner()).await.unwrap(), 1);
}
