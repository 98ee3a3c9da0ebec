use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::SiteEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, SiteEntity, Serialize)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date_added: Date,
    pub importance: Importance,
    pub done_upto: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Importance {
    #[sea_orm(string_value = "Important")]
    #[serde(rename = "Important")]
    Important,
    #[sea_orm(string_value = "Less Important")]
    #[serde(rename = "Less Important")]
    LessImportant,
    #[sea_orm(string_value = "No Hurry")]
    #[serde(rename = "No Hurry")]
    NoHurry,
}

impl Importance {
    pub fn label(&self) -> &'static str {
        match self {
            Importance::Important => "Have to done quickly.",
            Importance::LessImportant => "Can be done after some time.",
            Importance::NoHurry => "Can be done after more time just chill.",
        }
    }
}
