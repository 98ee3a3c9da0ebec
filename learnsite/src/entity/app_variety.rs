use std::fmt;

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::SiteEntity;

/// A catalog entry: one kind of app with its price and contact address.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, SiteEntity, Serialize)]
#[sea_orm(table_name = "app_variety")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Path relative to the media root, under `assets/`.
    pub image: String,
    pub email: String,
    pub date: DateTimeUtc,
    #[sea_orm(column_name = "type")]
    pub app_type: AppType,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((4, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What part of the stack an app covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(5))")]
pub enum AppType {
    #[sea_orm(string_value = "ALL")]
    #[serde(rename = "ALL")]
    Fullstack,
    #[sea_orm(string_value = "UI")]
    #[serde(rename = "UI")]
    Frontend,
    #[sea_orm(string_value = "DATA")]
    #[serde(rename = "DATA")]
    Backend,
}

impl AppType {
    /// Human readable label shown next to the stored value.
    pub fn label(&self) -> &'static str {
        match self {
            AppType::Fullstack => "FULLSTACK",
            AppType::Frontend => "FRONTEND",
            AppType::Backend => "BACKEND",
        }
    }
}

pub const IMAGE_UPLOAD_DIR: &str = "assets/";

pub const PRICE_MAX_DIGITS: u32 = 4;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// A catalog entry as supplied by the data loader.
///
/// `date` defaults to the load time and `price` to `0.00`. Call
/// [`Validate::validate`] before inserting.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAppVariety {
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub name: String,
    pub image: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub date: Option<DateTimeUtc>,
}

/// `price` fits a decimal column of 4 digits with 2 after the point.
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let price = price.normalize();
    let decimal_places = price.scale();
    let whole = price.abs().trunc();
    let whole_digits = if whole.is_zero() {
        0
    } else {
        whole.to_string().len() as u32
    };

    let (code, message) = if whole_digits + decimal_places > PRICE_MAX_DIGITS {
        ("max_digits", "Ensure that there are no more than 4 digits in total.")
    } else if decimal_places > PRICE_DECIMAL_PLACES {
        ("max_decimal_places", "Ensure that there are no more than 2 decimal places.")
    } else if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        ("max_whole_digits", "Ensure that there are no more than 2 digits before the decimal point.")
    } else {
        return Ok(());
    };
    Err(ValidationError::new(code).with_message(message.into()))
}

impl NewAppVariety {
    pub fn into_active_model(self) -> ActiveModel {
        let image = if self.image.starts_with(IMAGE_UPLOAD_DIR) {
            self.image
        } else {
            format!("{IMAGE_UPLOAD_DIR}{}", self.image.trim_start_matches('/'))
        };

        ActiveModel {
            name: Set(self.name),
            image: Set(image),
            email: Set(self.email),
            date: Set(self.date.unwrap_or_else(Utc::now)),
            app_type: Set(self.app_type),
            description: Set(self.description),
            price: Set(self.price.round_dp(2)),
            ..Default::default()
        }
    }
}
