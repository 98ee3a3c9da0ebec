//! Form bindings: typed parsing and validation of submitted fields.
//!
//! [`TodoForm`] is derived from the editable `todo` columns with
//! `#[derive(ModelForm)]`. [`AppVarietyForm`] is a single model-choice field
//! and needs the database to validate, so it is written by hand.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveEnum, ConnectionTrait, DbErr, EntityTrait, Iterable, Set};
use serde::Serialize;
use validator::ValidateLength;

use crate::ModelForm;
use crate::entity::{AppType, Importance, app_variety, todo};

/// Submitted `application/x-www-form-urlencoded` fields.
pub type FormData = HashMap<String, String>;

pub const REQUIRED: &str = "This field is required.";
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A value that can be parsed out of one submitted form field.
pub trait FormValue: Sized {
    fn parse_form_value(raw: &str) -> Result<Self, String>;
}

impl FormValue for String {
    fn parse_form_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FormValue for i32 {
    fn parse_form_value(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|_| "Enter a whole number.".to_string())
    }
}

impl FormValue for NaiveDate {
    fn parse_form_value(raw: &str) -> Result<Self, String> {
        NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT).map_err(|_| "Enter a valid date.".to_string())
    }
}

fn parse_choice<E>(raw: &str) -> Result<E, String>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.to_string()).map_err(|_| {
        format!("Select a valid choice. {raw} is not one of the available choices.")
    })
}

impl FormValue for Importance {
    fn parse_form_value(raw: &str) -> Result<Self, String> {
        parse_choice(raw)
    }
}

impl FormValue for AppType {
    fn parse_form_value(raw: &str) -> Result<Self, String> {
        parse_choice(raw)
    }
}

/// Clean one required field: presence, `max_length`, then typed parsing.
///
/// Problems are pushed onto `errors` and `None` is returned.
pub fn clean_field<T: FormValue>(
    data: &FormData,
    name: &str,
    max_length: Option<usize>,
    errors: &mut FormErrors,
) -> Option<T> {
    let raw = match data.get(name).map(|v| v.trim()) {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            errors.add(name, REQUIRED);
            return None;
        }
    };

    if let Some(max) = max_length {
        if !raw.validate_length(None, Some(max as u64), None) {
            let len = raw.chars().count();
            errors.add(
                name,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
            return None;
        }
    }

    match T::parse_form_value(raw) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(name, message);
            None
        }
    }
}

/// A form whose fields are bound straight from submitted data.
pub trait ModelForm: Sized {
    /// Field names in declaration order.
    const FIELDS: &'static [&'static str];

    /// Validate `data`, returning the cleaned form or every field error.
    fn bind(data: &FormData) -> Result<Self, FormErrors>;
}

/// One `<option>` of a choice widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// The add-todo form: every editable `todo` column.
#[derive(Debug, Clone, PartialEq, Eq, ModelForm)]
pub struct TodoForm {
    #[form(max_length = 20)]
    pub title: String,
    #[form(max_length = 100)]
    pub description: String,
    #[form(max_length = 20)]
    pub importance: Importance,
    /// Rendered as `<input type="date">`.
    pub done_upto: NaiveDate,
}

impl TodoForm {
    pub fn importance_choices() -> Vec<Choice> {
        Importance::iter()
            .map(|i| Choice {
                value: i.to_value(),
                label: i.label().to_string(),
            })
            .collect()
    }

    /// Fill in the non-editable columns; `date_added` is today.
    pub fn into_active_model(self) -> todo::ActiveModel {
        todo::ActiveModel {
            title: Set(self.title),
            description: Set(self.description),
            date_added: Set(Utc::now().date_naive()),
            importance: Set(self.importance),
            done_upto: Set(self.done_upto),
            ..Default::default()
        }
    }
}

/// Pick one catalog entry from a drop-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVarietyForm {
    pub app_variety: app_variety::Model,
}

impl AppVarietyForm {
    pub const FIELD: &'static str = "app_variety";
    pub const LABEL: &'static str = "Select the app variety";
    pub const INVALID_CHOICE: &'static str =
        "Select a valid choice. That choice is not one of the available choices.";

    /// Every catalog entry as a selectable option.
    pub async fn choices(db: &impl ConnectionTrait) -> Result<Vec<Choice>, DbErr> {
        let all = app_variety::Entity::find().all(db).await?;
        Ok(all
            .into_iter()
            .map(|app| Choice {
                value: app.id.to_string(),
                label: app.to_string(),
            })
            .collect())
    }

    /// Valid only when the submitted id names an existing catalog entry.
    ///
    /// Database failures are not validation failures and are returned as `Err(Err(_))`.
    pub async fn bind(
        data: &FormData,
        db: &impl ConnectionTrait,
    ) -> Result<Result<Self, FormErrors>, DbErr> {
        let mut errors = FormErrors::default();
        let Some(id) = clean_field::<String>(data, Self::FIELD, None, &mut errors) else {
            return Ok(Err(errors));
        };

        let found = match id.parse::<i32>() {
            Ok(id) => app_variety::Entity::find_by_id(id).one(db).await?,
            Err(_) => None,
        };

        Ok(match found {
            Some(app_variety) => Ok(Self { app_variety }),
            None => {
                errors.add(Self::FIELD, Self::INVALID_CHOICE);
                Err(errors)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valid_todo() -> FormData {
        data(&[
            ("title", "Buy milk"),
            ("description", "Two litres, semi-skimmed"),
            ("importance", "Less Important"),
            ("done_upto", "2026-11-02"),
        ])
    }

    #[test]
    fn test_todo_form_fields_in_declaration_order() {
        assert_eq!(
            TodoForm::FIELDS,
            &["title", "description", "importance", "done_upto"]
        );
    }

    #[test]
    fn test_valid_todo_binds() {
        let form = TodoForm::bind(&valid_todo()).expect("form should be valid");
        assert_eq!(form.title, "Buy milk");
        assert_eq!(form.importance, Importance::LessImportant);
        assert_eq!(form.done_upto, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = TodoForm::bind(&data(&[("title", "Buy milk")])).unwrap_err();
        assert_eq!(errors.get("importance"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("description"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("done_upto"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.get("title").is_none());
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut submitted = valid_todo();
        submitted.insert("title".into(), "   ".into());
        let errors = TodoForm::bind(&submitted).unwrap_err();
        assert_eq!(errors.get("title"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_title_max_length() {
        let mut submitted = valid_todo();
        submitted.insert("title".into(), "x".repeat(21));
        let errors = TodoForm::bind(&submitted).unwrap_err();
        assert_eq!(
            errors.get("title"),
            Some(&["Ensure this value has at most 20 characters (it has 21).".to_string()][..])
        );

        submitted.insert("title".into(), "x".repeat(20));
        assert!(TodoForm::bind(&submitted).is_ok());
    }

    #[test]
    fn test_max_length_counts_characters() {
        let mut submitted = valid_todo();
        submitted.insert("title".into(), "é".repeat(20));
        assert!(TodoForm::bind(&submitted).is_ok());
    }

    #[test]
    fn test_bad_date_and_choice() {
        let mut submitted = valid_todo();
        submitted.insert("done_upto".into(), "02/11/2026".into());
        submitted.insert("importance".into(), "Urgent".into());
        let errors = TodoForm::bind(&submitted).unwrap_err();
        assert_eq!(errors.get("done_upto"), Some(&["Enter a valid date.".to_string()][..]));
        assert_eq!(
            errors.get("importance"),
            Some(
                &["Select a valid choice. Urgent is not one of the available choices.".to_string()]
                    [..]
            )
        );
    }

    #[test]
    fn test_app_type_parses_stored_values() {
        assert_eq!(AppType::parse_form_value("UI"), Ok(AppType::Frontend));
        assert!(AppType::parse_form_value("FRONTEND").is_err());
    }

    #[test]
    fn test_importance_choices() {
        let choices = TodoForm::importance_choices();
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0].value, "Important");
        assert_eq!(choices[2].label, "Can be done after more time just chill.");
    }
}
