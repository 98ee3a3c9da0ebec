//! App-catalog views: landing page, list, detail and the app-store picker.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::Form;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::Serialize;

use crate::entity::app_variety;
use crate::forms::{AppVarietyForm, Choice, FormData, FormErrors};
use crate::templates;
use crate::{AppState, SiteError};

pub const MEDIA_URL: &str = "/media/";

/// An `AppVariety` as the templates see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub image_url: String,
    pub email: String,
    pub date: String,
    pub app_type: String,
    pub type_label: String,
    pub description: String,
    pub price: String,
}

impl From<&app_variety::Model> for AppView {
    fn from(app: &app_variety::Model) -> Self {
        Self {
            id: app.id,
            name: app.name.clone(),
            image: app.image.clone(),
            image_url: format!("{MEDIA_URL}{}", app.image),
            email: app.email.clone(),
            date: app.date.format("%b. %-d, %Y, %H:%M").to_string(),
            app_type: sea_orm::ActiveEnum::to_value(&app.app_type),
            type_label: app.app_type.label().to_string(),
            description: app.description.clone(),
            price: format!("{:.2}", app.price.round_dp(2)),
        }
    }
}

#[derive(Debug, Serialize)]
struct ListContext {
    app_data: Vec<AppView>,
}

#[derive(Debug, Serialize)]
struct DetailContext {
    data: AppView,
}

/// What the app-store template renders.
#[derive(Debug, Serialize)]
pub struct AppStoreContext {
    pub field: &'static str,
    pub label: &'static str,
    pub choices: Vec<Choice>,
    /// The submitted value, echoed back into the drop-down.
    pub selected: Option<String>,
    pub errors: FormErrors,
    /// Messages for the picker field alone.
    pub field_errors: Vec<String>,
    /// Present only after a valid submission.
    pub app_data: Option<Vec<AppView>>,
}

/// Every catalog entry in storage order.
pub async fn all_apps(db: &impl ConnectionTrait) -> Result<Vec<app_variety::Model>, SiteError> {
    Ok(app_variety::Entity::find().all(db).await?)
}

/// One catalog entry by primary key, or `NotFound`.
///
/// Ids that are not integers cannot name a record and are also `NotFound`.
pub async fn app_by_id(db: &impl ConnectionTrait, id: &str) -> Result<app_variety::Model, SiteError> {
    let not_found = || SiteError::NotFound(format!("AppVariety {id}"));
    let pk: i32 = id.parse().map_err(|_| not_found())?;
    app_variety::Entity::find_by_id(pk)
        .one(db)
        .await?
        .ok_or_else(not_found)
}

/// Build the app-store page.
///
/// With no submission the picker is shown empty. A valid submission adds the
/// full catalog; the chosen entry itself is not used to filter it.
pub async fn app_store_context(
    db: &impl ConnectionTrait,
    submitted: Option<&FormData>,
) -> Result<AppStoreContext, SiteError> {
    let mut context = AppStoreContext {
        field: AppVarietyForm::FIELD,
        label: AppVarietyForm::LABEL,
        choices: AppVarietyForm::choices(db).await?,
        selected: None,
        errors: FormErrors::default(),
        field_errors: Vec::new(),
        app_data: None,
    };

    let Some(data) = submitted else {
        return Ok(context);
    };
    context.selected = data.get(AppVarietyForm::FIELD).cloned();

    match AppVarietyForm::bind(data, db).await? {
        Ok(form) => {
            log::debug!("App store selection {} accepted", form.app_variety.id);
            let apps = all_apps(db).await?;
            context.app_data = Some(apps.iter().map(AppView::from).collect());
        }
        Err(errors) => {
            log::debug!("App store selection rejected: {errors:?}");
            context.field_errors = errors
                .get(AppVarietyForm::FIELD)
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            context.errors = errors;
        }
    }
    Ok(context)
}

pub async fn app(State(state): State<AppState>) -> Result<Html<String>, SiteError> {
    state
        .templates
        .render_html(templates::APP, &serde_json::json!({}))
}

pub async fn app_data(State(state): State<AppState>) -> Result<Html<String>, SiteError> {
    let apps = all_apps(state.db.inner()).await?;
    let context = ListContext {
        app_data: apps.iter().map(AppView::from).collect(),
    };
    state.templates.render_html(templates::APPS, &context)
}

pub async fn details_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, SiteError> {
    let app = app_by_id(state.db.inner(), &id).await?;
    let context = DetailContext {
        data: AppView::from(&app),
    };
    state.templates.render_html(templates::DETAILS, &context)
}

pub async fn app_store(State(state): State<AppState>) -> Result<Html<String>, SiteError> {
    let context = app_store_context(state.db.inner(), None).await?;
    state.templates.render_html(templates::APP_STORE, &context)
}

pub async fn app_store_submit(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> Result<Html<String>, SiteError> {
    let data = match form {
        Ok(Form(data)) => data,
        Err(rejection) => {
            log::debug!("Unreadable app store submission: {rejection}");
            FormData::new()
        }
    };
    let context = app_store_context(state.db.inner(), Some(&data)).await?;
    state.templates.render_html(templates::APP_STORE, &context)
}
