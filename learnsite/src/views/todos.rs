//! Todo views: the index page and the add-todo endpoint.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};
use serde::Serialize;

use crate::entity::todo;
use crate::forms::{Choice, FormData, ModelForm, TodoForm};
use crate::templates;
use crate::{AppState, SiteError};

pub const TODO_INDEX_PATH: &str = "/todos/";
pub const TODO_ADD_PATH: &str = "/todos/add/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date_added: String,
    pub importance: String,
    pub importance_label: String,
    pub done_upto: String,
}

impl From<&todo::Model> for TodoView {
    fn from(t: &todo::Model) -> Self {
        Self {
            id: t.id,
            title: t.title.clone(),
            description: t.description.clone(),
            date_added: t.date_added.format("%b. %-d, %Y").to_string(),
            importance: sea_orm::ActiveEnum::to_value(&t.importance),
            importance_label: t.importance.label().to_string(),
            done_upto: t.done_upto.format("%b. %-d, %Y").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct IndexContext {
    todos: Vec<TodoView>,
    add_url: &'static str,
    importance_choices: Vec<Choice>,
}

/// Every todo in storage order.
pub async fn all_todos(db: &impl ConnectionTrait) -> Result<Vec<todo::Model>, SiteError> {
    Ok(todo::Entity::find().all(db).await?)
}

/// Validate a submission and insert it.
///
/// Returns `Ok(None)` for an invalid submission; nothing is written then.
pub async fn add_todo_submission(
    db: &impl ConnectionTrait,
    data: &FormData,
) -> Result<Option<todo::Model>, SiteError> {
    match TodoForm::bind(data) {
        Ok(form) => {
            let created = form.into_active_model().insert(db).await?;
            log::info!("Added todo {} ({})", created.id, created);
            Ok(Some(created))
        }
        Err(errors) => {
            log::debug!("Discarding invalid todo submission: {errors:?}");
            Ok(None)
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, SiteError> {
    let todos = all_todos(state.db.inner()).await?;
    let context = IndexContext {
        todos: todos.iter().map(TodoView::from).collect(),
        add_url: TODO_ADD_PATH,
        importance_choices: TodoForm::importance_choices(),
    };
    state.templates.render_html(templates::TODO_INDEX, &context)
}

/// Always lands back on the index, whether or not the submission was kept.
pub async fn add_todo(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> Result<Redirect, SiteError> {
    match form {
        Ok(Form(data)) => {
            add_todo_submission(state.db.inner(), &data).await?;
        }
        Err(rejection) => log::debug!("Unreadable todo submission: {rejection}"),
    }
    Ok(Redirect::to(TODO_INDEX_PATH))
}

/// There is no standalone add page.
pub async fn add_todo_page() -> Redirect {
    Redirect::to(TODO_INDEX_PATH)
}
