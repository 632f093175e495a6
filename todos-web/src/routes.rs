//! HTTP route handlers: HTML pages and the JSON API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use todos::{Todo, TodoError};
use tracing::{error, warn};

use crate::forms::TodoForm;
use crate::pages::{FormKind, FormValues};
use crate::state::AppState;

/// HTML pages plus `/api`, without static files or middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(page_router())
        .nest("/api", api_router())
        .with_state(state)
}

/// Build the HTML page router.
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add))
        .route("/edit/{id}", get(edit_form).post(edit))
        .route("/toggle/{id}", get(toggle))
        .route("/delete/{id}", get(delete))
        .route("/view/{id}", get(view))
}

/// Build the read-only JSON API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos))
        .route("/todos/{id}", get(get_todo))
}

/// Failure that cannot be handled by redisplaying or redirecting.
///
/// Rendered as a generic 500 page; details go to the log only.
pub struct PageError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for PageError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %format!("{:#}", self.0), "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Something went wrong</h1><p>The to-do list could not be read or written.</p>"),
        )
            .into_response()
    }
}

type PageResult = Result<Response, PageError>;

fn to_index() -> Response {
    Redirect::to("/").into_response()
}

/// GET / - all todos in creation order.
async fn index(State(state): State<AppState>) -> PageResult {
    let todos = state.todos.list()?;
    Ok(Html(state.pages.index(&todos)?).into_response())
}

/// GET /add - empty add form.
async fn add_form(State(state): State<AppState>) -> PageResult {
    let values = FormValues::default();
    let html = state.pages.form(FormKind::Add, &values, None)?;
    Ok(Html(html).into_response())
}

/// POST /add - create, or re-display the form on invalid input.
async fn add(State(state): State<AppState>, Form(form): Form<TodoForm>) -> PageResult {
    match form
        .to_new_todo()
        .and_then(|input| state.todos.create(input))
    {
        Ok(_) => Ok(to_index()),
        Err(TodoError::Validation(message)) => redisplay(&state, FormKind::Add, &form, &message),
        Err(err) => Err(err.into()),
    }
}

/// GET /edit/{id} - form pre-filled from the stored record.
async fn edit_form(State(state): State<AppState>, Path(id): Path<u64>) -> PageResult {
    let Some(todo) = state.todos.find(id)? else {
        return Ok(to_index());
    };
    let values = FormValues::from(&todo);
    let html = state.pages.form(FormKind::Edit(id), &values, None)?;
    Ok(Html(html).into_response())
}

/// POST /edit/{id} - apply submitted fields. A vanished record redirects.
async fn edit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<TodoForm>,
) -> PageResult {
    let kind = FormKind::Edit(id);
    match form
        .to_patch()
        .and_then(|patch| state.todos.update(id, patch))
    {
        Ok(_) | Err(TodoError::NotFound(_)) => Ok(to_index()),
        Err(TodoError::Validation(message)) => redisplay(&state, kind, &form, &message),
        Err(err) => Err(err.into()),
    }
}

/// GET /toggle/{id} - flip completion; unknown ids are ignored.
async fn toggle(State(state): State<AppState>, Path(id): Path<u64>) -> PageResult {
    state.todos.toggle_completed(id)?;
    Ok(to_index())
}

/// GET /delete/{id} - idempotent delete.
async fn delete(State(state): State<AppState>, Path(id): Path<u64>) -> PageResult {
    state.todos.delete(id)?;
    Ok(to_index())
}

/// GET /view/{id} - detail page, or back to the list if absent.
async fn view(State(state): State<AppState>, Path(id): Path<u64>) -> PageResult {
    match state.todos.find(id)? {
        Some(todo) => Ok(Html(state.pages.view(&todo)?).into_response()),
        None => Ok(to_index()),
    }
}

fn redisplay(state: &AppState, kind: FormKind, form: &TodoForm, message: &str) -> PageResult {
    warn!(?kind, reason = message, "rejected todo form");
    let html = state.pages.form(kind, &form.values(), Some(message))?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/todos - the full collection.
async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, StatusCode> {
    state.todos.list().map(Json).map_err(internal_error)
}

/// GET /api/todos/{id} - one record.
async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    state
        .todos
        .find(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

fn internal_error(err: TodoError) -> StatusCode {
    error!(error = %err, "api request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tempfile::TempDir;
    use todos::test_support::{completed_todo, todo};
    use todos::{FileStore, Priority, RecordStore};
    use tower::ServiceExt;

    use super::*;

    fn setup(seed: &[Todo]) -> (TempDir, std::path::PathBuf, Router) {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("todos.json");
        if !seed.is_empty() {
            FileStore::new(&path).save(seed).expect("seed");
        }
        let state = AppState::new(&path).expect("state");
        (temp, path, app(state))
    }

    fn stored(path: &std::path::Path) -> Vec<Todo> {
        FileStore::new(path).load().expect("load")
    }

    async fn get_request(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn post_form(app: Router, uri: &str, body: &str) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request");
        app.oneshot(request).await.expect("response")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    fn assert_redirects_to_index(response: &Response) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn index_renders_stored_todos() {
        let (_temp, _path, app) = setup(&[todo(1, "Buy milk"), completed_todo(2, "Call mom")]);

        let response = get_request(app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Buy milk"));
        assert!(html.contains("1 open, 1 completed"));
    }

    #[tokio::test]
    async fn add_creates_and_redirects() {
        let (_temp, path, app) = setup(&[]);

        let response = post_form(
            app,
            "/add",
            "title=Buy+milk&description=&priority=high&due_date=2024-06-01",
        )
        .await;

        assert_redirects_to_index(&response);
        let todos = stored(&path);
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].title, "Buy milk");
        assert_eq!(todos[0].description, None);
        assert_eq!(todos[0].due_date.as_deref(), Some("2024-06-01"));
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn add_with_empty_title_redisplays_form() {
        let (_temp, path, app) = setup(&[]);

        let response = post_form(app, "/add", "title=&description=keep+me").await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("title is required"));
        assert!(html.contains("keep me"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn edit_updates_supplied_fields() {
        let (_temp, path, app) = setup(&[todo(1, "Buy milk")]);

        let response = post_form(
            app,
            "/edit/1",
            "title=Buy+oat+milk&description=2+litres&priority=low&due_date=",
        )
        .await;

        assert_redirects_to_index(&response);
        let todos = stored(&path);
        assert_eq!(todos[0].title, "Buy oat milk");
        assert_eq!(todos[0].description.as_deref(), Some("2 litres"));
        assert_eq!(todos[0].priority, Priority::Low);
        assert_eq!(todos[0].due_date, None);
    }

    #[tokio::test]
    async fn missing_ids_redirect_to_index() {
        let (_temp, path, app) = setup(&[todo(1, "Buy milk")]);
        let before = fs::read_to_string(&path).expect("read");

        for uri in ["/edit/99", "/view/99", "/toggle/99", "/delete/99"] {
            let response = get_request(app.clone(), uri).await;
            assert_redirects_to_index(&response);
        }
        let response = post_form(app, "/edit/99", "title=x").await;
        assert_redirects_to_index(&response);

        assert_eq!(fs::read_to_string(&path).expect("read"), before);
    }

    #[tokio::test]
    async fn toggle_and_delete_redirect() {
        let (_temp, path, app) = setup(&[todo(1, "a"), todo(2, "b")]);

        assert_redirects_to_index(&get_request(app.clone(), "/toggle/1").await);
        assert!(stored(&path)[0].completed);

        assert_redirects_to_index(&get_request(app, "/delete/2").await);
        let ids: Vec<u64> = stored(&path).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn view_and_edit_form_render_existing_todo() {
        let (_temp, _path, app) = setup(&[todo(3, "Walk dog")]);

        let response = get_request(app.clone(), "/view/3").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Walk dog"));

        let response = get_request(app, "/edit/3").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("value=\"Walk dog\""));
    }

    #[tokio::test]
    async fn corrupt_data_file_is_a_server_error() {
        let (_temp, path, app) = setup(&[]);
        fs::write(&path, "not json").expect("write");

        let response = get_request(app.clone(), "/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = get_request(app, "/api/todos").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn api_returns_json() {
        let (_temp, _path, app) = setup(&[todo(1, "Buy milk")]);

        let response = get_request(app.clone(), "/api/todos").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json");
        assert_eq!(body[0]["title"], "Buy milk");
        assert_eq!(body[0]["priority"], "medium");

        let response = get_request(app.clone(), "/api/todos/1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_request(app.clone(), "/api/todos/2").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_request(app, "/api/health").await;
        assert_eq!(body_text(response).await, "ok");
    }
}
