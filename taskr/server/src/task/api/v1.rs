use crate::task::{
    DEFAULT_LIMIT, Frequency, NewTask, Task, TaskChanges, TaskQuery, TaskService,
    TaskServiceError, TaskState,
};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier for the task
    pub id: i32,
    /// Short name of the task
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// ID of the user owning the task
    pub owner_id: i32,
    /// How often the task recurs
    pub frequency: Frequency,
    /// Custom interval, only present when frequency is `other`
    pub frequency_value: Option<i32>,
    /// Day the task was last done
    pub last_done: Option<NaiveDate>,
    /// Day the task is next due
    pub next_to_do: Option<NaiveDate>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            name: task.name().to_string(),
            description: task.description().map(str::to_string),
            owner_id: task.owner_id(),
            frequency: task.frequency(),
            frequency_value: task.frequency_value(),
            last_done: task.last_done(),
            next_to_do: task.next_to_do(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Request body for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
    /// Defaults to `monthly`
    #[serde(default)]
    frequency: Frequency,
    /// Required when frequency is `other`, forbidden otherwise
    #[serde(default)]
    frequency_value: Option<i32>,
    #[serde(default)]
    last_done: Option<NaiveDate>,
    #[serde(default)]
    next_to_do: Option<NaiveDate>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            frequency: request.frequency,
            frequency_value: request.frequency_value,
            last_done: request.last_done,
            next_to_do: request.next_to_do,
        }
    }
}

/// Request body for a partial task update. Omitted fields are left unchanged,
/// `null` clears a nullable field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    description: Option<Option<String>>,
    #[serde(default)]
    frequency: Option<Frequency>,
    /// Dropped automatically when frequency moves away from `other`
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    frequency_value: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>, format = Date)]
    last_done: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>, format = Date)]
    next_to_do: Option<Option<NaiveDate>>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            frequency: request.frequency,
            frequency_value: request.frequency_value,
            last_done: request.last_done,
            next_to_do: request.next_to_do,
        }
    }
}

/// Marks a field that was present in the payload, even when it was `null`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    #[serde(default)]
    skip: u32,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    owner_id: Option<i32>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl From<TasksQuery> for TaskQuery {
    fn from(query: TasksQuery) -> Self {
        Self {
            skip: query.skip,
            limit: query.limit,
            owner_id: query.owner_id,
        }
    }
}

/// JSON response for API errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
        }
    }
}

/// Custom error type for task API handlers.
#[derive(Debug, thiserror::Error)]
pub enum TaskApiError {
    #[error(transparent)]
    Service(#[from] TaskServiceError),
    /// The body was not valid JSON for the endpoint.
    #[error(transparent)]
    JsonBody(#[from] JsonRejection),
    #[error(transparent)]
    PathParam(#[from] PathRejection),
    #[error(transparent)]
    QueryParam(#[from] QueryRejection),
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        let (status_code, error_response) = match self {
            TaskApiError::Service(TaskServiceError::TaskNotFound(id)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", format!("Task with ID {} not found", id)),
            ),
            TaskApiError::Service(TaskServiceError::InvalidRecurrence(err)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", err.to_string()),
            ),
            TaskApiError::Service(TaskServiceError::OwnerNotFound(id)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("OWNER_NOT_FOUND", format!("Owner with ID {} not found", id)),
            ),
            TaskApiError::Service(err @ TaskServiceError::CorruptRecurrence { .. }) => {
                tracing::error!("Stored task is inconsistent: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An unexpected error occurred while processing your request. Please try again later.".to_string(),
                    ),
                )
            }
            TaskApiError::Service(TaskServiceError::Database(err)) => {
                tracing::error!("Task database operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An unexpected error occurred while processing your request. Please try again later.".to_string(),
                    ),
                )
            }
            TaskApiError::JsonBody(rejection) => (
                rejection.status(),
                ErrorResponse::new("INVALID_REQUEST", rejection.body_text()),
            ),
            TaskApiError::PathParam(rejection) => (
                rejection.status(),
                ErrorResponse::new("INVALID_REQUEST", rejection.body_text()),
            ),
            TaskApiError::QueryParam(rejection) => (
                rejection.status(),
                ErrorResponse::new("INVALID_REQUEST", rejection.body_text()),
            ),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Handler for GET /api/v1/tasks - Returns a window of tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(
        ("skip" = Option<u32>, Query, description = "Number of tasks to skip"),
        ("limit" = Option<u32>, Query, description = "Maximum number of tasks to return, 100 by default"),
        ("owner_id" = Option<i32>, Query, description = "Only return tasks of this owner")
    ),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 400, description = "Malformed query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Query(query), _): WithRejection<Query<TasksQuery>, TaskApiError>,
) -> Result<Json<Vec<TaskJson>>, TaskApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service.get_tasks(query.into()).await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for POST /api/v1/tasks - Creates a task for the default owner.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Task created", body = TaskJson),
        (status = 400, description = "frequency and frequency_value disagree", body = ErrorResponse),
        (status = 422, description = "Malformed task or unknown owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTaskRequest>, TaskApiError>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let service = TaskService::new(&state.db);
    let task = service
        .create_task(payload.into(), state.default_owner_id)
        .await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for GET /api/v1/tasks/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, TaskApiError>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PUT /api/v1/tasks/{id} - Partially updates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "frequency and frequency_value disagree", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, TaskApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateTaskRequest>, TaskApiError>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let service = TaskService::new(&state.db);
    let task = service.update_task_by_id(id, payload.into()).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /api/v1/tasks/{id} - Deletes a task and returns it.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, TaskApiError>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let service = TaskService::new(&state.db);
    let task = service.delete_task_by_id(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// OpenAPI description of the task endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        get_tasks_handler,
        create_task_handler,
        get_task_handler,
        update_task_handler,
        delete_task_handler
    ),
    components(schemas(
        TaskJson,
        CreateTaskRequest,
        UpdateTaskRequest,
        ErrorResponse,
        Frequency
    )),
    tags((name = "Tasks", description = "Recurring task management"))
)]
pub struct TaskApiDoc;

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
