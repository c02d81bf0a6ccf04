use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Task, TaskInput, User},
};
use actix_web::{delete, get, http::StatusCode, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// Rejects ids that cannot name a row.
fn positive_id(raw: i64) -> Result<i64, AppError> {
    if raw > 0 {
        Ok(raw)
    } else {
        Err(AppError::ValidationError(
            "Task id must be greater than 0".into(),
        ))
    }
}

/// Unwraps a body extraction failure deferred until after authentication.
fn body_error(err: actix_web::Error) -> AppError {
    match err.as_error::<AppError>() {
        Some(AppError::ValidationError(msg)) => AppError::ValidationError(msg.clone()),
        _ => AppError::ValidationError(err.to_string()),
    }
}

/// Loads task `id` and checks that `user` owns it.
///
/// `missing` is the 404 detail and `action` completes the 403 detail
/// ("Not authorized to {action} this task").
async fn owned_task(
    pool: &SqlitePool,
    id: i64,
    user: &CurrentUser,
    missing: String,
    action: &str,
) -> Result<Task, AppError> {
    let task = Task::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound(missing))?;

    if task.user_id != user.id() {
        log::warn!("user {} tried to {} task {}", user.id(), action, id);
        return Err(AppError::Forbidden(format!(
            "Not authorized to {} this task",
            action
        )));
    }
    Ok(task)
}

/// Lists the authenticated user's tasks, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[get("/")]
pub async fn get_tasks(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = Task::list_for_user(&pool, user.id()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task.
///
/// The payload names its owner; it must be an existing user and must be the caller.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `403 Forbidden`: `user_id` is another user.
/// - `422 Unprocessable Entity`: invalid payload, or `user_id` does not exist.
#[post("/")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    task_data: Result<web::Json<TaskInput>, actix_web::Error>,
) -> Result<impl Responder, AppError> {
    let task_data = task_data.map_err(body_error)?;
    task_data.validate()?;

    if User::find_by_id(&pool, task_data.user_id).await?.is_none() {
        return Err(AppError::ValidationError(format!(
            "User with id {} does not exist",
            task_data.user_id
        )));
    }
    if task_data.user_id != user.id() {
        return Err(AppError::Forbidden(
            "Not authorized to create task for this user".into(),
        ));
    }

    let task = Task::create(&pool, &task_data).await?;
    log::info!("user {} created task {}", user.id(), task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no such task.
/// - `422 Unprocessable Entity`: the id is not a positive integer.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let id = positive_id(task_id.into_inner())?;
    let task = owned_task(
        &pool,
        id,
        &user,
        format!("Unable to find task {}", id),
        "access",
    )
    .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Overwrites every field of one of the caller's tasks.
///
/// A task cannot be handed to another user through an update.
///
/// ## Responses:
/// - `202 Accepted`: the updated task.
/// - `403 Forbidden`: the task, or the requested new owner, is another user.
/// - `404 Not Found`: no such task.
/// - `422 Unprocessable Entity`: invalid payload or id.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    user: CurrentUser,
    task_data: Result<web::Json<TaskInput>, actix_web::Error>,
) -> Result<impl Responder, AppError> {
    let id = positive_id(task_id.into_inner())?;
    let task_data = task_data.map_err(body_error)?;
    task_data.validate()?;

    owned_task(
        &pool,
        id,
        &user,
        format!("Task {} does not exist.", id),
        "update",
    )
    .await?;

    if task_data.user_id != user.id() {
        return Err(AppError::Forbidden(
            "Not authorized to assign task to another user".into(),
        ));
    }

    let task = Task::update(&pool, id, &task_data).await?;
    log::info!("user {} updated task {}", user.id(), id);

    Ok(HttpResponse::build(StatusCode::ACCEPTED).json(task))
}

/// Deletes one of the caller's tasks and returns it.
///
/// ## Responses:
/// - `202 Accepted`: the deleted task.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no such task.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let id = positive_id(task_id.into_inner())?;
    let task = owned_task(
        &pool,
        id,
        &user,
        format!("Task {} does not exist.", id),
        "delete",
    )
    .await?;

    if !Task::delete(&pool, id).await? {
        return Err(AppError::NotFound(format!("Task {} does not exist.", id)));
    }
    log::info!("user {} deleted task {}", user.id(), id);

    Ok(HttpResponse::build(StatusCode::ACCEPTED).json(task))
}
