use crate::{
    auth::{generate_token, hash_password, verify_password, AuthResponse, Credentials},
    config::AuthSettings,
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// Register a new user
///
/// Stores a bcrypt hash of the password and returns a bearer token for the new account.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` with the access token.
/// - `422 Unprocessable Entity`: invalid payload, or the email is already registered.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;

    if User::find_by_email(&pool, &credentials.email).await?.is_some() {
        return Err(AppError::ValidationError("Email already registered".into()));
    }

    let password = credentials.password.clone();
    let cost = settings.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    // A concurrent registration can still win the race to the UNIQUE index.
    let user = match User::create(&pool, &credentials.email, &password_hash).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::ValidationError("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("registered user {} ({})", user.id, user.email);

    let token = generate_token(user.id, &settings)?;
    Ok(HttpResponse::Ok().json(AuthResponse::bearer(token)))
}

/// Login user
///
/// Checks the password against the stored hash and returns a bearer token.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` with the access token.
/// - `401 Unauthorized`: unknown email or wrong password.
/// - `422 Unprocessable Entity`: invalid payload.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;

    let user = match User::find_by_email(&pool, &credentials.email).await? {
        Some(user) => user,
        None => {
            log::debug!("login attempt for unknown email");
            return Err(AppError::Unauthorized(format!(
                "Unable to find user with email: {}",
                credentials.email
            )));
        }
    };

    let password = credentials.password.clone();
    let stored_hash = user.password_hash.clone();
    if !web::block(move || verify_password(&password, &stored_hash)).await?? {
        log::warn!("wrong password for user {}", user.id);
        return Err(AppError::Unauthorized("Wrong password".into()));
    }

    let token = generate_token(user.id, &settings)?;
    Ok(HttpResponse::Ok().json(AuthResponse::bearer(token)))
}
