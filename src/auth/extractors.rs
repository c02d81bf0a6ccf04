use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use crate::auth::Claims;
use crate::error::AppError;
use crate::models::User;

/// The user the request's bearer token belongs to.
///
/// Reads the [`Claims`] that `AuthMiddleware` placed in the request extensions
/// and loads the matching row. Fails with 401 when the claims are absent, the
/// subject is malformed or the user no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| {
                AppError::Unauthorized(
                    "Token claims not found in request. Ensure AuthMiddleware is active.".into(),
                )
            })?;
            let pool = pool.ok_or_else(|| {
                AppError::Configuration("Database pool is not registered with the application".into())
            })?;

            let user_id = claims.user_id()?;
            match User::find_by_id(&pool, user_id).await.map_err(AppError::from)? {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(AppError::Unauthorized("Error fetching user".into()).into()),
            }
        })
    }
}
