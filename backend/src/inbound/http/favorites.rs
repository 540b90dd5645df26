//! Favorite-job handlers.
//!
//! ```text
//! POST   /api/v1/favorites/{jobId}
//! DELETE /api/v1/favorites/{jobId}
//! GET    /api/v1/favorites
//! ```

use actix_web::{HttpRequest, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FavoriteChange;
use crate::domain::{Job, JobId, RoleSet};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authorize;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_job_id;

/// Outcome of a favorite toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    #[schema(value_type = String)]
    pub job_id: JobId,
    /// Membership after the call.
    pub favorite: bool,
    /// Whether this call changed the set.
    pub changed: bool,
}

impl FavoriteResponse {
    fn new(job_id: JobId, favorite: bool, change: FavoriteChange) -> Self {
        Self {
            job_id,
            favorite,
            changed: change == FavoriteChange::Applied,
        }
    }
}

/// Add a job to the caller's favorites. Idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/favorites/{jobId}",
    params(("jobId" = String, Path, description = "Job identifier (UUID)")),
    responses(
        (status = 200, description = "Job is a favorite", body = FavoriteResponse),
        (status = 400, description = "Invalid job id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Job not found", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/favorites/{job_id}")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<FavoriteResponse>> {
    let principal = authorize(&state, &req, RoleSet::ANY).await?;
    let job_id = parse_job_id(&path)?;
    let change = state.favorites.add(&principal.user_id(), &job_id).await?;
    Ok(web::Json(FavoriteResponse::new(job_id, true, change)))
}

/// Remove a job from the caller's favorites. Idempotent.
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{jobId}",
    params(("jobId" = String, Path, description = "Job identifier (UUID)")),
    responses(
        (status = 200, description = "Job is not a favorite", body = FavoriteResponse),
        (status = 400, description = "Invalid job id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/favorites/{job_id}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<FavoriteResponse>> {
    let principal = authorize(&state, &req, RoleSet::ANY).await?;
    let job_id = parse_job_id(&path)?;
    let change = state.favorites.remove(&principal.user_id(), &job_id).await?;
    Ok(web::Json(FavoriteResponse::new(job_id, false, change)))
}

/// The caller's favorite jobs, most recently added first.
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    responses(
        (status = 200, description = "Favorite jobs", body = [Job]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<Job>>> {
    let principal = authorize(&state, &req, RoleSet::ANY).await?;
    let jobs = state.favorites_query.list(&principal.user_id()).await?;
    Ok(web::Json(jobs))
}
