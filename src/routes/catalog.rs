use axum::{Json, Router, routing::get};

use crate::{
    dto::{
        catalog::{BonusTaskResponse, BonusTasksResponse},
        session::BarView,
    },
    services::catalog_service,
    state::SharedState,
};

/// Built-in bars and bonus tasks offered at setup.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/catalog/bars", get(list_bars))
        .route("/catalog/bonus-tasks", get(list_bonus_tasks))
        .route("/catalog/bonus-tasks/random", get(random_bonus_task))
}

/// Bars available when assembling a course.
#[utoipa::path(
    get,
    path = "/catalog/bars",
    tag = "catalog",
    responses((status = 200, description = "Catalog bars", body = [BarView]))
)]
pub async fn list_bars() -> Json<Vec<BarView>> {
    Json(catalog_service::bars().iter().map(BarView::from).collect())
}

/// Whole bonus task pool.
#[utoipa::path(
    get,
    path = "/catalog/bonus-tasks",
    tag = "catalog",
    responses((status = 200, description = "Bonus tasks", body = BonusTasksResponse))
)]
pub async fn list_bonus_tasks() -> Json<BonusTasksResponse> {
    Json(BonusTasksResponse {
        tasks: catalog_service::bonus_tasks(),
    })
}

/// One bonus task drawn at random.
#[utoipa::path(
    get,
    path = "/catalog/bonus-tasks/random",
    tag = "catalog",
    responses((status = 200, description = "Random bonus task", body = BonusTaskResponse))
)]
pub async fn random_bonus_task() -> Json<BonusTaskResponse> {
    Json(BonusTaskResponse {
        task: catalog_service::random_bonus_task(),
    })
}
