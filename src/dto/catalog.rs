use serde::Serialize;
use utoipa::ToSchema;

/// Pool of bonus challenges.
#[derive(Debug, Serialize, ToSchema)]
pub struct BonusTasksResponse {
    pub tasks: Vec<String>,
}

/// One randomly drawn challenge.
#[derive(Debug, Serialize, ToSchema)]
pub struct BonusTaskResponse {
    pub task: String,
}
