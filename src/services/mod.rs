/// Built-in bar catalog and bonus task pool.
pub mod catalog_service;
/// Read side of the cloud score mirror.
pub mod cloud_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Session lifecycle, scoring and leaderboard operations.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Local snapshot restore and write-back.
pub mod persistence_service;
/// Score relay, image upload and payment intents.
pub mod relay_service;
/// Hole submission workflow.
pub mod submission_service;
