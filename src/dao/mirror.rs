use futures::future::BoxFuture;

use crate::dao::{models::TeamScoreRecord, storage::StorageResult};

/// Sort applied when reading mirrored records back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOrder {
    /// Oldest submission first.
    TimestampAscending,
    /// Newest submission first.
    TimestampDescending,
    /// Most recently inserted row first.
    CreatedDescending,
}

/// Filter for reading mirrored records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorQuery {
    /// Restrict to a single session.
    pub game_id: Option<String>,
    /// Only rows with a photo attached.
    pub with_photo_only: bool,
    /// Row ordering.
    pub order: MirrorOrder,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

impl MirrorQuery {
    /// Every row, newest insert first.
    pub fn all() -> Self {
        Self {
            game_id: None,
            with_photo_only: false,
            order: MirrorOrder::CreatedDescending,
            limit: None,
        }
    }

    /// Rows of one session in submission order.
    pub fn for_game(game_id: impl Into<String>) -> Self {
        Self {
            game_id: Some(game_id.into()),
            with_photo_only: false,
            order: MirrorOrder::TimestampAscending,
            limit: None,
        }
    }

    /// Most recent rows carrying a photo.
    pub fn recent_photos(limit: usize) -> Self {
        Self {
            game_id: None,
            with_photo_only: true,
            order: MirrorOrder::TimestampDescending,
            limit: Some(limit),
        }
    }
}

/// Cloud copy of hole submissions, used for the gallery and cross-game leaderboard.
pub trait ScoreMirror: Send + Sync {
    /// Insert one submission row.
    fn insert_score(&self, record: TeamScoreRecord) -> BoxFuture<'static, StorageResult<()>>;
    /// Read rows back.
    fn fetch_scores(
        &self,
        query: MirrorQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamScoreRecord>>>;
}
