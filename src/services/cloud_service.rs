//! Read side of the cloud mirror.
//!
//! Every query degrades to an empty list when the mirror is missing or failing; the gallery
//! and cross-game views are informational and must never break the app.

use indexmap::IndexMap;
use tracing::warn;

use crate::{
    dao::{
        mirror::MirrorQuery,
        models::TeamScoreRecord,
    },
    dto::cloud::{CloudGameItem, CloudScoreDto, LiveLeaderboardEntry},
    state::SharedState,
};

/// Photos returned by the gallery when no limit is given.
pub const DEFAULT_PHOTO_LIMIT: usize = 20;

async fn fetch(state: &SharedState, query: MirrorQuery, what: &str) -> Vec<TeamScoreRecord> {
    let Some(mirror) = state.mirror() else {
        return Vec::new();
    };
    match mirror.fetch_scores(query).await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "failed to fetch {what} from the cloud mirror");
            Vec::new()
        }
    }
}

/// Submissions of one game, oldest first.
pub async fn game_scores(state: &SharedState, game_id: &str) -> Vec<CloudScoreDto> {
    fetch(state, MirrorQuery::for_game(game_id), "game scores")
        .await
        .into_iter()
        .map(CloudScoreDto::from)
        .collect()
}

/// Most recent submissions carrying a photo.
pub async fn recent_photos(state: &SharedState, limit: Option<usize>) -> Vec<CloudScoreDto> {
    let limit = limit.unwrap_or(DEFAULT_PHOTO_LIMIT);
    fetch(state, MirrorQuery::recent_photos(limit), "photos")
        .await
        .into_iter()
        .map(CloudScoreDto::from)
        .collect()
}

/// Cross-game standings, lowest total first.
pub async fn live_leaderboard(state: &SharedState) -> Vec<LiveLeaderboardEntry> {
    live_standings(fetch(state, MirrorQuery::all(), "leaderboard").await)
}

/// Distinct games, newest first.
pub async fn all_games(state: &SharedState) -> Vec<CloudGameItem> {
    distinct_games(fetch(state, MirrorQuery::all(), "games").await)
}

/// Group rows per game and total them.
///
/// Each player row adds its sips; a row on a bonus-completed record also takes one point off,
/// so a team of four completing the bonus gains four points. Holes played is the number of
/// records of the game.
pub fn live_standings(records: Vec<TeamScoreRecord>) -> Vec<LiveLeaderboardEntry> {
    let mut games: IndexMap<String, LiveLeaderboardEntry> = IndexMap::new();
    for record in records {
        let entry = games
            .entry(record.game_id.clone())
            .or_insert_with(|| LiveLeaderboardEntry {
                game_id: record.game_id.clone(),
                game_name: record.game_name.clone(),
                players: Vec::new(),
                total_score: 0,
                holes_played: 0,
            });
        entry.holes_played += 1;
        for player in record.players {
            entry.total_score += i64::from(player.sips);
            if record.bonus_completed {
                entry.total_score -= 1;
            }
            if !entry.players.contains(&player.name) {
                entry.players.push(player.name);
            }
        }
    }

    let mut standings: Vec<LiveLeaderboardEntry> = games.into_values().collect();
    standings.sort_by_key(|entry| entry.total_score);
    standings
}

/// First row of every game in the given order.
pub fn distinct_games(records: Vec<TeamScoreRecord>) -> Vec<CloudGameItem> {
    let mut games: IndexMap<String, CloudGameItem> = IndexMap::new();
    for record in records {
        games
            .entry(record.game_id.clone())
            .or_insert_with(|| CloudGameItem {
                game_id: record.game_id,
                game_name: record.game_name,
                created_at: record.created_at,
            });
    }
    games.into_values().collect()
}
