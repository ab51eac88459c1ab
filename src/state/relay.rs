use dashmap::DashMap;

/// Sip count reported for one player inside a team score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSips {
    /// Player display name.
    pub name: String,
    /// Sips drunk at the bar.
    pub sips: u32,
}

/// Team-level score record accepted by the relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScore {
    /// Client-chosen identifier of the record.
    pub id: Option<String>,
    /// Name of the game; also used as the lookup key.
    pub game_name: String,
    /// Bar the record belongs to.
    pub bar_id: String,
    /// Bar display name.
    pub bar_name: String,
    /// Client timestamp in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Per-player sips.
    pub players: Vec<PlayerSips>,
    /// Whether the team completed the bonus task.
    pub bonus_completed: bool,
    /// Optional photo attached to the record.
    pub photo_url: Option<String>,
}

/// In-memory list behind the save-score relay, grouped by game name.
///
/// Nothing is persisted: records live as long as the process.
#[derive(Debug, Default)]
pub struct ScoreRelay {
    by_game: DashMap<String, Vec<TeamScore>>,
}

impl ScoreRelay {
    /// Create an empty relay list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&self, score: TeamScore) {
        self.by_game
            .entry(score.game_name.clone())
            .or_default()
            .push(score);
    }

    /// Records of one game in insertion order.
    pub fn for_game(&self, game_name: &str) -> Vec<TeamScore> {
        self.by_game
            .get(game_name)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Every record, ordered by client timestamp.
    pub fn all(&self) -> Vec<TeamScore> {
        let mut scores: Vec<TeamScore> = self
            .by_game
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        scores.sort_by_key(|score| score.timestamp);
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game: &str, timestamp: i64) -> TeamScore {
        TeamScore {
            id: None,
            game_name: game.into(),
            bar_id: "bar-1".into(),
            bar_name: "Sing Sing Bar".into(),
            timestamp,
            players: vec![PlayerSips {
                name: "Alice".into(),
                sips: 2,
            }],
            bonus_completed: false,
            photo_url: None,
        }
    }

    #[test]
    fn filters_by_game_name() {
        let relay = ScoreRelay::new();
        relay.push(record("friday", 2));
        relay.push(record("saturday", 1));
        relay.push(record("friday", 3));

        let friday = relay.for_game("friday");
        assert_eq!(friday.len(), 2);
        assert!(relay.for_game("sunday").is_empty());
    }

    #[test]
    fn all_is_ordered_by_timestamp() {
        let relay = ScoreRelay::new();
        relay.push(record("friday", 20));
        relay.push(record("saturday", 10));
        relay.push(record("friday", 30));

        let stamps: Vec<_> = relay.all().into_iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, [10, 20, 30]);
    }
}
