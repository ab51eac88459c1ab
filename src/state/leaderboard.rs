//! Leaderboard derivation.
//!
//! The leaderboard is never stored: it is folded from the full ledger on every read, so it
//! always agrees with whatever the ledger currently holds.

use crate::state::game::{Bar, GameSession, Player, PlayerId, Score};

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Roster entry the row describes.
    pub player: Player,
    /// Sum of every sip the player has on the ledger.
    pub raw_strokes: u64,
    /// Number of ledger entries carrying a completed bonus.
    pub bonus_count: u64,
    /// `raw_strokes - bonus_count`; lower is better.
    pub total_score: i64,
    /// `total_score - total_par` of the whole course.
    pub relative_to_par: i64,
}

/// Per-player sums over the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTally {
    /// Sum of strokes over matching entries.
    pub raw_strokes: u64,
    /// Count of matching entries flagged with a completed bonus.
    pub bonus_count: u64,
}

impl PlayerTally {
    /// Each completed bonus event is worth one sip off the total.
    pub fn total_score(&self) -> i64 {
        self.raw_strokes as i64 - self.bonus_count as i64
    }
}

/// Sum of `par` over the whole course. Food stops contribute zero.
pub fn total_par(course: &[Bar]) -> u64 {
    course.iter().map(|bar| u64::from(bar.par)).sum()
}

/// Fold the ledger for a single player. Duplicate entries for the same hole are all counted.
pub fn tally_player(scores: &[Score], player_id: PlayerId) -> PlayerTally {
    scores
        .iter()
        .filter(|score| score.player_id == player_id)
        .fold(PlayerTally::default(), |mut tally, score| {
            tally.raw_strokes += u64::from(score.strokes);
            if score.bonus_completed {
                tally.bonus_count += 1;
            }
            tally
        })
}

/// Rank every roster player by ascending total score.
///
/// The sort is stable, so tied players keep their roster order.
pub fn compute(session: &GameSession) -> Vec<LeaderboardEntry> {
    let par = total_par(&session.course) as i64;

    let mut entries: Vec<LeaderboardEntry> = session
        .players
        .iter()
        .map(|player| {
            let tally = tally_player(&session.scores, player.id);
            let total_score = tally.total_score();
            LeaderboardEntry {
                player: player.clone(),
                raw_strokes: tally.raw_strokes,
                bonus_count: tally.bonus_count,
                total_score,
                relative_to_par: total_score - par,
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.total_score);
    entries
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;

    fn bar(id: &str, par: u32) -> Bar {
        Bar {
            id: id.into(),
            name: id.to_uppercase(),
            neighborhood: "East Village".into(),
            address: String::new(),
            par,
            latitude: None,
            longitude: None,
            bonus_task: None,
        }
    }

    fn player(name: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: name.into(),
            color: "#FF6B35".into(),
        }
    }

    fn score(player: &Player, hole: &str, strokes: u32, bonus: bool) -> Score {
        Score {
            player_id: player.id,
            hole_id: hole.into(),
            strokes,
            recorded_at: SystemTime::now(),
            bonus_completed: bonus,
        }
    }

    fn session(course: Vec<Bar>, players: Vec<Player>) -> GameSession {
        GameSession::new("Crawl".into(), course, players)
    }

    #[test]
    fn total_par_sums_every_hole_including_food_stops() {
        let course = vec![bar("a", 3), bar("food", 0), bar("b", 4)];
        assert_eq!(total_par(&course), 7);
        assert_eq!(total_par(&[]), 0);
    }

    #[test]
    fn tally_counts_every_bonus_entry() {
        let alice = player("Alice");
        let scores = vec![
            score(&alice, "a", 3, true),
            score(&alice, "b", 2, true),
            score(&alice, "c", 1, false),
        ];
        let tally = tally_player(&scores, alice.id);
        assert_eq!(tally.raw_strokes, 6);
        assert_eq!(tally.bonus_count, 2);
        assert_eq!(tally.total_score(), 4);
    }

    #[test]
    fn tally_can_go_negative() {
        let alice = player("Alice");
        let scores = vec![score(&alice, "a", 0, true)];
        assert_eq!(tally_player(&scores, alice.id).total_score(), -1);
    }

    #[test]
    fn leaderboard_is_relative_to_whole_course_par() {
        let alice = player("Alice");
        let bob = player("Bob");
        let mut game = session(
            vec![bar("a", 3), bar("b", 4)],
            vec![alice.clone(), bob.clone()],
        );
        game.scores.push(score(&alice, "a", 3, false));
        game.scores.push(score(&bob, "a", 5, false));

        let board = compute(&game);
        assert_eq!(board[0].player.name, "Alice");
        assert_eq!(board[0].total_score, 3);
        assert_eq!(board[0].relative_to_par, -4);
        assert_eq!(board[1].player.name, "Bob");
        assert_eq!(board[1].total_score, 5);
        assert_eq!(board[1].relative_to_par, -2);
    }

    #[test]
    fn ties_keep_roster_order() {
        let alice = player("Alice");
        let bob = player("Bob");
        let carol = player("Carol");
        let mut game = session(
            vec![bar("a", 3)],
            vec![carol.clone(), alice.clone(), bob.clone()],
        );
        game.scores.push(score(&alice, "a", 2, false));
        game.scores.push(score(&bob, "a", 2, false));
        game.scores.push(score(&carol, "a", 2, false));

        let names: Vec<_> = compute(&game)
            .into_iter()
            .map(|entry| entry.player.name)
            .collect();
        assert_eq!(names, ["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn players_without_entries_score_zero() {
        let alice = player("Alice");
        let game = session(vec![bar("a", 2)], vec![alice]);
        let board = compute(&game);
        assert_eq!(board[0].total_score, 0);
        assert_eq!(board[0].relative_to_par, -2);
    }

    #[test]
    fn empty_roster_yields_empty_board() {
        let game = session(vec![bar("a", 2)], Vec::new());
        assert!(compute(&game).is_empty());
    }

    #[test]
    fn out_of_roster_entries_do_not_appear() {
        let alice = player("Alice");
        let stranger = player("Stranger");
        let mut game = session(vec![bar("a", 2)], vec![alice.clone()]);
        game.scores.push(score(&stranger, "a", 9, false));

        let board = compute(&game);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].total_score, 0);
    }
}
