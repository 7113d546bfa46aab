//! Leaderboard and user ranking orderings.

use crate::dao::models::{ScoreEntity, UserEntity};

/// Winning scores, fewest attempts used first.
///
/// Ties go to the game with the larger budget; remaining ties keep their
/// input order. At most `limit` scores are returned.
pub fn rank_high_scores(mut scores: Vec<ScoreEntity>, limit: usize) -> Vec<ScoreEntity> {
    scores.retain(|score| score.won);
    scores.sort_by(|a, b| {
        a.attempts_used
            .cmp(&b.attempts_used)
            .then_with(|| b.attempts_allowed.cmp(&a.attempts_allowed))
    });
    scores.truncate(limit);
    scores
}

/// Users with at least one win, best win ratio first.
///
/// Equal ratios rank the user with fewer games played higher.
pub fn rank_users(mut users: Vec<UserEntity>) -> Vec<UserEntity> {
    users.retain(|user| user.win_ratio > 0.0);
    users.sort_by(|a, b| {
        b.win_ratio
            .total_cmp(&a.win_ratio)
            .then_with(|| a.total_played.cmp(&b.total_played))
    });
    users
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;

    fn score(won: bool, attempts_used: u32, attempts_allowed: u32) -> ScoreEntity {
        ScoreEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            date: SystemTime::now(),
            won,
            attempts_used,
            attempts_allowed,
        }
    }

    fn user(name: &str, won: u32, total_played: u32) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            won,
            total_played,
            win_ratio: if total_played == 0 {
                0.0
            } else {
                f64::from(won) / f64::from(total_played)
            },
        }
    }

    #[test]
    fn larger_budget_wins_attempt_ties() {
        let tight = score(true, 2, 6);
        let generous = score(true, 2, 8);
        let best = score(true, 1, 6);

        let ranked = rank_high_scores(vec![tight.clone(), generous.clone(), best.clone()], 10);

        assert_eq!(ranked, vec![best, generous, tight]);
    }

    #[test]
    fn high_scores_skip_losses_and_respect_limit() {
        let ranked = rank_high_scores(
            vec![score(false, 0, 6), score(true, 3, 6), score(true, 4, 6), score(true, 5, 6)],
            2,
        );

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|score| score.won));
        assert_eq!(ranked[0].attempts_used, 3);
        assert_eq!(ranked[1].attempts_used, 4);
    }

    #[test]
    fn fewer_games_wins_ratio_ties() {
        let veteran = user("veteran", 2, 4);
        let rookie = user("rookie", 1, 2);
        let champion = user("champion", 3, 3);

        let ranked = rank_users(vec![veteran.clone(), rookie.clone(), champion.clone()]);

        assert_eq!(ranked, vec![champion, rookie, veteran]);
    }

    #[test]
    fn users_without_wins_are_not_ranked() {
        let ranked = rank_users(vec![user("idle", 0, 0), user("unlucky", 0, 5)]);
        assert!(ranked.is_empty());
    }
}
