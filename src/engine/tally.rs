use serde::Serialize;
use std::collections::HashMap;

use crate::models::Vote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Impostor,
    Crew,
}

/// Result of reducing a vote set against the impostor's identity
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub winner: Winner,
    /// Vote count per target user id
    pub tally: HashMap<i64, u32>,
    /// More than one target attained the maximum count
    pub tie: bool,
}

/// Per-target vote counts
pub fn tally_votes(votes: &[Vote]) -> HashMap<i64, u32> {
    let mut tally = HashMap::new();
    for vote in votes {
        *tally.entry(vote.target_user_id).or_insert(0) += 1;
    }
    tally
}

/// Decide the game from the full vote set at reveal time.
///
/// The rule is intentionally asymmetric: the crew wins only when a unique
/// plurality target exists and it is the impostor. Zero votes, a tied
/// plurality, or a wrong unique target all go to the impostor.
pub fn decide(votes: &[Vote], impostor_user_id: i64) -> VoteOutcome {
    let tally = tally_votes(votes);

    let mut top_target: Option<i64> = None;
    let mut top_count: u32 = 0;
    let mut tie = false;
    for (&target, &count) in &tally {
        if count > top_count {
            top_target = Some(target);
            top_count = count;
            tie = false;
        } else if count == top_count {
            tie = true;
        }
    }

    let crew_wins = !tie && top_target == Some(impostor_user_id);
    VoteOutcome {
        winner: if crew_wins { Winner::Crew } else { Winner::Impostor },
        tally,
        tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn votes_for(game_id: Uuid, targets: &[(i64, i64)]) -> Vec<Vote> {
        targets
            .iter()
            .map(|&(voter, target)| Vote::new(game_id, voter, target))
            .collect()
    }

    #[test]
    fn test_zero_votes_means_impostor_wins() {
        let outcome = decide(&[], 7);
        assert_eq!(outcome.winner, Winner::Impostor);
        assert!(outcome.tally.is_empty());
        assert!(!outcome.tie);
    }

    #[test]
    fn test_tie_means_impostor_wins_even_when_impostor_is_tied() {
        // {A:2, B:2} with impostor = A
        let game_id = Uuid::new_v4();
        let votes = votes_for(game_id, &[(1, 10), (2, 10), (3, 20), (4, 20)]);
        let outcome = decide(&votes, 10);
        assert_eq!(outcome.winner, Winner::Impostor);
        assert!(outcome.tie);
        assert_eq!(outcome.tally[&10], 2);
        assert_eq!(outcome.tally[&20], 2);
    }

    #[test]
    fn test_unique_plurality_on_impostor_means_crew_wins() {
        // {A:3, B:1} with impostor = A
        let game_id = Uuid::new_v4();
        let votes = votes_for(game_id, &[(1, 10), (2, 10), (3, 10), (4, 20)]);
        let outcome = decide(&votes, 10);
        assert_eq!(outcome.winner, Winner::Crew);
        assert!(!outcome.tie);
    }

    #[test]
    fn test_unique_plurality_on_wrong_target_means_impostor_wins() {
        let game_id = Uuid::new_v4();
        let votes = votes_for(game_id, &[(1, 20), (2, 20), (3, 10)]);
        let outcome = decide(&votes, 10);
        assert_eq!(outcome.winner, Winner::Impostor);
        assert!(!outcome.tie);
    }

    #[test]
    fn test_decision_is_insensitive_to_vote_order() {
        let game_id = Uuid::new_v4();
        let mut votes = votes_for(game_id, &[(1, 10), (2, 10), (3, 20), (4, 10), (5, 20)]);
        let baseline = decide(&votes, 10);
        assert_eq!(baseline.winner, Winner::Crew);

        // Every rotation of the vote list lands on the same outcome
        for _ in 0..votes.len() {
            votes.rotate_left(1);
            let outcome = decide(&votes, 10);
            assert_eq!(outcome.winner, baseline.winner);
            assert_eq!(outcome.tie, baseline.tie);
            assert_eq!(outcome.tally, baseline.tally);
        }
    }

    #[test]
    fn test_tally_counts_each_target() {
        let game_id = Uuid::new_v4();
        let votes = votes_for(game_id, &[(1, 10), (2, 10), (3, 20)]);
        let tally = tally_votes(&votes);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[&10], 2);
        assert_eq!(tally[&20], 1);
    }
}
