use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Clue, Participant};

/// Participants who have not yet submitted a clue for the given round
pub fn missing_clues<'a>(
    participants: &'a [Participant],
    clues: &[Clue],
    round_number: i32,
) -> Vec<&'a Participant> {
    let submitted: HashSet<Uuid> = clues
        .iter()
        .filter(|c| c.round_number == round_number)
        .map(|c| c.participant_id)
        .collect();
    participants
        .iter()
        .filter(|p| !submitted.contains(&p.id))
        .collect()
}

/// True iff every participant has a clue for the given round
pub fn round_complete(participants: &[Participant], clues: &[Clue], round_number: i32) -> bool {
    missing_clues(participants, clues, round_number).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(game_id: Uuid, user_id: i64) -> Participant {
        Participant::new(game_id, user_id, false)
    }

    #[test]
    fn test_round_with_no_participants_is_complete() {
        assert!(round_complete(&[], &[], 1));
    }

    #[test]
    fn test_round_incomplete_until_everyone_submits() {
        let game_id = Uuid::new_v4();
        let players = vec![
            participant(game_id, 1),
            participant(game_id, 2),
            participant(game_id, 3),
        ];

        let mut clues = vec![
            Clue::new(game_id, players[0].id, 1, "sand".to_string()),
            Clue::new(game_id, players[1].id, 1, "wave".to_string()),
        ];
        assert!(!round_complete(&players, &clues, 1));
        assert_eq!(missing_clues(&players, &clues, 1).len(), 1);
        assert_eq!(missing_clues(&players, &clues, 1)[0].user_id, 3);

        clues.push(Clue::new(game_id, players[2].id, 1, "salt".to_string()));
        assert!(round_complete(&players, &clues, 1));
    }

    #[test]
    fn test_clues_from_other_rounds_do_not_count() {
        let game_id = Uuid::new_v4();
        let players = vec![participant(game_id, 1)];
        let clues = vec![Clue::new(game_id, players[0].id, 1, "sand".to_string())];
        assert!(round_complete(&players, &clues, 1));
        assert!(!round_complete(&players, &clues, 2));
    }
}
