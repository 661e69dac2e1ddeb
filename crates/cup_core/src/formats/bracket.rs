//! FIFA 2026 round-of-32 template.
//!
//! The table only says which group finisher goes where; walking the bracket
//! lives in [`knockout`](super::knockout).

use crate::error::{Result, SimError};
use crate::models::{Roster, TeamId};
use std::collections::HashMap;
use tracing::warn;

/// Who fills one side of an opening match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Winner(char),
    RunnerUp(char),
    /// Best third-placed team from one of these groups.
    Third(&'static [char]),
}

/// Sixteen opening matches, in bracket order.
pub const ROUND_OF_32: [(Slot, Slot); 16] = [
    (Slot::RunnerUp('A'), Slot::RunnerUp('B')),
    (Slot::Winner('E'), Slot::Third(&['A', 'B', 'C', 'D', 'F'])),
    (Slot::Winner('F'), Slot::RunnerUp('C')),
    (Slot::Winner('C'), Slot::RunnerUp('F')),
    (Slot::Winner('I'), Slot::Third(&['C', 'D', 'F', 'G', 'H'])),
    (Slot::RunnerUp('E'), Slot::RunnerUp('I')),
    (Slot::Winner('A'), Slot::Third(&['C', 'E', 'F', 'H', 'I'])),
    (Slot::Winner('L'), Slot::Third(&['E', 'H', 'I', 'J', 'K'])),
    (Slot::Winner('D'), Slot::Third(&['B', 'E', 'F', 'I', 'J'])),
    (Slot::Winner('G'), Slot::Third(&['A', 'E', 'H', 'I', 'J'])),
    (Slot::RunnerUp('K'), Slot::RunnerUp('L')),
    (Slot::Winner('H'), Slot::RunnerUp('J')),
    (Slot::Winner('B'), Slot::Third(&['E', 'F', 'G', 'I', 'J'])),
    (Slot::Winner('J'), Slot::RunnerUp('H')),
    (Slot::Winner('K'), Slot::Third(&['D', 'E', 'I', 'J', 'L'])),
    (Slot::RunnerUp('D'), Slot::RunnerUp('G')),
];

/// Resolves template slots against a set of stamped entrants.
struct SlotFiller {
    winners: HashMap<char, TeamId>,
    runners_up: HashMap<char, TeamId>,
    /// Neither winner nor runner-up, in entrant order.
    thirds: Vec<TeamId>,
}

impl SlotFiller {
    fn new(entrants: &[TeamId], roster: &Roster) -> Self {
        let mut winners = HashMap::new();
        let mut runners_up = HashMap::new();
        let mut thirds = Vec::new();
        for &id in entrants {
            let team = roster.team(id);
            match (team.group, team.group_pos) {
                (Some(g), Some(1)) => {
                    winners.insert(g, id);
                }
                (Some(g), Some(2)) => {
                    runners_up.insert(g, id);
                }
                _ => thirds.push(id),
            }
        }
        Self { winners, runners_up, thirds }
    }

    fn fill(&mut self, slot: Slot, roster: &Roster) -> Result<TeamId> {
        match slot {
            Slot::Winner(g) => {
                let missing = SimError::MissingBracketSlot { group: g, position: 1 };
                self.winners.get(&g).copied().ok_or(missing)
            }
            Slot::RunnerUp(g) => {
                let missing = SimError::MissingBracketSlot { group: g, position: 2 };
                self.runners_up.get(&g).copied().ok_or(missing)
            }
            Slot::Third(allowed) => self.pick_third(allowed, roster),
        }
    }

    /// First remaining third from an allowed group; otherwise the first
    /// remaining third of any group.
    fn pick_third(&mut self, allowed: &[char], roster: &Roster) -> Result<TeamId> {
        let hit = self
            .thirds
            .iter()
            .position(|id| roster.team(*id).group.is_some_and(|g| allowed.contains(&g)));

        match hit {
            Some(idx) => Ok(self.thirds.remove(idx)),
            None if !self.thirds.is_empty() => {
                let id = self.thirds.remove(0);
                warn!(
                    "no third-placed team from {:?} left; taking {} instead",
                    allowed,
                    roster.name(id)
                );
                Ok(id)
            }
            None => Err(SimError::MissingBracketSlot {
                group: allowed.first().copied().unwrap_or('?'),
                position: 3,
            }),
        }
    }
}

/// Flattened opening order for 32 entrants: slot pairs laid out left to right.
pub fn fifa2026_round_of_32(entrants: &[TeamId], roster: &Roster) -> Result<Vec<TeamId>> {
    let mut filler = SlotFiller::new(entrants, roster);
    let mut order = Vec::with_capacity(32);
    for (left, right) in ROUND_OF_32 {
        order.push(filler.fill(left, roster)?);
        order.push(filler.fill(right, roster)?);
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRating;
    use std::collections::HashSet;

    /// 12 winners, 12 runners-up and thirds from the given groups.
    fn stamped_field(third_groups: &[char]) -> (Roster, Vec<TeamId>) {
        let mut ratings = Vec::new();
        let mut stamps = Vec::new();
        for g in 'A'..='L' {
            for pos in 1..=2u8 {
                ratings.push(TeamRating::new(format!("{g}{pos}"), 1500.0));
                stamps.push((g, pos));
            }
        }
        for &g in third_groups {
            ratings.push(TeamRating::new(format!("{g}3"), 1500.0));
            stamps.push((g, 3));
        }

        let mut roster = Roster::from_ratings(&ratings).unwrap();
        for (idx, (g, pos)) in stamps.into_iter().enumerate() {
            let team = roster.team_mut(TeamId(idx));
            team.group = Some(g);
            team.group_pos = Some(pos);
        }
        let ids = roster.ids().collect();
        (roster, ids)
    }

    #[test]
    fn test_template_uses_every_group_twice() {
        let mut winners = HashSet::new();
        let mut runners = HashSet::new();
        let mut thirds = 0;
        for (l, r) in ROUND_OF_32 {
            for slot in [l, r] {
                match slot {
                    Slot::Winner(g) => assert!(winners.insert(g)),
                    Slot::RunnerUp(g) => assert!(runners.insert(g)),
                    Slot::Third(allowed) => {
                        assert_eq!(allowed.len(), 5);
                        thirds += 1;
                    }
                }
            }
        }
        assert_eq!(winners.len(), 12);
        assert_eq!(runners.len(), 12);
        assert_eq!(thirds, 8);
    }

    #[test]
    fn test_round_of_32_places_every_entrant_once() {
        let (roster, ids) = stamped_field(&['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H']);
        let order = fifa2026_round_of_32(&ids, &roster).unwrap();

        assert_eq!(order.len(), 32);
        let unique: HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), 32);

        assert_eq!(roster.name(order[0]), "A2");
        assert_eq!(roster.name(order[1]), "B2");
        assert_eq!(roster.name(order[2]), "E1");
        // E1 meets the first third from {A,B,C,D,F} in entrant order.
        assert_eq!(roster.name(order[3]), "A3");
        assert_eq!(roster.name(order[30]), "D2");
        assert_eq!(roster.name(order[31]), "G2");
    }

    #[test]
    fn test_third_slot_falls_back_to_first_remaining() {
        // With this pool the G1 slot finds no allowed group left.
        let (roster, ids) = stamped_field(&['A', 'B', 'C', 'D', 'F', 'G', 'K', 'L']);
        let order = fifa2026_round_of_32(&ids, &roster).unwrap();

        let names: Vec<&str> = order.iter().map(|id| roster.name(*id)).collect();
        // Slot 2: E1 vs first of {A,B,C,D,F} → A3.
        assert_eq!(names[3], "A3");
        // Slot 5: I1 vs first of {C,D,F,G,H} → C3.
        assert_eq!(names[9], "C3");
        // Slot 7: A1 vs first of {C,E,F,H,I} → F3 (C3 already gone).
        assert_eq!(names[13], "F3");
        // Slot 8: L1 vs {E,H,I,J,K} → K3.
        assert_eq!(names[15], "K3");
        // Slot 9: D1 vs {B,E,F,I,J} → B3.
        assert_eq!(names[17], "B3");
        // Slot 10: G1 vs {A,E,H,I,J}: none left (A3 gone) → fallback to D3.
        assert_eq!(names[19], "D3");
        // Slot 13: B1 vs {E,F,G,I,J} → G3.
        assert_eq!(names[25], "G3");
        // Slot 15: K1 vs {D,E,I,J,L} → L3.
        assert_eq!(names[29], "L3");
        let unique: HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), 32);
    }

    #[test]
    fn test_missing_group_winner_is_an_error() {
        let (mut roster, ids) = stamped_field(&['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H']);
        roster.team_mut(TeamId(0)).group_pos = Some(3); // A1 demoted
        let err = fifa2026_round_of_32(&ids, &roster).unwrap_err();
        assert!(matches!(err, SimError::MissingBracketSlot { group: 'A', position: 1 }));
    }

    #[test]
    fn test_short_third_pool_is_an_error() {
        let (roster, ids) = stamped_field(&['A', 'B']);
        let err = fifa2026_round_of_32(&ids, &roster).unwrap_err();
        assert!(matches!(err, SimError::MissingBracketSlot { position: 3, .. }));
    }
}
