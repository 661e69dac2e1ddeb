pub mod match_result;
pub mod roster;
pub mod team;

pub use match_result::{KnockoutRound, MatchOutcome, MatchResult, Side};
pub use roster::Roster;
pub use team::{Team, TeamId, TeamRating};
