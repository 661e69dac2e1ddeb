use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid bracket size: {found} teams")]
    InvalidBracketSize { found: usize },

    #[error("Invalid field size: {teams} teams cannot fill {groups} groups of {group_size}")]
    FieldSize { teams: usize, groups: usize, group_size: usize },

    #[error("Too many groups: {groups} (labels run A-Z)")]
    TooManyGroups { groups: usize },

    #[error("Bracket slot unfilled: group {group} position {position}")]
    MissingBracketSlot { group: char, position: u8 },

    #[error("Knockout match ended level: {home} vs {away}")]
    UndecidedKnockout { home: String, away: String },

    #[error("Duplicate team name: {0}")]
    DuplicateTeam(String),

    #[error("Empty field")]
    EmptyField,

    #[error("Stage not simulated yet: {0}")]
    NotSimulated(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl SimError {
    /// Whether a caller can retry with different input (as opposed to a broken
    /// tournament state).
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::Io(_) => true,
            SimError::Config(_) => true,
            SimError::InvalidConfig(_) => true,
            SimError::NotSimulated(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
