use crate::model::types::KeyMode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("no atom with {mode} key {key} exists in the structure")]
    UnknownIdentifier { key: i32, mode: KeyMode },

    #[error("cannot determine an orientation: {reason}")]
    DirectionUnavailable { reason: String },

    #[error("invalid orientation plan: {details}")]
    InvalidPlan { details: String },
}

impl Error {
    pub fn unknown_identifier(key: i32, mode: KeyMode) -> Self {
        Self::UnknownIdentifier { key, mode }
    }

    pub fn direction_unavailable(reason: impl Into<String>) -> Self {
        Self::DirectionUnavailable {
            reason: reason.into(),
        }
    }

    pub fn invalid_plan(details: impl Into<String>) -> Self {
        Self::InvalidPlan {
            details: details.into(),
        }
    }
}
