/// Convenience result type used across vibescape.
pub type VibeResult<T> = Result<T, VibeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum VibeError {
    /// Invalid user-provided or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while validating or sampling animation tracks.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while evaluating a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A reparent operation would have introduced a cycle.
    #[error("cycle error: '{child}' cannot be parented under '{parent}'")]
    Cycle {
        /// Object that was being reparented.
        child: String,
        /// Requested parent (a descendant of `child`, or `child` itself).
        parent: String,
    },

    /// A referenced id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The object is locked against transform edits.
    #[error("locked: {0}")]
    Locked(String),

    /// A transition condition uses syntax outside the supported grammar.
    #[error("condition error at byte {offset}: {message}")]
    Condition {
        /// Byte offset into the condition string.
        offset: usize,
        /// Human readable description.
        message: String,
    },

    /// The audio input device or session could not be opened.
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VibeError {
    /// Build a [`VibeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VibeError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`VibeError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`VibeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`VibeError::Cycle`] value.
    pub fn cycle(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::Cycle {
            child: child.into(),
            parent: parent.into(),
        }
    }

    /// Build a [`VibeError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`VibeError::Locked`] value.
    pub fn locked(msg: impl Into<String>) -> Self {
        Self::Locked(msg.into())
    }

    /// Build a [`VibeError::Condition`] value.
    pub fn condition(offset: usize, message: impl Into<String>) -> Self {
        Self::Condition {
            offset,
            message: message.into(),
        }
    }

    /// Build a [`VibeError::AudioUnavailable`] value.
    pub fn audio_unavailable(msg: impl Into<String>) -> Self {
        Self::AudioUnavailable(msg.into())
    }
}

impl From<serde_json::Error> for VibeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
