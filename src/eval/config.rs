use crate::{audio::sampler::AudioConfig, foundation::error::VibeResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Engine construction settings.
pub struct EngineConfig {
    /// Fixed seed for shake/flicker randomness. `None` draws from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Audio analysis settings.
    #[serde(default)]
    pub audio: AudioConfig,
}

impl EngineConfig {
    /// Config with a fixed seed and default audio settings.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> VibeResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate nested settings.
    pub fn validate(&self) -> VibeResult<()> {
        self.audio.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/config.rs"]
mod tests;
