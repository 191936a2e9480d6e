use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Unsupported speech rate: {0} (expected normal, slow or fast)")]
pub struct UnsupportedSpeechRate(pub String);

/// How fast episodes are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechRate {
    #[default]
    Normal,
    Slow,
    Fast,
}

impl SpeechRate {
    /// Speed relative to the voice's natural rate
    pub fn factor(self) -> f32 {
        match self {
            SpeechRate::Normal => 1.0,
            SpeechRate::Slow => 0.9,
            SpeechRate::Fast => 1.1,
        }
    }

    /// SSML `prosody` rate, `None` when the voice is left alone
    pub fn prosody_rate(self) -> Option<&'static str> {
        match self {
            SpeechRate::Normal => None,
            SpeechRate::Slow => Some("90%"),
            SpeechRate::Fast => Some("110%"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeechRate::Normal => "normal",
            SpeechRate::Slow => "slow",
            SpeechRate::Fast => "fast",
        }
    }
}

impl fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeechRate {
    type Err = UnsupportedSpeechRate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(SpeechRate::Normal),
            "slow" => Ok(SpeechRate::Slow),
            "fast" => Ok(SpeechRate::Fast),
            _ => Err(UnsupportedSpeechRate(s.to_string())),
        }
    }
}
