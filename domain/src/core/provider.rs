//! Provider value object representing one decision-making backend

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available decision providers (Value Object)
///
/// A provider is the backend behind one voter slot. The same provider may
/// occupy several slots in a panel; slot identity is the slot index, never
/// the provider id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider {
    ClaudeSonnet45,
    ClaudeHaiku45,
    Gpt52Codex,
    Gpt5Mini,
    Gemini3Pro,
    /// Any other backend, addressed by its raw identifier
    Custom(String),
}

impl Provider {
    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &str {
        match self {
            Provider::ClaudeSonnet45 => "claude-sonnet-4.5",
            Provider::ClaudeHaiku45 => "claude-haiku-4.5",
            Provider::Gpt52Codex => "gpt-5.2-codex",
            Provider::Gpt5Mini => "gpt-5-mini",
            Provider::Gemini3Pro => "gemini-3-pro-preview",
            Provider::Custom(s) => s,
        }
    }

    /// Default panel used when no providers are configured
    pub fn default_panel() -> Vec<Provider> {
        vec![
            Provider::Gpt52Codex,
            Provider::ClaudeSonnet45,
            Provider::Gemini3Pro,
        ]
    }

    /// Get a short display name, e.g. "claude-sonnet-4.5" -> "claude"
    pub fn short_name(&self) -> &str {
        let s = self.as_str();
        s.split(['-', '_']).next().unwrap_or(s)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "claude-sonnet-4.5" => Provider::ClaudeSonnet45,
            "claude-haiku-4.5" => Provider::ClaudeHaiku45,
            "gpt-5.2-codex" => Provider::Gpt52Codex,
            "gpt-5-mini" => Provider::Gpt5Mini,
            "gemini-3-pro-preview" => Provider::Gemini3Pro,
            other => Provider::Custom(other.to_string()),
        })
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().expect("provider parsing is infallible"))
    }
}

/// Identifier of the automated player a turn is driven for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
