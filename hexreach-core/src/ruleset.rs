//! RuleSet - variant selection for a game

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::BoardSize;
use crate::rules::LegalityPolicy;

/// Board layout and rule options for one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub size: BoardSize,
    #[serde(default)]
    pub policy: LegalityPolicy,
    /// Reject moves that recreate an earlier position
    #[serde(default = "default_superko")]
    pub superko: bool,
}

fn default_superko() -> bool {
    true
}

impl RuleSet {
    /// The first rules: 8x8, placements must already connect, no
    /// repetition check
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            size: BoardSize::Eight,
            policy: LegalityPolicy::Strict,
            superko: false,
        }
    }

    /// The current rules: 10x10, simulated legality, positional superko
    pub fn evolved() -> Self {
        Self {
            name: "evolved".to_string(),
            size: BoardSize::Ten,
            policy: LegalityPolicy::Permissive,
            superko: true,
        }
    }

    /// Named preset lookup
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "evolved" => Some(Self::evolved()),
            _ => None,
        }
    }

    /// Load from JSON file (a full rule set, or `{"preset": "<name>"}`)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule set: {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        if let Ok(rules) = serde_json::from_str::<RuleSet>(content) {
            return Ok(rules);
        }

        #[derive(Deserialize)]
        struct PresetRef {
            preset: String,
        }

        if let Ok(reference) = serde_json::from_str::<PresetRef>(content) {
            return Self::preset(&reference.preset)
                .ok_or_else(|| anyhow::anyhow!("Unknown rule set preset: {}", reference.preset));
        }

        // Fall back to the full format for the error message
        let rules: RuleSet = serde_json::from_str(content)?;
        Ok(rules)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write rule set: {}", path.display()))?;
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::evolved()
    }
}
