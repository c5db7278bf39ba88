//! Rule selection shared by commands that start new games

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexreach_core::{BoardSize, LegalityPolicy, RuleSet};

#[derive(Args, Clone, Debug, Default)]
pub struct RulesArgs {
    /// Rule set JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub rules: Option<PathBuf>,

    /// Named rule set (classic, evolved)
    #[arg(long)]
    pub preset: Option<String>,

    /// Board side length (8 or 10)
    #[arg(long)]
    pub size: Option<u8>,

    /// Legality policy (strict, permissive)
    #[arg(long)]
    pub policy: Option<LegalityPolicy>,

    /// Allow moves that repeat an earlier position
    #[arg(long)]
    pub no_superko: bool,
}

impl RulesArgs {
    /// Base rule set from file or preset, then flag overrides
    pub fn resolve(&self) -> Result<RuleSet> {
        let mut rules = match (&self.rules, &self.preset) {
            (Some(path), _) => RuleSet::load(path)
                .with_context(|| format!("Failed to load rules: {}", path.display()))?,
            (None, Some(name)) => RuleSet::preset(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown preset: {} (expected classic or evolved)", name))?,
            (None, None) => RuleSet::default(),
        };

        if let Some(side) = self.size {
            rules.size = BoardSize::from_side(side)
                .ok_or_else(|| anyhow::anyhow!("Unsupported board size: {} (expected 8 or 10)", side))?;
        }
        if let Some(policy) = self.policy {
            rules.policy = policy;
        }
        if self.no_superko {
            rules.superko = false;
        }

        tracing::debug!(
            "Rules: {} ({}, {}, superko={})",
            rules.name,
            rules.size,
            rules.policy,
            rules.superko
        );

        Ok(rules)
    }
}
