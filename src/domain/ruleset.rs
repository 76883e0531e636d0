use std::fmt;
use std::str::FromStr;

use crate::error::BuoyError;

/// Policy restricting which kinds of git references may answer a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RulesetType {
    /// Release tag, release branch, or default branch
    #[default]
    AnyRule,
    /// Only release tag or release branch
    ReleaseOrReleaseBranchRule,
    /// Only release tag
    ReleaseRule,
    /// Only release branch
    ReleaseBranchRule,
    /// Unable to parse
    InvalidRule,
}

impl RulesetType {
    const VALID: [RulesetType; 4] = [
        RulesetType::AnyRule,
        RulesetType::ReleaseOrReleaseBranchRule,
        RulesetType::ReleaseRule,
        RulesetType::ReleaseBranchRule,
    ];

    /// Display name of the ruleset, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            RulesetType::AnyRule => "Any",
            RulesetType::ReleaseOrReleaseBranchRule => "ReleaseOrBranch",
            RulesetType::ReleaseRule => "Release",
            RulesetType::ReleaseBranchRule => "Branch",
            RulesetType::InvalidRule => "Invalid",
        }
    }

    /// Case-insensitive lookup by display name. Unknown names map to
    /// [`RulesetType::InvalidRule`].
    pub fn parse(rule: &str) -> Self {
        let rule = rule.trim();
        Self::VALID
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(rule))
            .unwrap_or(RulesetType::InvalidRule)
    }

    /// Names of all selectable rulesets, in priority order.
    pub fn names() -> Vec<&'static str> {
        Self::VALID.iter().map(|r| r.name()).collect()
    }

    /// Release tags are eligible.
    pub fn allows_release(&self) -> bool {
        matches!(
            self,
            RulesetType::AnyRule
                | RulesetType::ReleaseOrReleaseBranchRule
                | RulesetType::ReleaseRule
        )
    }

    /// Release branches are eligible.
    pub fn allows_release_branch(&self) -> bool {
        matches!(
            self,
            RulesetType::AnyRule
                | RulesetType::ReleaseOrReleaseBranchRule
                | RulesetType::ReleaseBranchRule
        )
    }

    /// The default branch is eligible as a last resort.
    pub fn allows_default_branch(&self) -> bool {
        matches!(self, RulesetType::AnyRule)
    }
}

impl fmt::Display for RulesetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RulesetType {
    type Err = BuoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match RulesetType::parse(s) {
            RulesetType::InvalidRule => Err(BuoyError::InvalidRuleset),
            rule => Ok(rule),
        }
    }
}
