//! Domain logic - pure value types independent of git or network access

pub mod reference;
pub mod ruleset;
pub mod version;

pub use reference::{parse_ref, RefType};
pub use ruleset::RulesetType;
pub use version::{parse_tolerant, release_branch_version, release_version};
