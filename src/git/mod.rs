//! Remote git reference resolution
//!
//! This module turns the reference listing of a remote repository into a
//! [`Repo`] and answers "what is the best reference for release X under
//! ruleset R".
//!
//! # Overview
//!
//! Listing remotes goes through the [`RemoteLister`] trait so resolution can
//! be exercised without a network. The implementations are:
//!
//! - [remote::Git2Lister]: lists a live remote using the `git2` crate
//! - [mock::MockLister]: serves canned listings for tests
//!
//! # Usage
//!
//! ```rust
//! use buoy::domain::{RefType, RulesetType};
//! use buoy::git::{MockLister, Repo};
//! use semver::Version;
//!
//! let mut lister = MockLister::new();
//! lister
//!     .add_tag("https://example.com/pkg.git", "v0.15.0")
//!     .set_default_branch("https://example.com/pkg.git", "main");
//!
//! let repo = Repo::fetch("example.com/pkg", "https://example.com/pkg.git", &lister)?;
//! let (r, kind) = repo.best_ref_for(&Version::new(0, 15, 0), RulesetType::AnyRule);
//! assert_eq!(r, "example.com/pkg@v0.15.0");
//! assert_eq!(kind, RefType::ReleaseRef);
//! # Ok::<(), buoy::BuoyError>(())
//! ```

pub mod mock;
pub mod remote;

pub use mock::MockLister;
pub use remote::Git2Lister;

use semver::Version;
use tracing::debug;

use crate::domain::version::{branch_release, same_release_line, tag_release};
use crate::domain::{release_branch_version, release_version, RefType, RulesetType};
use crate::error::Result;

/// A named reference advertised by a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRef {
    /// `refs/tags/<name>`
    Tag(String),
    /// `refs/heads/<name>`
    Branch(String),
    /// The symbolic `HEAD`, pointing at the default branch
    Head { target: String },
}

/// Capability to list the references of a remote repository.
///
/// ## Error Handling
///
/// Implementations report unreachable remotes, authentication failures and
/// unknown URLs as errors. Nothing is retried.
pub trait RemoteLister {
    /// List every reference advertised by the remote at `url`.
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>>;
}

/// A simplified git remote: its tags, branches and default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repo {
    /// Identifier used when formatting results, e.g. `knative.dev/pkg`
    pub reference: String,
    pub default_branch: String,
    pub tags: Vec<String>,
    pub branches: Vec<String>,
}

impl Repo {
    /// List the remote at `url` and classify its references.
    pub fn fetch(reference: &str, url: &str, lister: &dyn RemoteLister) -> Result<Self> {
        let refs = lister.list(url)?;
        let repo = Self::from_refs(reference, refs);
        debug!(
            reference,
            url,
            tags = repo.tags.len(),
            branches = repo.branches.len(),
            default_branch = %repo.default_branch,
            "listed remote"
        );
        Ok(repo)
    }

    /// Build a repo from an already obtained listing.
    pub fn from_refs(reference: &str, refs: impl IntoIterator<Item = RemoteRef>) -> Self {
        let mut repo = Repo {
            reference: reference.to_string(),
            ..Repo::default()
        };
        for r in refs {
            match r {
                RemoteRef::Tag(name) => repo.tags.push(name),
                RemoteRef::Branch(name) => repo.branches.push(name),
                RemoteRef::Head { target } => repo.default_branch = target,
            }
        }
        repo
    }

    /// Best `module@ref` for the given release under `ruleset`.
    ///
    /// Equivalent to [`Repo::best_ref_for_release`] with the same version for
    /// both the release and the module release.
    pub fn best_ref_for(&self, target: &Version, ruleset: RulesetType) -> (String, RefType) {
        self.best_ref_for_release(target, target, ruleset)
    }

    /// Best `module@ref` when the release being cut and the release line of
    /// the modules differ.
    ///
    /// Candidates are tried in order, each gated by the ruleset:
    /// 1. the highest `vX.Y.Z` tag on `module_release`'s `X.Y` line
    /// 2. the `release-X.Y` branch for `release`
    /// 3. the default branch (only for [`RulesetType::AnyRule`])
    ///
    /// Falls back to `(reference, NoRef)` when nothing is eligible.
    pub fn best_ref_for_release(
        &self,
        release: &Version,
        module_release: &Version,
        ruleset: RulesetType,
    ) -> (String, RefType) {
        if ruleset.allows_release() {
            if let Some(v) = self.largest_tag(module_release) {
                return (
                    format!("{}@{}", self.reference, release_version(&v)),
                    RefType::ReleaseRef,
                );
            }
        }

        if ruleset.allows_release_branch() {
            if let Some(v) = self.largest_branch(release) {
                return (
                    format!("{}@{}", self.reference, release_branch_version(&v)),
                    RefType::ReleaseBranchRef,
                );
            }
        }

        if ruleset.allows_default_branch() {
            return (
                format!("{}@{}", self.reference, self.default_branch),
                RefType::DefaultBranchRef,
            );
        }

        (self.reference.clone(), RefType::NoRef)
    }

    fn largest_tag(&self, target: &Version) -> Option<Version> {
        self.tags
            .iter()
            .filter_map(|t| tag_release(t))
            .filter(|v| same_release_line(v, target))
            .max()
    }

    fn largest_branch(&self, target: &Version) -> Option<Version> {
        self.branches
            .iter()
            .filter_map(|b| branch_release(b))
            .filter(|v| same_release_line(v, target))
            .max()
    }
}
