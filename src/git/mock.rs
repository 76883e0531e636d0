use std::collections::HashMap;

use crate::error::{BuoyError, Result};
use crate::git::{RemoteLister, RemoteRef};

/// Mock lister serving canned reference listings without network access
#[derive(Debug, Default, Clone)]
pub struct MockLister {
    remotes: HashMap<String, Vec<RemoteRef>>,
}

impl MockLister {
    /// Create a new mock with no known remotes
    pub fn new() -> Self {
        Self::default()
    }

    fn refs_mut(&mut self, url: &str) -> &mut Vec<RemoteRef> {
        self.remotes.entry(url.to_string()).or_default()
    }

    /// Register a remote with no references. Listing it succeeds.
    pub fn add_remote(&mut self, url: impl Into<String>) -> &mut Self {
        self.remotes.entry(url.into()).or_default();
        self
    }

    /// Add a tag to the remote at `url`
    pub fn add_tag(&mut self, url: &str, tag: impl Into<String>) -> &mut Self {
        self.refs_mut(url).push(RemoteRef::Tag(tag.into()));
        self
    }

    /// Add a branch to the remote at `url`
    pub fn add_branch(&mut self, url: &str, branch: impl Into<String>) -> &mut Self {
        self.refs_mut(url).push(RemoteRef::Branch(branch.into()));
        self
    }

    /// Point the remote's `HEAD` at `branch`, adding the branch itself too
    pub fn set_default_branch(&mut self, url: &str, branch: impl Into<String>) -> &mut Self {
        let branch = branch.into();
        let refs = self.refs_mut(url);
        refs.retain(|r| !matches!(r, RemoteRef::Head { .. }));
        refs.push(RemoteRef::Head {
            target: branch.clone(),
        });
        refs.push(RemoteRef::Branch(branch));
        self
    }
}

impl RemoteLister for MockLister {
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>> {
        self.remotes
            .get(url)
            .cloned()
            .ok_or_else(|| BuoyError::remote(format!("Cannot list remote '{}'", url)))
    }
}
