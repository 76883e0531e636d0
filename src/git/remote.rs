use git2::{Cred, CredentialType, Direction, Remote, RemoteCallbacks};
use tracing::{debug, trace};

use crate::error::{BuoyError, Result};
use crate::git::{RemoteLister, RemoteRef};

const TAG_PREFIX: &str = "refs/tags/";
const BRANCH_PREFIX: &str = "refs/heads/";

/// Lists live remotes with `git2`, the equivalent of `git ls-remote`.
///
/// Nothing is cloned or written to disk: a detached remote is connected for
/// fetching and only its advertised references are read.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Lister;

impl Git2Lister {
    pub fn new() -> Self {
        Git2Lister
    }
}

impl RemoteLister for Git2Lister {
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>> {
        let mut remote = Remote::create_detached(url)?;

        debug!(url, "connecting to remote");
        let connection = remote
            .connect_auth(Direction::Fetch, Some(credential_callbacks()), None)
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    BuoyError::remote(format!("Network error listing '{}': {}", url, e))
                } else {
                    BuoyError::remote(format!("Cannot list remote '{}': {}", url, e))
                }
            })?;

        let refs = connection
            .list()?
            .iter()
            .filter_map(|head| classify(head.name(), head.symref_target()))
            .collect();

        Ok(refs)
    }
}

/// Map an advertised ref name onto a [`RemoteRef`]. Peeled tag entries and
/// refs outside of tags/heads (pull requests, notes, ...) are dropped.
fn classify(name: &str, symref_target: Option<&str>) -> Option<RemoteRef> {
    if name == "HEAD" {
        let target = symref_target?;
        let target = target.strip_prefix(BRANCH_PREFIX).unwrap_or(target);
        return Some(RemoteRef::Head {
            target: target.to_string(),
        });
    }
    if let Some(tag) = name.strip_prefix(TAG_PREFIX) {
        if tag.ends_with("^{}") {
            return None;
        }
        return Some(RemoteRef::Tag(tag.to_string()));
    }
    if let Some(branch) = name.strip_prefix(BRANCH_PREFIX) {
        return Some(RemoteRef::Branch(branch.to_string()));
    }
    trace!(name, "ignoring remote ref");
    None
}

/// Credentials for private remotes: SSH keys from `~/.ssh`, then the SSH
/// agent, then whatever default helper libgit2 finds.
fn credential_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_head() {
        assert_eq!(
            classify("HEAD", Some("refs/heads/main")),
            Some(RemoteRef::Head {
                target: "main".to_string()
            })
        );
        assert_eq!(classify("HEAD", None), None);
    }

    #[test]
    fn test_classify_tags_and_branches() {
        assert_eq!(
            classify("refs/tags/v0.15.1", None),
            Some(RemoteRef::Tag("v0.15.1".to_string()))
        );
        assert_eq!(classify("refs/tags/v0.15.1^{}", None), None);
        assert_eq!(
            classify("refs/heads/release-0.15", None),
            Some(RemoteRef::Branch("release-0.15".to_string()))
        );
    }

    #[test]
    fn test_classify_ignores_other_refs() {
        assert_eq!(classify("refs/pull/12/head", None), None);
        assert_eq!(classify("refs/notes/commits", None), None);
    }

    #[test]
    fn test_list_invalid_url_fails() {
        let lister = Git2Lister::new();
        assert!(lister.list("not a url at all").is_err());
    }
}
