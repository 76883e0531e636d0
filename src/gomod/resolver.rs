use tracing::debug;

use crate::error::Result;
use crate::git::{RemoteLister, Repo};
use crate::golang::ImportResolver;

/// Resolves dependency modules to their remote repositories.
///
/// Holds the two external capabilities resolution needs: mapping a module
/// path to a git URL, and listing that URL's references. Construct one per
/// process and pass it by reference; each call lists the remote afresh, and
/// nothing is cached between dependencies.
pub struct Resolver {
    imports: Box<dyn ImportResolver>,
    lister: Box<dyn RemoteLister>,
}

impl Resolver {
    pub fn new(
        imports: impl ImportResolver + 'static,
        lister: impl RemoteLister + 'static,
    ) -> Self {
        Resolver {
            imports: Box::new(imports),
            lister: Box::new(lister),
        }
    }

    /// Fetch the remote state of `module`'s repository.
    pub fn repo_for(&self, module: &str) -> Result<Repo> {
        let url = self.imports.repo_url(module)?;
        debug!(module, %url, "resolving module repository");
        Repo::fetch(module, &url, self.lister.as_ref())
    }
}
