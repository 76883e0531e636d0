//! Go module path to git repository resolution
//!
//! A Go module path such as `knative.dev/pkg` is not itself a git URL. The
//! hosting server advertises the repository root through a
//! `<meta name="go-import">` tag, which [`GoImportResolver`] reads.

pub mod goimport;
pub mod mock;

pub use goimport::{GoImportResolver, MetaImport};
pub use mock::MockImports;

use crate::error::Result;

/// Capability to map a module path onto the URL of its git repository.
pub trait ImportResolver {
    fn repo_url(&self, module: &str) -> Result<String>;
}
