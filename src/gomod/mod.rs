//! Go module dependency introspection
//!
//! Reads module manifests, selects the dependencies worth resolving, and
//! floats them to release refs or checks that they are ready for a release.

pub mod check;
pub mod float;
pub mod manifest;
pub mod modules;
pub mod release_meta;
pub mod resolver;
pub mod selector;

pub use manifest::{GoMod, GoWork, Require};
pub use modules::{module, module_matching, modules, modules_matching, ModuleGraph};
pub use release_meta::ReleaseMeta;
pub use resolver::Resolver;
pub use selector::{domain_matcher, CurrentModules, Matcher, Selector};
