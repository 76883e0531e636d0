use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::error::{BuoyError, Result};
use crate::gomod::manifest::GoMod;
use crate::gomod::selector::{domain_matcher, Matcher};

/// Modules parsed from one or more manifests, with their in-scope
/// dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleGraph {
    /// Each parsed module mapped to its in-scope dependencies, in manifest order
    pub packages: BTreeMap<String, Vec<String>>,
    /// Every dependency seen across all manifests, deduplicated in first-seen order
    pub dependencies: Vec<String>,
}

/// Name of the module declared in `gomod` and its requirements with the
/// `domain` prefix.
pub fn module(gomod: &Path, domain: &str) -> Result<(String, Vec<String>)> {
    let matcher = domain_matcher(domain)?;
    module_matching(gomod, &matcher)
}

/// Like [`module`], keeping the requirements accepted by `matcher`.
pub fn module_matching(gomod: &Path, matcher: &dyn Matcher) -> Result<(String, Vec<String>)> {
    let file = GoMod::read(gomod)?;
    let packages: Vec<String> = file
        .requires
        .into_iter()
        .map(|r| r.path)
        .filter(|p| matcher.matches(p))
        .collect();
    debug!(
        manifest = %gomod.display(),
        module = %file.module,
        dependencies = packages.len(),
        "parsed manifest"
    );
    Ok((file.module, packages))
}

/// Parse every manifest, keeping requirements with the `domain` prefix.
///
/// Any unreadable or malformed manifest fails the whole call.
pub fn modules<P: AsRef<Path>>(gomods: &[P], domain: &str) -> Result<ModuleGraph> {
    let matcher = domain_matcher(domain)?;
    modules_matching(gomods, &matcher)
}

/// Like [`modules`], keeping the requirements accepted by `matcher`.
pub fn modules_matching<P: AsRef<Path>>(
    gomods: &[P],
    matcher: &dyn Matcher,
) -> Result<ModuleGraph> {
    if gomods.is_empty() {
        return Err(BuoyError::manifest("no go module files provided"));
    }

    let mut graph = ModuleGraph::default();
    let mut seen = HashSet::new();
    for gomod in gomods {
        let (name, packages) = module_matching(gomod.as_ref(), matcher)?;
        for pkg in &packages {
            if seen.insert(pkg.clone()) {
                graph.dependencies.push(pkg.clone());
            }
        }
        graph.packages.insert(name, packages);
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXAMPLE1: &str = r#"module knative.dev/test-demo1

go 1.14

require (
	github.com/google/go-cmp v0.4.0
	k8s.io/api v0.17.4
	k8s.io/apimachinery v0.17.4
	k8s.io/client-go v11.0.1-0.20190805182717-6502b5e7b1b5+incompatible
	knative.dev/eventing v0.15.0
	knative.dev/pkg v0.0.0-20200603222317-b79e4a24ca50
	knative.dev/serving v0.15.0
	knative.dev/test-infra v0.0.0-20200603231617-e6b4d0e9d6e4
)
"#;

    const EXAMPLE2: &str = r#"module knative.dev/test-demo2

go 1.14

require (
	knative.dev/discovery v0.15.0
	knative.dev/pkg v0.0.0-20200603222317-b79e4a24ca50
	knative.dev/test-infra v0.0.0-20200603231617-e6b4d0e9d6e4
)
"#;

    fn fixtures() -> TempDir {
        let td = tempfile::tempdir().unwrap();
        fs::write(td.path().join("gomod.example1"), EXAMPLE1).unwrap();
        fs::write(td.path().join("gomod.example2"), EXAMPLE2).unwrap();
        fs::write(td.path().join("bad.example"), "this is not a go.mod\n").unwrap();
        td
    }

    #[test]
    fn test_module_by_domain() {
        let td = fixtures();
        let path = td.path().join("gomod.example1");

        let (name, deps) = module(&path, "knative.dev").unwrap();
        assert_eq!(name, "knative.dev/test-demo1");
        assert_eq!(
            deps,
            vec![
                "knative.dev/eventing",
                "knative.dev/pkg",
                "knative.dev/serving",
                "knative.dev/test-infra"
            ]
        );

        let (_, deps) = module(&path, "      knative.dev   ").unwrap();
        assert_eq!(deps.len(), 4);

        let (_, deps) = module(&path, "k8s.io").unwrap();
        assert_eq!(deps, vec!["k8s.io/api", "k8s.io/apimachinery", "k8s.io/client-go"]);

        let (_, deps) = module(&path, "example.com").unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_module_errors() {
        let td = fixtures();
        assert!(module(&td.path().join("bad.example"), "knative.dev").is_err());
        assert!(module(&td.path().join("does-not-exist"), "knative.dev").is_err());
        assert!(matches!(
            module(&td.path().join("gomod.example1"), "  "),
            Err(BuoyError::NoDomain)
        ));
    }

    #[test]
    fn test_modules_dedups_in_first_seen_order() {
        let td = fixtures();
        let paths = [td.path().join("gomod.example1"), td.path().join("gomod.example2")];

        let graph = modules(&paths, "knative.dev").unwrap();
        assert_eq!(graph.packages.len(), 2);
        assert_eq!(
            graph.packages["knative.dev/test-demo2"],
            vec!["knative.dev/discovery", "knative.dev/pkg", "knative.dev/test-infra"]
        );
        assert_eq!(
            graph.dependencies,
            vec![
                "knative.dev/eventing",
                "knative.dev/pkg",
                "knative.dev/serving",
                "knative.dev/test-infra",
                "knative.dev/discovery",
            ]
        );
    }

    #[test]
    fn test_modules_no_partial_results() {
        let td = fixtures();
        let paths = [td.path().join("gomod.example1"), td.path().join("bad.example")];
        assert!(modules(&paths, "knative.dev").is_err());
    }

    #[test]
    fn test_modules_requires_files() {
        let none: [&Path; 0] = [];
        assert!(modules(&none, "knative.dev").is_err());
    }
}
