use std::io::Write;
use std::path::Path;

use semver::Version;
use tracing::debug;

use crate::domain::{parse_tolerant, RefType, RulesetType};
use crate::error::{BuoyError, DependencyError, Result};
use crate::gomod::modules::modules;
use crate::gomod::resolver::Resolver;
use crate::ui;

impl Resolver {
    /// Check that every dependency of `gomod` under `domain` has a ref for
    /// `release` under `ruleset`.
    ///
    /// All dependencies are evaluated before failing; the returned
    /// [`BuoyError::Dependency`] names each one that is not ready. The module
    /// and a ✔/✘ line per dependency are written to `out`; pass
    /// [`std::io::sink`] to stay quiet.
    pub fn check(
        &self,
        gomod: &Path,
        release: &str,
        domain: &str,
        ruleset: RulesetType,
        out: &mut dyn Write,
    ) -> Result<()> {
        if ruleset == RulesetType::InvalidRule {
            return Err(BuoyError::InvalidRuleset);
        }

        let graph = modules(&[gomod], domain)?;
        let this = parse_tolerant(release)?;

        for (module, packages) in &graph.packages {
            self.check_module(module, packages, &this, ruleset, out)?;
        }
        Ok(())
    }

    fn check_module(
        &self,
        module: &str,
        packages: &[String],
        this: &Version,
        ruleset: RulesetType,
        out: &mut dyn Write,
    ) -> Result<()> {
        writeln!(out, "{}", module)?;

        let mut not_ready = Vec::new();
        for pkg in packages {
            let repo = self.repo_for(pkg)?;
            let (r, ref_type) = repo.best_ref_for(this, ruleset);
            let ready = ref_type != RefType::NoRef;
            debug!(module, dependency = %pkg, reference = %r, ready, "checked dependency");
            writeln!(out, "{}", ui::check_mark(ready, &r))?;
            if !ready {
                not_ready.push(r);
            }
        }

        if !not_ready.is_empty() {
            return Err(DependencyError {
                module: module.to_string(),
                dependencies: not_ready,
            }
            .into());
        }
        Ok(())
    }
}
