use std::path::Path;

use tracing::{debug, info};

use crate::domain::{parse_tolerant, RefType, RulesetType};
use crate::error::{BuoyError, Result};
use crate::gomod::modules::modules_matching;
use crate::gomod::resolver::Resolver;
use crate::gomod::selector::Matcher;

impl Resolver {
    /// Resolve every selected dependency of `gomod` to its best ref for
    /// `release`.
    ///
    /// `module_release` names the release line the dependency modules are on
    /// when it differs from the release being cut; release tags are looked up
    /// on that line while release branches follow `release`. It defaults to
    /// `release`.
    ///
    /// Dependencies with no eligible ref under `ruleset` are left out rather
    /// than reported. Results keep the order of the manifest.
    pub fn float(
        &self,
        gomod: &Path,
        release: &str,
        module_release: Option<&str>,
        selector: &dyn Matcher,
        ruleset: RulesetType,
    ) -> Result<Vec<String>> {
        if ruleset == RulesetType::InvalidRule {
            return Err(BuoyError::InvalidRuleset);
        }

        let graph = modules_matching(&[gomod], selector)?;

        let this = parse_tolerant(release)?;
        let module_release = match module_release {
            Some(mr) if !mr.trim().is_empty() => parse_tolerant(mr)?,
            _ => this.clone(),
        };

        let mut refs = Vec::new();
        for pkg in &graph.dependencies {
            let repo = self.repo_for(pkg)?;
            let (r, ref_type) = repo.best_ref_for_release(&this, &module_release, ruleset);
            if ref_type == RefType::NoRef {
                debug!(module = %pkg, %ruleset, "no ref to float to");
                continue;
            }
            info!(module = %pkg, reference = %r, kind = %ref_type, "floating");
            refs.push(r);
        }
        Ok(refs)
    }
}
