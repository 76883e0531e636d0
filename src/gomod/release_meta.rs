use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::domain::{
    parse_ref, parse_tolerant, release_branch_version, release_version, RefType, RulesetType,
};
use crate::error::Result;
use crate::gomod::modules::module_matching;
use crate::gomod::resolver::Resolver;
use crate::ui;

/// Release state of a module: whether its release branch exists and which
/// release tag to cut next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMeta {
    pub module: String,
    pub release_branch_exists: bool,
    pub release_branch: String,
    pub release: String,
}

impl Resolver {
    /// Release branch and next release tag of the module declared by `gomod`.
    ///
    /// The next release is the patch after the newest tag on the module
    /// release line, or the module release itself when that line has no tags
    /// yet (`0.20` gives `v0.20.0`, `v0.20.3` gives `v0.20.3`). A summary is
    /// written to `out`.
    pub fn release_status(
        &self,
        gomod: &Path,
        release: &str,
        module_release: Option<&str>,
        out: &mut dyn Write,
    ) -> Result<ReleaseMeta> {
        let r = parse_tolerant(release)?;
        let mr = match module_release {
            Some(m) if !m.trim().is_empty() => parse_tolerant(m)?,
            _ => r.clone(),
        };

        let (module, _) = module_matching(gomod, &|_: &str| false)?;
        writeln!(out, "{}", module)?;

        let repo = self.repo_for(&module)?;

        let (branch_ref, branch_type) =
            repo.best_ref_for_release(&r, &mr, RulesetType::ReleaseBranchRule);
        let (release_branch, release_branch_exists) = if branch_type == RefType::ReleaseBranchRef
        {
            (parse_ref(&branch_ref).1.to_string(), true)
        } else {
            (release_branch_version(&r), false)
        };
        writeln!(out, "{}", ui::check_mark(release_branch_exists, &release_branch))?;

        let (tag_ref, tag_type) = repo.best_ref_for_release(&r, &mr, RulesetType::ReleaseRule);
        let next = match tag_type {
            RefType::ReleaseRef => {
                let mut latest = parse_tolerant(parse_ref(&tag_ref).1)?;
                latest.patch += 1;
                release_version(&latest)
            }
            _ => release_version(&mr),
        };
        writeln!(out, "{}", ui::next_mark(&next))?;

        debug!(%module, %release_branch, release_branch_exists, release = %next, "release status");
        Ok(ReleaseMeta {
            module,
            release_branch_exists,
            release_branch,
            release: next,
        })
    }
}
