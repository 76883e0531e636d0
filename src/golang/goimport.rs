use std::collections::HashMap;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::error::{BuoyError, Result};
use crate::golang::ImportResolver;

/// One `go-import` directive: `<prefix> <vcs> <repo-root>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaImport {
    pub prefix: String,
    pub vcs: String,
    pub repo_root: String,
}

/// Extract every `go-import` meta directive from an HTML page.
pub fn parse_meta_imports(html: &str) -> Result<Vec<MetaImport>> {
    let invalid = |e: regex::Error| BuoyError::import(format!("Invalid pattern: {}", e));
    let meta = Regex::new(r#"(?is)<meta\s+[^>]*>"#).map_err(invalid)?;
    let name = Regex::new(r#"(?i)name\s*=\s*["']go-import["']"#).map_err(invalid)?;
    let content = Regex::new(r#"(?i)content\s*=\s*["']([^"']*)["']"#).map_err(invalid)?;

    let imports = meta
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| name.is_match(tag))
        .filter_map(|tag| content.captures(tag))
        .filter_map(|caps| {
            let fields: Vec<&str> = caps[1].split_whitespace().collect();
            match fields.as_slice() {
                [prefix, vcs, root, ..] => Some(MetaImport {
                    prefix: prefix.to_string(),
                    vcs: vcs.to_string(),
                    repo_root: root.to_string(),
                }),
                _ => None,
            }
        })
        .collect();
    Ok(imports)
}

/// Pick the directive whose prefix is a path prefix of `module`.
pub fn select_meta_import<'a>(module: &str, imports: &'a [MetaImport]) -> Option<&'a MetaImport> {
    imports.iter().find(|m| {
        module == m.prefix
            || module
                .strip_prefix(m.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Resolves module paths the way `go get` does.
///
/// Lookup order:
/// 1. explicit overrides (from the `[repos]` config table)
/// 2. `github.com/ORG/REPO/...` paths, mapped without a request
/// 3. the `go-import` meta tag served at `https://<module>?go-get=1`
pub struct GoImportResolver {
    client: reqwest::blocking::Client,
    overrides: HashMap<String, String>,
}

impl GoImportResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("buoy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GoImportResolver {
            client,
            overrides: HashMap::new(),
        })
    }

    /// Use fixed repository URLs for some modules.
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    fn fetch_meta_imports(&self, module: &str) -> Result<Vec<MetaImport>> {
        let url = format!("https://{}?go-get=1", module);
        debug!(%url, "fetching go-import metadata");
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        parse_meta_imports(&body)
    }
}

impl ImportResolver for GoImportResolver {
    fn repo_url(&self, module: &str) -> Result<String> {
        if let Some(url) = self.overrides.get(module) {
            return Ok(url.clone());
        }

        if let Some(url) = github_repo_url(module) {
            return Ok(url);
        }

        let imports = self.fetch_meta_imports(module)?;
        let meta = select_meta_import(module, &imports).ok_or_else(|| {
            BuoyError::import(format!("missing <meta name=go-import> for '{}'", module))
        })?;
        if meta.vcs != "git" {
            return Err(BuoyError::import(format!(
                "'{}' is served by '{}', only git is supported",
                module, meta.vcs
            )));
        }
        debug!(module, repo_root = %meta.repo_root, "resolved module repository");
        Ok(meta.repo_root.clone())
    }
}

fn github_repo_url(module: &str) -> Option<String> {
    let rest = module.strip_prefix("github.com/")?;
    let mut parts = rest.split('/');
    let org = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    Some(format!("https://github.com/{}/{}.git", org, repo))
}
