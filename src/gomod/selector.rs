use tracing::debug;

use crate::error::{BuoyError, Result};
use crate::gowork::{Module, Workspace};

/// Predicate over module names.
pub trait Matcher {
    fn matches(&self, module: &str) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, module: &str) -> bool {
        self(module)
    }
}

/// Matches modules whose name starts with `domain`.
///
/// A blank domain is rejected with [`BuoyError::NoDomain`].
pub fn domain_matcher(domain: &str) -> Result<impl Matcher> {
    let domain = domain.trim().to_string();
    if domain.is_empty() {
        return Err(BuoyError::NoDomain);
    }
    Ok(move |module: &str| module.starts_with(&domain))
}

/// Matches the modules that belong to the current project.
#[derive(Debug, Clone, Default)]
pub struct CurrentModules {
    mods: Vec<Module>,
}

impl CurrentModules {
    pub fn new(mods: Vec<Module>) -> Self {
        CurrentModules { mods }
    }

    /// Discover the project's modules from `workspace`.
    pub fn discover(workspace: &Workspace) -> Result<Self> {
        let mods = workspace.current_project_modules()?;
        debug!(
            modules = ?mods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            "current project modules"
        );
        Ok(Self::new(mods))
    }
}

impl Matcher for CurrentModules {
    fn matches(&self, module: &str) -> bool {
        self.mods.iter().any(|m| m.name == module)
    }
}

/// Include/exclude rules for choosing which dependencies to resolve.
///
/// A module is selected when some include matches and no exclude does;
/// exclusion always wins.
#[derive(Default)]
pub struct Selector {
    pub includes: Vec<Box<dyn Matcher>>,
    pub excludes: Vec<Box<dyn Matcher>>,
}

impl Selector {
    /// Selector that accepts every module.
    pub fn permissive() -> Self {
        Selector {
            includes: vec![Box::new(|_: &str| true)],
            excludes: Vec::new(),
        }
    }

    pub fn include(mut self, matcher: impl Matcher + 'static) -> Self {
        self.includes.push(Box::new(matcher));
        self
    }

    pub fn exclude(mut self, matcher: impl Matcher + 'static) -> Self {
        self.excludes.push(Box::new(matcher));
        self
    }

    /// Modules under `domain`, minus the current project's own modules.
    pub fn default_for(domain: &str, workspace: &Workspace) -> Result<Self> {
        let include = domain_matcher(domain)?;
        let exclude = CurrentModules::discover(workspace)?;
        Ok(Selector::default().include(include).exclude(exclude))
    }

    /// Whether `module` is in scope.
    pub fn select(&self, module: &str) -> bool {
        if self.excludes.iter().any(|m| m.matches(module)) {
            return false;
        }
        self.includes.iter().any(|m| m.matches(module))
    }
}

impl Matcher for Selector {
    fn matches(&self, module: &str) -> bool {
        self.select(module)
    }
}
