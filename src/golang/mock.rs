use std::collections::HashMap;

use crate::error::{BuoyError, Result};
use crate::golang::ImportResolver;

/// Mock resolver with a fixed module to URL table
#[derive(Debug, Default, Clone)]
pub struct MockImports {
    urls: HashMap<String, String>,
}

impl MockImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `module` to `url`
    pub fn add(&mut self, module: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.urls.insert(module.into(), url.into());
        self
    }
}

impl ImportResolver for MockImports {
    fn repo_url(&self, module: &str) -> Result<String> {
        self.urls
            .get(module)
            .cloned()
            .ok_or_else(|| BuoyError::import(format!("unknown module '{}'", module)))
    }
}
