// ABOUTME: Derives the on-disk components root from the project root
// ABOUTME: Falls back to a relative src/components when no project root is configured

use std::path::PathBuf;

/// Environment variable naming the project root
pub const PROJECT_PATH_ENV: &str = "PROJECT_PATH";

/// Components directory, relative to the project root
pub const COMPONENTS_SUBDIR: &str = "src/components";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentPathResolver {
    project_root: Option<PathBuf>,
}

impl ComponentPathResolver {
    pub fn new(project_root: Option<PathBuf>) -> Self {
        Self { project_root }
    }

    /// Components root; existence is not checked here
    pub fn resolve(&self) -> PathBuf {
        match &self.project_root {
            Some(root) => root.join(COMPONENTS_SUBDIR),
            None => PathBuf::from(COMPONENTS_SUBDIR),
        }
    }

    pub fn component_dir(&self, component_name: &str) -> PathBuf {
        self.resolve().join(component_name)
    }
}
