// ABOUTME: Extracts @/components imports from component source and fetches their type files
// ABOUTME: One level only; dependencies without a readable type.ts are silently omitted

use crate::observer::{PipelineEvent, PipelineObserver};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// The single type filename looked up for a dependency
pub const DEPENDENCY_TYPE_FILE: &str = "type.ts";

lazy_static! {
    // Relative imports (`../Button`) and deep imports (`@/components/Button/x`) are not matched
    static ref COMPONENTS_IMPORT: Regex =
        Regex::new(r#"from\s+['"]@/components/([^'"/]+)['"]"#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentComponentType {
    pub component_name: String,
    pub type_source: String,
}

/// Unique component names imported from `@/components/<name>`, in first-seen order
pub fn extract_dependencies(source: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();

    for cap in COMPONENTS_IMPORT.captures_iter(source) {
        let Some(name) = cap.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }

    names
}

#[derive(Clone)]
pub struct DependencyTypeFetcher {
    observer: Arc<dyn PipelineObserver>,
}

impl DependencyTypeFetcher {
    pub fn new(observer: Arc<dyn PipelineObserver>) -> Self {
        Self { observer }
    }

    /// Reads `<components_root>/<name>/type.ts` for each name, sequentially.
    /// Names are expected to be unique already.
    pub async fn fetch_types(
        &self,
        names: &[String],
        components_root: &Path,
    ) -> Vec<DependentComponentType> {
        let mut results = Vec::with_capacity(names.len());

        for name in names {
            let path = components_root.join(name).join(DEPENDENCY_TYPE_FILE);

            match tokio::fs::read_to_string(&path).await {
                Ok(type_source) => {
                    self.observer.on_event(&PipelineEvent::DependencyTypeRead {
                        component: name.clone(),
                        path,
                    });
                    results.push(DependentComponentType {
                        component_name: name.clone(),
                        type_source,
                    });
                }
                Err(e) => {
                    self.observer
                        .on_event(&PipelineEvent::DependencyTypeSkipped {
                            component: name.clone(),
                            path,
                            reason: e.to_string(),
                        });
                }
            }
        }

        results
    }
}
