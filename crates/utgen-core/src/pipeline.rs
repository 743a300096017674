// ABOUTME: Sequences path resolution, probing, dependency extraction, type fetch and prompt assembly
// ABOUTME: Every outcome, including unexpected I/O failures, can be rendered as plain text for the caller

use crate::dependencies::{extract_dependencies, DependencyTypeFetcher};
use crate::error::{Result, UtgenError};
use crate::observer::{PipelineEvent, PipelineObserver, TracingObserver};
use crate::paths::ComponentPathResolver;
use crate::probe::FileProbe;
use crate::prompt::assemble_prompt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Ready(String),
    NotFound {
        component: String,
        directory: PathBuf,
    },
}

impl PromptOutcome {
    pub fn into_text(self) -> String {
        match self {
            PromptOutcome::Ready(prompt) => prompt,
            PromptOutcome::NotFound {
                component,
                directory,
            } => format!(
                "Files not found for component '{}' in {}",
                component,
                directory.display()
            ),
        }
    }
}

#[derive(Clone)]
pub struct PromptPipeline {
    resolver: ComponentPathResolver,
    probe: FileProbe,
    fetcher: DependencyTypeFetcher,
    observer: Arc<dyn PipelineObserver>,
}

impl PromptPipeline {
    pub fn new(resolver: ComponentPathResolver, observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            resolver,
            probe: FileProbe::new(observer.clone()),
            fetcher: DependencyTypeFetcher::new(observer.clone()),
            observer,
        }
    }

    pub fn with_tracing(resolver: ComponentPathResolver) -> Self {
        Self::new(resolver, Arc::new(TracingObserver))
    }

    pub fn resolver(&self) -> &ComponentPathResolver {
        &self.resolver
    }

    /// Runs the whole pipeline for one component.
    ///
    /// `component_path` replaces the derived component directory; dependency
    /// types are always looked up under the resolved components root since
    /// `@/components` imports are project-relative.
    pub async fn generate(
        &self,
        component_name: &str,
        component_path: Option<&Path>,
    ) -> Result<PromptOutcome> {
        let components_root = self.resolver.resolve();
        let component_dir = component_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| components_root.join(component_name));

        let files = self.probe.locate(component_name, &component_dir).await?;
        if !files.found() {
            return Ok(PromptOutcome::NotFound {
                component: component_name.to_string(),
                directory: component_dir,
            });
        }

        let dependencies = files
            .implementation
            .content()
            .map(extract_dependencies)
            .unwrap_or_default();

        let dependent_types = if dependencies.is_empty() {
            Vec::new()
        } else {
            self.observer.on_event(&PipelineEvent::DependenciesExtracted {
                names: dependencies.clone(),
            });
            self.fetcher
                .fetch_types(&dependencies, &components_root)
                .await
        };

        Ok(PromptOutcome::Ready(assemble_prompt(
            component_name,
            files.implementation_source(),
            files.type_source(),
            &dependent_types,
        )))
    }

    /// Same as [`generate`](Self::generate) with failures folded into the text
    pub async fn generate_text(&self, component_name: &str, component_path: Option<&Path>) -> String {
        match self.generate(component_name, component_path).await {
            Ok(outcome) => outcome.into_text(),
            Err(e) => {
                tracing::error!("Reading component files failed: {}", e);
                format!("Error: Error reading component files: {}", e)
            }
        }
    }
}

/// Entry names of a components directory, sorted
pub async fn list_components(components_dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(components_dir)
        .await
        .map_err(|e| UtgenError::io(components_dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| UtgenError::io(components_dir, e))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use std::fs;

    fn pipeline(root: &Path) -> PromptPipeline {
        PromptPipeline::new(
            ComponentPathResolver::new(Some(root.to_path_buf())),
            Arc::new(NoopObserver),
        )
    }

    #[tokio::test]
    async fn missing_component_yields_not_found_outcome() {
        let project = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(project.path().join("src/components")).unwrap();

        let outcome = pipeline(project.path()).generate("Ghost", None).await.unwrap();
        assert_eq!(
            outcome,
            PromptOutcome::NotFound {
                component: "Ghost".to_string(),
                directory: project.path().join("src/components/Ghost"),
            }
        );
        assert!(outcome
            .into_text()
            .starts_with("Files not found for component 'Ghost'"));
    }

    #[tokio::test]
    async fn explicit_path_bypasses_resolver() {
        let project = tempfile::tempdir().expect("tempdir");
        let elsewhere = tempfile::tempdir().expect("tempdir");
        fs::write(elsewhere.path().join("index.tsx"), "explicit").unwrap();

        let text = pipeline(project.path())
            .generate_text("Widget", Some(elsewhere.path()))
            .await;
        assert!(text.contains("```tsx\nexplicit\n```"));
        assert!(text.contains("// No types file found"));
    }

    #[tokio::test]
    async fn types_only_component_skips_dependency_scan() {
        let project = tempfile::tempdir().expect("tempdir");
        let dir = project.path().join("src/components/Tokens");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type.ts"), "import x from \"@/components/Icon\";").unwrap();

        let text = pipeline(project.path()).generate_text("Tokens", None).await;
        assert!(text.contains("// No index file found"));
        assert!(!text.contains("Dependent Component Type Definitions"));
    }

    #[tokio::test]
    async fn io_failure_is_rendered_as_text() {
        let project = tempfile::tempdir().expect("tempdir");
        let dir = project.path().join("src/components/Broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type.ts"), [0xc3, 0x28]).unwrap();

        let text = pipeline(project.path()).generate_text("Broken", None).await;
        assert!(text.starts_with("Error: Error reading component files:"));
        assert!(text.contains("type.ts"));
    }

    #[tokio::test]
    async fn list_components_sorted() {
        let root = tempfile::tempdir().expect("tempdir");
        for name in ["Tabs", "Button", "Avatar"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }

        let names = list_components(root.path()).await.unwrap();
        assert_eq!(names, vec!["Avatar", "Button", "Tabs"]);
    }

    #[tokio::test]
    async fn list_components_missing_dir_is_error() {
        let root = tempfile::tempdir().expect("tempdir");
        assert!(list_components(&root.path().join("nope")).await.is_err());
    }
}
