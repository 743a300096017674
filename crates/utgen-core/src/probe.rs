// ABOUTME: Locates a component's implementation and type files from ordered candidate filenames
// ABOUTME: First existing candidate wins per category; absence is state, only unexpected I/O is an error

use crate::error::{Result, UtgenError};
use crate::observer::{FileKind, PipelineEvent, PipelineObserver};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rendered in place of the implementation source when no candidate exists
pub const NO_INDEX_FILE_PLACEHOLDER: &str = "// No index file found";
/// Rendered in place of the type source when no candidate exists
pub const NO_TYPES_FILE_PLACEHOLDER: &str = "// No types file found";

/// A filename builder for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Same filename for every component, e.g. `index.tsx`
    Fixed(&'static str),
    /// Component name followed by a suffix, e.g. `Button.types.ts`
    Named(&'static str),
}

impl Candidate {
    pub fn file_name(&self, component_name: &str) -> String {
        match self {
            Candidate::Fixed(name) => (*name).to_string(),
            Candidate::Named(suffix) => format!("{}{}", component_name, suffix),
        }
    }
}

/// Type definition candidates, in precedence order
pub const TYPE_CANDIDATES: &[Candidate] = &[
    Candidate::Fixed("type.ts"),
    Candidate::Fixed("types.ts"),
    Candidate::Named(".types.ts"),
    Candidate::Fixed("interface.ts"),
];

/// Implementation candidates, in precedence order
pub const IMPLEMENTATION_CANDIDATES: &[Candidate] = &[
    Candidate::Fixed("index.tsx"),
    Candidate::Named(".tsx"),
    Candidate::Named(".jsx"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFile {
    Found { path: PathBuf, content: String },
    NotFound,
}

impl SourceFile {
    pub fn is_found(&self) -> bool {
        matches!(self, SourceFile::Found { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            SourceFile::Found { content, .. } => Some(content),
            SourceFile::NotFound => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceFile::Found { path, .. } => Some(path),
            SourceFile::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFiles {
    pub implementation: SourceFile,
    pub types: SourceFile,
}

impl ComponentFiles {
    /// True when either category resolved
    pub fn found(&self) -> bool {
        self.implementation.is_found() || self.types.is_found()
    }

    pub fn implementation_source(&self) -> &str {
        self.implementation
            .content()
            .unwrap_or(NO_INDEX_FILE_PLACEHOLDER)
    }

    pub fn type_source(&self) -> &str {
        self.types.content().unwrap_or(NO_TYPES_FILE_PLACEHOLDER)
    }
}

#[derive(Clone)]
pub struct FileProbe {
    observer: Arc<dyn PipelineObserver>,
}

impl FileProbe {
    pub fn new(observer: Arc<dyn PipelineObserver>) -> Self {
        Self { observer }
    }

    pub async fn locate(&self, component_name: &str, component_dir: &Path) -> Result<ComponentFiles> {
        self.observer.on_event(&PipelineEvent::ProbeStarted {
            component: component_name.to_string(),
            directory: component_dir.to_path_buf(),
        });

        let types = self
            .first_existing(FileKind::Types, TYPE_CANDIDATES, component_name, component_dir)
            .await?;
        let implementation = self
            .first_existing(
                FileKind::Implementation,
                IMPLEMENTATION_CANDIDATES,
                component_name,
                component_dir,
            )
            .await?;

        Ok(ComponentFiles {
            implementation,
            types,
        })
    }

    async fn first_existing(
        &self,
        kind: FileKind,
        candidates: &[Candidate],
        component_name: &str,
        component_dir: &Path,
    ) -> Result<SourceFile> {
        for candidate in candidates {
            let path = component_dir.join(candidate.file_name(component_name));

            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {
                    let content = tokio::fs::read_to_string(&path)
                        .await
                        .map_err(|e| UtgenError::io(&path, e))?;
                    self.observer.on_event(&PipelineEvent::CandidateResolved {
                        kind,
                        path: path.clone(),
                    });
                    return Ok(SourceFile::Found { path, content });
                }
                // A directory that happens to carry a candidate name
                Ok(_) => {}
                Err(e) if is_absent(&e) => {}
                Err(e) => return Err(UtgenError::io(&path, e)),
            }

            self.observer
                .on_event(&PipelineEvent::CandidateMissing { kind, path });
        }

        self.observer
            .on_event(&PipelineEvent::NoCandidateFound { kind });
        Ok(SourceFile::NotFound)
    }
}

fn is_absent(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}
