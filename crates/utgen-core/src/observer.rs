// ABOUTME: Injectable observer for the diagnostic trace emitted while a prompt is generated
// ABOUTME: Default implementation forwards to tracing; tests can record events instead of capturing stderr

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Which candidate list a probe event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Implementation,
    Types,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Implementation => "implementation",
            FileKind::Types => "types",
        }
    }
}

/// Events emitted by the pipeline stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    ProbeStarted {
        component: String,
        directory: PathBuf,
    },
    CandidateMissing {
        kind: FileKind,
        path: PathBuf,
    },
    CandidateResolved {
        kind: FileKind,
        path: PathBuf,
    },
    NoCandidateFound {
        kind: FileKind,
    },
    DependenciesExtracted {
        names: Vec<String>,
    },
    DependencyTypeRead {
        component: String,
        path: PathBuf,
    },
    DependencyTypeSkipped {
        component: String,
        path: PathBuf,
        reason: String,
    },
}

pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Forwards every event to `tracing`; every attempted candidate path is logged at `info`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::ProbeStarted {
                component,
                directory,
            } => {
                tracing::info!(component = %component, directory = %directory.display(), "Probing component files");
            }
            PipelineEvent::CandidateMissing { kind, path } => {
                tracing::info!(kind = kind.as_str(), path = %path.display(), "Candidate not present");
            }
            PipelineEvent::CandidateResolved { kind, path } => {
                tracing::info!(kind = kind.as_str(), path = %path.display(), "Read component file");
            }
            PipelineEvent::NoCandidateFound { kind } => {
                tracing::warn!(kind = kind.as_str(), "No candidate file found");
            }
            PipelineEvent::DependenciesExtracted { names } => {
                tracing::info!("Detected component dependencies: [{}]", names.join(", "));
            }
            PipelineEvent::DependencyTypeRead { component, path } => {
                tracing::info!(dependency = %component, path = %path.display(), "Read dependency type file");
            }
            PipelineEvent::DependencyTypeSkipped {
                component,
                path,
                reason,
            } => {
                tracing::debug!(dependency = %component, path = %path.display(), "Skipping dependency type file: {}", reason);
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn attempted_candidates_are_visible_at_info() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingObserver.on_event(&PipelineEvent::CandidateMissing {
                kind: FileKind::Implementation,
                path: PathBuf::from("/app/src/components/Button/index.tsx"),
            });
        });

        let text = logs.text();
        assert!(text.contains("Candidate not present"), "{text}");
        assert!(text.contains("/app/src/components/Button/index.tsx"));
    }

    #[test]
    fn recording_observer_keeps_order_across_clones() {
        let observer = RecordingObserver::new();
        let handle = observer.clone();

        observer.on_event(&PipelineEvent::NoCandidateFound {
            kind: FileKind::Types,
        });
        handle.on_event(&PipelineEvent::DependenciesExtracted {
            names: vec!["Icon".to_string()],
        });

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            PipelineEvent::NoCandidateFound {
                kind: FileKind::Types
            }
        );
    }
}
