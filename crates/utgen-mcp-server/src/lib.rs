// ABOUTME: MCP server exposing the component prompt pipeline as tools
// ABOUTME: Every tool answers with text; pipeline failures never use the protocol error channel

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utgen_core::{list_components, PromptPipeline, UtgenConfig};

pub const SERVER_NAME: &str = "unit-test-generator";

const INSTRUCTIONS: &str = "Generates prompts for writing component unit tests. \
Call generate-test-prompt with a componentName (directory name under src/components of the \
project named by PROJECT_PATH) to receive the component source, its type definitions and the \
type definitions of the components it imports, together with the testing requirements. \
Use list-components to discover component names.";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestPromptRequest {
    /// Component directory name, e.g. "Button"
    pub component_name: String,
    /// Explicit component directory, used instead of <project>/src/components/<componentName>
    #[serde(default)]
    pub component_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListComponentsRequest {
    /// Directory to list (default: the project's src/components)
    #[serde(default)]
    pub components_dir: Option<String>,
}

#[derive(Debug, Serialize)]
struct ComponentListing {
    components: Vec<String>,
}

#[derive(Clone)]
pub struct TestPromptServer {
    pipeline: PromptPipeline,
    /// Tool router for handling tool calls
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TestPromptServer {
    pub fn new(config: &UtgenConfig) -> Self {
        Self::with_pipeline(PromptPipeline::with_tracing(config.resolver()))
    }

    pub fn with_pipeline(pipeline: PromptPipeline) -> Self {
        Self {
            pipeline,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "generate-test-prompt",
        description = "Build a unit-test generation prompt for a component. Returns: the component implementation, its type definitions, type definitions of directly imported @/components dependencies, and the testing requirements. Required: componentName. Optional: componentPath."
    )]
    async fn generate_test_prompt(
        &self,
        params: Parameters<GenerateTestPromptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        let text = self.render_test_prompt(&request).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "list-components",
        description = "List component directory names. Returns: JSON object {\"components\": [...]}. Optional: componentsDir (defaults to the project's src/components)."
    )]
    async fn list_components(
        &self,
        params: Parameters<ListComponentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        let text = self.render_component_list(&request).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl TestPromptServer {
    pub async fn render_test_prompt(&self, request: &GenerateTestPromptRequest) -> String {
        tracing::info!(
            component = %request.component_name,
            component_path = ?request.component_path,
            "generate-test-prompt"
        );
        self.pipeline
            .generate_text(
                &request.component_name,
                request.component_path.as_deref().map(Path::new),
            )
            .await
    }

    pub async fn render_component_list(&self, request: &ListComponentsRequest) -> String {
        let dir = request
            .components_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.pipeline.resolver().resolve());

        match list_components(&dir).await {
            Ok(components) => serde_json::to_string_pretty(&ComponentListing { components })
                .unwrap_or_else(|e| format!("Error listing components: {}", e)),
            Err(e) => {
                tracing::warn!("Failed to list components in {}: {}", dir.display(), e);
                format!("Error listing components: {}", e)
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for TestPromptServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn server_for(root: &Path) -> TestPromptServer {
        TestPromptServer::new(&UtgenConfig {
            project_root: Some(root.to_path_buf()),
            ..Default::default()
        })
    }

    #[test]
    fn advertises_both_tools() {
        let server = server_for(Path::new("/nonexistent"));
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["generate-test-prompt", "list-components"]);
    }

    #[test]
    fn server_info_enables_tools() {
        let info = server_for(Path::new("/nonexistent")).get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.instructions.unwrap().contains("generate-test-prompt"));
    }

    #[tokio::test]
    async fn missing_component_is_reported_as_text() {
        let project = tempfile::tempdir().expect("tempdir");
        let server = server_for(project.path());

        let text = server
            .render_test_prompt(&GenerateTestPromptRequest {
                component_name: "Nope".to_string(),
                component_path: None,
            })
            .await;
        assert!(text.starts_with("Files not found for component 'Nope'"));
    }

    #[tokio::test]
    async fn component_path_overrides_project_layout() {
        let project = tempfile::tempdir().expect("tempdir");
        let custom = tempfile::tempdir().expect("tempdir");
        fs::write(custom.path().join("Card.tsx"), "export const Card = () => null;").unwrap();

        let text = server_for(project.path())
            .render_test_prompt(&GenerateTestPromptRequest {
                component_name: "Card".to_string(),
                component_path: Some(custom.path().to_string_lossy().into_owned()),
            })
            .await;
        assert!(text.contains("export const Card = () => null;"));
    }

    #[tokio::test]
    async fn lists_default_components_dir_as_json() {
        let project = tempfile::tempdir().expect("tempdir");
        let components = project.path().join("src/components");
        fs::create_dir_all(components.join("Input")).unwrap();
        fs::create_dir_all(components.join("Alert")).unwrap();

        let text = server_for(project.path())
            .render_component_list(&ListComponentsRequest::default())
            .await;
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["components"], serde_json::json!(["Alert", "Input"]));
    }

    #[tokio::test]
    async fn listing_failure_is_text() {
        let project = tempfile::tempdir().expect("tempdir");
        let missing: PathBuf = project.path().join("missing");

        let text = server_for(project.path())
            .render_component_list(&ListComponentsRequest {
                components_dir: Some(missing.to_string_lossy().into_owned()),
            })
            .await;
        assert!(text.starts_with("Error listing components:"));
    }
}
