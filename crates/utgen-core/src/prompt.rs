// ABOUTME: Renders the unit-test instruction prompt for a component
// ABOUTME: Embedded sources are backtick-escaped so the surrounding code fences stay intact

use crate::dependencies::DependentComponentType;

/// Where the generated test is expected to be written, relative to the component directory
pub const TEST_FILE_LOCATION: &str = "__test__/index.test.tsx";

const REQUIREMENTS: [&str; 10] = [
    "Use Jest and React Testing Library",
    "Include a basic rendering test with snapshot",
    "Test all component props and their effects",
    "Test component behavior including user interactions",
    "Test conditional rendering if applicable",
    "Test callbacks/handlers if applicable",
    "Cover edge cases and error states",
    "Use appropriate React Testing Library queries (prefer user-centric queries)",
    "Use userEvent for user interactions when applicable",
    "Structure with describe blocks for logical grouping",
];

/// Escapes every backtick so the text cannot close a fenced block
pub fn escape_backticks(source: &str) -> String {
    source.replace('`', "\\`")
}

pub fn assemble_prompt(
    component_name: &str,
    implementation_source: &str,
    type_source: &str,
    dependent_types: &[DependentComponentType],
) -> String {
    let mut prompt = format!(
        "\nGenerate a comprehensive unit test for the {name} component based on the following files:\n\
         \n\
         Component implementation:\n\
         ```tsx\n\
         {implementation}\n\
         ```\n\
         \n\
         Type definitions:\n\
         ```ts\n\
         {types}\n\
         ```\n",
        name = component_name,
        implementation = escape_backticks(implementation_source),
        types = escape_backticks(type_source),
    );

    if !dependent_types.is_empty() {
        prompt.push_str(&dependent_types_section(dependent_types));
    }

    prompt.push_str("\nRequirements:\n");
    for (i, requirement) in REQUIREMENTS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, requirement));
    }

    prompt.push_str(
        "\nThe test should follow our standard format with imports at the top, \
         followed by any mocks, and then the test cases.\n",
    );
    prompt.push_str(&format!(
        "The test file should be added in {}.\n",
        TEST_FILE_LOCATION
    ));

    prompt
}

fn dependent_types_section(dependent_types: &[DependentComponentType]) -> String {
    let blocks = dependent_types
        .iter()
        .map(|dep| {
            format!(
                "\nComponent: {}\n```ts\n{}\n```\n",
                dep.component_name,
                escape_backticks(&dep.type_source)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nDependent Component Type Definitions:\n{}\n\
         Please ensure the unit tests properly handle these component dependencies.\n",
        blocks
    )
}
