//! Tests for tool descriptors.

use llmux_llm::{Error, ToolDescriptor, ToolManager, ToolSet};
use serde_json::json;

fn colour_tool() -> ToolDescriptor {
    ToolDescriptor {
        name: "Colour Scheme".into(),
        internal_name: "colour-scheme".into(),
        schema: r#"// Colour Scheme
// picks colours
{
  "name": "ColorSchemeTool",
  "description": "Pick colours",
  "input_schema": { "type": "object", "properties": { "primary": { "type": "string" } } }
}"#
        .into(),
        output_filename: "colorscheme.json".into(),
    }
}

#[test]
fn parse_schema_strips_comment_lines() {
    let schema = colour_tool().parse_schema().expect("schema");
    assert_eq!(schema.name, "ColorSchemeTool");
    assert_eq!(schema.description, "Pick colours");
    assert_eq!(schema.input_schema["properties"]["primary"], json!({"type": "string"}));
}

#[test]
fn parse_schema_rejects_empty_and_invalid() {
    let mut tool = colour_tool();
    tool.schema = "// only a comment".into();
    assert!(matches!(tool.parse_schema(), Err(Error::ToolSchema { .. })));

    tool.schema = "{ not json".into();
    assert!(matches!(tool.parse_schema(), Err(Error::ToolSchema { .. })));

    tool.schema = r#"{"name": "x"}"#.into();
    assert!(matches!(tool.parse_schema(), Err(Error::ToolSchema { .. })));
}

#[test]
fn tool_set_finds_by_name_or_internal_name() {
    let tools = ToolSet::new(vec![colour_tool()]);
    assert!(tools.tool("Colour Scheme").is_some());
    assert!(tools.tool("colour-scheme").is_some());
    assert!(tools.tool("missing").is_none());
    assert!(tools.tool("").is_none());
}

#[test]
fn render_output_wraps_in_fence() {
    let tool = colour_tool();
    assert_eq!(
        tool.render_output("{\"primary\":\n\"red\"}"),
        "```colorscheme.json\n{\"primary\": \"red\"}\n```\n"
    );
    assert_eq!(
        tool.render_output("\"primary\":\"red\""),
        "```colorscheme.json\n{\"primary\":\"red\"}\n```\n"
    );
}
