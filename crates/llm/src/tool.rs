//! Tool descriptors and the tool lookup seam.

use crate::Error;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool the model can be asked to call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolDescriptor {
    /// Display name
    pub name: CompactString,
    /// Stable internal name, also accepted for lookup
    #[serde(default)]
    pub internal_name: CompactString,
    /// Full schema text: `{name, description, input_schema}` JSON,
    /// optionally preceded by `//` comment lines
    pub schema: String,
    /// Filename hint used to label rendered tool output
    #[serde(default)]
    pub output_filename: CompactString,
}

impl ToolDescriptor {
    /// Parse the schema text, ignoring `//` comment lines.
    pub fn parse_schema(&self) -> Result<ToolSchema, Error> {
        let text = self
            .schema
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            return Err(Error::ToolSchema {
                tool: self.name.to_string(),
                reason: "schema is empty".into(),
            });
        }
        serde_json::from_str(&text).map_err(|e| Error::ToolSchema {
            tool: self.name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Wrap a tool-call response in a fenced block labelled with
    /// `output_filename`, flattened to one line and brace-wrapped.
    pub fn render_output(&self, text: &str) -> String {
        let body = text.replace('\r', "").replace('\n', " ");
        let wrap = !body.trim_start().starts_with('{');
        let mut out = format!("```{}\n", self.output_filename);
        if wrap {
            out.push('{');
        }
        out.push_str(&body);
        if wrap {
            out.push('}');
        }
        out.push_str("\n```\n");
        out
    }

    fn matches(&self, id: &str) -> bool {
        self.name == id || (!self.internal_name.is_empty() && self.internal_name == id)
    }
}

/// Parsed tool schema.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input_schema: Value,
}

/// How a backend accepts a tool schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFormat {
    /// `tools` + forced `tool_choice`, OpenAI function style
    Function,
    /// `tools[].function_declarations` + `tool_config` mode `ANY`
    FunctionDeclarations,
    /// `response_format` of type `json_schema`, no `tools`
    JsonSchema,
    /// Schema as the top-level `format` field
    Format,
}

/// Lookup of tools by id.
pub trait ToolManager: Send + Sync {
    /// Find a tool by name or internal name.
    fn tool(&self, id: &str) -> Option<ToolDescriptor>;
}

/// A fixed set of tools.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: Vec<ToolDescriptor>,
}

impl ToolSet {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self { tools }
    }
}

impl ToolManager for ToolSet {
    fn tool(&self, id: &str) -> Option<ToolDescriptor> {
        self.tools.iter().find(|t| t.matches(id)).cloned()
    }
}
