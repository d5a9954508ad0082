//! Attaching a tool schema to a request body.

use llm::{Error, ToolFormat, ToolManager};
use serde_json::{Map, Value, json};

/// Attaches the selected tool to request bodies in a backend's format.
pub struct ToolRequestBuilder<'a> {
    tools: &'a dyn ToolManager,
}

impl<'a> ToolRequestBuilder<'a> {
    pub fn new(tools: &'a dyn ToolManager) -> Self {
        Self { tools }
    }

    /// Attach the first of `tool_ids`. Nothing happens when the list is
    /// empty; the remaining ids are ignored.
    pub fn attach(
        &self,
        body: &mut Map<String, Value>,
        tool_ids: &[String],
        format: ToolFormat,
    ) -> Result<(), Error> {
        let Some(id) = tool_ids.first() else {
            return Ok(());
        };
        if tool_ids.len() > 1 {
            tracing::debug!("{} tools selected, only {id} is sent", tool_ids.len());
        }

        let tool = self
            .tools
            .tool(id)
            .ok_or_else(|| Error::UnknownTool(id.clone()))?;
        let schema = tool.parse_schema()?;
        let mut parameters = schema.input_schema;

        match format {
            ToolFormat::Function => {
                close_objects(&mut parameters);
                body.insert(
                    "tools".into(),
                    json!([{
                        "type": "function",
                        "function": {
                            "name": schema.name,
                            "description": schema.description,
                            "parameters": parameters,
                        },
                    }]),
                );
                body.insert(
                    "tool_choice".into(),
                    json!({ "type": "function", "function": { "name": schema.name } }),
                );
            }
            ToolFormat::FunctionDeclarations => {
                strip_defaults(&mut parameters);
                body.insert(
                    "tools".into(),
                    json!([{
                        "function_declarations": [{
                            "name": schema.name,
                            "description": schema.description,
                            "parameters": parameters,
                        }],
                    }]),
                );
                body.insert(
                    "tool_config".into(),
                    json!({ "function_calling_config": { "mode": "ANY" } }),
                );
            }
            ToolFormat::JsonSchema => {
                close_objects(&mut parameters);
                body.remove("tools");
                body.remove("tool_choice");
                body.insert(
                    "response_format".into(),
                    json!({
                        "type": "json_schema",
                        "json_schema": {
                            "name": schema.name,
                            "description": schema.description,
                            "schema": parameters,
                        },
                    }),
                );
            }
            ToolFormat::Format => {
                body.insert("format".into(), parameters);
            }
        }
        Ok(())
    }
}

/// Set `additionalProperties: false` on every object schema that does not
/// say otherwise.
pub fn close_objects(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.entry("additionalProperties")
                    .or_insert(Value::Bool(false));
            }
            map.values_mut().for_each(close_objects);
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

/// Remove every `default` keyword; Gemini rejects them.
pub fn strip_defaults(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            map.remove("default");
            map.values_mut().for_each(strip_defaults);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_defaults),
        _ => {}
    }
}
