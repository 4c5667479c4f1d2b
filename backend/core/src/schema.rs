//! Declared output shape for structured model responses.
//!
//! Only one shape is needed: an object with a single required string property.
//! The same value is sent to the backend as a JSON Schema and used locally to
//! check what comes back.

use serde_json::{json, Value};

use crate::error::VerifyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    name: String,
    field: String,
    description: String,
}

impl OutputSchema {
    /// Schema for an object holding exactly one string property.
    pub fn single_string(
        name: impl Into<String>,
        field: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            description: description.into(),
        }
    }

    /// Schema name, required by OpenAI-style `json_schema` response formats.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                self.field.as_str(): {
                    "type": "string",
                    "description": self.description,
                }
            },
            "required": [self.field],
            "additionalProperties": false,
        })
    }

    /// Parse raw model output and pull out the declared field.
    ///
    /// Anything other than a JSON object carrying exactly that field, as a
    /// string, is a [`VerifyError::Generation`].
    pub fn extract(&self, raw: &str) -> Result<String, VerifyError> {
        let trimmed = strip_code_fence(raw.trim());
        if trimmed.is_empty() {
            return Err(VerifyError::Generation("empty response".into()));
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|e| {
            VerifyError::Generation(format!("response is not valid JSON: {e}"))
        })?;

        self.extract_value(&value)
    }

    pub fn extract_value(&self, value: &Value) -> Result<String, VerifyError> {
        let object = value.as_object().ok_or_else(|| {
            VerifyError::Generation("response is not a JSON object".into())
        })?;

        if let Some(extra) = object.keys().find(|key| **key != self.field) {
            return Err(VerifyError::Generation(format!(
                "unexpected field `{extra}`; only `{}` is allowed",
                self.field
            )));
        }

        match object.get(&self.field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(VerifyError::Generation(format!(
                "field `{}` is not a string",
                self.field
            ))),
            None => Err(VerifyError::Generation(format!(
                "field `{}` is missing",
                self.field
            ))),
        }
    }
}

// Some local models wrap JSON in a ```json fence even when a format is requested.
fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OutputSchema {
        OutputSchema::single_string("verification_report", "report", "The report.")
    }

    #[test]
    fn json_schema_requires_single_string_field() {
        let value = schema().to_json_schema();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["report"]["type"], "string");
        assert_eq!(value["required"], json!(["report"]));
        assert_eq!(value["additionalProperties"], false);
    }

    #[test]
    fn extracts_declared_field() {
        let text = schema().extract(r#"{"report": "Looks genuine."}"#).unwrap();
        assert_eq!(text, "Looks genuine.");
    }

    #[test]
    fn extracts_from_fenced_json() {
        let raw = "```json\n{\"report\": \"Fenced.\"}\n```";
        assert_eq!(schema().extract(raw).unwrap(), "Fenced.");
    }

    #[test]
    fn fence_tag_is_case_insensitive() {
        let raw = "```JSON\n{\"report\": \"Upper.\"}\n```";
        assert_eq!(schema().extract(raw).unwrap(), "Upper.");
        let raw = "```Json {\"report\": \"Mixed.\"}```";
        assert_eq!(schema().extract(raw).unwrap(), "Mixed.");
    }

    #[test]
    fn rejects_undeclared_fields() {
        let err = schema()
            .extract(r#"{"report": "x", "severity": "high"}"#)
            .unwrap_err();
        assert!(matches!(err, VerifyError::Generation(_)));
        assert!(err.to_string().contains("severity"));
    }

    #[test]
    fn rejects_plain_text() {
        let err = schema().extract("The medicine looks fine.").unwrap_err();
        assert!(matches!(err, VerifyError::Generation(_)));
    }

    #[test]
    fn rejects_missing_or_mistyped_field() {
        assert!(schema().extract(r#"{"summary": "x"}"#).is_err());
        assert!(schema().extract(r#"{"report": 42}"#).is_err());
        assert!(schema().extract(r#"["report"]"#).is_err());
        assert!(schema().extract("   ").is_err());
    }
}
