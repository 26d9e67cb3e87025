//! Argument parsing and output helpers shared by the builtin tools

use crate::error::{Error, Result};
use crate::registry::ToolResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// Decode tool arguments into a typed input struct.
pub(crate) fn parse<T: DeserializeOwned>(tool: &str, input: serde_json::Value) -> Result<T> {
    serde_json::from_value(input)
        .map_err(|e| Error::InvalidInput(format!("Invalid {tool} parameters: {e}")))
}

/// Reject empty strings for required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject text longer than `max` characters.
pub(crate) fn check_max_chars(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::InvalidInput(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Reject numbers outside `min..=max`.
pub(crate) fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<u32> {
    if !(min..=max).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(value)
}

/// Wrap a serializable value as a successful result timed from `start`.
pub(crate) fn output<T: Serialize + ?Sized>(value: &T, start: Instant) -> Result<ToolResult> {
    let output = serde_json::to_value(value)
        .map_err(|e| Error::Execution(format!("failed to encode tool output: {e}")))?;
    Ok(ToolResult::success(output, elapsed_ms(start)))
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// First `n` characters of `text`.
pub(crate) fn truncate_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        #[serde(default)]
        count: Option<u32>,
    }

    #[test]
    fn test_parse_reports_tool_name() {
        let ok: Sample = parse("sample", json!({"name": "x"})).unwrap();
        assert_eq!(ok.name, "x");
        assert!(ok.count.is_none());

        let err = parse::<Sample>("sample", json!({"count": 2})).unwrap_err();
        assert!(err.to_string().contains("Invalid sample parameters"));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_validators() {
        assert!(require_text("title", "").is_err());
        assert!(require_text("title", "a").is_ok());
        assert!(check_max_chars("title", &"é".repeat(100), 100).is_ok());
        assert!(check_max_chars("title", &"é".repeat(101), 100).is_err());
        assert_eq!(check_range("max_results", 50, 1, 50).unwrap(), 50);
        assert!(check_range("max_results", 0, 1, 50).is_err());
        assert!(check_range("max_results", 51, 1, 50).is_err());
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
