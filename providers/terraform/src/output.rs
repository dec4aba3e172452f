use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

/// Outputs reported by `terraform output -json`, keyed by output name.
pub type Outputs = HashMap<String, OutputMeta>;

/// One output entry. `value` holds the raw JSON text of the value, undecoded.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputMeta {
    pub sensitive: bool,
    pub value: String,
}

impl OutputMeta {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            sensitive: false,
            value: value.into(),
        }
    }
}

#[derive(Deserialize)]
struct RawOutputMeta {
    #[serde(default)]
    sensitive: bool,
    value: Box<RawValue>,
}

impl<'de> Deserialize<'de> for OutputMeta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawOutputMeta::deserialize(deserializer)?;
        Ok(OutputMeta {
            sensitive: raw.sensitive,
            value: raw.value.get().to_owned(),
        })
    }
}

pub fn parse_outputs(json: &str) -> serde_json::Result<Outputs> {
    serde_json::from_str(json)
}

/// Decodes the output `key` as a string.
///
/// Never fails: a missing key, a value that is not a JSON string, and JSON
/// `null` all yield an empty string.
pub fn extract_string_output(outputs: &Outputs, key: &str) -> String {
    let Some(meta) = outputs.get(key) else {
        return String::new();
    };
    serde_json::from_str::<Option<String>>(&meta.value)
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESCAPED_KEY: &str = r#""-----BEGIN KEY-----\nabc\n-----END KEY-----\n""#;

    fn outputs(entries: &[(&str, &str)]) -> Outputs {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), OutputMeta::new(*v)))
            .collect()
    }

    #[test]
    fn test_extract_string_output() {
        let cases = [
            ("empty outputs", outputs(&[]), "some_key", ""),
            (
                "key not found",
                outputs(&[("other_key", r#""value""#)]),
                "some_key",
                "",
            ),
            (
                "valid string",
                outputs(&[("ip_address", r#""192.168.1.1""#)]),
                "ip_address",
                "192.168.1.1",
            ),
            (
                "invalid json",
                outputs(&[("bad_value", "not valid json")]),
                "bad_value",
                "",
            ),
            ("number", outputs(&[("number", "123")]), "number", ""),
            ("null", outputs(&[("null_value", "null")]), "null_value", ""),
            ("empty string", outputs(&[("empty", r#""""#)]), "empty", ""),
            (
                "object",
                outputs(&[("obj", r#"{"ip":"10.0.0.1"}"#)]),
                "obj",
                "",
            ),
            (
                "escaped multiline string",
                outputs(&[("key", ESCAPED_KEY)]),
                "key",
                "-----BEGIN KEY-----\nabc\n-----END KEY-----\n",
            ),
        ];

        for (name, outputs, key, expected) in cases {
            assert_eq!(extract_string_output(&outputs, key), expected, "{name}");
        }
    }

    #[test]
    fn parses_terraform_output_document() {
        let json = r#"{
            "control_plane_public_ip": {"type": "string", "value": "203.0.113.10"},
            "worker_ips": {"sensitive": false, "type": ["list", "string"], "value": ["10.0.0.5"]},
            "ssh_private_key": {"sensitive": true, "type": "string", "value": "KEY"}
        }"#;

        let outputs = parse_outputs(json).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs["worker_ips"].value, r#"["10.0.0.5"]"#);
        assert!(outputs["ssh_private_key"].sensitive);
        assert_eq!(
            extract_string_output(&outputs, "control_plane_public_ip"),
            "203.0.113.10"
        );
        assert_eq!(extract_string_output(&outputs, "worker_ips"), "");
    }

    #[test]
    fn parses_empty_state() {
        assert!(parse_outputs("{}").unwrap().is_empty());
        assert!(parse_outputs("[]").is_err());
    }
}
