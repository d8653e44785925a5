//! Human-readable error descriptions and structured JSON error formatting.

use fridge_core::error::{BuildError, FridgeError};
use fridge_transport::TransportError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid analyzer parameters ({msg}).\nLikely causes: Out-of-range values in [filter] or [items].\nHow to fix: Edit the config file or the override flags, then rerun."
        );
    }

    if let Some(fe) = err.downcast_ref::<FridgeError>() {
        return match fe {
            FridgeError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: A value in the TOML or an override flag is out of range.\nHow to fix: Edit the config file (see etc/fridge.toml) and try again."
            ),
            FridgeError::Source(msg) => format!(
                "What happened: The inbound message stream failed ({msg}).\nLikely causes: The broker bridge exited or the input file became unreadable.\nHow to fix: Restart the bridge; the analyzer resumes from scratch on a new process."
            ),
            FridgeError::Sink(msg) => format!(
                "What happened: Derived events could not be written ({msg}).\nLikely causes: The downstream pipe was closed.\nHow to fix: Check the consumer reading our stdout."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TransportError>() {
        return match te {
            TransportError::Csv(msg) if msg.contains("must have headers") => {
                "Invalid headers in replay CSV. Expected 'topic,payload'.".to_string()
            }
            other => format!(
                "What happened: {other}.\nLikely causes: Unreadable or malformed input file.\nHow to fix: Check the file path and its contents."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("parse config") || lower.contains("read config") {
        let cause = err
            .source()
            .map(|s| format!(" Cause: {s}"))
            .unwrap_or_default();
        return format!(
            "What happened: {msg}.{cause}\nHow to fix: Fix the TOML syntax or the file permissions and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 configuration, 3 inbound stream, 4 outbound sink, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    if let Some(fe) = err.downcast_ref::<FridgeError>() {
        return match fe {
            FridgeError::Config(_) => 2,
            FridgeError::Source(_) => 3,
            FridgeError::Sink(_) => 4,
        };
    }
    if err.downcast_ref::<TransportError>().is_some() {
        return 3;
    }
    let lower = err.to_string().to_ascii_lowercase();
    if lower.contains("parse config") || lower.contains("read config") {
        return 2;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<FridgeError>() {
        Some(FridgeError::Config(_)) => "Config",
        Some(FridgeError::Source(_)) => "Source",
        Some(FridgeError::Sink(_)) => "Sink",
        None if err.downcast_ref::<TransportError>().is_some() => "Source",
        None => match exit_code_for_error(err) {
            2 => "Config",
            _ => "Error",
        },
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let cfg = eyre::Report::new(FridgeError::Config("filter.window_size".into()));
        let src = eyre::Report::new(FridgeError::Source("eof".into()));
        let snk = eyre::Report::new(FridgeError::Sink("broken pipe".into()));
        let build = eyre::Report::new(BuildError::InvalidConfig("window_size must be >= 2"));
        assert_eq!(exit_code_for_error(&cfg), 2);
        assert_eq!(exit_code_for_error(&build), 2);
        assert_eq!(exit_code_for_error(&src), 3);
        assert_eq!(exit_code_for_error(&snk), 4);
        assert_eq!(exit_code_for_error(&eyre::eyre!("boom")), 1);
    }

    #[test]
    fn json_error_has_reason_and_message() {
        let err = eyre::Report::new(FridgeError::Sink("broken pipe".into()));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Sink");
        assert_eq!(v["exit_code"], 4);
        assert!(v["message"].as_str().unwrap().contains("broken pipe"));
    }

    #[test]
    fn csv_header_error_is_specific() {
        let err = eyre::Report::new(TransportError::Csv(
            "replay CSV must have headers 'topic,payload', got: a,b".into(),
        ));
        assert!(humanize(&err).contains("Expected 'topic,payload'"));
        assert_eq!(exit_code_for_error(&err), 3);
    }
}
