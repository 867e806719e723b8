use std::fmt::Write;

use ketone_sched::{SavePayload, ValidationReport};
use serde::Deserialize;

use crate::error::KtError;

/// Payload encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

pub fn encode_payload(payload: &SavePayload, format: OutputFormat) -> Result<String, KtError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(payload).map_err(|e| KtError::Encode(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(payload).map_err(|e| KtError::Encode(e.to_string()))
        }
    }
}

/// One `<row id>: <message>` line per finding, rows in order.
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for (id, errors) in report.iter() {
        for error in errors {
            let _ = writeln!(out, "{}: {}", id, error);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use ketone_sched::{validate, DateInput, DateRangeEntry, JobFrequencySelection, JobMode, RowId, RowSchedule};

    use super::*;

    #[test]
    fn report_lines() {
        let rows = [
            DateRangeEntry {
                id: RowId::new("a"),
                start: DateInput::blank(),
                end: DateInput::blank(),
                schedule: RowSchedule::Daily,
            },
            DateRangeEntry {
                id: RowId::new("b"),
                start: DateInput::from("2024-01-01"),
                end: DateInput::from("2024-01-02"),
                schedule: RowSchedule::Daily,
            },
        ];
        let rendered = render_report(&validate(&rows));
        assert_eq!(rendered, "a: Start date is required\na: End date is required\n");
    }

    #[test]
    fn encodes_yaml() {
        let payload = SavePayload::for_selection(&JobFrequencySelection::new(JobMode::Daily));
        let yaml = encode_payload(&payload, OutputFormat::Yaml).unwrap();
        assert_eq!(yaml.trim(), "jobFrequency: Daily");
    }

    #[test]
    fn format_names() {
        assert_eq!("YML".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
