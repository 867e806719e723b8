//! Ketone schedule draft checker.

mod config;
mod draft_file;
mod error;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ketone_sched::{OverlapBoundary, SaveError, SequentialIds, ValidatorOptions};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::load_config;
use crate::draft_file::load_draft;
use crate::output::{encode_payload, render_report, OutputFormat};

#[derive(Parser)]
#[command(name = "kt")]
#[command(about = "Validate and export job schedule drafts", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/ketone/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Shared boundary dates: inclusive or exclusive
    #[arg(long, global = true)]
    boundary: Option<OverlapBoundary>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print validation findings for a draft
    Check {
        /// Draft file (.toml, .json, .yaml)
        draft: PathBuf,
    },

    /// Emit the save payload for a draft if it validates
    Save {
        /// Draft file (.toml, .json, .yaml)
        draft: PathBuf,

        /// Output format: json or yaml
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(configured: Option<&str>, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        configured.unwrap_or("warn")
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(config.log_level.as_deref(), cli.verbose);

    let options = ValidatorOptions {
        overlap_boundary: cli.boundary.unwrap_or(config.validation.overlap_boundary),
        ..config.validation
    };
    debug!(?options, "validator options");

    let outcome = match cli.command {
        Command::Check { draft } => check(&draft, &options)?,
        Command::Save {
            draft,
            format,
            output,
        } => save(
            &draft,
            &options,
            format.unwrap_or(config.output.format),
            output.as_deref(),
        )?,
    };

    print!("{}", outcome.stdout);
    eprint!("{}", outcome.stderr);
    Ok(outcome.exit_code())
}

/// What a command prints, and whether validation refused the draft.
#[derive(Debug, Default)]
struct Outcome {
    stdout: String,
    stderr: String,
    blocked: bool,
}

impl Outcome {
    fn exit_code(&self) -> ExitCode {
        if self.blocked {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

fn check(path: &Path, options: &ValidatorOptions) -> anyhow::Result<Outcome> {
    let draft = load_draft(path)?.into_draft(SequentialIds::new())?;
    let report = draft.validate(options);

    if report.has_blocking_errors() {
        return Ok(Outcome {
            stdout: render_report(&report),
            blocked: true,
            ..Outcome::default()
        });
    }

    Ok(Outcome {
        stdout: format!("ok: {} ({} mode)\n", path.display(), draft.selection().mode),
        ..Outcome::default()
    })
}

fn save(
    path: &Path,
    options: &ValidatorOptions,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Outcome> {
    let draft = load_draft(path)?.into_draft(SequentialIds::new())?;

    let payload = match draft.save(options) {
        Ok(payload) => payload,
        Err(SaveError::Blocked(report)) => {
            return Ok(Outcome {
                stderr: format!(
                    "Please resolve validation issues before saving.\n{}",
                    render_report(&report)
                ),
                blocked: true,
                ..Outcome::default()
            });
        }
    };

    let encoded = encode_payload(&payload, format)?;
    match output {
        Some(out) => {
            std::fs::write(out, encoded)?;
            info!(path = %out.display(), "payload written");
            Ok(Outcome::default())
        }
        None => Ok(Outcome {
            stdout: format!("{}\n", encoded),
            ..Outcome::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const OVERLAPPING: &str = r#"
mode = "Custom"

[[ranges]]
id = "jan"
start = "2024-01-01"
end = "2024-01-31"
frequency = "Daily"

[[ranges]]
id = "mid"
start = "2024-01-15"
end = "2024-02-15"
frequency = "Daily"
"#;

    const CLEAN: &str = r#"
mode = "Custom"

[[ranges]]
id = "jan"
start = "2024-01-01"
end = "2024-01-31"
frequency = "Daily"

[[ranges]]
id = "feb"
start = "2024-02-01"
frequency = "One time"
"#;

    fn write_draft(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("job.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn check_fails_on_blocking_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(&dir, OVERLAPPING);

        let outcome = check(&path, &ValidatorOptions::default()).unwrap();
        assert!(outcome.blocked);
        assert_eq!(
            format!("{:?}", outcome.exit_code()),
            format!("{:?}", ExitCode::FAILURE)
        );
        assert_eq!(
            outcome.stdout,
            "jan: Overlaps another range\nmid: Overlaps another range\n"
        );
    }

    #[test]
    fn check_passes_clean_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(&dir, CLEAN);

        let outcome = check(&path, &ValidatorOptions::default()).unwrap();
        assert!(!outcome.blocked);
        assert_eq!(
            format!("{:?}", outcome.exit_code()),
            format!("{:?}", ExitCode::SUCCESS)
        );
        assert!(outcome.stdout.starts_with("ok: "));
        assert!(outcome.stdout.trim_end().ends_with("(Custom mode)"));
    }

    #[test]
    fn save_refuses_blocked_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(&dir, OVERLAPPING);
        let out = dir.path().join("payload.json");

        let outcome = save(&path, &ValidatorOptions::default(), OutputFormat::Json, Some(&out)).unwrap();
        assert!(outcome.blocked);
        assert!(outcome.stdout.is_empty());
        assert!(outcome.stderr.starts_with("Please resolve validation issues before saving."));
        assert!(outcome.stderr.contains("mid: Overlaps another range"));
        assert!(!out.exists());
    }

    #[test]
    fn save_writes_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(&dir, CLEAN);
        let out = dir.path().join("payload.json");

        let outcome = save(&path, &ValidatorOptions::default(), OutputFormat::Json, Some(&out)).unwrap();
        assert!(!outcome.blocked);

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["jobFrequency"], "Custom");
        assert_eq!(written["customRanges"][1]["end"], "2024-02-01");
    }

    #[test]
    fn exclusive_boundary_unblocks_touching_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(
            &dir,
            r#"
mode = "Custom"

[[ranges]]
start = "2024-01-01"
end = "2024-01-31"
frequency = "Daily"

[[ranges]]
start = "2024-01-31"
end = "2024-02-15"
frequency = "Daily"
"#,
        );
        let exclusive = ValidatorOptions {
            overlap_boundary: OverlapBoundary::Exclusive,
            ..ValidatorOptions::default()
        };

        assert!(check(&path, &ValidatorOptions::default()).unwrap().blocked);
        assert!(!check(&path, &exclusive).unwrap().blocked);
    }
}
