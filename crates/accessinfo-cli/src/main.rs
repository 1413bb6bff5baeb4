//! `accessinfo`: deadline and status classification for Code on Access to
//! Information requests, from the command line.

use std::path::{Path, PathBuf};

use accessinfo_core::{
    describe_state, display_label_in, extra_states, CodeOnAccessClassifier, DeadlineKind,
    DeadlinePolicy, DeadlineSummary, Locale, RequestSnapshot, StatusMessage,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Deadline policy YAML overriding the Code on Access offsets
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show deadlines and progress for a creation time
    Deadlines {
        /// When the request was made (RFC 3339)
        #[arg(long)]
        created_at: DateTime<Utc>,
        /// Evaluate as of this time instead of the current time (RFC 3339)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Language for messages (en, zh-HK)
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Classify a request document (YAML, or JSON by extension)
    Status {
        /// Path to the request document
        file: PathBuf,
        /// Evaluate as of this time instead of the current time (RFC 3339)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Language for labels and messages (en, zh-HK)
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Print the display label of a custom status code
    Label {
        code: String,
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Print the notice shown when a request is marked with a custom status
    Describe {
        code: String,
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// List the custom status codes
    States,
}

#[derive(Serialize)]
struct DeadlinesReport {
    created_at: DateTime<Utc>,
    evaluated_at: DateTime<Utc>,
    initial_response: DateTime<Utc>,
    target_completion: DateTime<Utc>,
    maximum_time: DateTime<Utc>,
    days_elapsed: i64,
    days_until_initial: i64,
    days_until_target: i64,
    days_until_maximum: i64,
    bucket: String,
    style_tag: String,
    message: String,
}

#[derive(Serialize)]
struct StatusReport {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    classification: accessinfo_core::Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<DeadlineSummary>,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "accessinfo_core=debug,accessinfo=debug",
        _ => "accessinfo_core=trace,accessinfo=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn load_policy(path: Option<&Path>) -> Result<DeadlinePolicy> {
    match path {
        Some(path) => {
            let policy = DeadlinePolicy::from_yaml_file(path)
                .with_context(|| format!("loading policy {}", path.display()))?;
            tracing::info!(?policy, "Loaded deadline policy");
            Ok(policy)
        }
        None => Ok(DeadlinePolicy::default()),
    }
}

fn render<T: Serialize>(
    format: Format,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(value)?),
        Format::Text => Ok(text()),
    }
}

fn deadlines(
    policy: &DeadlinePolicy,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    locale: Locale,
    format: Format,
) -> Result<String> {
    let deadlines = policy.deadlines(created_at);
    let message = StatusMessage::compute(policy, created_at, now);

    let report = DeadlinesReport {
        created_at,
        evaluated_at: now,
        initial_response: deadlines.initial_response,
        target_completion: deadlines.target_completion,
        maximum_time: deadlines.maximum_time,
        days_elapsed: accessinfo_core::days_elapsed(created_at, now),
        days_until_initial: policy.days_until(created_at, now, DeadlineKind::Initial),
        days_until_target: policy.days_until(created_at, now, DeadlineKind::Target),
        days_until_maximum: policy.days_until(created_at, now, DeadlineKind::Maximum),
        bucket: message.bucket.to_string(),
        style_tag: message.bucket.style_tag().to_string(),
        message: message.render(locale),
    };

    render(format, &report, || {
        format!(
            "Initial response:  {} ({} days)\n\
             Target completion: {} ({} days)\n\
             Maximum time:      {} ({} days)\n\
             Days elapsed:      {}\n\
             Status:            {} [{}]\n\
             {}",
            locale.format_long(report.initial_response),
            report.days_until_initial,
            locale.format_long(report.target_completion),
            report.days_until_target,
            locale.format_long(report.maximum_time),
            report.days_until_maximum,
            report.days_elapsed,
            report.bucket,
            report.style_tag,
            report.message,
        )
    })
}

fn status(
    policy: &DeadlinePolicy,
    file: &Path,
    now: DateTime<Utc>,
    locale: Locale,
    format: Format,
) -> Result<String> {
    let request = RequestSnapshot::from_file(file)
        .with_context(|| format!("loading request {}", file.display()))?;

    let classifier = CodeOnAccessClassifier::with_policy(*policy);
    let classification = classifier.classify_detailed(&request, now);
    let label = classification
        .status
        .custom()
        .map(|status| status.label(locale).to_string());
    let summary = DeadlineSummary::for_request(&request, now, locale, policy);

    let report = StatusReport {
        status: classification.status.to_string(),
        label,
        classification,
        summary,
    };

    render(format, &report, || {
        let mut lines = vec![format!("Status: {}", report.status)];
        if let Some(label) = &report.label {
            lines.push(format!("        {}", label));
        }
        for finding in &report.classification.findings {
            let mark = if finding.triggered { "x" } else { " " };
            lines.push(format!("[{}] {:?}: {}", mark, finding.check, finding.rationale));
            for evidence in &finding.evidence {
                lines.push(format!("      {} ({})", evidence.claim, evidence.pointer));
            }
        }
        if let Some(summary) = &report.summary {
            lines.push(format!("{} [{}]", summary.message, summary.style_tag));
            if let Some(alert) = &summary.alert {
                lines.push(format!("{:?}: {}", alert.level, alert.text));
            }
        }
        lines.join("\n")
    })
}

fn run(cli: Cli) -> Result<String> {
    let policy = load_policy(cli.policy.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Deadlines {
            created_at,
            now,
            locale,
        } => deadlines(&policy, created_at, now.unwrap_or_else(Utc::now), locale, format),
        Commands::Status { file, now, locale } => {
            status(&policy, &file, now.unwrap_or_else(Utc::now), locale, format)
        }
        Commands::Label { code, locale } => {
            let label = display_label_in(&code, locale)?;
            render(format, &serde_json::json!({ "code": code, "label": label }), || {
                label.to_string()
            })
        }
        Commands::Describe { code, locale } => {
            let notice = describe_state(&code, locale)?;
            render(format, &notice, || format!("{:?}: {}", notice.level, notice.text))
        }
        Commands::States => {
            let states = extra_states();
            render(format, &states, || states.join("\n"))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("{}", run(cli)?);
    Ok(())
}
