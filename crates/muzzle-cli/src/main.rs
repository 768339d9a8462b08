//! CLI entry point for muzzle.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `muzzle-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use muzzle_app::{
    ExplainOutput, VerifyInput, format_references, parse_report_json, render_annotations,
    render_markdown, retry_policy, run_explain, run_verify, run_versions, runtime_error_report,
    serialize_report, to_renderable, verdict_exit_code,
};
use muzzle_registry::RetryPolicy;
use muzzle_settings::Overrides;
use muzzle_types::MuzzleReportV1;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "muzzle",
    version,
    about = "Verify instrumentation advice against every published version of a library"
)]
struct Cli {
    /// Path to muzzle config TOML.
    #[arg(long, global = true, default_value = "muzzle.toml")]
    config: Utf8PathBuf,

    /// Registry directory or http(s) base URL (default: `registry/` next to the config).
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Override profile (strict|warn).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long, global = true)]
    max_findings: Option<u32>,

    /// Override the verification thread count (0 = one per core).
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify every directive and write artifacts.
    Verify {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/muzzle/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/muzzle/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/muzzle/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/muzzle/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "muzzle.inverse") or code (e.g., "missing_symbol") to explain.
        identifier: String,
    },

    /// List the published versions of an artifact.
    Versions {
        #[arg(long)]
        group: String,

        #[arg(long)]
        module: String,

        /// Only list versions inside this range, e.g. "[3.7.0,3.8.0)".
        #[arg(long)]
        versions: Option<String>,
    },

    /// Print the advice references the config resolves to.
    References,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Verify {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_verify(&cli, report_out, write_markdown, markdown_out),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
        Commands::Versions {
            ref group,
            ref module,
            ref versions,
        } => cmd_versions(&cli, group, module, versions.as_deref()),
        Commands::References => cmd_references(&cli),
    }
}

/// Logs go to stderr and only when `MUZZLE_LOG` holds a filter, e.g. `MUZZLE_LOG=muzzle=debug`.
fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_env("MUZZLE_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        max_findings: cli.max_findings,
        threads: cli.threads,
    }
}

fn registry_location(cli: &Cli) -> String {
    match &cli.registry {
        Some(location) => location.clone(),
        None => cli
            .config
            .parent()
            .unwrap_or(Utf8Path::new(""))
            .join("registry")
            .into_string(),
    }
}

fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read config: {}", path))
}

fn cmd_verify(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let config_text = read_config(&cli.config)?;
        let registry = registry_location(cli);

        let output = run_verify(VerifyInput {
            config_path: &cli.config,
            config_text: &config_text,
            registry: &registry,
            overrides: overrides(cli),
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let renderable = to_renderable(&output.report);
            let md = render_markdown(&renderable);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict.clone()))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("muzzle error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &MuzzleReportV1) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let renderable = to_renderable(&report);
    let md = render_markdown(&renderable);

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let renderable = to_renderable(&report);

    for annotation in render_annotations(&renderable, max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found {
            explanation,
            related,
        } => {
            print!(
                "{}",
                muzzle_app::format_explanation(&explanation, related.as_ref())
            );
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            suggestions,
        } => {
            eprint!("{}", muzzle_app::format_not_found(&identifier, &suggestions));
            std::process::exit(1);
        }
    }
}

fn cmd_versions(
    cli: &Cli,
    group: &str,
    module: &str,
    range: Option<&str>,
) -> anyhow::Result<()> {
    let location = registry_location(cli);
    let resolver = muzzle_registry::open_registry(&location, configured_retry(cli)?)?;
    for version in run_versions(&resolver, group, module, range)? {
        println!("{}", version);
    }
    Ok(())
}

/// `[retry]` from the config when one exists; listing works without a config too.
fn configured_retry(cli: &Cli) -> anyhow::Result<RetryPolicy> {
    if !cli.config.is_file() {
        return Ok(RetryPolicy::default());
    }
    let config_text = read_config(&cli.config)?;
    let resolved = muzzle_app::load_config(&cli.config, &config_text, overrides(cli))?;
    Ok(retry_policy(&resolved.retry))
}

fn cmd_references(cli: &Cli) -> anyhow::Result<()> {
    let config_text = read_config(&cli.config)?;
    let resolved = muzzle_app::load_config(&cli.config, &config_text, overrides(cli))?;
    print!("{}", format_references(&resolved.advice));
    Ok(())
}
