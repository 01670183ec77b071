//! GeoGen CLI
//!
//! Replays a problem file through the geometry holder and reports a verdict
//! for every construction step.

mod problem;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geogen_core::{Configuration, GeometryHolder, HolderSettings, Verdict};
use problem::{Problem, Scope};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "geogen", about = "Symbolic-numeric equivalence checks for geometric constructions")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register every step of a problem and print its verdict
    Verify {
        /// Problem file (JSON)
        problem: PathBuf,
        /// Holder settings (JSON); defaults are used when absent
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Outcome of one step
#[derive(Debug, Serialize)]
struct StepReport {
    name: String,
    verdict: Verdict,
    /// Name of the coinciding object for duplicates
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate_of: Option<String>,
}

fn load_settings(path: Option<&Path>) -> Result<HolderSettings> {
    let Some(path) = path else {
        return Ok(HolderSettings::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn verify(problem: &Problem, settings: HolderSettings) -> Result<Vec<StepReport>> {
    let (mut scope, loose_objects) = Scope::with_loose_objects(problem)?;
    let configuration = Configuration::from_loose_objects(loose_objects);

    let mut holder = GeometryHolder::new(settings)?;
    holder.initialize(&configuration)?;
    info!(seed = holder.master_seed(), "holder ready");

    let mut reports = Vec::with_capacity(problem.steps.len());
    for step in &problem.steps {
        let object = scope.build(step)?;
        let verdict = holder
            .register(&object)
            .with_context(|| format!("registering {}", step.name))?;
        debug!(step = %step.name, %verdict);

        let duplicate_of = match verdict {
            Verdict::Fresh => {
                scope.bind(&step.name, object)?;
                None
            }
            Verdict::DuplicateOf(existing) => {
                scope.alias(&step.name, existing)?;
                Some(scope.name_of(existing))
            }
            Verdict::Unconstructible => None,
        };

        reports.push(StepReport {
            name: step.name.clone(),
            verdict,
            duplicate_of,
        });
    }

    Ok(reports)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Verify {
            problem,
            settings,
            json,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let problem = Problem::load(&problem)?;
            let reports = verify(&problem, settings)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    match &report.duplicate_of {
                        Some(existing) => println!("{}: duplicate of {}", report.name, existing),
                        None => println!("{}: {}", report.name, report.verdict),
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_reports_duplicates_by_name() {
        let problem: Problem = serde_json::from_str(
            r#"{
                "layout": "ScaleneAcuteTriangle",
                "loose_objects": ["A", "B", "C"],
                "steps": [
                    { "name": "O", "construction": "Circumcenter", "inputs": ["A", "B", "C"] },
                    { "name": "c", "construction": "Circumcircle", "inputs": ["A", "B", "C"] },
                    { "name": "O2", "construction": "CenterOfCircle", "inputs": ["c"] },
                    { "name": "P", "construction": "CenterOfCircle", "inputs": ["c"] }
                ]
            }"#,
        )
        .unwrap();
        let settings = HolderSettings {
            seed: Some(1),
            ..Default::default()
        };

        let reports = verify(&problem, settings).unwrap();

        assert_eq!(reports[0].verdict, Verdict::Fresh);
        assert_eq!(reports[1].verdict, Verdict::Fresh);
        assert_eq!(reports[2].duplicate_of.as_deref(), Some("O"));
        assert_eq!(reports[3].duplicate_of.as_deref(), Some("O"));
    }

    #[test]
    fn test_cli_parses_verify() {
        let cli = Cli::try_parse_from(["geogen", "verify", "p.json", "--settings", "s.json", "-v"]).unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Verify { json: false, .. }));
    }
}
