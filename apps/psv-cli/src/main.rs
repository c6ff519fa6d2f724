use clap::{Parser, Subcommand};
use psv_app::{AppError, AppResult, SizingOptions, case_service, history_service, sizing_service};
use psv_sizing::{OrificeTable, StandardFamily, solve_eta_c};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "psv-cli")]
#[command(about = "PSV sizing - relief valve sizing to API 520 / API 526", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size (or rate) the valve described by a case file
    Size {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// Spring range CSV, overriding the case
        #[arg(long)]
        springs: Option<PathBuf>,
        /// Append a history entry to this directory
        #[arg(long)]
        history: Option<PathBuf>,
        /// User recorded in the history entry
        #[arg(long)]
        user: Option<String>,
        /// Print the result and datasheet as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a case file without sizing it
    Check {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
    /// List calculation history
    History {
        /// History directory
        dir: PathBuf,
        /// Only entries with this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// List standard orifice designations
    Orifices {
        /// api526 or non-api
        #[arg(long)]
        family: Option<String>,
    },
    /// Solve the two-phase critical pressure ratio for an omega value
    EtaC {
        omega: f64,
    },
    /// List fluids available by name
    Fluids,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Size {
            case_path,
            springs,
            history,
            user,
            json,
        } => {
            let mut options = SizingOptions {
                springs,
                history_dir: history,
                ..SizingOptions::default()
            };
            if let Some(user) = user {
                options.user = user;
            }
            cmd_size(&case_path, &options, json)
        }
        Commands::Check { case_path } => cmd_check(&case_path),
        Commands::History { dir, tag } => cmd_history(&dir, tag.as_deref()),
        Commands::Orifices { family } => cmd_orifices(family.as_deref()),
        Commands::EtaC { omega } => cmd_eta_c(omega),
        Commands::Fluids => cmd_fluids(),
    };
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "command failed");
    }
    outcome
}

#[derive(Serialize)]
struct JsonReport<'a> {
    result: &'a psv_sizing::SizingResult,
    datasheet: &'a psv_app::Datasheet,
}

fn cmd_size(case_path: &Path, options: &SizingOptions, json: bool) -> AppResult<()> {
    let response = sizing_service::size_case_file(case_path, options)?;
    tracing::debug!(
        case = %case_path.display(),
        orifice = %response.result.orifice.designation,
        warnings = response.result.warnings.len(),
        "case sized"
    );

    if json {
        let report = JsonReport {
            result: &response.result,
            datasheet: &response.datasheet,
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::InvalidInput(format!("cannot serialize result: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    for group in &response.datasheet.groups {
        println!("{}", group.title);
        for (key, value) in &group.rows {
            println!("  {:<26} {}", format!("{key}:"), value);
        }
        println!();
    }
    if let Some(entry) = &response.history_entry {
        println!("✓ History entry {} recorded", &entry.id[..12]);
    }
    Ok(())
}

fn cmd_check(case_path: &Path) -> AppResult<()> {
    println!("Checking case: {}", case_path.display());
    let case = case_service::load_case(case_path)?;
    case_service::validate_case(&case)?;
    let summary = case_service::summarize_case(&case);
    println!(
        "✓ Case is valid: {} ({}, {}, {}, set {})",
        summary.tag, summary.service, summary.mode, summary.fluid, summary.set_pressure
    );
    Ok(())
}

fn cmd_history(dir: &Path, tag: Option<&str>) -> AppResult<()> {
    let entries = history_service::list_history(dir, tag)?;
    if entries.is_empty() {
        println!("No history entries found");
        return Ok(());
    }
    for entry in entries {
        let d = &entry.draft;
        println!(
            "{}  {:<10} {:<12} {:<10} {:<9} set {:<12} bp {:<12} {} {}  {}",
            entry.timestamp,
            d.user,
            d.tag,
            d.service,
            d.mode,
            d.set_pressure,
            d.back_pressure,
            d.orifice,
            d.valve_size,
            d.outcome
        );
    }
    Ok(())
}

fn cmd_orifices(family: Option<&str>) -> AppResult<()> {
    let family: StandardFamily = match family {
        Some(text) => text.parse()?,
        None => StandardFamily::Api526,
    };
    let table = OrificeTable::standard();
    println!("{} orifices:", family);
    for record in table.family(family) {
        let size = psv_sizing::api_526_valve_size(record.designation)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {:>9.1} mm²  threaded max {:>6.1} barg  API size {}",
            record.designation, record.area_mm2, record.max_set_pressure_barg, size
        );
    }
    Ok(())
}

fn cmd_eta_c(omega: f64) -> AppResult<()> {
    if !omega.is_finite() {
        return Err(AppError::InvalidInput("omega must be finite".to_string()));
    }
    let ratio = solve_eta_c(omega);
    println!(
        "eta_c = {:.6}  ({:?} after {} iterations)",
        ratio.eta_c, ratio.outcome, ratio.iterations
    );
    Ok(())
}

fn cmd_fluids() -> AppResult<()> {
    println!("Fluids available by name:");
    for entry in psv_fluids::fluid_catalog() {
        println!(
            "  {:<20} M = {:>8.3} g/mol  aliases: {}",
            entry.display_name,
            entry.species.molar_mass(),
            entry.aliases.join(", ")
        );
    }
    Ok(())
}
