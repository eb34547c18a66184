//! # CoreStrength CLI
//!
//! Command line front end for concrete core strength evaluation.
//!
//! ```text
//! strength evaluate --diameter 68 --length 132 --load 175 --grade 50 --csv out.csv
//! strength project new cores.csp --engineer "A. Engineer" --job-id 25-001 --structure "Podium"
//! strength project add cores.csp --label C-1 --diameter 68 --length 132 --load 175 --grade 50
//! strength project report cores.csp --pdf cores.pdf
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod display;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use strength_core::calculations::{calculate, Measurement};
use strength_core::errors::CalcError;
use strength_core::export::{to_csv, to_csv_rows};
use strength_core::file_io::{load_project, save_project, write_export};
use strength_core::pdf::{render_evaluation_pdf, render_project_pdf, ReportHeader};
use strength_core::project::{InputFloors, Project};

#[derive(Parser, Debug)]
#[command(name = "strength")]
#[command(about = "Concrete core compressive strength evaluation (IS 516)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a single core and optionally export the report
    Evaluate(EvaluateArgs),

    /// Manage a multi-core project file
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
}

/// The four core measurements. Defaults are a typical 68 mm core.
#[derive(Args, Debug, Clone, Copy)]
struct MeasurementArgs {
    /// Core diameter (mm)
    #[arg(long, default_value_t = 68.0)]
    diameter: f64,

    /// Core length (mm)
    #[arg(long, default_value_t = 132.0)]
    length: f64,

    /// Load applied (kN)
    #[arg(long, default_value_t = 175.0)]
    load: f64,

    /// Concrete grade (MPa)
    #[arg(long, default_value_t = 50.0)]
    grade: f64,
}

impl MeasurementArgs {
    fn measurement(&self) -> Measurement {
        Measurement::new(self.diameter, self.length, self.load, self.grade)
    }
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    measurement: MeasurementArgs,

    /// Print the result as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Write the CSV report to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the PDF report to this path
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Sample label for the PDF title
    #[arg(long, default_value = "Core Sample")]
    label: String,

    /// Engineer name for the PDF header
    #[arg(long, default_value = "")]
    engineer: String,

    /// Job ID for the PDF header
    #[arg(long, default_value = "")]
    job_id: String,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// Create an empty project file
    New {
        path: PathBuf,
        #[arg(long)]
        engineer: String,
        #[arg(long)]
        job_id: String,
        #[arg(long)]
        structure: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add a core sample to a project
    Add {
        path: PathBuf,
        #[arg(long)]
        label: String,
        #[arg(long)]
        location: Option<String>,
        #[command(flatten)]
        measurement: MeasurementArgs,
    },

    /// Remove a core sample by label
    Remove {
        path: PathBuf,
        #[arg(long)]
        label: String,
    },

    /// Evaluate every sample and export the package
    Report {
        path: PathBuf,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::level_filters::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(calc_error) = e.downcast_ref::<CalcError>() {
                if let Ok(json) = serde_json::to_string_pretty(calc_error) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Evaluate(args) => evaluate(args),
        Command::Project { command } => match command {
            ProjectCommand::New {
                path,
                engineer,
                job_id,
                structure,
                force,
            } => project_new(&path, engineer, job_id, structure, force),
            ProjectCommand::Add {
                path,
                label,
                location,
                measurement,
            } => project_add(&path, label, location, measurement.measurement()),
            ProjectCommand::Remove { path, label } => project_remove(&path, &label),
            ProjectCommand::Report { path, csv, pdf } => {
                project_report(&path, csv.as_deref(), pdf.as_deref())
            }
        },
    }
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let measurement = args.measurement.measurement();
    InputFloors::default()
        .check(&measurement)
        .context("measurement below input floor")?;

    let result = calculate(&measurement).context("evaluation failed")?;
    if !result.passes() {
        warn!(
            corrected_mpa = result.corrected_strength_mpa,
            required_mpa = result.required_strength_mpa,
            "core does not reach 75% of grade"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_summary(&result);
        display::print_breakdown(&result);
    }

    if let Some(path) = &args.csv {
        let csv = to_csv(&result)?;
        write_export(path, csv.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(path) = &args.pdf {
        let header = ReportHeader::new(&args.engineer, &args.job_id, &args.label);
        let pdf = render_evaluation_pdf(&result, &header)?;
        write_export(path, &pdf).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

fn project_new(
    path: &Path,
    engineer: String,
    job_id: String,
    structure: String,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let project = Project::new(engineer, job_id, structure);
    save_project(&project, path)?;
    println!("Created project {}", path.display());
    Ok(())
}

fn project_add(
    path: &Path,
    label: String,
    location: Option<String>,
    measurement: Measurement,
) -> Result<()> {
    let mut project = open(path)?;

    if project.find_by_label(&label).is_some() {
        bail!("sample '{}' already exists in {}", label, path.display());
    }
    project
        .settings
        .input_floors
        .check(&measurement)
        .with_context(|| format!("sample '{}'", label))?;

    let result = calculate(&measurement).with_context(|| format!("sample '{}'", label))?;
    let id = project.add_sample(label.clone(), location, measurement);
    save_project(&project, path)?;

    info!(%id, label = %label, status = %result.status, "added sample");
    println!(
        "Added {} ({}): corrected {:.2} MPa, {}",
        label, id, result.corrected_strength_mpa, result.status
    );
    Ok(())
}

fn project_remove(path: &Path, label: &str) -> Result<()> {
    let mut project = open(path)?;
    project.remove_by_label(label)?;
    save_project(&project, path)?;
    println!("Removed {}", label);
    Ok(())
}

fn project_report(path: &Path, csv: Option<&Path>, pdf: Option<&Path>) -> Result<()> {
    let project = open(path)?;
    let evaluated = project.evaluate_all()?;

    println!(
        "{} / {} / {} ({} samples)",
        project.meta.job_id,
        project.meta.structure,
        project.meta.engineer,
        evaluated.len()
    );
    println!();
    display::print_project_table(&evaluated);

    let failures = evaluated.iter().filter(|(_, r)| !r.passes()).count();
    if failures > 0 {
        warn!(failures, "samples below 75% of grade");
    }

    if let Some(csv_path) = csv {
        let rows: Vec<(&str, _)> = evaluated
            .iter()
            .map(|(sample, result)| (sample.label.as_str(), result.clone()))
            .collect();
        let text = to_csv_rows(&rows)?;
        write_export(csv_path, text.as_bytes())
            .with_context(|| format!("writing {}", csv_path.display()))?;
    }

    if let Some(pdf_path) = pdf {
        let bytes = render_project_pdf(&project)?;
        write_export(pdf_path, &bytes)
            .with_context(|| format!("writing {}", pdf_path.display()))?;
    }

    Ok(())
}

fn open(path: &Path) -> Result<Project> {
    load_project(path).with_context(|| format!("opening project {}", path.display()))
}
