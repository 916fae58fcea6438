//! nutricalc CLI - Command-line interface for the nutrition engine
//!
//! Commands:
//! - assess: run one calculation pass over an input record
//! - validate: parse an input record and check the mandatory triple
//! - schema: print example input / output records

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};

use nutricalc::export::{self, NoteFields, OrderOptions};
use nutricalc::intake::AssessmentInput;
use nutricalc::{CalcError, NutritionEngine, ENGINE_VERSION};

/// nutricalc - Clinical nutrition calculation engine
#[derive(Parser)]
#[command(name = "nutricalc")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute nutrition assessment reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one calculation pass over an input record
    Assess {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,

        /// Catalog override CSV; a malformed file keeps the default catalog
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Report date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Patient identifier carried on FHIR resources
        #[arg(long)]
        patient_id: Option<String>,
    },

    /// Parse an input record and check the mandatory anthropometric triple
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
    /// Markdown meal plan
    Markdown,
    /// Markdown clinical note skeleton
    Note,
    /// FHIR-style NutritionOrder resource
    FhirOrder,
    /// FHIR-style NutritionIntake resource
    FhirIntake,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Example input record
    Input,
    /// Example output report
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), NutriCliError> {
    match cli.command {
        Commands::Assess {
            input,
            output,
            format,
            catalog,
            date,
            patient_id,
        } => cmd_assess(
            &input,
            &output,
            format,
            catalog.as_deref(),
            date.as_deref(),
            patient_id,
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_assess(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    catalog: Option<&Path>,
    date: Option<&str>,
    patient_id: Option<String>,
) -> Result<(), NutriCliError> {
    let input_data = read_input(input)?;
    let record = AssessmentInput::from_json(&input_data)?;

    let mut engine = NutritionEngine::new();
    if let Some(catalog_path) = catalog {
        // Malformed overrides keep the default catalog in force
        let csv_data = fs::read_to_string(catalog_path)?;
        engine.load_catalog_csv(&csv_data);
    }

    let report = engine.assess(&record)?;

    let date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| NutriCliError::BadDate(e.to_string()))?,
        None => Utc::now().date_naive(),
    };

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(&report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&report)?,
        OutputFormat::Markdown => export::plan_markdown(&report, date),
        OutputFormat::Note => {
            export::clinical_note_markdown(&report, &NoteFields::default(), date)
        }
        OutputFormat::FhirOrder => {
            let options = OrderOptions {
                patient_id,
                ..Default::default()
            };
            serde_json::to_string_pretty(&export::fhir_nutrition_order(&report, &options, date))?
        }
        OutputFormat::FhirIntake => {
            serde_json::to_string_pretty(&export::fhir_nutrition_intake(&report, date))?
        }
    };

    write_output(output, &rendered)
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), NutriCliError> {
    let input_data = read_input(input)?;

    let outcome = AssessmentInput::from_json(&input_data).and_then(|record| record.validate());

    match (&outcome, json) {
        (Ok(()), true) => {
            println!("{}", serde_json::json!({ "valid": true }));
            Ok(())
        }
        (Ok(()), false) => {
            println!("Input record is valid");
            Ok(())
        }
        (Err(e), true) => {
            println!(
                "{}",
                serde_json::json!({ "valid": false, "error": e.to_string() })
            );
            Err(NutriCliError::ValidationFailed)
        }
        (Err(e), false) => {
            println!("Input record is invalid: {e}");
            Err(NutriCliError::ValidationFailed)
        }
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), NutriCliError> {
    let example = AssessmentInput::example();
    let rendered = match schema_type {
        SchemaType::Input => serde_json::to_string_pretty(&example)?,
        SchemaType::Output => {
            let report = NutritionEngine::new().assess(&example)?;
            serde_json::to_string_pretty(&report)?
        }
    };
    println!("{rendered}");
    Ok(())
}

fn read_input(path: &Path) -> Result<String, NutriCliError> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(NutriCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(path: &Path, data: &str) -> Result<(), NutriCliError> {
    if path.to_string_lossy() == "-" {
        println!("{data}");
        Ok(())
    } else {
        fs::write(path, data)?;
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum NutriCliError {
    Io(io::Error),
    Calc(CalcError),
    Json(serde_json::Error),
    BadDate(String),
    NoInput,
    ValidationFailed,
}

impl From<io::Error> for NutriCliError {
    fn from(e: io::Error) -> Self {
        NutriCliError::Io(e)
    }
}

impl From<CalcError> for NutriCliError {
    fn from(e: CalcError) -> Self {
        NutriCliError::Calc(e)
    }
}

impl From<serde_json::Error> for NutriCliError {
    fn from(e: serde_json::Error) -> Self {
        NutriCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<NutriCliError> for CliError {
    fn from(e: NutriCliError) -> Self {
        match e {
            NutriCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            NutriCliError::Calc(e) => CliError {
                code: "CALC_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'nutricalc schema input' for an example record".to_string()),
            },
            NutriCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            NutriCliError::BadDate(msg) => CliError {
                code: "BAD_DATE".to_string(),
                message: msg,
                hint: Some("Use YYYY-MM-DD".to_string()),
            },
            NutriCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "No input provided on stdin".to_string(),
                hint: Some("Pipe a record in or pass --input <file>".to_string()),
            },
            NutriCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Input record failed validation".to_string(),
                hint: Some("Fix the reported field and retry".to_string()),
            },
        }
    }
}
