// Command line front end for the MRZ parser

use clap::Parser;
use log::{error, info};
use mrz_parser::{MrzError, MrzParser, MrzResult, ParserConfig};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// Parse and validate the machine readable zone of a travel document.
///
/// Lines are taken from the arguments, or from stdin when none are given.
#[derive(Parser, Debug)]
#[command(name = "mrz", version, about)]
struct Cli {
    /// MRZ lines, top to bottom
    lines: Vec<String>,

    /// Skip the OCR correction tables for each field type
    #[arg(long)]
    no_correction: bool,

    /// JSON parser configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn status(is_valid: bool) -> &'static str {
    if is_valid {
        "PASSED"
    } else {
        "FAILED"
    }
}

fn optional_status(is_valid: Option<bool>) -> &'static str {
    is_valid.map(status).unwrap_or("N/A")
}

// Function to print a detailed parsing report
fn print_detailed_report(result: &MrzResult) {
    println!("\n===============================================");
    println!("            MRZ DETAILED REPORT");
    println!("===============================================\n");

    println!("DOCUMENT INFORMATION:");
    println!("  Format: {}", result.format);
    println!("  Document Type: {}", result.document_type);
    println!("  Issuing Country: {}", result.country_code);
    println!("  Document Number: {}", result.document_number);
    println!("  Surnames: {}", result.surnames);
    println!("  Given Names: {}", result.given_names);
    println!("  Nationality: {}", result.nationality_country_code);
    match result.birthdate {
        Some(date) => println!("  Date of Birth: {}", date),
        None => println!("  Date of Birth: invalid"),
    }
    match result.sex {
        Some(sex) => println!("  Sex: {}", sex),
        None => println!("  Sex: invalid"),
    }
    match result.expiry_date {
        Some(date) => println!("  Date of Expiry: {}", date),
        None => println!("  Date of Expiry: invalid"),
    }
    println!("  Personal Number: {}", result.personal_number);
    if let Some(personal_number2) = &result.personal_number2 {
        println!("  Optional Data: {}", personal_number2);
    }

    println!("\nCHECK DIGITS:");
    println!("  1. Document Number: {}", status(result.is_document_number_valid));
    println!("  2. Date of Birth: {}", status(result.is_birthdate_valid));
    println!("  3. Date of Expiry: {}", status(result.is_expiry_date_valid));
    println!("  4. Personal Number: {}", optional_status(result.is_personal_number_valid));
    println!("  5. Composite: {}", optional_status(result.is_composite_valid));

    println!(
        "\nMRZ check digit result: {}",
        if result.all_check_digits_valid { "VALID" } else { "INVALID" }
    );
}

fn read_stdin() -> Result<String, MrzError> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn run(cli: Cli) -> Result<bool, MrzError> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_file(path)?,
        None => ParserConfig::default(),
    };
    if cli.no_correction {
        config.ocr_correction = false;
    }
    let parser = MrzParser::with_config(config);

    let result = if cli.lines.is_empty() {
        info!("Reading MRZ text from stdin");
        parser.parse_text(&read_stdin()?)
    } else {
        parser.parse(&cli.lines)
    };

    let result = match result {
        Some(result) => result,
        None => {
            eprintln!("Input does not match any supported MRZ layout");
            return Ok(false);
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| MrzError::FormatError(format!("Failed to serialize result: {}", e)))?;
        println!("{}", json);
    } else {
        print_detailed_report(&result);
    }
    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error parsing MRZ: {}", err);
            ExitCode::FAILURE
        }
    }
}
