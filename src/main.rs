// Passport MRZ parsing and expiry validation over OCR text dumps.

use std::fs;
use std::io::{self, Read};
use std::process;

use chrono::NaiveDate;
use clap::Parser;

use passcheck::models::{ExtractionMethod, PassportScan};
use passcheck::PassportReader;

#[derive(Parser)]
#[command(
    name = "passcheck",
    about = "Parse passport MRZ text and check document validity"
)]
struct Cli {
    /// Path to an OCR text dump, or "-" to read from stdin
    input: String,

    /// Verification date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Emit the scan result as JSON
    #[arg(long)]
    json: bool,
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

fn print_report(scan: &PassportScan) {
    println!("===============================================");
    println!("           PASSPORT SCAN REPORT");
    println!("===============================================");
    println!(
        "Extraction method: {}",
        match scan.method {
            ExtractionMethod::Mrz => "MRZ",
            ExtractionMethod::VisualZone => "visual zone (no MRZ found)",
        }
    );

    if let Some(fields) = &scan.mrz {
        println!("\nPASSPORT INFORMATION:");
        println!("  Document Type:   {}", fields.document_type);
        println!("  Issuing State:   {}", fields.issuing_state);
        println!("  Document Number: {}", fields.document_number);
        println!("  Surname:         {}", fields.surname);
        println!("  Given Names:     {}", fields.given_names);
        println!("  Nationality:     {}", fields.nationality);
        println!("  Date of Birth:   {}", fields.date_of_birth);
        println!("  Sex:             {}", fields.sex);
        println!("  Date of Expiry:  {}", fields.date_of_expiry);
        println!("  Personal Number: {:?}", fields.personal_number);

        let status = &fields.check_status;
        println!("\nCHECK DIGITS:");
        let verdict = |ok: bool| if ok { "PASSED" } else { "FAILED" };
        println!(
            "  1. Document Number: {}",
            verdict(status.document_number_ok)
        );
        println!("  2. Date of Birth:   {}", verdict(status.date_of_birth_ok));
        println!(
            "  3. Date of Expiry:  {}",
            verdict(status.date_of_expiry_ok)
        );
        println!(
            "  4. Personal Number: {}",
            verdict(status.personal_number_ok)
        );
        println!("  5. Composite:       {}", verdict(status.composite_ok));
        println!(
            "\nMRZ integrity: {}",
            if fields.is_fully_valid {
                "FULLY VALID"
            } else {
                "CHECK DIGIT FAILURES - manual review advised"
            }
        );
    }

    if let Some(visual) = &scan.visual {
        println!("\nVISUAL ZONE FIELDS:");
        println!("  Document Number: {:?}", visual.document_number);
        println!("  Surname:         {:?}", visual.surname);
        println!("  Given Names:     {:?}", visual.given_names);
        println!("  Date of Birth:   {:?}", visual.date_of_birth);
        println!("  Place of Birth:  {:?}", visual.place_of_birth);
        println!("  Date of Issue:   {:?}", visual.date_of_issue);
        println!("  Date of Expiry:  {:?}", visual.date_of_expiry);
        println!("  Authority:       {:?}", visual.authority);
    }

    match &scan.validation {
        Some(validation) => {
            println!("\nEXPIRY VALIDATION:");
            println!("  Expiry Date:       {}", validation.expiry_date_display);
            println!(
                "  Verification Date: {}",
                validation.verification_date_display
            );
            println!("  Days Remaining:    {}", validation.days_remaining);
            println!("  Alert Level:       {}", validation.alert_level);
            println!("  Status:            {}", validation.message);
        }
        None => println!("\nEXPIRY VALIDATION: no expiry date available"),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let text = match read_input(&cli.input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error reading {}: {}", cli.input, err);
            process::exit(1);
        }
    };

    let reader = PassportReader::new();
    let result = match cli.date {
        Some(date) => reader.read_with_reference(&text, date),
        None => reader.read(&text),
    };

    match result {
        Ok(scan) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&scan).expect("scan serializes")
                );
            } else {
                print_report(&scan);
            }
        }
        Err(err) => {
            eprintln!("Error scanning passport text: {}", err);
            process::exit(1);
        }
    }
}
