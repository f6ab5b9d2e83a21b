//! `edgemgmt validate`: check a connection profile for errors.
//!
//! Parses and validates the profile, reporting results in either
//! human-readable text or machine-readable JSON format. No request is
//! made to the management server.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::{read_profile, validation};
use crate::error::EdgeError;

pub async fn execute(args: &ValidateArgs) -> Result<(), EdgeError> {
    let path = &args.profile;
    let profile = read_profile(path).await?;

    if let Err(errors) = validation::validate(&profile) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(EdgeError::ConfigValidation { errors });
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &profile)
            );
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "org": profile.org,
                    "mgmt_server": profile.mgmt_server,
                })
            );
        }
    }

    Ok(())
}
