//! # API Input Validator
//!
//! A command-line utility for checking a JSON payload against a JSON rule
//! file, the same way an API endpoint would check its request parameters.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin api-input-validator rules/host.create.json request.json
//! cargo run --bin api-input-validator rules/host.create.json request.json /params
//! ```
//!
//! The optional third argument is the path used in error messages; it
//! defaults to `/`.
//!
//! ## Rule Files
//!
//! A rule file holds one rule tree:
//!
//! ```json
//! {
//!     "type": "objects",
//!     "uniq": [["host"]],
//!     "fields": {
//!         "host": {"type": "h_name", "flags": ["required"], "length": 128},
//!         "name": {"type": "string_utf8", "length": 128, "default_source": "host"},
//!         "status": {"type": "int32", "in": "0,1", "default": 0}
//!     }
//! }
//! ```
//!
//! ## Output
//!
//! On success the normalized payload is written to standard output:
//!
//! ```text
//! ✓ Input is valid
//! [{"host":"web-01","name":"web-01","status":0}]
//! ```
//!
//! On failure the validation message is written to standard error:
//!
//! ```text
//! ❌ Invalid parameter "/1/status": value must be one of 0, 1.
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: The payload is valid
//! - `1`: The payload is invalid, or a file could not be loaded
//! - `2`: Wrong command-line arguments

use api_input_validator::{Rule, RuleError, RuleResult, Validator, Value};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <rules.json> <data.json> [path]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} rules/host.create.json request.json", args[0]);
        eprintln!("  {} rules/host.create.json request.json /params", args[0]);
        process::exit(2);
    }

    let path = args.get(3).map(String::as_str).unwrap_or("/");

    let rule: Rule = match load_json(Path::new(&args[1])) {
        Ok(rule) => rule,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };
    let data: Value = match load_json(Path::new(&args[2])) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    match Validator::new().validate(&rule, data, path) {
        Ok(normalized) => {
            println!("✓ Input is valid");
            println!("{}", normalized);
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(file_path: &Path) -> RuleResult<T> {
    let display = file_path.display().to_string();

    let content = fs::read_to_string(file_path).map_err(|source| RuleError::Io {
        path: display.clone(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| RuleError::Json {
        path: display,
        source,
    })
}
