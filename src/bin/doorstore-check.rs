//! # Door Document Checker
//!
//! Checks a door document for problems the server would otherwise only hit at write
//! time: entries that are not doors, empty or duplicate ids, and an id counter that
//! has fallen behind.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin doorstore-check db.json
//! ```
//!
//! ## Output Examples
//!
//! ```text
//! Checking door document: db.json
//! ✓ Document is valid (3 doors)
//! ```
//!
//! ```text
//! Checking door document: db.json
//! ❌ error: entry 1 reuses id '2'
//! ⚠ warning: no 'doors' collection
//! ```
//!
//! Exits with status 1 when the file cannot be read or has error-level issues.

use doorstore::integrity::{IssueSeverity, check_document};
use doorstore::storage::parse_document;
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <door-document>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} db.json", args[0]);
        process::exit(1);
    }

    let path = &args[1];
    println!("Checking door document: {}", path);

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Failed to read file: {}", e);
            process::exit(1);
        }
    };
    let document = match parse_document(&content) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    let report = check_document(&document);
    for issue in &report.issues {
        match issue.severity() {
            IssueSeverity::Error => println!("❌ error: {}", issue),
            IssueSeverity::Warning => println!("⚠ warning: {}", issue),
        }
    }

    if report.is_valid() {
        println!("✓ Document is valid ({} doors)", report.door_count);
    } else {
        process::exit(1);
    }
}
