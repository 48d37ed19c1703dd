use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use hsr_engine_rs::cli::{Cli, Command};
use hsr_engine_rs::error::Result;
use hsr_engine_rs::lookup::load_meal_file;
use hsr_engine_rs::models::{Category, Meal};
use hsr_engine_rs::render::{display_classification, display_result};
use hsr_engine_rs::scoring::HsrCalculator;
use hsr_engine_rs::HsrError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Rate { json, category } => cmd_rate(&cli.file, json, category.as_deref()),
        Command::Categorize => cmd_categorize(&cli.file),
    }
}

fn load_meal(file_path: &str, category: Option<&str>) -> Result<Meal> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(HsrError::InvalidInput(format!(
            "meal file not found: {}",
            file_path
        )));
    }

    let foods = load_meal_file(path)?;

    match category {
        None => Ok(Meal::new(foods)),
        Some(raw) => {
            let category = Category::parse(raw).ok_or_else(|| {
                HsrError::InvalidInput(format!("unknown category: {}", raw))
            })?;
            Ok(Meal::with_category(foods, category))
        }
    }
}

/// Rate the meal and print the result.
fn cmd_rate(file_path: &str, json: bool, category: Option<&str>) -> Result<()> {
    let meal = load_meal(file_path, category)?;

    let result = HsrCalculator::new(&meal).calculate();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_result(&result);
    }

    Ok(())
}

/// Show the category analysis without scoring.
fn cmd_categorize(file_path: &str) -> Result<()> {
    let meal = load_meal(file_path, None)?;
    display_classification(&meal);
    Ok(())
}
