use clap::{Parser, Subcommand};

/// HSR engine — rates foods and meals with evidence-adjusted thresholds.
#[derive(Parser, Debug)]
#[command(name = "hsr_engine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the meal JSON file (an array of food records).
    #[arg(short, long, default_value = "meal.json")]
    pub file: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate the Health Star Rating for the meal.
    Rate {
        /// Print the full result as JSON instead of the summary view.
        #[arg(long)]
        json: bool,

        /// Supply the meal category ("2", "dairy_food", ...) instead of
        /// auto-detection.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the category analysis without scoring.
    Categorize,
}

impl Default for Command {
    fn default() -> Self {
        Command::Rate {
            json: false,
            category: None,
        }
    }
}
