use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use level_quiz::vehicle::{VehicleCatalog, View};
use level_quiz::{EngineConfig, Quiz, QuizError, logging};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the multi-level quiz in the terminal
    Quiz {
        /// JSON file to load the levels from
        #[arg(short, long, default_value = "data/quiz_data.json")]
        questions: PathBuf,

        /// Do not offer the "I don't know" choice
        #[arg(long)]
        no_unknown_option: bool,

        /// Append logs to this file while the quiz runs
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Show the features of a vehicle by registration number
    Vehicle {
        /// JSON file holding vehicle records
        #[arg(short, long, default_value = "data/car_data.json")]
        data: PathBuf,

        /// Registration number to look up
        registration: String,

        /// Which view's features to list
        #[arg(long, value_enum, default_value_t = View::Front)]
        view: View,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Quiz {
            questions,
            no_unknown_option,
            log_file,
        } => run_quiz(questions, no_unknown_option, log_file),
        Command::Vehicle {
            data,
            registration,
            view,
        } => run_vehicle(data, &registration, view),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_quiz(
    questions: PathBuf,
    no_unknown_option: bool,
    log_file: Option<PathBuf>,
) -> Result<(), QuizError> {
    if let Some(path) = log_file {
        logging::init_file(&path)?;
    }

    let config = EngineConfig {
        include_unknown_option: !no_unknown_option,
    };
    Quiz::from_json(questions, config)?.run()
}

fn run_vehicle(data: PathBuf, registration: &str, view: View) -> Result<(), QuizError> {
    logging::init_stderr();

    let catalog = VehicleCatalog::from_json(data)?;
    let Some(vehicle) = catalog.lookup(registration) else {
        return Err(QuizError::VehicleNotFound(registration.trim().to_uppercase()));
    };

    println!("Details for {}:", registration.trim().to_uppercase());
    println!(
        "Brand: {}  ·  Model: {}  ·  Year: {}",
        vehicle.brand, vehicle.model, vehicle.year
    );
    println!();
    println!("{} ({})", view, view.image_file());
    for (name, description) in vehicle.features(view) {
        println!("  {name}: {description}");
    }

    Ok(())
}
