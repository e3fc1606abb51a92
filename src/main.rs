use crate::config::Config;
use crate::manager::StudentManager;
use clap::{ArgAction, Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::Level;

mod config;
mod display;
mod errors;
mod loaders;
mod manager;
mod model;
mod shell;

#[derive(Parser)]
#[command(version, about)]
struct Options {
    /// Use FILE instead of the default settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the roster
    List {
        /// Print the roster as CSV
        #[arg(long)]
        csv: bool,
    },
    /// Log a student in
    Login { id: String, name: String },
    /// Register a new student
    Register {
        id: String,
        name: String,
        study_program: String,
    },
    /// Show a study program name, or all of them
    Program { code: Option<String> },
    /// Change the study program of the first student with this name
    ChangeProgram { name: String, study_program: String },
    /// Import students from CSV files and show the resulting roster
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the roster as CSV
        #[arg(long)]
        csv: bool,
    },
    /// Submit assignments
    Submit { count: usize },
    /// Read commands from the standard input
    Shell,
}

fn show(manager: &StudentManager, csv: bool) -> Result<()> {
    if csv {
        Ok(display::export_students(manager.students(), std::io::stdout())?)
    } else {
        display::display_students(manager.students());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = match &options.config {
        Some(file_name) => Config::load(file_name)?,
        None => Config::default(),
    };
    let mut manager = StudentManager::with_config(&config);
    match options.command.unwrap_or(Command::Shell) {
        Command::List { csv } => show(&manager, csv)?,
        Command::Login { id, name } => println!("{}", manager.login(&id, &name)?),
        Command::Register {
            id,
            name,
            study_program,
        } => println!("{}", manager.register(&id, &name, &study_program)?),
        Command::Program { code: Some(code) } => {
            println!("{}", StudentManager::study_program(&code)?);
        }
        Command::Program { code: None } => display::display_study_programs(),
        Command::ChangeProgram {
            name,
            study_program,
        } => {
            let message = manager.modify_student(
                &name,
                StudentManager::change_study_program(&study_program),
            )?;
            println!("{message}");
            show(&manager, false)?;
        }
        Command::Import { paths, csv } => {
            manager.import_students(&paths).await?;
            show(&manager, csv)?;
        }
        Command::Submit { count } => {
            manager.submit_assignments(count).await;
            println!("{count} assignments submitted");
        }
        Command::Shell => shell::run(&mut manager, BufReader::new(tokio::io::stdin())).await?,
    }
    Ok(())
}
