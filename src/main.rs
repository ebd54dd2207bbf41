use clap::Parser;
use log::info;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use quill::core::config;
use quill::tui;

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Terminal front-end for interactive fiction interpreters"
)]
struct Args {
    /// Story/data file handed to the interpreter
    story: PathBuf,

    /// Interpreter executable to run the story with
    #[arg(short, long)]
    interpreter: Option<String>,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // File logger — the terminal itself is the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("quill.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    if !args.story.is_file() {
        eprintln!("Error: story file not found: {}", args.story.display());
        eprintln!();
        eprintln!("Please check:");
        eprintln!("• File path is correct");
        eprintln!("• You're running from the right directory");
        eprintln!("• File exists and is readable");
        std::process::exit(1);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let config = config::resolve(&file_config, args.interpreter.as_deref(), args.story);

    info!(
        "Quill starting: {} via {}",
        config.story.display(),
        config.interpreter
    );

    tui::run(config)
}
