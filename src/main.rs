use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use loxwalk::ast_printer::AstPrinter;
use loxwalk::diagnostics::Diagnostics;
use loxwalk::parser::Parser;
use loxwalk::runner::{self, Lox, Outcome};
use loxwalk::scanner::{scan_tokens, Scanner};

const PROMPT: &str = "> ";

#[derive(ClapParser, Debug)]
#[command(version, about = "Tree-walking Lox interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses input from a file as a single expression and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the AST as JSON instead of prefix notation
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive session
    Repl,
}

fn read_source(filename: &Path) -> Result<String> {
    runner::read_source(filename).context(format!("Failed to read file {:?}", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'loxwalk::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("loxwalk::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for error in diagnostics.errors() {
        eprintln!("{}", error);
    }
}

fn exit_with(outcome: Outcome) {
    if outcome != Outcome::Success {
        debug!("Exiting with {:?}", outcome);
        std::process::exit(outcome.exit_code());
    }
}

fn tokenize(filename: &Path) -> Result<()> {
    let source = read_source(filename)?;
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        exit_with(Outcome::StaticError);
    }

    Ok(())
}

fn parse(filename: &Path, json: bool) -> Result<()> {
    let source = read_source(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = scan_tokens(&source, &mut diagnostics);
    let expr = Parser::new(tokens).parse_expression(&mut diagnostics);

    match expr {
        Some(expr) if !diagnostics.had_error() => {
            if json {
                println!("{}", serde_json::to_string_pretty(&expr)?);
            } else {
                println!("{}", AstPrinter.print(&expr));
            }
        }
        _ => {
            print_diagnostics(&diagnostics);
            exit_with(Outcome::StaticError);
        }
    }

    Ok(())
}

fn evaluate(filename: &Path) -> Result<()> {
    let source = read_source(filename)?;
    let mut lox = Lox::new();

    let outcome = lox.evaluate(&source);
    print_diagnostics(lox.diagnostics());
    exit_with(outcome);

    Ok(())
}

fn run(filename: &Path) -> Result<()> {
    let source = read_source(filename)?;
    let mut lox = Lox::new();

    let outcome = lox.run(&source);
    print_diagnostics(lox.diagnostics());
    exit_with(outcome);

    Ok(())
}

fn repl() -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;
    let mut lox = Lox::new();

    println!("type 'exit' to quit");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();

                if line == "exit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line);

                let outcome = lox.run(line);
                debug!("REPL line finished with {:?}", outcome);

                print_diagnostics(lox.diagnostics());

                // One bad line must not poison the next.
                lox.reset();
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read line"),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Commands::Tokenize { filename } => tokenize(filename),
        Commands::Parse { filename, json } => parse(filename, *json),
        Commands::Evaluate { filename } => evaluate(filename),
        Commands::Run { filename } => run(filename),
        Commands::Repl => repl(),
    }
}
