// minic: parser, semantic checker and inspector for a small teaching language

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as CliParser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use minic::constants::MAX_ERRORS;
use minic::parser::{Lexer, Parser, ParserConfig, TokenKind};
use minic::semantic::SemanticAnalyzer;
use minic::ui::{App, Inspection};

#[derive(CliParser)]
#[command(name = "minic", version, about)]
struct Cli {
    /// Maximum number of diagnostics kept per phase
    #[arg(long, global = true, default_value_t = MAX_ERRORS)]
    max_errors: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and analyze a file, reporting diagnostics
    Check { file: PathBuf },
    /// Print the syntax tree of a file
    Ast { file: PathBuf },
    /// Print the token stream of a file
    Tokens { file: PathBuf },
    /// Browse source, syntax tree and diagnostics in the terminal
    Inspect { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Check { file } => check(file, cli.max_errors),
        Command::Ast { file } => print_ast(file, cli.max_errors),
        Command::Tokens { file } => print_tokens(file),
        Command::Inspect { file } => inspect(file, cli.max_errors),
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn parser_for(source: &str, max_errors: usize) -> Parser {
    let config = ParserConfig {
        max_errors,
        ..ParserConfig::default()
    };
    Parser::with_config(Lexer::new(source), config)
}

fn check(path: &Path, max_errors: usize) -> Result<ExitCode> {
    let source = read_source(path)?;
    info!("checking {}", path.display());

    let mut parser = parser_for(&source, max_errors);
    let program = parser.parse();

    if parser.has_errors() {
        eprint!("{}", parser.diagnostics());
        eprintln!(
            "Syntax analysis: FAILED ({} error(s))",
            parser.error_count() + parser.diagnostics().dropped()
        );
        return Ok(ExitCode::FAILURE);
    }
    println!("Syntax analysis: PASSED");

    let mut analyzer = SemanticAnalyzer::with_error_limit(max_errors);
    let passed = analyzer.analyze(&program);

    eprint!("{}", analyzer.warning_diagnostics());
    eprint!("{}", analyzer.error_diagnostics());

    if passed {
        println!(
            "Semantic analysis: PASSED ({} warning(s))",
            analyzer.warnings().len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "Semantic analysis: FAILED ({} error(s))",
            analyzer.errors().len() + analyzer.error_diagnostics().dropped()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn print_ast(path: &Path, max_errors: usize) -> Result<ExitCode> {
    let source = read_source(path)?;
    let mut parser = parser_for(&source, max_errors);
    let program = parser.parse();

    print!("{}", program);
    if parser.has_errors() {
        eprint!("{}", parser.diagnostics());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_tokens(path: &Path) -> Result<ExitCode> {
    let source = read_source(path)?;
    let tokens = Lexer::new(&source).tokenize();

    let mut lexical_errors = 0;
    for token in &tokens {
        if matches!(token.kind, TokenKind::Error(_)) {
            lexical_errors += 1;
        }
        println!("{}", token);
    }

    if lexical_errors > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn inspect(path: &Path, max_errors: usize) -> Result<ExitCode> {
    let source = read_source(path)?;
    let inspection = Inspection::run(&source, max_errors);

    // Set up terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(path.display().to_string(), source, inspection);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("inspector failed")?;
    Ok(ExitCode::SUCCESS)
}
