use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use lox_core::{CoreError, Interpreter};

/// Exit status for input that failed to scan or parse.
const EX_DATAERR: u8 = 65;
/// Exit status for input that failed during evaluation.
const EX_SOFTWARE: u8 = 70;

/// Evaluate Lox expressions from a script, an inline argument, or a prompt.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(help = "Script to run; starts an interactive prompt when omitted")]
    script: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "SOURCE",
        conflicts_with = "script",
        help = "Evaluate an inline expression"
    )]
    expr: Option<String>,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "value",
        help = "Output format: value, ast, tokens"
    )]
    emit: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    match cli.emit.as_str() {
        "value" | "ast" | "tokens" => {}
        other => bail!("unsupported emit format: {other}"),
    }

    if let Some(source) = cli.expr {
        return Ok(run_once(&source, &cli.emit));
    }

    match cli.script {
        Some(path) => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            Ok(run_once(&source, &cli.emit))
        }
        None => run_prompt(&cli.emit),
    }
}

fn run_once(source: &str, emit: &str) -> ExitCode {
    let mut session = Interpreter::new();
    match run_unit(&mut session, source, emit) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            match err {
                CoreError::Syntax(_) => ExitCode::from(EX_DATAERR),
                CoreError::Runtime(_) => ExitCode::from(EX_SOFTWARE),
            }
        }
    }
}

fn run_prompt(emit: &str) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = Interpreter::new();

    loop {
        print!("> ");
        stdout.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            println!();
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        if let Err(err) = run_unit(&mut session, &line, emit) {
            eprintln!("{err}");
        }
        // Each prompt line is its own unit.
        session.reset();
    }

    Ok(ExitCode::SUCCESS)
}

fn run_unit(session: &mut Interpreter, source: &str, emit: &str) -> Result<(), CoreError> {
    match emit {
        "tokens" => {
            let lexed = session.scan(source);
            for token in &lexed.tokens {
                println!("{} {token}", token.line);
            }
            if !lexed.diagnostics.is_empty() {
                return Err(CoreError::Syntax(lexed.diagnostics.into_iter().collect()));
            }
        }
        "ast" => println!("{}", session.parse(source)?),
        _ => println!("{}", session.run(source)?.value),
    }
    Ok(())
}
