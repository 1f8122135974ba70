//! tinybasic command line interface: compiles BASIC sources to byte code files and runs them.

use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tinybasic::{parser, compiler, tac::Writer, runtime::{Program, VM, StdConsole}};

#[derive(Parser, Debug)]
#[command(name = "tinybasic", version, about = "Compiles and runs tiny BASIC programs")]
struct Args {
    /// Log compiler and vm activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a BASIC source file into a byte code file
    Compile {
        /// BASIC source file
        input: PathBuf,
        /// Byte code output file
        output: PathBuf,
        /// Give each call frame its own bindings instead of treating all bindings as global
        #[arg(long)]
        local: bool,
        /// Print the generated three-address code
        #[arg(long)]
        tac: bool,
    },
    /// Run a byte code file
    Run {
        /// Byte code file
        program: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set up logging")?;

    match args.command {
        Command::Compile { input, output, local, tac } => compile(&input, &output, local, tac),
        Command::Run { program } => {
            let exit_code = run(&program)?;
            std::process::exit(exit_code as i32);
        },
    }
}

/// Formats errors with their source location.
fn located<E: std::fmt::Display>(errors: &[ E ], loc: impl Fn(&E) -> (u32, u32)) -> String {
    errors.iter()
        .map(|error| {
            let (line, column) = loc(error);
            format!("{} in line {}, column {}", error, line, column)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn compile(input: &PathBuf, output: &PathBuf, local: bool, print_tac: bool) -> Result<()> {
    info!("compiling {}", input.display());
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let parsed = parser::parse(&source)
        .map_err(|errors| anyhow!(located(&errors, |e| e.loc(&source))))?;
    debug!("parsed {} lines", parsed.len());

    let code = compiler::lower(&parsed)
        .map_err(|errors| anyhow!(located(&errors, |e| e.loc(&source))))?;
    if print_tac {
        print!("{}", code);
    }

    let mut writer = Writer::new(compiler::CompileOptions { all_global: !local });
    writer.write_code(&code).context("Failed to encode byte code")?;
    let program = writer.into_program();

    std::fs::write(output, program.to_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("wrote {} bytes to {}", program.program_size(), output.display());
    Ok(())
}

fn run(path: &PathBuf) -> Result<i64> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let program = Program::from_bytes(&bytes)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let mut vm = VM::new(&program);
    let exit_code = vm.run(&mut StdConsole::new())
        .context("Runtime error")?;
    debug!("exit code {}", exit_code);
    Ok(exit_code)
}
