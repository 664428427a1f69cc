use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use zasm_cli::{assemble_file, ErrorPolicy};
use zasm_rs::{encode_line, parse_line, tokenize, DiagnosticSink, TracingSink};

#[derive(Parser, Debug)]
#[command(author, version, about = "Z80 line assembler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file line by line
    Assemble {
        /// Source file
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Write the assembled bytes to this file
        #[arg(long, value_name = "BIN")]
        out: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Continue with the next line after a failing one
        #[arg(long)]
        keep_going: bool,
        /// Show instruction bytes in the text listing
        #[arg(long)]
        show_bytes: bool,
    },
    /// Print the token stream of one line
    Tokens {
        line: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the syntax tree of one line
    Tree {
        line: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Encode one line and print its bytes
    Encode {
        line: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Assemble { input, out, format, keep_going, show_bytes } => {
            let policy = if keep_going { ErrorPolicy::KeepGoing } else { ErrorPolicy::Stop };
            let listing = assemble_file(&input, policy)?;
            tracing::info!(path = %input.display(), lines = listing.entries.len(), bytes = listing.image().len(), "assembled");
            match format {
                OutputFormat::Json => print_json(&listing)?,
                OutputFormat::Text => {
                    print!("{}", listing.render(show_bytes));
                    for d in &listing.diagnostics {
                        TracingSink.report(d.clone());
                    }
                }
            }
            let errors = listing.error_count();
            anyhow::ensure!(errors == 0, "{errors} line(s) failed to assemble");
            if let Some(path) = out {
                std::fs::write(path, listing.image())?;
            }
        }
        Command::Tokens { line, format } => {
            let tokens = tokenize(&line)?;
            match format {
                OutputFormat::Json => print_json(&tokens)?,
                OutputFormat::Text => {
                    for t in &tokens {
                        println!("{:>3}  {t}", t.column);
                    }
                }
            }
        }
        Command::Tree { line, format } => {
            let Some(inst) = parse_line(&line)? else {
                return Ok(());
            };
            match format {
                OutputFormat::Json => print_json(&inst)?,
                OutputFormat::Text => print!("{}", inst.render()),
            }
        }
        Command::Encode { line, format } => {
            let encoded = encode_line(&line)?;
            match format {
                OutputFormat::Json => print_json(&encoded)?,
                OutputFormat::Text => {
                    println!("{}", hex(&encoded.bytes));
                    for w in encoded.warnings {
                        eprintln!("{w}");
                    }
                }
            }
        }
    }

    Ok(())
}
