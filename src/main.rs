use clap::Parser;
use colored::*;
use std::process;

use mdfmt_lib::{EndOfLine, OptionOverrides, WrapMode};

mod exit_codes;
mod file_processor;

use file_processor::{FileOutcome, ProcessOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to format. Use "-" to read standard input and
    /// write the result to standard output.
    #[arg(required = true)]
    paths: Vec<String>,

    /// Do not write files; exit with status 1 if any file would change
    #[arg(long)]
    check: bool,

    /// Number ordered list items consecutively instead of repeating the first number
    #[arg(long)]
    number: bool,

    /// Paragraph wrapping: "keep", "no", or a column count
    #[arg(long, value_name = "MODE")]
    wrap: Option<WrapMode>,

    /// Line endings of the output: "lf", "crlf", or "keep"
    #[arg(long, value_name = "MODE")]
    end_of_line: Option<EndOfLine>,

    /// Skip checking that the output renders to the same HTML as the input
    #[arg(long)]
    no_validate: bool,

    /// Ignore .editorconfig and indent list content by marker width
    #[arg(long)]
    no_editorconfig: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            check: self.check,
            use_editorconfig: !self.no_editorconfig,
            overrides: OptionOverrides {
                wrap: self.wrap,
                number: self.number.then_some(true),
                end_of_line: self.end_of_line,
                validate: self.no_validate.then_some(false),
            },
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run_stdin(cli: &Cli) -> anyhow::Result<i32> {
    let outcome = file_processor::process_stdin(&cli.process_options())?;
    if outcome == FileOutcome::WouldReformat {
        if !cli.quiet {
            eprintln!("{} <stdin>", "Would reformat".yellow().bold());
        }
        return Ok(exit_codes::UNFORMATTED);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_files(cli: &Cli) -> anyhow::Result<i32> {
    let files = file_processor::discover_markdown_files(&cli.paths)?;
    if files.is_empty() {
        if !cli.quiet {
            println!("No markdown files found to format.");
        }
        return Ok(exit_codes::SUCCESS);
    }

    let results = file_processor::process_files(&files, &cli.process_options());

    let mut changed = 0usize;
    let mut errors = 0usize;
    for (path, result) in &results {
        match result {
            Ok(FileOutcome::Unchanged) => {
                if cli.verbose && !cli.quiet {
                    println!("{} {}", "Unchanged".dimmed(), path.display());
                }
            }
            Ok(FileOutcome::Reformatted) => {
                changed += 1;
                if !cli.quiet {
                    println!("{} {}", "Reformatted".green().bold(), path.display());
                }
            }
            Ok(FileOutcome::WouldReformat) => {
                changed += 1;
                if !cli.quiet {
                    println!("{} {}", "Would reformat".yellow().bold(), path.display());
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("{}: {}: {e:#}", "Error".red().bold(), path.display());
            }
        }
    }

    if !cli.quiet {
        let verb = if cli.check { "would be reformatted" } else { "reformatted" };
        println!(
            "\n{} of {} files {verb}",
            changed.to_string().bold(),
            results.len()
        );
    }

    if errors > 0 {
        Ok(exit_codes::TOOL_ERROR)
    } else if cli.check && changed > 0 {
        Ok(exit_codes::UNFORMATTED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = if cli.paths.iter().any(|p| p == "-") {
        if cli.paths.len() > 1 {
            eprintln!("{}: \"-\" cannot be combined with other paths", "Error".red().bold());
            process::exit(exit_codes::TOOL_ERROR);
        }
        run_stdin(&cli)
    } else {
        run_files(&cli)
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            process::exit(exit_codes::TOOL_ERROR);
        }
    }
}
