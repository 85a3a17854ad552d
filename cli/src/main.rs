//! pdfoutline CLI - PDF title and heading outline extraction

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{discover_pdfs, output_path, run_batch_with, BatchOptions};
use pdfoutline::outline::{analyze, LevelMap};
use pdfoutline::{JsonFormat, ParseOptions, StyleFlags};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract titles and H1-H3 outlines from PDFs as JSON", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every PDF in a directory to <stem>.json
    Batch(BatchArgs),

    /// Extract the outline of a single PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the font style statistics behind an outline
    Styles {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct BatchArgs {
    /// Directory containing input PDFs
    #[arg(long, value_name = "DIR", env = "PDFOUTLINE_INPUT_DIR", default_value = "/app/input")]
    input: PathBuf,

    /// Directory receiving JSON outputs
    #[arg(long, value_name = "DIR", env = "PDFOUTLINE_OUTPUT_DIR", default_value = "/app/output")]
    output: PathBuf,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Process one document at a time
    #[arg(long)]
    sequential: bool,

    /// Fail a document when any of its pages cannot be laid out
    #[arg(long)]
    strict: bool,
}

impl BatchArgs {
    fn options(&self) -> BatchOptions {
        let parse_options = if self.strict {
            ParseOptions::new().strict()
        } else {
            ParseOptions::new().lenient()
        };

        let mut options = BatchOptions::new(&self.input, &self.output)
            .with_format(json_format(self.compact))
            .with_parse_options(parse_options);
        if self.sequential {
            options = options.sequential();
        }
        options
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch(args)) => cmd_batch(&args),
        Some(Commands::Extract {
            input,
            output,
            compact,
        }) => cmd_extract(&input, output.as_deref(), compact),
        Some(Commands::Styles { input }) => cmd_styles(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(&cli.batch),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(args: &BatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Starting PDF outline extraction...".cyan());

    let options = args.options();
    log::debug!("Batch options: {:?}", options);

    fs::create_dir_all(&options.output_dir)?;
    let inputs = discover_pdfs(&options.input_dir)?;
    if inputs.is_empty() {
        println!(
            "{} {}",
            "No PDF files found at".yellow(),
            options.input_dir.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = run_batch_with(&options, |input, outcome| {
        pb.println(completion_line(input, outcome));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    if !report.is_success() {
        println!(
            "{} {} of {} file(s) failed",
            "Warning:".yellow().bold(),
            report.failed.len(),
            report.total()
        );
    }
    println!("{}", "Completed processing all PDFs.".green().bold());

    Ok(())
}

/// Progress line for a document that has finished, successfully or not.
fn completion_line(input: &Path, outcome: &pdfoutline::Result<PathBuf>) -> String {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    match outcome {
        Ok(written) => {
            let file = written.file_name().unwrap_or_default().to_string_lossy();
            format!("Processed {} -> {}", name, file.green())
        }
        Err(e) => format!("  {} {}: {}", "Error processing".red(), name, e),
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = pdfoutline::batch::process_file(input, &ParseOptions::new().lenient())?;
    let json = pdfoutline::render::to_json(&result, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_styles(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = pdfoutline::parse_file_with_options(input, ParseOptions::new().lenient())?;
    let styles = analyze(&doc);

    println!("{}", "Style Frequencies".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{:>8}  {:<28} {:<20} {:>6}", "Size", "Flags", "Font", "Count");
    for (key, count) in styles.iter() {
        let flags = StyleFlags::from_bits_truncate(key.flags);
        println!(
            "{:>8.2}  {:<28} {:<20} {:>6}",
            key.font_size,
            format!("{:?}", flags),
            key.font_name,
            count
        );
    }

    println!();
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Spans".bold(), styles.total());

    let Some(body) = styles.most_frequent() else {
        println!("{}", "No text found".yellow());
        return Ok(());
    };
    println!(
        "{}: {:.2}pt {} ({})",
        "Body style".bold(),
        body.font_size,
        body.font_name,
        styles.count(body)
    );

    let levels = LevelMap::from_styles(&styles, body.font_size);
    if levels.is_empty() {
        println!("{}: none", "Heading sizes".bold());
    }
    for (size, level) in levels.iter() {
        println!("  {} {:.2}pt", level.to_string().green(), size);
    }

    if let Some(title) = doc.metadata.trimmed_title() {
        println!("{}: {}", "Metadata title".bold(), title);
    }
    println!(
        "{}: {}",
        "Output file".bold(),
        output_path(Path::new("."), input).display()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_batch() {
        let cli = Cli::try_parse_from(["pdfoutline", "--input", "in", "--compact"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.batch.input, PathBuf::from("in"));
        assert!(cli.batch.compact);
    }

    #[test]
    fn test_batch_options_from_args() {
        let cli = Cli::try_parse_from([
            "pdfoutline",
            "batch",
            "--input",
            "pdfs",
            "--output",
            "json",
            "--sequential",
            "--strict",
        ])
        .unwrap();
        let Some(Commands::Batch(args)) = cli.command else {
            panic!("expected batch command");
        };

        let options = args.options();
        assert_eq!(options.input_dir, PathBuf::from("pdfs"));
        assert_eq!(options.output_dir, PathBuf::from("json"));
        assert!(!options.parallel);
        assert_eq!(options.format, JsonFormat::Pretty);
        assert_eq!(
            options.parse_options.error_mode,
            pdfoutline::ErrorMode::Strict
        );
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from(["pdfoutline", "extract", "a.pdf", "-o", "a.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Extract { ref input, output: Some(_), compact: false }) if input == Path::new("a.pdf")
        ));
    }

    #[test]
    fn test_batch_on_empty_dir() {
        let input = tempfile::TempDir::new().unwrap();
        let root = tempfile::TempDir::new().unwrap();
        let args = BatchArgs {
            input: input.path().to_path_buf(),
            output: root.path().join("out"),
            compact: false,
            sequential: true,
            strict: false,
        };
        cmd_batch(&args).unwrap();
        assert!(root.path().join("out").is_dir());
    }

    #[test]
    fn test_batch_on_missing_input_dir() {
        let root = tempfile::TempDir::new().unwrap();
        let args = BatchArgs {
            input: root.path().join("missing"),
            output: root.path().join("out"),
            compact: false,
            sequential: true,
            strict: false,
        };
        cmd_batch(&args).unwrap();
        assert!(root.path().join("out").is_dir());
    }

    #[test]
    fn test_completion_line_reports_finished_document() {
        colored::control::set_override(false);
        let done = completion_line(Path::new("in/report.pdf"), &Ok(PathBuf::from("out/report.json")));
        assert_eq!(done, "Processed report.pdf -> report.json");

        let failed = completion_line(
            Path::new("in/broken.pdf"),
            &Err(pdfoutline::Error::UnknownFormat),
        );
        assert_eq!(
            failed,
            "  Error processing broken.pdf: not a PDF: missing %PDF- header"
        );
    }
}
