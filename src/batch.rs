//! Directory-to-directory outline extraction.
//!
//! Every `*.pdf` in the input directory becomes `<stem>.json` in the output
//! directory. A document that fails to open or lay out is reported and
//! skipped; only directory-level problems abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::DocumentResult;
use crate::outline::{analyze, synthesize};
use crate::parser::{ParseOptions, PdfParser};
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned for PDFs (not recursive)
    pub input_dir: PathBuf,
    /// Directory receiving one JSON file per PDF
    pub output_dir: PathBuf,
    /// JSON layout of the written files
    pub format: JsonFormat,
    /// Process documents on the rayon thread pool
    pub parallel: bool,
    /// Options passed to the parser for every document
    pub parse_options: ParseOptions,
}

impl BatchOptions {
    /// Create options for a run from `input_dir` into `output_dir`.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            format: JsonFormat::Pretty,
            parallel: true,
            parse_options: ParseOptions::default(),
        }
    }

    /// Process documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the JSON layout.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the parser options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The input file
    pub path: PathBuf,
    /// Rendered error message
    pub message: String,
}

/// Outcome of a batch run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// JSON files written
    pub written: Vec<PathBuf>,
    /// Inputs that failed
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of inputs seen.
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    /// True when every input produced an output.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// List the PDFs directly inside `dir`, sorted by path.
///
/// Only files whose extension is exactly `pdf` are returned. Symlinks are
/// followed. A directory that does not exist holds no PDFs.
pub fn discover_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if dir.is_file() {
        return Err(Error::Other(format!(
            "input is a file, not a directory: {}",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Open one PDF and synthesize its outline.
///
/// The file stem is the fallback title. The parsed document is released
/// before this returns.
pub fn process_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<DocumentResult> {
    let path = path.as_ref();
    let layout = {
        let parser = PdfParser::open_with_options(path, options.clone())?;
        parser.parse()?
    };

    let styles = analyze(&layout);
    Ok(synthesize(&layout, &styles, &file_stem(path)))
}

/// Output path for an input PDF: `<output_dir>/<stem>.json`.
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    output_dir.join(format!("{}.json", file_stem(input)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Process every PDF in the input directory.
pub fn run_batch(options: &BatchOptions) -> Result<BatchReport> {
    run_batch_with(options, |_, _| {})
}

/// Process every PDF in the input directory, calling `on_done` as each
/// document finishes.
///
/// In parallel mode `on_done` runs on worker threads and in completion
/// order; the returned report is always in discovery order.
pub fn run_batch_with<F>(options: &BatchOptions, on_done: F) -> Result<BatchReport>
where
    F: Fn(&Path, &Result<PathBuf>) + Sync,
{
    fs::create_dir_all(&options.output_dir)?;
    let inputs = discover_pdfs(&options.input_dir)?;

    if inputs.is_empty() {
        log::info!("No PDF files found at {}", options.input_dir.display());
        return Ok(BatchReport::default());
    }
    log::info!("Found {} PDF file(s) in {}", inputs.len(), options.input_dir.display());

    let run = |input: &PathBuf| {
        let outcome = convert_one(input, options);
        on_done(input, &outcome);
        (input.clone(), outcome)
    };
    let outcomes: Vec<(PathBuf, Result<PathBuf>)> = if options.parallel {
        inputs.par_iter().map(run).collect()
    } else {
        inputs.iter().map(run).collect()
    };

    let mut report = BatchReport::default();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(written) => report.written.push(written),
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                report.failed.push(BatchFailure {
                    path: input,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

fn convert_one(input: &Path, options: &BatchOptions) -> Result<PathBuf> {
    log::info!("Processing {}", input.display());

    let result = process_file(input, &options.parse_options)?;
    let json = to_json(&result, options.format)?;

    let target = output_path(&options.output_dir, input);
    fs::write(&target, json).map_err(Error::Io)?;
    log::info!("Saved output to {}", target.display());

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_rejects_file_input() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("one.pdf");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(discover_pdfs(&file), Err(Error::Other(_))));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.pdf", "notes.txt", "upper.PDF", "c.pdf.bak"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = discover_pdfs(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let found = discover_pdfs("/nonexistent/pdfoutline/input").unwrap();
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_follows_symlinks() {
        let store = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let target = store.path().join("real.pdf");
        fs::write(&target, b"%PDF-1.4\n").unwrap();
        std::os::unix::fs::symlink(&target, input.path().join("doc.pdf")).unwrap();
        std::os::unix::fs::symlink(store.path().join("gone.pdf"), input.path().join("dangling.pdf"))
            .unwrap();

        let found = discover_pdfs(input.path()).unwrap();
        assert_eq!(found, vec![input.path().join("doc.pdf")]);
    }

    #[test]
    fn test_missing_input_dir_reports_nothing() {
        let root = TempDir::new().unwrap();
        let output = root.path().join("out");

        let report = run_batch(&BatchOptions::new(root.path().join("missing"), &output)).unwrap();
        assert_eq!(report, BatchReport::default());
        assert!(output.is_dir());
    }

    #[test]
    fn test_output_path_uses_stem() {
        let path = output_path(Path::new("/out"), Path::new("/in/annual.report.pdf"));
        assert_eq!(path, PathBuf::from("/out/annual.report.json"));
    }

    #[test]
    fn test_options_builder() {
        let options = BatchOptions::new("in", "out")
            .sequential()
            .with_format(JsonFormat::Compact)
            .with_parse_options(ParseOptions::new().lenient());
        assert!(!options.parallel);
        assert_eq!(options.format, JsonFormat::Compact);
        assert_eq!(options.input_dir, PathBuf::from("in"));
    }

    #[test]
    fn test_empty_input_creates_output_dir() {
        let input = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let output = root.path().join("nested").join("out");

        let report = run_batch(&BatchOptions::new(input.path(), &output)).unwrap();
        assert_eq!(report.total(), 0);
        assert!(output.is_dir());
    }

    #[test]
    fn test_corrupt_file_is_reported_not_fatal() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("broken.pdf"), b"not a pdf at all").unwrap();

        let report = run_batch(&BatchOptions::new(input.path(), output.path()).sequential()).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_success());
        assert!(!output.path().join("broken.json").exists());
    }

    #[test]
    fn test_callback_sees_every_input() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for name in ["one.pdf", "two.pdf", "three.pdf"] {
            fs::write(input.path().join(name), b"garbage").unwrap();
        }

        let seen = AtomicUsize::new(0);
        let report = run_batch_with(&BatchOptions::new(input.path(), output.path()), |_, outcome| {
            assert!(outcome.is_err());
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 3);
        let failed: Vec<_> = report
            .failed
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(failed, vec!["one.pdf", "three.pdf", "two.pdf"]);
    }
}
