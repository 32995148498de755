//! Grade a batch of exam PDFs against an answer key.
//!
//! Usage:
//!   cargo run --release --bin grade_sheets -- --key "1:a, 2:d, 3:v" exams/*.pdf
//!   cargo run --release --bin grade_sheets -- --key "1:a, 2:d" --json report.json \
//!       --course "Curso X" --code C-001 --threshold 12 --pdfium-dir ./lib exams/*.pdf
//!
//! Logging follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use answer_sheet::{
    parse_answer_key, BatchGrader, CancellationToken, CourseInfo, ExamDocument, GraderConfig,
    GradingReport, PdfiumLoader,
};

struct CliConfig {
    key: Option<String>,
    course_name: String,
    course_code: String,
    threshold: Option<f64>,
    config_path: Option<PathBuf>,
    pdfium_dir: Option<String>,
    json_output: Option<PathBuf>,
    verbose: bool,
    inputs: Vec<PathBuf>,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self {
            key: None,
            course_name: "Curso X".to_string(),
            course_code: "C-001".to_string(),
            threshold: None,
            config_path: None,
            pdfium_dir: None,
            json_output: None,
            verbose: false,
            inputs: Vec::new(),
        };

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--key" | "--course" | "--code" | "--threshold" | "--config" | "--pdfium-dir"
                | "--json" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| format!("{} needs a value", flag))?
                        .clone();
                    match flag {
                        "--key" => config.key = Some(value),
                        "--course" => config.course_name = value,
                        "--code" => config.course_code = value,
                        "--threshold" => {
                            let threshold = value
                                .parse::<f64>()
                                .map_err(|_| format!("invalid threshold '{}'", value))?;
                            config.threshold = Some(threshold);
                        },
                        "--config" => config.config_path = Some(PathBuf::from(value)),
                        "--pdfium-dir" => config.pdfium_dir = Some(value),
                        _ => config.json_output = Some(PathBuf::from(value)),
                    }
                },
                "--verbose" | "-v" => {
                    config.verbose = true;
                },
                other if other.starts_with("--") => {
                    return Err(format!("unknown option {}", other));
                },
                path => config.inputs.push(PathBuf::from(path)),
            }
            i += 1;
        }

        Ok(config)
    }
}

fn load_documents(paths: &[PathBuf]) -> Vec<ExamDocument> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let id = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        match std::fs::read(path) {
            Ok(bytes) => documents.push(ExamDocument::new(id, bytes)),
            Err(e) => {
                // Still graded: an unreadable file scores like a blank sheet.
                log::warn!("Cannot read {}: {}", path.display(), e);
                documents.push(ExamDocument::new(id, Vec::new()));
            },
        }
    }
    documents
}

async fn run(cli: CliConfig) -> Result<(), String> {
    let key_text = cli.key.ok_or("missing --key")?;
    let key = parse_answer_key(&key_text);
    if key.is_empty() {
        return Err(format!("answer key '{}' has no valid entries", key_text));
    }
    println!("Parsed key: {}", key);

    let mut config = match &cli.config_path {
        Some(path) => GraderConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => GraderConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.grading.pass_threshold = threshold;
    }

    if cli.inputs.is_empty() {
        return Err("no PDF files given".to_string());
    }

    let loader = PdfiumLoader::bind(cli.pdfium_dir.as_deref()).map_err(|e| e.to_string())?;
    let grader = BatchGrader::new(loader, config).map_err(|e| e.to_string())?;

    let documents = load_documents(&cli.inputs);
    let outcome = grader
        .grade_batch(&key, documents, &CancellationToken::new())
        .await
        .map_err(|e| e.to_string())?;

    let course = CourseInfo {
        name: cli.course_name,
        code: cli.course_code,
        pass_threshold: grader.config().grading.pass_threshold,
        total_questions: key.len(),
    };
    let report = GradingReport::new(course, outcome.sheets);

    println!();
    println!("{:<45} {:>8} {:>10} {:>6}  Result", "PDF", "Score", "Correct", "Total");
    println!("{}", "-".repeat(80));
    for sheet in report.ranked() {
        let r = &sheet.result;
        let name: String = r.document_id.chars().take(45).collect();
        println!(
            "{:<45} {:>8.2} {:>10} {:>6}  {}",
            name,
            r.score,
            r.correct_count,
            r.total_questions,
            if r.passed { "PASS" } else { "FAIL" }
        );
        if cli.verbose {
            let detected: Vec<String> = sheet
                .detected
                .iter()
                .map(|(q, s)| format!("{}:{}", q, s))
                .collect();
            println!("    detected: {}", detected.join(", "));
        }
    }

    let summary = &report.summary;
    println!();
    println!("Course: {} ({})", report.course.name, report.course.code);
    println!("Mean score:          {:.2}", summary.mean_score);
    println!("Mean passing score:  {:.2}", summary.mean_passing_score);
    println!("Highest / lowest:    {:.2} / {:.2}", summary.highest_score, summary.lowest_score);
    println!(
        "Passed:              {} / {} ({:.2}%)",
        summary.passed, summary.documents, summary.pass_rate
    );
    if !outcome.skipped.is_empty() {
        println!("Not graded:          {}", outcome.skipped.join(", "));
    }

    if let Some(path) = &cli.json_output {
        report.write_json(path).map_err(|e| e.to_string())?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        },
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
