use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use examgrid::builder::ScheduleForm;
use examgrid::config::{ConfigError, ServiceConfig};
use examgrid::export::ExportError;
use examgrid::grid::FilterCriteria;
use examgrid::model::{ResponseStatus, ScheduleConstraints, ScheduleResult};
use examgrid::state::ScheduleView;
use examgrid::submit::transport::parse_response;
use examgrid::submit::{
    CancelToken, HttpTransport, SubmissionPipeline, SubmitError, SubmitEvent, SubmitObserver, TransportError,
};
use examgrid::{ErrorCode, ValidationError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson { path: PathBuf, source: serde_json::Error },
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{}", .0.user_message())]
    Submit(#[from] SubmitError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Export(#[from] ExportError),
    #[error("saved response reports an error: {0}")]
    Rejected(String),
    #[error("saved response in {} has no results or total_period", .path.display())]
    Incomplete { path: PathBuf },
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Read { .. } => "E_READ",
            Self::Write { .. } => "E_WRITE",
            Self::InvalidJson { .. } => "E_INVALID_JSON",
            Self::Validation(e) => e.error_code(),
            Self::Submit(e) => e.error_code(),
            Self::Transport(e) => e.error_code(),
            Self::Export(e) => e.error_code(),
            Self::Rejected(_) => "E_REJECTED",
            Self::Incomplete { .. } => "E_MALFORMED",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "examgrid", about = "Exam scheduling client for the remote optimizer")]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a constraints file without contacting the service.
    Validate { form: PathBuf },
    /// Submit a constraints file and print the resulting grid.
    Submit {
        form: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Render a previously saved service response.
    Render {
        form: PathBuf,
        response: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print the example request body.
    Example {
        /// Fetch it from the service instead of building it locally.
        #[arg(long, default_value_t = false)]
        remote: bool,
    },
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Match exam or room names containing this text.
    #[arg(long)]
    text: Option<String>,

    #[arg(long)]
    filiere: Option<String>,

    #[arg(long)]
    promotion: Option<u32>,

    #[arg(long, default_value_t = 1)]
    days_per_page: u32,

    /// Show exam names only.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Also write the visible assignments as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let result = match cli.command {
        Command::Validate { form } => run_validate(&form),
        Command::Submit { form, view } => run_submit(&form, &view).await,
        Command::Render { form, response, view } => run_render(&form, &response, &view),
        Command::Example { remote } => run_example(remote).await,
    };

    if let Err(e) = result {
        eprintln!("error [{}]: {e}", e.code());
        std::process::exit(1);
    }
}

fn run_validate(path: &Path) -> Result<(), CliError> {
    let form = read_form(path)?;
    let issues = form.issues();
    if issues.is_empty() {
        println!("ok");
        return Ok(());
    }
    for issue in &issues {
        println!("{issue}");
    }
    Err(ValidationError { issues }.into())
}

async fn run_submit(path: &Path, args: &ViewArgs) -> Result<(), CliError> {
    let form = read_form(path)?;
    let constraints = form.build()?;
    let config = ServiceConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;
    let pipeline = SubmissionPipeline::new(Arc::new(transport), config.retry);

    let cancel = CancelToken::new();
    let _teardown = cancel.drop_guard();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = pipeline.submit(&constraints, &ProgressReporter, &cancel).await;
    interrupt.abort();

    let result = outcome?;
    show(&form, &constraints, result, args)
}

fn run_render(form_path: &Path, response_path: &Path, args: &ViewArgs) -> Result<(), CliError> {
    let form = read_form(form_path)?;
    let constraints = form.build()?;
    let text = read_file(response_path)?;
    let response = parse_response(&text).map_err(|source| CliError::InvalidJson {
        path: response_path.to_path_buf(),
        source,
    })?;
    if response.status == ResponseStatus::Error {
        return Err(CliError::Rejected(response.message.unwrap_or_default()));
    }
    let result = response
        .into_result()
        .ok_or_else(|| CliError::Incomplete { path: response_path.to_path_buf() })?;
    show(&form, &constraints, result, args)
}

async fn run_example(remote: bool) -> Result<(), CliError> {
    if remote {
        let config = ServiceConfig::from_env()?;
        let transport = HttpTransport::new(&config)?;
        let pipeline = SubmissionPipeline::new(Arc::new(transport), config.retry);
        println!("{}", pipeline.fetch_example().await?);
        return Ok(());
    }
    let body = ScheduleConstraints::example()
        .to_wire()
        .map_err(|e| CliError::Submit(SubmitError::Serialize(e.to_string())))?;
    println!("{}", String::from_utf8_lossy(&body));
    Ok(())
}

fn show(
    form: &ScheduleForm,
    constraints: &ScheduleConstraints,
    result: ScheduleResult,
    args: &ViewArgs,
) -> Result<(), CliError> {
    let mut view = ScheduleView::new(form.first_hour());
    view.apply_result(constraints, result);
    view.compact = args.compact;
    view.set_filter(FilterCriteria::new(args.text.as_deref(), args.filiere.as_deref(), args.promotion));

    for conflict in view.conflicts() {
        tracing::warn!(
            day = conflict.cell.day,
            slot = conflict.cell.slot,
            room = %conflict.cell.room,
            exams = ?conflict.exams,
            "overlapping exams"
        );
    }

    for page in view.render_pages(args.days_per_page)? {
        println!("{page}");
    }

    if let Some(path) = &args.json {
        let json = view.export_json()?;
        fs::write(path, json).map_err(|source| CliError::Write { path: path.clone(), source })?;
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn read_form(path: &Path) -> Result<ScheduleForm, CliError> {
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::InvalidJson { path: path.to_path_buf(), source })
}

/// Progress line for one submission event. Failures yield nothing here
/// because `main` reports the final error once.
fn progress_line(event: &SubmitEvent<'_>) -> Option<String> {
    match event {
        SubmitEvent::Retrying { retry, max_retries, delay, error } => Some(format!(
            "attempt failed ({error}); retry {retry}/{max_retries} in {}s",
            delay.as_secs()
        )),
        SubmitEvent::Succeeded(result) => Some(format!("{} exams scheduled", result.assignments.len())),
        SubmitEvent::Failed(_) => None,
    }
}

/// Prints retry progress to stderr.
struct ProgressReporter;

impl SubmitObserver for ProgressReporter {
    fn on_event(&self, event: &SubmitEvent<'_>) {
        if let Some(line) = progress_line(event) {
            eprintln!("{line}");
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
