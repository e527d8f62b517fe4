use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use noteqa::config::{Config, ensure_database_directory};
use noteqa::llm::{LanguageModel, LlmError, OllamaClientBuilder};
use noteqa::source::SourceError;
use noteqa::{
    MonthRange, Note, NoteQuery, Pipeline, PipelineBuilder, PipelineInput, PipelineRequest,
    SampleSource, SqliteSource, sanitize,
};

/// noteqa - customer-note relevance filtering and evidence-based Q&A
#[derive(Parser)]
#[command(name = "noteqa")]
#[command(about = "Filter customer notes by project relevance and answer questions with quotes")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Flags that take precedence over the environment.
#[derive(Args, Default)]
struct Overrides {
    /// SQLite notes database (overrides NOTEQA_DB)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Ollama base URL (overrides OLLAMA_HOST)
    #[arg(long, global = true, value_name = "URL")]
    host: Option<String>,

    /// Model name (overrides OLLAMA_MODEL)
    #[arg(long, global = true, value_name = "NAME")]
    model: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Strip markup from an HTML file (or stdin) and print plain text
    Sanitize {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Retrieve notes for an author and month range
    Fetch(QueryArgs),
    /// Regenerate clean content for every note in a notes file
    Transform {
        #[arg(value_name = "NOTES")]
        notes: PathBuf,
    },
    /// Keep the notes relevant to a project description
    Filter {
        #[arg(value_name = "NOTES")]
        notes: PathBuf,

        /// Project description to judge relevance against
        #[arg(short, long)]
        project: String,
    },
    /// Answer questions about every note in a notes file
    Answer {
        #[arg(value_name = "NOTES")]
        notes: PathBuf,

        /// Question to ask (repeatable)
        #[arg(short = 'q', long = "question", required = true)]
        questions: Vec<String>,
    },
    /// Retrieve, filter and answer in one go
    Run {
        #[command(flatten)]
        query: QueryArgs,

        /// Project description; omit to skip relevance filtering
        #[arg(short, long)]
        project: Option<String>,

        /// Question to ask (repeatable)
        #[arg(short = 'q', long = "question")]
        questions: Vec<String>,
    },
    /// Load notes from a JSON file into the SQLite store
    Import {
        #[arg(value_name = "NOTES")]
        notes: PathBuf,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Author name to match (case-insensitive substring)
    #[arg(short, long)]
    name: String,

    /// First month, YYYY-MM
    #[arg(long, value_name = "YYYY-MM")]
    start: String,

    /// Last month, YYYY-MM
    #[arg(long, value_name = "YYYY-MM")]
    end: String,

    /// Serve the built-in sample notes instead of querying the database
    #[arg(long)]
    samples: bool,
}

#[derive(Serialize)]
struct ImportSummary {
    imported: usize,
    database: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(&cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input: malformed months, missing or unparsable
/// files, invalid URLs. Everything else is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        if let Some(source_error) = cause.downcast_ref::<SourceError>() {
            return matches!(source_error, SourceError::InvalidQuery(_));
        }
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            return io_error.kind() == std::io::ErrorKind::NotFound;
        }
        cause.downcast_ref::<serde_json::Error>().is_some()
            || matches!(cause.downcast_ref::<LlmError>(), Some(LlmError::InvalidUrl(_)))
    })
}

fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.overrides)?;

    match &cli.command {
        Commands::Sanitize { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => std::io::read_to_string(std::io::stdin())
                    .context("Failed to read stdin")?,
            };
            println!("{}", sanitize(&raw));
            Ok(())
        }
        Commands::Fetch(args) => {
            let query = build_query(args)?;
            let pipeline = build_pipeline(&config, args.samples, false)?;
            print_json(&pipeline.retrieve(&query))
        }
        Commands::Transform { notes } => {
            let pipeline = PipelineBuilder::new().build();
            print_json(&pipeline.sanitize(read_notes(notes)?))
        }
        Commands::Filter { notes, project } => {
            if project.trim().is_empty() {
                anyhow::bail!("Project description cannot be empty");
            }
            let pipeline = build_pipeline(&config, false, true)?;
            print_json(&pipeline.filter_relevant(&read_notes(notes)?, project))
        }
        Commands::Answer { notes, questions } => {
            let pipeline = build_pipeline(&config, false, true)?;
            print_json(&pipeline.answer_questions(&read_notes(notes)?, questions))
        }
        Commands::Run {
            query,
            project,
            questions,
        } => {
            let request = PipelineRequest {
                input: PipelineInput::Query(build_query(query)?),
                project_description: project.clone(),
                questions: questions.clone(),
            };
            let pipeline = build_pipeline(&config, query.samples, true)?;
            print_json(&pipeline.run(&request))
        }
        Commands::Import { notes } => {
            let notes = read_notes(notes)?;
            ensure_database_directory(&config.database_path)?;
            let mut store = SqliteSource::open(&config.database_path)
                .context("Failed to open database")?;
            let imported = store.import(&notes).context("Failed to import notes")?;
            print_json(&ImportSummary {
                imported,
                database: config.database_path.display().to_string(),
            })
        }
    }
}

/// Reads the environment, then applies command-line overrides.
fn load_config(overrides: &Overrides) -> Result<Config> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(db) = &overrides.db {
        config.database_path = db.clone();
    }
    if let Some(host) = &overrides.host {
        config.ollama_host = Some(host.clone());
    }
    if let Some(model) = &overrides.model {
        config.ollama_model = Some(model.clone());
    }
    Ok(config)
}

fn build_query(args: &QueryArgs) -> Result<NoteQuery> {
    let months = MonthRange::parse(&args.start, &args.end)?;
    Ok(NoteQuery::new(args.name.as_str(), months))
}

/// Assembles a pipeline: sample-only or SQLite-backed, with an LLM if needed.
fn build_pipeline(config: &Config, samples_only: bool, with_model: bool) -> Result<Pipeline> {
    let mut builder = PipelineBuilder::new()
        .relevance_max_tokens(config.relevance_max_tokens)
        .qa_max_tokens(config.qa_max_tokens)
        .sample_fallback(config.sample_fallback);

    builder = if samples_only {
        builder.source(Box::new(SampleSource))
    } else {
        builder.source(Box::new(open_store(&config.database_path)?))
    };

    if with_model {
        builder = builder.client(build_client(config)?);
    }

    Ok(builder.build())
}

fn open_store(path: &Path) -> Result<SqliteSource> {
    ensure_database_directory(path)?;
    SqliteSource::open(path).context("Failed to open database")
}

fn build_client(config: &Config) -> Result<Arc<dyn LanguageModel>> {
    let mut builder = OllamaClientBuilder::new();
    if let Some(host) = &config.ollama_host {
        builder = builder.base_url(host.as_str());
    }
    if let Some(model) = &config.ollama_model {
        builder = builder.model(model.as_str());
    }
    let client = builder.build().context("Failed to create Ollama client")?;
    Ok(Arc::new(client))
}

fn read_notes(path: &Path) -> Result<Vec<Note>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of notes", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
