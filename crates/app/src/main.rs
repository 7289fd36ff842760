use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::Clock;
use services::QuizFlowService;
use storage::{CsvQuestionStore, FileResultLog, InMemorySessionStore};
use tracing_subscriber::EnvFilter;
use web::{AppState, CookieCodec};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_QUESTIONS: &str = "questions.csv";
const DEFAULT_RESULTS: &str = "results.txt";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPort { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPort { raw } => write!(f, "invalid --port value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--port <port>] [--questions <csv>] [--results <file>]");
    eprintln!("                      [--session-secret <secret>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --port {DEFAULT_PORT}");
    eprintln!("  --questions {DEFAULT_QUESTIONS}");
    eprintln!("  --results {DEFAULT_RESULTS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PORT, QUIZ_QUESTIONS, QUIZ_RESULTS, QUIZ_SESSION_SECRET");
}

struct Args {
    port: u16,
    questions: PathBuf,
    results: PathBuf,
    session_secret: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let mut questions = std::env::var("QUIZ_QUESTIONS")
            .ok()
            .map_or_else(|| PathBuf::from(DEFAULT_QUESTIONS), PathBuf::from);
        let mut results = std::env::var("QUIZ_RESULTS")
            .ok()
            .map_or_else(|| PathBuf::from(DEFAULT_RESULTS), PathBuf::from);
        let mut session_secret = std::env::var("QUIZ_SESSION_SECRET").ok();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--port" => {
                    let value = require_value(args, "--port")?;
                    port = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPort { raw: value.clone() })?;
                }
                "--questions" => {
                    questions = PathBuf::from(require_value(args, "--questions")?);
                }
                "--results" => {
                    results = PathBuf::from(require_value(args, "--results")?);
                }
                "--session-secret" => {
                    session_secret = Some(require_value(args, "--session-secret")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            port,
            questions,
            results,
            session_secret,
        })
    }
}

fn cookie_codec(session_secret: Option<&str>) -> CookieCodec {
    match session_secret {
        Some(secret) => CookieCodec::from_secret(secret),
        None => {
            tracing::warn!(
                "no session secret configured; using a random one, \
                 sessions will not survive a restart"
            );
            CookieCodec::from_key(rand::random())
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default_clock();
    let flow = QuizFlowService::new(
        clock,
        Arc::new(CsvQuestionStore::new(&args.questions)),
        Arc::new(InMemorySessionStore::new(clock)),
        Arc::new(FileResultLog::new(&args.results)),
    );
    let state = AppState {
        flow: Arc::new(flow),
        cookies: cookie_codec(args.session_secret.as_deref()),
    };

    tracing::info!(
        "serving quiz on 0.0.0.0:{} (questions: {}, results: {})",
        args.port,
        args.questions.display(),
        args.results.display(),
    );
    warp::serve(web::routes(state)).run(([0, 0, 0, 0], args.port)).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
