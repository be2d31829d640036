use clap::Parser;
use clap::error::ErrorKind;
use std::io;
use std::process::ExitCode;
use tracing::error;
use tramvia::{
    Config, Error,
    engine::{ScheduleQuery, ScheduleType},
    service::ScheduleService,
    state::CommandStateStore,
};

/// Query scheduled tram departure times from the ATM Milano GTFS feed.
#[derive(Parser, Debug)]
#[command(name = "tramvia", version)]
struct Cli {
    /// Tram line number (e.g. 9, 12, 16)
    line: String,
    /// Stop name (optional, shows all stops if omitted or empty)
    stop_name: Option<String>,
    /// weekday (default), saturday, sunday
    schedule_type: Option<String>,
}

fn main() -> ExitCode {
    // Keep stdout clean for the protocol lines; all diagnostics go to
    // stderr through the subscriber.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let schedule_type = match cli.schedule_type.as_deref() {
        Some(raw) => raw.parse()?,
        None => ScheduleType::Weekday,
    };
    let query = ScheduleQuery {
        line: cli.line,
        stop_name: cli.stop_name.filter(|name| !name.is_empty()),
        schedule_type,
    };

    let config = Config::default();
    let store = CommandStateStore::new(&config.state_program);
    let service = ScheduleService::new(&config, &store);
    let outcome = service.query(&query)?;

    println!("LINE: {}", query.line);
    println!("STOP: {}", query.stop_name.as_deref().unwrap_or("all"));
    println!("TYPE: {}", query.schedule_type);
    println!("TEXT: {}", outcome.text_path.display());
    println!("SOURCE: GTFS");
    println!("CACHE: {}", outcome.cache.as_str());
    Ok(())
}
