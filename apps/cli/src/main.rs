mod args;

use std::io;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use args::Command;
use pulse_app::{App, DisplayBus, ScheduleClass, config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let global = config::load_global(&config_path)?;
    let mut app = App::new(global)?;

    match args.command {
        Command::FetchMonthly => run_fetch(&mut app, ScheduleClass::Monthly)?,
        Command::FetchDaily => run_fetch(&mut app, ScheduleClass::Daily)?,
        Command::FetchToday => run_fetch(&mut app, ScheduleClass::Today)?,
        Command::Widgets => app.refresh_widgets(&StdoutBus)?,
    }

    Ok(())
}

fn run_fetch(app: &mut App, class: ScheduleClass) -> Result<(), Box<dyn std::error::Error>> {
    // Credential failures are fatal for the invocation; everything after
    // this point ends at the job boundary instead.
    let client = app.connect()?;
    app.fetch(class, &client);
    Ok(())
}

/// Dashboard bus adapter: one JSON line per published event for the host to
/// pick up. Fire-and-forget, matching the bus contract.
struct StdoutBus;

impl DisplayBus for StdoutBus {
    fn publish(&self, event: &str, payload: serde_json::Value) {
        println!(
            "{}",
            serde_json::json!({ "event": event, "payload": payload })
        );
    }
}
