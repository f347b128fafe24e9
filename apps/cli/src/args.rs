use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchMonthly,
    FetchDaily,
    FetchToday,
    Widgets,
}

#[derive(Debug)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args() -> Result<CliArgs, String> {
    let mut args = env::args().skip(1);
    let mut config = None;
    let mut command = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "fetch-monthly" => command = Some(Command::FetchMonthly),
            "fetch-daily" => command = Some(Command::FetchDaily),
            "fetch-today" => command = Some(Command::FetchToday),
            "widgets" => command = Some(Command::Widgets),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    let command = command.ok_or_else(|| "missing command".to_string())?;
    Ok(CliArgs { config, command })
}

pub fn print_help() {
    println!(
        "sitepulse\n\n\
Usage:\n  sitepulse [--config <path>] <command>\n\n\
Commands:\n  fetch-monthly  Fetch the previous full month and store it under its month period\n  fetch-daily    Fetch yesterday and store it under its daily period\n  fetch-today    Fetch today and store it under the today period\n  widgets        Publish widget values for the dashboard bus to stdout\n\n\
Options:\n  --config <path>  Configuration file (default /etc/sitepulse.yml)\n  -h, --help       Show this help message\n"
    );
}
