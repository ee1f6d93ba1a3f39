//! `velux` - command-line front-end for the KLF 200 gateway.
//!
//! Connects, authenticates, runs one registry command, and prints the
//! decoded result as pretty JSON:
//!
//! ```text
//! velux -H 192.168.1.20 -P velux123 GET_PROTOCOL_VERSION
//! velux -H 192.168.1.20 -P velux123 COMMAND_SEND '{"position": 0, "nodeIds": [2, 3]}'
//! velux -H 192.168.1.20 -P velux123 info
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::EnvFilter;

use klf200::{Config, Connection, Event};

#[derive(Parser)]
#[command(
    name = "velux",
    version,
    about = "Control a Velux KLF 200 io-homecontrol gateway",
    arg_required_else_help = true
)]
struct Cli {
    /// Gateway host, as `host` or `host:port`
    #[arg(short = 'H', long, env = "VELUX_HOST")]
    host: String,

    /// Gateway password (printed on the unit's label)
    #[arg(short = 'P', long, env = "VELUX_PASSWORD", hide_env_values = true)]
    password: String,

    /// Overall timeout in seconds
    #[arg(short = 't', long, default_value_t = 60)]
    timeout: u64,

    /// Increase verbosity (repeat for more: -D, -DD, -DDD)
    #[arg(short = 'D', long = "debug", action = ArgAction::Count)]
    debug: u8,

    /// `info` or a registry command without the GW_/_REQ affixes,
    /// e.g. GET_PROTOCOL_VERSION or COMMAND_SEND
    command: String,

    /// JSON parameters for the command
    params: Option<String>,
}

fn init_logging(level: u8) {
    let directive = match level {
        0 => "klf200=warn",
        1 => "klf200=info",
        2 => "klf200=debug",
        _ => "trace",
    };
    let filter = EnvFilter::from_default_env().add_directive(directive.parse().expect("directive"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Split `host[:port]`, leaving bare hostnames untouched.
fn split_host(host: &str) -> (String, Option<u16>) {
    if let Some((name, port)) = host.rsplit_once(':') {
        if let Ok(port) = port.parse() {
            return (name.to_string(), Some(port));
        }
    }
    (host.to_string(), None)
}

async fn run(cli: Cli) -> ExitCode {
    let (host, port) = split_host(&cli.host);
    let mut config = Config::new(host, cli.password.clone());
    if let Some(port) = port {
        config = config.port(port);
    }

    let connection = match Connection::connect(config).await {
        Ok(connection) => connection,
        Err(err) => {
            eprintln!("velux: connect failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = if cli.command == "info" {
        run_info(&connection).await
    } else {
        run_command(&connection, &cli).await
    };

    connection.disconnect().await;
    code
}

async fn run_info(connection: &Connection) -> ExitCode {
    let version = connection.get_version().await.ok().flatten();
    let protocol = connection.get_protocol_version().await.ok().flatten();
    let state = connection.get_state().await.ok().flatten();

    let info = json!({
        "fingerprint": connection.fingerprint(),
        "version": version,
        "protocolVersion": protocol,
        "state": state,
    });
    println!("{}", serde_json::to_string_pretty(&info).expect("json"));
    ExitCode::SUCCESS
}

async fn run_command(connection: &Connection, cli: &Cli) -> ExitCode {
    let name = format!("GW_{}_REQ", cli.command.to_uppercase());
    if klf200::commands::by_name(&name).is_none() {
        eprintln!("velux: unknown command {}", cli.command);
        return ExitCode::FAILURE;
    }

    let params: Value = match &cli.params {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("velux: invalid JSON parameters: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Value::Null,
    };

    let mut events = connection.subscribe();
    let result = match connection.request(&name, params).await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("velux: {err}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Some(data) => {
            println!("{}", serde_json::to_string_pretty(&data).expect("json"));
            ExitCode::SUCCESS
        }
        None => {
            // Commands without a response body legitimately return
            // nothing; a buffered error event means the call failed.
            loop {
                match events.try_recv() {
                    Ok(Event::Error { message, .. }) => {
                        eprintln!("velux: {message}");
                        break ExitCode::FAILURE;
                    }
                    Ok(_) => continue,
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => break ExitCode::SUCCESS,
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let timeout = Duration::from_secs(cli.timeout);
    match tokio::time::timeout(timeout, run(cli)).await {
        Ok(code) => code,
        Err(_) => {
            eprintln!("velux: timed out");
            ExitCode::FAILURE
        }
    }
}
