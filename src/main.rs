//! # Meal Orders
//!
//! Interactive terminal front end. Each line is one user intent:
//!
//! | Input | Action |
//! |-------|--------|
//! | `chicken` or `order chicken` | Place an order for a random chicken meal |
//! | `complete <id>` | Mark an order completed |
//! | `delete <id>` | Delete an order |
//! | `list` | Show the orders again |
//! | `help` | Show this table |
//! | `quit` | End the session |
//!
//! The order list and message area are re-rendered after every action.

use clap::Parser;
use meal_orders::config::{Config, StorageBackend};
use meal_orders::lifecycle::{setup_tracing, MealOrderSystem};
use meal_orders::view::ViewAction;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

const HELP: &str = "\
Commands:
  <ingredient> | order <ingredient>   place an order
  complete <id>                       mark an order completed
  delete <id>                         delete an order
  list                                show orders
  help                                show this help
  quit                                end the session";

/// Command-line arguments for the ordering session.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Meal lookup endpoint, overriding the configuration file
    #[arg(long, env = "MEAL_ORDERS_API_URL")]
    api_url: Option<String>,

    /// Keep orders in this directory so the session spans several runs
    #[arg(long, env = "MEAL_ORDERS_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

/// One parsed input line.
#[derive(Debug, PartialEq)]
enum Command {
    Place(String),
    Action(ViewAction),
    List,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let (head, rest) = trimmed
        .split_once(char::is_whitespace)
        .map(|(h, r)| (h, r.trim()))
        .unwrap_or((trimmed, ""));

    match head.to_ascii_lowercase().as_str() {
        "quit" | "exit" if rest.is_empty() => Command::Quit,
        "help" if rest.is_empty() => Command::Help,
        "list" if rest.is_empty() => Command::List,
        "order" => Command::Place(rest.to_string()),
        "complete" | "done" | "delete" | "rm" => match ViewAction::parse(trimmed) {
            Some(action) => Command::Action(action),
            None => Command::Unknown(trimmed.to_string()),
        },
        _ => Command::Place(trimmed.to_string()),
    }
}

async fn load_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::default(),
    };

    if let Some(url) = &args.api_url {
        config.lookup.base_url = url.clone();
    }
    if let Some(dir) = &args.session_dir {
        config.storage.backend = StorageBackend::File;
        config.storage.session_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn show(system: &MealOrderSystem) {
    match system.controller.render().await {
        Ok(view) => println!("{view}"),
        Err(e) => error!(error = %e, "Could not render orders"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args.log_level);

    let config = load_config(&args).await?;
    info!(api = %config.lookup.base_url, backend = ?config.storage.backend, "Loaded configuration");

    let system = MealOrderSystem::from_config(&config).await?;

    println!("{HELP}\n");
    show(&system).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::List => {}
            Command::Place(ingredient) => {
                // Failures are already in the message area.
                let _ = system.controller.place_order(&ingredient).await;
            }
            Command::Action(action) => {
                let _ = system.controller.dispatch(action).await;
            }
            Command::Unknown(input) => {
                println!("Unrecognized command: {input} (try `help`)");
                continue;
            }
        }
        show(&system).await;
    }

    system.shutdown().await?;
    info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_orders::model::OrderId;
    use meal_orders::view::ActionKind;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  chicken "), Command::Place("chicken".into()));
        assert_eq!(
            parse_command("order  beef stew"),
            Command::Place("beef stew".into())
        );
        assert_eq!(parse_command("order"), Command::Place(String::new()));
        // A blank line is an empty submission, not something to skip.
        assert_eq!(parse_command("   "), Command::Place(String::new()));
        assert_eq!(parse_command(""), Command::Place(String::new()));
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("list"), Command::List);
        assert_eq!(
            parse_command("complete 42"),
            Command::Action(ViewAction {
                kind: ActionKind::Complete,
                order_id: OrderId(42),
            })
        );
        assert_eq!(
            parse_command("Delete 7"),
            Command::Action(ViewAction {
                kind: ActionKind::Delete,
                order_id: OrderId(7),
            })
        );
        assert!(matches!(parse_command("delete abc"), Command::Unknown(_)));
    }
}
