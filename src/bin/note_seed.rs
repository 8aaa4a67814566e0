//! Insert a single note into the configured store
//!
//! Usage: `note-seed <content> [important]`

use std::process::ExitCode;

use notes_server::config::Config;
use notes_server::model::NewNote;
use notes_server::store;

const USAGE: &str = "usage: note-seed <content> [important]";

/// Config file consulted by the seed tool
const CONFIG_PATH: &str = "config";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let Some(content) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };
    let important = match args.next().as_deref() {
        None => false,
        Some(flag) => match flag.parse::<bool>() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("important must be true or false, got {flag:?}");
                eprintln!("{USAGE}");
                return ExitCode::from(2);
            }
        },
    };

    match seed(content, important).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("note-seed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn seed(content: String, important: bool) -> Result<String, Box<dyn std::error::Error>> {
    let cfg = Config::load_from(CONFIG_PATH)?;
    let note_store = store::open(&cfg.store).await?;
    let note = note_store
        .create(NewNote::new(content).important(important))
        .await?;
    Ok(serde_json::to_string(&note)?)
}
