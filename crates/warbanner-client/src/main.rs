//! Warbanner lobby CLI.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use warbanner_client::{
    ApiClient, ClientError, IdentityStore, Role, SyncLoop, parse_character,
};
use warbanner_faction::FactionTable;
use warbanner_protocol::{CreateLobbyRequest, JoinLobbyRequest, LobbyId};

#[derive(Parser, Debug)]
#[command(name = "warbanner", about = "Battleground lobby client")]
struct Cli {
    /// Lobby server base URL.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Identity file recording which lobbies this device created or joined.
    #[arg(long, default_value = "warbanner-identity.json")]
    identity_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a lobby and become its leader.
    Create {
        /// Path to the exported character JSON.
        character_file: PathBuf,
    },
    /// Join an existing lobby.
    Join {
        lobby_id: String,
        character_file: PathBuf,
    },
    /// Poll a lobby until it starts or Ctrl-C.
    Watch {
        lobby_id: String,
        /// Polling interval in seconds.
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
    },
    /// Start a lobby you lead.
    Start { lobby_id: String },
    /// List lobbies still accepting players.
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let api = ApiClient::new(cli.server);
    let mut identities = IdentityStore::open(cli.identity_file)?;
    let factions = FactionTable::default();

    match cli.command {
        Command::Create { character_file } => {
            let raw = std::fs::read_to_string(&character_file)?;
            let character = parse_character(&raw, &factions)?;

            let id = api
                .create(&CreateLobbyRequest {
                    leader_name: character.name.clone(),
                    faction: character.faction.to_string(),
                    character_data: raw,
                })
                .await?;
            identities.record(id.clone(), Role::Leader, character.name)?;
            println!("created lobby {id}");
        }
        Command::Join {
            lobby_id,
            character_file,
        } => {
            let raw = std::fs::read_to_string(&character_file)?;
            let character = parse_character(&raw, &factions)?;

            let id = LobbyId::from(lobby_id.as_str());
            let echo = api
                .join(
                    &id,
                    &JoinLobbyRequest {
                        participant_name: character.name.clone(),
                        faction: character.faction.to_string(),
                        character_data: raw,
                    },
                )
                .await?;
            identities.record(id.clone(), Role::Participant, character.name)?;
            println!("joined lobby {id} as {} ({})", echo.name, echo.faction);
        }
        Command::Watch {
            lobby_id,
            interval_secs,
        } => {
            let id = LobbyId::from(lobby_id.as_str());
            let local_name = identities
                .get(&id)
                .map(|identity| identity.name.clone())
                .unwrap_or_default();

            let (sync, mut handle) = SyncLoop::new(
                api,
                id,
                local_name,
                Duration::from_secs(interval_secs),
            );
            let mut task = tokio::spawn(sync.run());
            let mut watching = true;

            loop {
                tokio::select! {
                    updated = handle.changed(), if watching => {
                        if !updated {
                            watching = false;
                            continue;
                        }
                        if let Some(view) = handle.view() {
                            let role = if view.is_leader { "leader" } else { "participant" };
                            println!(
                                "[{}] leader {} | {} vs {} | can start: {} | you: {}",
                                view.status,
                                view.leader,
                                view.alliance_count,
                                view.horde_count,
                                view.can_start,
                                role,
                            );
                        }
                    }
                    outcome = &mut task => {
                        match outcome.unwrap_or(None) {
                            Some(instance_id) => {
                                println!("match started: instance {instance_id}")
                            }
                            None => println!("stopped watching"),
                        }
                        break;
                    }
                }
            }
        }
        Command::Start { lobby_id } => {
            let id = LobbyId::from(lobby_id.as_str());
            let requester = identities
                .get(&id)
                .map(|identity| identity.name.clone())
                .ok_or_else(|| {
                    ClientError::Api(format!("no identity recorded for lobby {id}"))
                })?;

            let started = api.start(&id, &requester).await?;
            println!("match instance {}", started.match_instance_id);
            for account in started.accounts {
                println!("  {} / {}", account.username, account.password);
            }
        }
        Command::List => {
            for id in api.lobbies().await? {
                println!("{id}");
            }
        }
    }

    Ok(())
}
