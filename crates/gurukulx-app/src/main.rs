//! GurukulX whiteboard command-line shell.
//!
//! Replays pointer scripts through the engine, exports the board, and talks
//! to the collaborators.

mod config;
mod script;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use gurukulx_assist::{AssistMode, AssistantSession, Collaborators, Notice, SpeechOutcome};
use gurukulx_core::WhiteboardState;
use gurukulx_render::{export_raster, now_millis, to_data_uri, write_export};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "gurukulx-board",
    version,
    about = "Headless GurukulX whiteboard: replay, export and ask the teaching assistant"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a script, write the PNG export and print the summary JSON
    Replay(ReplayArgs),
    /// Ask the assistant a question about a replayed board
    Ask(AskArgs),
    /// Send a replayed board to the vision service
    Analyze(AnalyzeArgs),
    /// Synthesize speech into an audio file
    Speak(SpeakArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Pointer script (JSON)
    #[arg(long)]
    script: PathBuf,
    /// Directory for the PNG export
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Leave text boxes out of the export
    #[arg(long)]
    no_text: bool,
}

#[derive(Args, Debug)]
struct AskArgs {
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    message: String,
    /// general, lesson_suggestion, content_help, doubt_solving or formula_recognition
    #[arg(long)]
    mode: Option<String>,
    /// Use local mock collaborators
    #[arg(long)]
    mock: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    prompt: Option<String>,
    #[arg(long)]
    mock: bool,
}

#[derive(Args, Debug)]
struct SpeakArgs {
    #[arg(long)]
    text: String,
    /// Output audio file
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    mock: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay(args) => command_replay(&config, args),
        Commands::Ask(args) => command_ask(&config, args),
        Commands::Analyze(args) => command_analyze(&config, args),
        Commands::Speak(args) => command_speak(&config, args),
    }
}

fn replay_board(config: &AppConfig, path: &Path) -> Result<WhiteboardState> {
    let actions = script::load_script(path)?;
    let mut board = WhiteboardState::new(config.board.clone());
    let events = script::replay(&mut board, &actions);
    log::info!(
        "replayed {} actions ({} events) from {}",
        actions.len(),
        events.len(),
        path.display()
    );
    Ok(board)
}

fn session(config: &AppConfig, mock: bool) -> Result<AssistantSession> {
    let collaborators = if mock {
        Collaborators::mock(&config.assist)
    } else {
        Collaborators::http(&config.assist)?
    };
    Ok(AssistantSession::new(collaborators, &config.assist))
}

fn report_notices(notices: Vec<Notice>) -> Option<Notice> {
    let mut last_error = None;
    for notice in notices {
        if notice.destructive {
            log::error!("{}: {}", notice.title, notice.description);
            last_error = Some(notice);
        } else {
            log::info!("{}: {}", notice.title, notice.description);
        }
    }
    last_error
}

fn command_replay(config: &AppConfig, args: ReplayArgs) -> Result<()> {
    let board = replay_board(config, &args.script)?;

    let png = export_raster(&board, !args.no_text).context("Failed to render board")?;
    let path = write_export(&args.out, &png, now_millis())?;
    log::info!("exported {}", path.display());

    println!("{}", board.export_summary().to_json()?);
    Ok(())
}

fn command_ask(config: &AppConfig, args: AskArgs) -> Result<()> {
    let board = replay_board(config, &args.script)?;
    let mut session = session(config, args.mock)?;
    if let Some(mode) = args.mode.as_deref() {
        session.set_mode(mode.parse::<AssistMode>()?);
    }

    let reply = session
        .send(&args.message, &board.export_summary())
        .map(|message| message.content.clone());
    report_notices(session.take_notices());

    match reply {
        Some(content) => {
            println!("{content}");
            Ok(())
        }
        None => bail!("message is empty"),
    }
}

fn command_analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<()> {
    let board = replay_board(config, &args.script)?;
    let png = export_raster(&board, true).context("Failed to render board")?;

    let mut session = session(config, args.mock)?;
    let reply = session
        .analyze_board(to_data_uri(&png), args.prompt)
        .map(|message| message.content.clone());

    if let Some(notice) = report_notices(session.take_notices()) {
        bail!("{}: {}", notice.title, notice.description);
    }
    if let Some(content) = reply {
        println!("{content}");
    }
    Ok(())
}

fn command_speak(config: &AppConfig, args: SpeakArgs) -> Result<()> {
    let mut session = session(config, args.mock)?;
    let outcome = session.speak(&args.text);
    let notice = report_notices(session.take_notices());

    match outcome {
        SpeechOutcome::Audio(audio) => {
            std::fs::write(&args.out, &audio.bytes)
                .with_context(|| format!("Failed to write {}", args.out.display()))?;
            log::info!(
                "wrote {} bytes of {} to {}",
                audio.bytes.len(),
                audio.content_type,
                args.out.display()
            );
            Ok(())
        }
        SpeechOutcome::LocalFallback => Ok(()),
        SpeechOutcome::Failed => match notice {
            Some(notice) => bail!("{}: {}", notice.title, notice.description),
            None => bail!("speech synthesis failed"),
        },
    }
}
