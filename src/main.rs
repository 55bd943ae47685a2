//! Pushclip CLI - push messages in, clipboard content out.
//!
//! This is the main binary entry point. See the `pushclip` library for
//! the core functionality.

use anyhow::Result;
use mimalloc::MiMalloc;
use pushclip::{app, sender, Config, TokenEvent, TokenProvider};

/// Global allocator configured per M-MIMALLOC-APPS guideline.
/// mimalloc provides better multi-threaded performance than the system allocator.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Global flag for signal-triggered shutdown (as Arc for signal-hook compatibility)
static SHUTDOWN_FLAG: std::sync::LazyLock<Arc<AtomicBool>> =
    std::sync::LazyLock::new(|| Arc::new(AtomicBool::new(false)));

#[derive(Parser, Debug)]
#[command(name = "pushclip", version, about = "Push messages to your clipboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the shell: show the registration token and listen for messages
    Run {
        /// Run without a TUI (daemon/CI mode)
        #[arg(long)]
        headless: bool,
    },
    /// Send a message to a device so it can be copied there
    Send {
        /// Recipient registration token (defaults to the remembered one)
        #[arg(long)]
        to: Option<String>,
        /// Message body to deliver
        body: String,
        /// Remember the recipient token for future sends
        #[arg(long, conflicts_with = "forget")]
        remember: bool,
        /// Forget the remembered recipient token
        #[arg(long)]
        forget: bool,
    },
    /// Fetch a registration token and print it
    Token,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_shell(false),
        Some(Command::Run { headless }) => run_shell(headless),
        Some(Command::Send {
            to,
            body,
            remember,
            forget,
        }) => {
            init_stderr_logging();
            let config = Config::load()?;
            sender::run(&config, to, &body, remember, forget)
        }
        Some(Command::Token) => {
            init_stderr_logging();
            print_token()
        }
    }
}

/// Console logging for non-TUI commands.
fn init_stderr_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

/// File logging so the TUI doesn't interfere with log output.
///
/// Uses PUSHCLIP_LOG_FILE, or PUSHCLIP_CONFIG_DIR/pushclip.log, or a tmp
/// fallback.
fn init_file_logging() -> Result<()> {
    let log_path = if let Ok(path) = std::env::var("PUSHCLIP_LOG_FILE") {
        std::path::PathBuf::from(path)
    } else if let Ok(config_dir) = std::env::var("PUSHCLIP_CONFIG_DIR") {
        std::path::PathBuf::from(config_dir).join("pushclip.log")
    } else {
        std::env::temp_dir().join("pushclip.log")
    };
    let log_file = std::fs::File::create(&log_path)
        .map_err(|e| anyhow::anyhow!("Failed to create log file at {log_path:?}: {e}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_secs()
        .init();
    Ok(())
}

/// Runs the shell in TUI or headless mode.
fn run_shell(headless: bool) -> Result<()> {
    // No terminal to draw on means headless regardless of flags.
    let headless = headless || !atty::is(atty::Stream::Stdout);

    if headless {
        init_stderr_logging();
    } else {
        init_file_logging()?;
    }

    let config = Config::load()?;
    let mut shell = app::AppShell::new(config);

    if headless {
        // Set up signal handlers
        use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
        use signal_hook::flag;
        flag::register(SIGINT, Arc::clone(&SHUTDOWN_FLAG))?;
        flag::register(SIGTERM, Arc::clone(&SHUTDOWN_FLAG))?;
        flag::register(SIGHUP, Arc::clone(&SHUTDOWN_FLAG))?;

        return app::run_headless_loop(&mut shell, &SHUTDOWN_FLAG);
    }

    // Set up panic hook to log panics and ensure terminal cleanup
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        log::error!("PANIC: {panic_info:?}");
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        default_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app::run_tui(&mut shell, &mut terminal);

    // Restore the terminal even if the loop errored
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;

    result
}

/// Fetches one registration token and prints it to stdout.
fn print_token() -> Result<()> {
    let config = Config::load()?;
    let rx = TokenProvider::new(&config.server_url, &config.device_name).spawn_fetch();

    match rx.recv() {
        Ok(TokenEvent::Received(token)) => {
            println!("{token}");
            Ok(())
        }
        Ok(TokenEvent::Failed(reason)) => anyhow::bail!("Token fetch failed: {reason}"),
        Err(_) => anyhow::bail!("Token fetch did not complete"),
    }
}
