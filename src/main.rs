use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use dashchat::chat::ChatMessage;
use dashchat::config::{self, ConfigResult};
use dashchat::transcript;
use dashchat::{ChatTransport, HttpTransport, SessionController, TurnOutcome};

/// Chat with the dashboard assistant about your calendar, email, drafts and meetings
#[derive(Parser, Debug)]
#[command(name = "dashchat", version, about)]
struct Cli {
    /// Config file (default: ~/.config/dashchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the server base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Use single-shot requests instead of streaming replies
    #[arg(long, global = true)]
    no_stream: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat (default). `/new` starts over, `/quit` exits
    Chat,
    /// Send a single message and print the reply
    Send {
        message: String,
        /// Continue an existing thread
        #[arg(long)]
        thread: Option<String>,
    },
    /// List conversation threads
    Threads,
    /// Print the messages of a thread
    History { thread_id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let ConfigResult {
        mut config,
        warning,
    } = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    if let Some(warning) = warning {
        eprintln!("warning: {}", warning);
    }
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    if cli.no_stream {
        config.server.streaming = false;
    }

    let transport = HttpTransport::from_config(&config.server)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => interactive(&transport).await,
        Command::Send { message, thread } => {
            let mut controller = SessionController::new();
            if let Some(thread_id) = thread {
                controller.load_thread(&transport, &thread_id).await?;
            }
            match send_turn(&mut controller, &transport, &message).await {
                TurnOutcome::Failed(err) => Err(err.into()),
                _ => Ok(()),
            }
        }
        Command::Threads => {
            let threads = transport.list_threads().await?;
            println!("{}", transcript::render_threads(&threads));
            Ok(())
        }
        Command::History { thread_id } => {
            let mut controller = SessionController::new();
            controller.load_thread(&transport, &thread_id).await?;
            println!("{}", transcript::render_messages(controller.messages()));
            Ok(())
        }
    }
}

async fn interactive(transport: &HttpTransport) -> Result<()> {
    let mut controller = SessionController::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let text = line.trim();

        match text {
            "" => continue,
            "/quit" => break,
            "/new" => {
                controller.new_conversation();
                println!("(new conversation)");
            }
            _ => {
                send_turn(&mut controller, transport, text).await;
            }
        }
    }
    Ok(())
}

/// Run one turn, printing deltas as they arrive; Ctrl-C cancels the turn
async fn send_turn<T: ChatTransport>(
    controller: &mut SessionController,
    transport: &T,
    text: &str,
) -> TurnOutcome {
    let mut printer = DeltaPrinter::default();

    let outcome = tokio::select! {
        outcome = controller.run_turn_with(transport, text, |m| printer.update(m)) => outcome,
        _ = tokio::signal::ctrl_c() => {
            controller.cancel_active();
            TurnOutcome::Cancelled
        }
    };

    match &outcome {
        TurnOutcome::Completed { message_id } => {
            if let Some(message) = controller.message(message_id) {
                printer.update(message);
            }
            println!();
        }
        TurnOutcome::Cancelled => println!("\n(cancelled)"),
        TurnOutcome::Failed(_) => {
            if let Some(notice) = controller.messages().last() {
                eprintln!("\n{}", notice.content);
            }
        }
    }
    outcome
}

/// Prints only the part of the reply not yet shown
#[derive(Default)]
struct DeltaPrinter {
    printed: usize,
}

impl DeltaPrinter {
    fn update(&mut self, message: &ChatMessage) {
        if let Some(rest) = message.content.get(self.printed..) {
            print!("{}", rest);
            let _ = io::stdout().flush();
            self.printed = message.content.len();
        }
    }
}
