//! `stagecraft-chat` -- terminal client for character chat and script drafts.
//!
//! Usage: `stagecraft-chat [character name]`. Without a name the first
//! character on the server is used.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                 | Description                          |
//! |--------------------------|----------|-------------------------|--------------------------------------|
//! | `STAGECRAFT_URL`         | no       | `http://localhost:3000` | Server base URL                      |
//! | `STAGECRAFT_USER`        | no       | `test-user-001`         | User id sent with every request      |
//! | `STAGECRAFT_HISTORY_DIR` | no       | --                      | Keep transcripts locally as JSON     |
//!
//! # Commands
//!
//! `/script [prompt]`, `/edit`, `/preview`, `/save [title]`, `/quit`.
//! Ctrl-C stops the response currently streaming; at the prompt it exits.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use stagecraft_core::chat::{Message, Role};
use stagecraft_core::script_blocks::ScriptBlock;
use stagecraft_session::chat::{ChatSession, SendOutcome};
use stagecraft_session::client::ApiClient;
use stagecraft_session::config::ClientConfig;
use stagecraft_session::history::{HistoryStore, JsonFileHistoryStore, ServerHistoryStore};
use stagecraft_session::script::{ScriptMode, ScriptSeed, ScriptSession};
use stagecraft_session::SessionCharacter;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Line that ends multi-line draft input in `/edit`.
const EDIT_TERMINATOR: &str = ".";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stagecraft_session=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let context = config.context();
    let client = ApiClient::new(&context);

    tracing::info!(server = %context.base_url, user = %context.user, "Starting stagecraft-chat");

    let characters = client
        .list_characters(None)
        .await
        .with_context(|| format!("cannot list characters from {}", context.base_url))?;

    let wanted = std::env::args().nth(1);
    let character = match &wanted {
        Some(name) => characters.iter().find(|c| &c.name == name),
        None => characters.first(),
    }
    .with_context(|| match &wanted {
        Some(name) => format!("no character named {name}"),
        None => "the server has no characters".to_string(),
    })?;
    let character = SessionCharacter::from(character);

    let store: Arc<dyn HistoryStore> = match &config.history_dir {
        Some(dir) => Arc::new(JsonFileHistoryStore::new(dir.clone())),
        None => {
            let ids: HashMap<String, _> = characters.iter().map(|c| (c.name.clone(), c.id)).collect();
            Arc::new(ServerHistoryStore::new(client.clone(), ids))
        }
    };

    let mut chat = ChatSession::open(character, store).await;
    let mut script: Option<ScriptSession> = None;

    println!("== {} ==", chat.character().profile.name);
    for message in chat.messages() {
        print_message(message, &chat.character().profile.name);
    }

    let interrupts = Interrupts::install();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ");
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupts.quit.cancelled() => None,
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/quit", _) => break,
            ("/script", rest) => {
                let mut seed = ScriptSeed::from_chat(&chat);
                if !rest.is_empty() {
                    seed.prompt = Some(rest.to_string());
                }
                let mut session = ScriptSession::new(seed);
                let token = interrupts.arm();
                let result = session
                    .generate(&client, &token, |delta| {
                        print!("{delta}");
                        flush();
                    })
                    .await;
                interrupts.disarm();
                println!();
                if let Err(e) = result {
                    eprintln!("script generation failed: {e}");
                }
                render_blocks(&session);
                script = Some(session);
            }
            ("/edit", _) => {
                let Some(session) = script.as_mut() else {
                    eprintln!("no script yet; run /script first");
                    continue;
                };
                if let Err(e) = session.set_mode(ScriptMode::Edit) {
                    eprintln!("{e}");
                    continue;
                }
                println!("{}", session.text());
                println!("-- enter the new draft, end with a line containing only `{EDIT_TERMINATOR}` --");
                let draft = read_draft(&mut lines).await?;
                if let Err(e) = session.edit_draft(draft) {
                    eprintln!("{e}");
                }
            }
            ("/preview", _) => match script.as_mut() {
                Some(session) => {
                    if let Err(e) = session.set_mode(ScriptMode::Preview) {
                        eprintln!("{e}");
                    }
                    render_blocks(session);
                }
                None => eprintln!("no script yet; run /script first"),
            },
            ("/save", rest) => match &script {
                Some(session) => {
                    let title = (!rest.is_empty()).then_some(rest);
                    match client.create_script(&session.to_create_script(title)).await {
                        Ok(saved) => println!(
                            "saved script #{} \"{}\" ({})",
                            saved.id,
                            saved.title,
                            session.download_file_name()
                        ),
                        Err(e) => eprintln!("save failed: {e}"),
                    }
                }
                None => eprintln!("no script yet; run /script first"),
            },
            ("", _) => {}
            _ => {
                let token = interrupts.arm();
                let outcome = chat
                    .send(line, &client, &token, |delta| {
                        print!("{delta}");
                        flush();
                    })
                    .await;
                interrupts.disarm();
                let outcome = outcome?;
                println!();
                match outcome {
                    SendOutcome::Failed(e) => {
                        tracing::debug!(error = %e, "Send failed");
                        if let Some(notice) = chat.messages().last() {
                            println!("{}", notice.content);
                        }
                    }
                    SendOutcome::Cancelled => println!("(stopped)"),
                    SendOutcome::Completed | SendOutcome::Ignored => {}
                }
            }
        }
    }

    Ok(())
}

/// Routes Ctrl-C to the response in flight, or ends the session when idle.
///
/// Listening for Ctrl-C replaces the default SIGINT handling for the rest of
/// the process, so there is exactly one listener.
#[derive(Clone)]
struct Interrupts {
    current: Arc<Mutex<Option<CancellationToken>>>,
    quit: CancellationToken,
}

impl Interrupts {
    fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            quit: CancellationToken::new(),
        }
    }

    fn install() -> Self {
        let interrupts = Self::new();
        let listener = interrupts.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !listener.interrupt() {
                    break;
                }
            }
        });
        interrupts
    }

    /// Handle one Ctrl-C. Returns `false` once the session should end.
    fn interrupt(&self) -> bool {
        match self.take_current() {
            Some(token) => {
                token.cancel();
                true
            }
            None => {
                self.quit.cancel();
                false
            }
        }
    }

    /// A fresh token cancelled by the next Ctrl-C.
    fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = Some(token.clone());
        }
        token
    }

    fn disarm(&self) {
        self.take_current();
    }

    fn take_current(&self) -> Option<CancellationToken> {
        self.current.lock().ok().and_then(|mut current| current.take())
    }
}

async fn read_draft(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<String> {
    let mut draft = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == EDIT_TERMINATOR {
            break;
        }
        draft.push(line);
    }
    Ok(draft.join("\n"))
}

fn print_message(message: &Message, character_name: &str) {
    match message.role {
        Role::User => println!("you: {}", message.content),
        Role::Assistant | Role::Streaming => println!("{character_name}: {}", message.content),
        Role::System => {}
    }
}

fn render_blocks(session: &ScriptSession) {
    for block in session.blocks() {
        match &block {
            ScriptBlock::Stage { text } => println!("    {text}"),
            ScriptBlock::Line { speaker, text } if session.is_viewpoint(&block) => {
                println!("{:>40}", format!("{text} :{speaker}"))
            }
            ScriptBlock::Line { speaker, text } => println!("{speaker}: {text}"),
            ScriptBlock::Narration { text } => println!("  {text}"),
        }
    }
}

fn prompt(text: &str) {
    print!("{text}");
    flush();
}

fn flush() {
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_cancels_the_response_in_flight() {
        let interrupts = Interrupts::new();
        let token = interrupts.arm();

        assert!(interrupts.interrupt());
        assert!(token.is_cancelled());
        assert!(!interrupts.quit.is_cancelled());
    }

    #[test]
    fn interrupt_at_the_prompt_quits() {
        let interrupts = Interrupts::new();
        assert!(!interrupts.interrupt());
        assert!(interrupts.quit.is_cancelled());
    }

    #[test]
    fn finished_responses_no_longer_absorb_interrupts() {
        let interrupts = Interrupts::new();
        let first = interrupts.arm();
        interrupts.disarm();

        assert!(!interrupts.interrupt());
        assert!(!first.is_cancelled());
        assert!(interrupts.quit.is_cancelled());
    }

    #[test]
    fn each_reply_gets_a_fresh_token() {
        let interrupts = Interrupts::new();
        let first = interrupts.arm();
        assert!(interrupts.interrupt());
        assert!(first.is_cancelled());

        let second = interrupts.arm();
        assert!(!second.is_cancelled());
        assert!(interrupts.interrupt());
        assert!(second.is_cancelled());
    }
}
