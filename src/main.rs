use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use lost_found_assistant::{
    AuthContext, ChatController, ChatPhase, ChatState, ChatView, ClientConfig, ControllerConfig,
    HttpTransport, MessageRole, PROGRESS_ORDER,
};

/// Terminal stand-in for the chat widget. The controller only raises flags;
/// the loop below does the printing.
#[derive(Default)]
struct TerminalView {
    scroll_pending: AtomicBool,
    focus_pending: AtomicBool,
}

impl ChatView for TerminalView {
    fn scroll_to_latest(&self) {
        self.scroll_pending.store(true, Ordering::SeqCst);
    }

    fn focus_input(&self) {
        self.focus_pending.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Reset,
    Close,
    Reply(String),
}

impl Command {
    /// A bare number picks the matching quick reply when one is on screen.
    fn parse(line: &str, quick_replies: &[&str]) -> Self {
        match line.trim() {
            "/quit" | "/exit" => Command::Quit,
            "/reset" => Command::Reset,
            "/close" => Command::Close,
            other => {
                let picked = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| quick_replies.get(index));
                match picked {
                    Some(reply) => Command::Reply(reply.to_string()),
                    None => Command::Reply(line.to_string()),
                }
            }
        }
    }
}

#[derive(Default)]
struct Screen {
    /// Id of the first message of the conversation on screen.
    conversation: Option<String>,
    printed: usize,
    last_error: Option<String>,
}

impl Screen {
    fn render(&mut self, state: &ChatState, view: &TerminalView, out: &mut impl Write) -> io::Result<()> {
        if view.scroll_pending.swap(false, Ordering::SeqCst) {
            let first = state.messages.first().map(|m| m.id.clone());
            if first != self.conversation || state.messages.len() < self.printed {
                if self.conversation.is_some() {
                    writeln!(out, "── new conversation ──")?;
                }
                self.conversation = first;
                self.printed = 0;
            }
            for message in &state.messages[self.printed..] {
                // The user's own lines are already on screen.
                if message.role == MessageRole::User {
                    continue;
                }
                writeln!(out, "assistant> {}", message.content)?;
                if let Some(result) = &message.query_result {
                    writeln!(
                        out,
                        "           {} ({} of {} shown)",
                        result.summary(),
                        result.records().len(),
                        result.total()
                    )?;
                }
            }
            self.printed = state.messages.len();
        }

        if state.error != self.last_error {
            if let Some(error) = &state.error {
                writeln!(out, "! {error}")?;
            }
            self.last_error = state.error.clone();
        }

        let step = state.current_step;
        let progress = match step.progress_position() {
            Some(index) => format!("[{}/{}] {}", index + 1, PROGRESS_ORDER.len(), step.label()),
            None => step.label().to_string(),
        };
        let mut status = format!("{progress} · {}", state.current_intent.label());
        if let Some(report_id) = &state.report_id {
            status.push_str(&format!(" · report {report_id}"));
        }
        writeln!(out, "({status})")?;

        for (index, reply) in step.quick_replies().iter().enumerate() {
            writeln!(out, "  {}. {reply}", index + 1)?;
        }
        if step.is_terminal() {
            writeln!(out, "Type /reset to start over.")?;
        }

        if view.focus_pending.swap(false, Ordering::SeqCst) {
            write!(out, "> ")?;
            out.flush()?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Logs go to stderr so they stay out of the conversation.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lost_found_assistant=info".into()),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let auth = match &config.api_token {
        Some(token) => AuthContext::bearer(token.clone()),
        None => AuthContext::anonymous(),
    };
    let transport = HttpTransport::new(&config, auth)?;
    let view = Arc::new(TerminalView::default());
    let controller = ChatController::new(
        transport,
        view.clone(),
        ControllerConfig { restore_draft_on_failure: config.restore_draft_on_failure },
    );

    info!("Using chat service at {}", config.base_url);
    println!("Lost & Found assistant. Commands: /reset, /close, /quit");

    let mut screen = Screen::default();
    controller.open().await;
    screen.render(&controller.snapshot(), &view, &mut io::stdout())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line, controller.quick_replies()) {
            Command::Quit => break,
            Command::Reset => controller.reset().await,
            Command::Close => {
                controller.close();
                println!("(assistant hidden; type anything to reopen)");
                continue;
            }
            Command::Reply(text) => {
                if controller.phase() == ChatPhase::Closed {
                    controller.open().await;
                }
                controller.set_input(text);
                controller.submit().await;
            }
        }
        screen.render(&controller.snapshot(), &view, &mut io::stdout())?;
    }

    info!("Assistant closed");
    Ok(())
}
