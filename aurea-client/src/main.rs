//! `aurea-chat`: terminal client for the Aurea proxy.
//!
//! Reads one message per line from stdin and prints the reply as it streams.
//! The proxy URL comes from `AUREA_URL` (default `http://127.0.0.1:3000`).

use std::io::Write;

use aurea_client::{ChatClient, Conversation, DEFAULT_URL, run_turn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Prints only the part of the last assistant message not yet shown.
#[derive(Default)]
struct Printer {
    message: usize,
    printed: usize,
}

impl Printer {
    fn update(&mut self, conversation: &Conversation) {
        let messages = conversation.messages();
        let Some(last) = messages.last().filter(|m| !m.is_user) else {
            return;
        };
        let index = messages.len() - 1;
        if index != self.message {
            if self.printed > 0 {
                println!();
            }
            self.message = index;
            self.printed = 0;
        }
        if let Some(new) = last.text.get(self.printed..) {
            print!("{new}");
            self.printed = last.text.len();
            let _ = std::io::stdout().flush();
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::var("AUREA_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let client = ChatClient::new(url);
    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt();
    while let Some(line) = lines.next_line().await? {
        let mut printer = Printer::default();
        match run_turn(&client, &mut conversation, line, |c| printer.update(c)).await {
            Ok(true) => println!(),
            Ok(false) => {}
            Err(e) => {
                println!();
                tracing::debug!(error = %e, "turn failed");
            }
        }
        prompt();
    }
    Ok(())
}
