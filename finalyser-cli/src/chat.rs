use finalyser_chat::{build_system_prompt, ChatError, ChatMessage, ChatStream, ProxyClient, UpstreamClient};
use finalyser_core::FinancialSnapshot;
use std::io::{self, Write};

pub const GREETING: &str = "Hello! I'm your financial assistant. I can help you with budgeting advice, \
expense analysis, and goal planning. What would you like to know?";

/// Where chat turns are sent
#[derive(Debug, Clone)]
pub enum ChatTarget {
    /// Straight to the completion service, building the system prompt locally
    Direct(UpstreamClient),
    /// Through a running `finalyser serve` endpoint
    Proxy(ProxyClient),
}

impl ChatTarget {
    async fn open(&self, transcript: &[ChatMessage], snapshot: Option<&FinancialSnapshot>) -> Result<ChatStream, ChatError> {
        match self {
            ChatTarget::Direct(client) => client.stream_chat(&build_system_prompt(snapshot), transcript).await,
            ChatTarget::Proxy(client) => client.stream_chat(transcript, snapshot).await,
        }
    }
}

/// Running transcript for the chat widget
pub struct Conversation {
    target: ChatTarget,
    transcript: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(target: ChatTarget) -> Self {
        Self {
            target,
            transcript: Vec::new(),
        }
    }

    /// Send one user turn, calling `on_delta` as text arrives.
    ///
    /// The turn is only kept in the transcript when the reply completes.
    pub async fn send(
        &mut self,
        message: &str,
        snapshot: Option<&FinancialSnapshot>,
        on_delta: impl FnMut(&str),
    ) -> Result<String, ChatError> {
        self.transcript.push(ChatMessage::user(message));
        let reply = match self.target.open(&self.transcript, snapshot).await {
            Ok(stream) => stream.for_each_delta(on_delta).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(text) => {
                self.transcript.push(ChatMessage::assistant(text.clone()));
                Ok(text)
            }
            Err(e) => {
                self.transcript.pop();
                tracing::warn!("chat turn failed: {e}");
                Err(e)
            }
        }
    }

    /// Send and echo the reply to stdout; failures become one error line
    pub async fn send_to_console(&mut self, message: &str, snapshot: Option<&FinancialSnapshot>) {
        let mut stdout = io::stdout();
        let res = self
            .send(message, snapshot, |chunk| {
                print!("{chunk}");
                stdout.flush().ok();
            })
            .await;
        match res {
            Ok(_) => println!(),
            Err(e) => println!("\n[chat error] {}", e.public_message()),
        }
    }
}
