//! finalyser-chat: snapshot-aware chat proxy in front of an OpenAI-compatible
//! completion service, plus the streaming client used to consume it

pub mod client;
pub mod context;
pub mod error;
pub mod server;
pub mod stream;
pub mod upstream;

pub use client::ProxyClient;
pub use context::build_system_prompt;
pub use error::ChatError;
pub use server::{router, serve, ChatProxyRequest};
pub use stream::{ChatStream, SseDecoder, StreamEvent};
pub use upstream::{ChatMessage, UpstreamClient, UpstreamConfig};
