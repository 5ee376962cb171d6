//! Incremental decoding of OpenAI-style server-sent events into text chunks.
//!
//! [`ChatStream`] is lazy, finite and non-restartable: it yields
//! `Delta`s, then exactly one `Completed` (or one error), then `None`.
//! Dropping it abandons the underlying HTTP body.

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt::Display;

use crate::error::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    Completed,
}

/// Line-buffered SSE parser; tolerates chunks split anywhere, including
/// inside a multi-byte character.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes; returns every event completed by them
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, ChatError> {
        if self.done {
            return Ok(Vec::new());
        }
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(ev) = self.decode_line(&line)? {
                out.push(ev);
                if self.done {
                    self.buf.clear();
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Flush a trailing line that arrived without a newline
    pub fn finish(&mut self) -> Result<Vec<StreamEvent>, ChatError> {
        if self.done || self.buf.is_empty() {
            return Ok(Vec::new());
        }
        let line = std::mem::take(&mut self.buf);
        Ok(self.decode_line(&line)?.into_iter().collect())
    }

    fn decode_line(&mut self, raw: &[u8]) -> Result<Option<StreamEvent>, ChatError> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        // Blank separators, comments and `event:`/`id:` fields carry no text.
        let Some(data) = line.strip_prefix("data:") else {
            return Ok(None);
        };
        let data = data.trim();
        if data == "[DONE]" {
            self.done = true;
            return Ok(Some(StreamEvent::Completed));
        }

        let v: Value = serde_json::from_str(data).map_err(|e| ChatError::Stream(format!("parse SSE json: {e}")))?;
        if let Some(err) = v.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            return Err(ChatError::Stream(message));
        }

        // choices[0].delta.content; role-only and tool-call deltas are skipped
        let content = v
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c0| c0.get("delta"))
            .and_then(|d| d.get("content"))
            .and_then(|c| c.as_str())
            .filter(|c| !c.is_empty());
        Ok(content.map(|c| StreamEvent::Delta(c.to_string())))
    }
}

/// Assistant reply arriving chunk by chunk
pub struct ChatStream {
    body: Option<BoxStream<'static, Result<Vec<u8>, String>>>,
    decoder: SseDecoder,
    pending: VecDeque<StreamEvent>,
    finished: bool,
}

impl ChatStream {
    pub fn from_response(resp: reqwest::Response) -> Self {
        Self::from_byte_stream(resp.bytes_stream())
    }

    pub fn from_byte_stream<S, B, E>(body: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]>,
        E: Display,
    {
        let body = body
            .map(|chunk| chunk.map(|b| b.as_ref().to_vec()).map_err(|e| e.to_string()))
            .boxed();
        Self {
            body: Some(body),
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Next event; `None` once the stream has completed or failed
    pub async fn next_event(&mut self) -> Option<Result<StreamEvent, ChatError>> {
        loop {
            if let Some(ev) = self.pending.pop_front() {
                if ev == StreamEvent::Completed {
                    self.close();
                }
                return Some(Ok(ev));
            }
            if self.finished {
                return None;
            }
            let Some(body) = self.body.as_mut() else {
                self.close();
                return None;
            };

            match body.next().await {
                Some(Ok(bytes)) => match self.decoder.push(&bytes) {
                    Ok(events) => self.pending.extend(events),
                    Err(e) => {
                        self.close();
                        return Some(Err(e));
                    }
                },
                Some(Err(msg)) => {
                    self.close();
                    return Some(Err(ChatError::Stream(msg)));
                }
                None => {
                    self.body = None;
                    match self.decoder.finish() {
                        Ok(events) => self.pending.extend(events),
                        Err(e) => {
                            self.close();
                            return Some(Err(e));
                        }
                    }
                    // Upstream closed without [DONE]: still end explicitly.
                    if !self.pending.contains(&StreamEvent::Completed) {
                        self.pending.push_back(StreamEvent::Completed);
                    }
                }
            }
        }
    }

    /// Drain the stream, calling `on_delta` for each chunk, and return the full text
    pub async fn for_each_delta(mut self, mut on_delta: impl FnMut(&str)) -> Result<String, ChatError> {
        let mut text = String::new();
        while let Some(ev) = self.next_event().await {
            match ev? {
                StreamEvent::Delta(chunk) => {
                    on_delta(&chunk);
                    text.push_str(&chunk);
                }
                StreamEvent::Completed => break,
            }
        }
        Ok(text)
    }

    pub async fn collect_text(self) -> Result<String, ChatError> {
        self.for_each_delta(|_| {}).await
    }

    /// Adapt into a `futures` stream of the same events
    pub fn into_stream(self) -> impl Stream<Item = Result<StreamEvent, ChatError>> {
        stream::unfold(self, |mut s| async move { s.next_event().await.map(|ev| (ev, s)) })
    }

    fn close(&mut self) {
        self.finished = true;
        self.body = None;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(text: &str) -> String {
        format!("data: {}\n\n", serde_json::json!({"choices": [{"delta": {"content": text}}]}))
    }

    fn chunks(parts: Vec<String>) -> ChatStream {
        let items: Vec<Result<Vec<u8>, String>> = parts.into_iter().map(|p| Ok(p.into_bytes())).collect();
        ChatStream::from_byte_stream(stream::iter(items))
    }

    #[test]
    fn test_decoder_handles_split_lines() {
        let mut d = SseDecoder::new();
        let full = delta("Hello");
        let (a, b) = full.split_at(10);
        assert!(d.push(a.as_bytes()).unwrap().is_empty());
        assert_eq!(d.push(b.as_bytes()).unwrap(), vec![StreamEvent::Delta("Hello".into())]);
    }

    #[test]
    fn test_decoder_handles_split_utf8() {
        let mut d = SseDecoder::new();
        let full = delta("€5");
        let bytes = full.as_bytes();
        let cut = full.find('€').unwrap() + 1;
        assert!(d.push(&bytes[..cut]).unwrap().is_empty());
        assert_eq!(d.push(&bytes[cut..]).unwrap(), vec![StreamEvent::Delta("€5".into())]);
    }

    #[test]
    fn test_decoder_skips_comments_and_role_deltas() {
        let mut d = SseDecoder::new();
        let input = ": keep-alive\nevent: message\ndata: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n";
        assert!(d.push(input.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_decoder_stops_at_done() {
        let mut d = SseDecoder::new();
        let input = format!("data: [DONE]\n\n{}", delta("late"));
        assert_eq!(d.push(input.as_bytes()).unwrap(), vec![StreamEvent::Completed]);
        assert!(d.is_done());
        assert!(d.push(delta("later").as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_decoder_rejects_bad_json() {
        let mut d = SseDecoder::new();
        assert!(matches!(d.push(b"data: {nope\n"), Err(ChatError::Stream(_))));
    }

    #[test]
    fn test_decoder_surfaces_inline_error() {
        let mut d = SseDecoder::new();
        let err = d.push(b"data: {\"error\":{\"message\":\"overloaded\"}}\n").unwrap_err();
        assert_eq!(err.to_string(), "stream error: overloaded");
    }

    #[tokio::test]
    async fn test_stream_yields_deltas_then_completed_then_none() {
        let mut s = chunks(vec![delta("Hi"), delta(" there"), "data: [DONE]\n\n".into()]);
        assert_eq!(s.next_event().await.unwrap().unwrap(), StreamEvent::Delta("Hi".into()));
        assert_eq!(s.next_event().await.unwrap().unwrap(), StreamEvent::Delta(" there".into()));
        assert_eq!(s.next_event().await.unwrap().unwrap(), StreamEvent::Completed);
        assert!(s.next_event().await.is_none());
        assert!(s.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_completes_without_done_marker() {
        let text = chunks(vec![delta("a"), "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}".into()])
            .collect_text()
            .await
            .unwrap();
        assert_eq!(text, "ab");
    }

    #[tokio::test]
    async fn test_stream_error_terminates() {
        let items: Vec<Result<Vec<u8>, String>> = vec![Ok(delta("x").into_bytes()), Err("reset".into())];
        let mut s = ChatStream::from_byte_stream(stream::iter(items));
        assert!(matches!(s.next_event().await, Some(Ok(StreamEvent::Delta(_)))));
        assert!(matches!(s.next_event().await, Some(Err(ChatError::Stream(_)))));
        assert!(s.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_into_stream_and_callbacks() {
        let events: Vec<_> = chunks(vec![delta("1"), delta("2"), "data: [DONE]\n".into()])
            .into_stream()
            .collect()
            .await;
        assert_eq!(events.len(), 3);

        let mut seen = Vec::new();
        let text = chunks(vec![delta("x"), delta("y")])
            .for_each_delta(|c| seen.push(c.to_string()))
            .await
            .unwrap();
        assert_eq!(seen, vec!["x", "y"]);
        assert_eq!(text, "xy");
    }
}
