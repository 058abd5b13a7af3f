//! OpenAI Chat Completions API backend.
//!
//! Connects to `/v1/chat/completions` with `stream: true` and parses the SSE
//! response into [`ChatEvent`]s.

use futures::StreamExt;

use crate::events::ChatEvent;

use super::{ChatBackend, EventStream, LlmError, LlmSettings, OutboundMessage};

/// Streaming backend for the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsBackend")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsBackend {
    /// Create a new backend with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for ChatCompletionsBackend {
    async fn stream(&self, messages: Vec<OutboundMessage>) -> Result<EventStream, LlmError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.settings.model,
            "stream": true,
            "messages": messages,
        });

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?.error_for_status()?;
        let byte_stream = resp.bytes_stream();

        let out = async_stream::try_stream! {
            let mut buf = Vec::<u8>::new();

            futures::pin_mut!(byte_stream);
            while let Some(chunk) = byte_stream.next().await {
                let chunk = chunk?;
                buf.extend_from_slice(&chunk);

                while let Some(pos) = find_double_newline(&buf) {
                    let frame = buf.drain(..pos + 2).collect::<Vec<_>>();
                    let text = String::from_utf8_lossy(&frame);

                    for line in text.lines() {
                        let line = line.trim();
                        if !line.starts_with("data:") {
                            continue;
                        }
                        let data = line.trim_start_matches("data:").trim();

                        if data == "[DONE]" {
                            yield ChatEvent::Done;
                            continue;
                        }

                        let v: serde_json::Value = serde_json::from_str(data)?;

                        // Providers surface in-stream failures as error frames
                        if let Some(err) = v.get("error") {
                            let message = err
                                .get("message")
                                .and_then(|x| x.as_str())
                                .unwrap_or("unknown provider error")
                                .to_string();
                            let code = err
                                .get("code")
                                .and_then(|x| x.as_str())
                                .map(ToString::to_string);
                            yield ChatEvent::Error { message, code };
                            continue;
                        }

                        let delta = &v["choices"][0]["delta"];

                        if let Some(s) = delta.get("content").and_then(|x| x.as_str())
                            && !s.is_empty()
                        {
                            yield ChatEvent::MessageDelta { text: s.to_string() };
                        }
                    }
                }
            }
        };

        Ok(Box::pin(out))
    }
}

/// Find the position of a double newline in the buffer.
fn find_double_newline(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_double_newline() {
        assert_eq!(find_double_newline(b"data: x\n\nrest"), Some(7));
        assert_eq!(find_double_newline(b"data: x\n"), None);
        assert_eq!(find_double_newline(b""), None);
    }

    #[test]
    fn test_backend_debug_omits_client() {
        let backend = ChatCompletionsBackend::new(LlmSettings {
            base_url: "http://localhost".to_string(),
            api_key: None,
            model: "test".to_string(),
        });
        let dbg = format!("{backend:?}");
        assert!(dbg.contains("ChatCompletionsBackend"));
    }
}
