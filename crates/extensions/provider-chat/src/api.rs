//! Request and reply envelopes.

use serde::{Deserialize, Serialize};

const GEMINI_HOST: &str = "generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Wire shape used for a given endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `POST {endpoint}/chat/completions` with a bearer credential.
    ChatCompletion,
    /// `POST {endpoint}/v1beta/models/{model}:generateContent?key=...`.
    GenerateContent,
}

impl Envelope {
    pub fn detect(endpoint: &str) -> Self {
        if endpoint.contains(GEMINI_HOST) {
            Self::GenerateContent
        } else {
            Self::ChatCompletion
        }
    }

    /// Full request URL for this envelope.
    pub fn url(&self, endpoint: &str, model: &str, key: &str) -> String {
        match self {
            Self::ChatCompletion => {
                if endpoint.ends_with('/') {
                    format!("{endpoint}chat/completions")
                } else {
                    format!("{endpoint}/chat/completions")
                }
            }
            Self::GenerateContent => {
                let model = if model.is_empty() { DEFAULT_GEMINI_MODEL } else { model };
                format!("{endpoint}/v1beta/models/{model}:generateContent?key={key}")
            }
        }
    }

    /// Body carrying `prompt` as the single user turn.
    pub(crate) fn body<'a>(&self, model: &'a str, prompt: &'a str) -> RequestBody<'a> {
        match self {
            Self::ChatCompletion => RequestBody::Chat(ChatRequest {
                model,
                messages: vec![ChatMessage { role: "user", content: prompt }],
            }),
            Self::GenerateContent => RequestBody::Generate(GenerateRequest {
                contents: vec![GenerateContent {
                    parts: vec![TextPart { text: prompt }],
                }],
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum RequestBody<'a> {
    Chat(ChatRequest<'a>),
    Generate(GenerateRequest<'a>),
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    contents: Vec<GenerateContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

/// Reply from either envelope. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiReply {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl ApiReply {
    /// Reply text, checking `choices` first and `candidates` second.
    pub(crate) fn into_text(self) -> Option<String> {
        if let Some(choices) = self.choices {
            return choices.into_iter().next()?.message.content;
        }
        let candidate = self.candidates?.into_iter().next()?;
        candidate.content.parts.into_iter().next()?.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_envelope() {
        assert_eq!(
            Envelope::detect("https://generativelanguage.googleapis.com"),
            Envelope::GenerateContent
        );
        assert_eq!(Envelope::detect("https://api.openai.com/v1"), Envelope::ChatCompletion);
    }

    #[test]
    fn test_chat_completion_url_slash_handling() {
        let env = Envelope::ChatCompletion;
        assert_eq!(env.url("https://x.ai/v1", "m", "k"), "https://x.ai/v1/chat/completions");
        assert_eq!(env.url("https://x.ai/v1/", "m", "k"), "https://x.ai/v1/chat/completions");
    }

    #[test]
    fn test_generate_content_url_default_model() {
        let env = Envelope::GenerateContent;
        assert_eq!(
            env.url("https://g.example", "", "KEY"),
            "https://g.example/v1beta/models/gemini-1.5-flash:generateContent?key=KEY"
        );
        assert!(env.url("https://g.example", "gemini-pro", "KEY").contains("/models/gemini-pro:"));
    }

    #[test]
    fn test_request_bodies() {
        let chat = serde_json::to_value(Envelope::ChatCompletion.body("gpt-4o", "hi")).unwrap();
        assert_eq!(chat["model"], "gpt-4o");
        assert_eq!(chat["messages"][0]["role"], "user");
        assert_eq!(chat["messages"][0]["content"], "hi");

        let generate = serde_json::to_value(Envelope::GenerateContent.body("ignored", "hi")).unwrap();
        assert_eq!(generate["contents"][0]["parts"][0]["text"], "hi");
        assert!(generate.get("model").is_none());
    }

    #[test]
    fn test_reply_text_extraction() {
        let chat: ApiReply =
            serde_json::from_str(r#"{"id":"1","choices":[{"message":{"role":"assistant","content":"A"}}]}"#)
                .unwrap();
        assert_eq!(chat.into_text().as_deref(), Some("A"));

        let generate: ApiReply =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"B"}]}}]}"#).unwrap();
        assert_eq!(generate.into_text().as_deref(), Some("B"));

        let other: ApiReply = serde_json::from_str(r#"{"foo":1}"#).unwrap();
        assert!(other.into_text().is_none());
    }
}
