use crate::tools::{display_order_tool, Tool};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful pizza ordering assistant for MaMaMia Pizza.";
pub const DEFAULT_FIRST_MESSAGE: &str =
    "Hi, I'm the MaMaMia Pizza voice assistant! How can I help you with your order today?";

/// What a call is started against: a hosted assistant, or one described inline.
#[derive(Debug, Clone)]
pub enum StartTarget {
    AssistantId(String),
    Inline(AssistantConfig),
}

/// Inline assistant description sent when no hosted assistant id is configured.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    /// Speech-to-text provider settings.
    transcriber: Transcriber,

    /// Language model driving the dialogue.
    model: Model,

    /// Text-to-speech voice.
    voice: Voice,

    /// What the assistant says as soon as the call connects.
    #[serde(skip_serializing_if = "Option::is_none")]
    first_message: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Transcriber {
    provider: String,
    model: String,
    language: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Model {
    provider: String,
    model: String,
    messages: Vec<PromptMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PromptMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    provider: String,
    voice_id: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfigurator::new().build()
    }
}

impl AssistantConfig {
    pub fn builder() -> AssistantConfigurator {
        AssistantConfigurator::new()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.model
            .messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
    }

    pub fn first_message(&self) -> Option<&str> {
        self.first_message.as_deref()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.model.tools
    }
}

pub struct AssistantConfigurator {
    config: AssistantConfig,
}

impl Default for AssistantConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantConfigurator {
    pub fn new() -> Self {
        Self {
            config: AssistantConfig {
                transcriber: Transcriber {
                    provider: "deepgram".to_string(),
                    model: "nova-2".to_string(),
                    language: "en-US".to_string(),
                },
                model: Model {
                    provider: "openai".to_string(),
                    model: "gpt-3.5-turbo".to_string(),
                    messages: vec![PromptMessage {
                        role: "system".to_string(),
                        content: DEFAULT_SYSTEM_PROMPT.to_string(),
                    }],
                    tools: vec![display_order_tool()],
                },
                voice: Voice {
                    provider: "playht".to_string(),
                    voice_id: "jennifer".to_string(),
                },
                first_message: Some(DEFAULT_FIRST_MESSAGE.to_string()),
            },
        }
    }

    pub fn with_transcriber(mut self, provider: &str, model: &str, language: &str) -> Self {
        self.config.transcriber = Transcriber {
            provider: provider.to_string(),
            model: model.to_string(),
            language: language.to_string(),
        };
        self
    }

    pub fn with_model(mut self, provider: &str, model: &str) -> Self {
        self.config.model.provider = provider.to_string();
        self.config.model.model = model.to_string();
        self
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.config.model.messages.retain(|m| m.role != "system");
        self.config.model.messages.insert(
            0,
            PromptMessage {
                role: "system".to_string(),
                content: prompt.to_string(),
            },
        );
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.config.model.tools = tools;
        self
    }

    pub fn with_voice(mut self, provider: &str, voice_id: &str) -> Self {
        self.config.voice = Voice {
            provider: provider.to_string(),
            voice_id: voice_id.to_string(),
        };
        self
    }

    pub fn with_first_message(mut self, message: &str) -> Self {
        self.config.first_message = Some(message.to_string());
        self
    }

    pub fn without_first_message(mut self) -> Self {
        self.config.first_message = None;
        self
    }

    pub fn build(self) -> AssistantConfig {
        self.config
    }
}
