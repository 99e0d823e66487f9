use mamamia_types::OrderSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Connecting,
    /// In a call, after the assistant pushed order details.
    Active,
    AssistantSpeaking,
    /// In a call, waiting for the visitor to speak.
    Listening,
    Ending,
    Ended,
    Error,
}

impl SessionState {
    /// A session object exists or is being set up.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            SessionState::Connecting
                | SessionState::Active
                | SessionState::AssistantSpeaking
                | SessionState::Listening
                | SessionState::Ending
        )
    }

    /// The call has been picked up by the service.
    pub fn is_call_active(self) -> bool {
        matches!(
            self,
            SessionState::Active
                | SessionState::AssistantSpeaking
                | SessionState::Listening
                | SessionState::Ending
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Speaker {
    User,
    Assistant,
    System,
}

impl Speaker {
    fn tag(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
            Speaker::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
}

impl ChatMessage {
    pub(crate) fn new(seq: u64, speaker: Speaker, text: &str) -> Self {
        Self {
            id: format!("{}-{}", seq, speaker.tag()),
            speaker,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    #[error("Missing Vapi Public Key. Set VAPI_PUBLIC_KEY to enable voice ordering.")]
    MissingCredential,
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Teardown(String),
    #[error("a call is already in progress")]
    AlreadyActive,
}

impl WidgetError {
    /// Persistent errors stay on screen until the configuration changes.
    pub fn is_persistent(&self) -> bool {
        matches!(self, WidgetError::MissingCredential)
    }
}

/// Order details as shown in the panel.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OrderView {
    pub description: String,
    pub total: String,
}

impl From<&OrderSummary> for OrderView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            description: order.description().to_string(),
            total: format!("${}", order.total()),
        }
    }
}

/// Snapshot of the widget handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WidgetView {
    pub panel_open: bool,
    pub state: SessionState,
    pub status: String,
    pub call_active: bool,
    pub can_start_call: bool,
    pub chat_log: Vec<ChatMessage>,
    pub order: Option<OrderView>,
    /// Hidden while an order is displayed.
    pub error: Option<String>,
}

/// Shortens a message for the one-line status, the way the panel shows it.
pub(crate) fn status_excerpt(prefix: &str, message: &str) -> String {
    let excerpt: String = message.chars().take(30).collect();
    format!("{}: {}...", prefix, excerpt)
}
