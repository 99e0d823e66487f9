//! The voice-ordering widget.
//!
//! Bridges one external voice session to a local transcript and order
//! display. The widget owns the session handle; every state change happens
//! in reaction to a visitor command or to an event from that session, and
//! both are processed strictly in arrival order.

use anyhow::anyhow;
use futures_util::future::{BoxFuture, FutureExt};
use mamamia_types::{AssistantMessage, OrderSummary, Role, VoiceEvent};
use tokio::sync::mpsc;

use crate::sdk::{EventRx, VoiceSdk, VoiceSession};

mod config;
mod state;

pub use config::{ConfigError, WidgetConfig, WidgetConfigBuilder};
pub use state::{ChatMessage, OrderView, SessionState, Speaker, WidgetError, WidgetView};

use state::status_excerpt;

const STATUS_IDLE: &str = "Idle";

/// A session whose `start()` has not returned yet. The future owns the
/// session and hands it back together with the outcome.
type PendingStart = BoxFuture<'static, (Box<dyn VoiceSession>, anyhow::Result<()>)>;

/// Visitor actions on the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WidgetCommand {
    Open,
    Close,
    Toggle,
    StartCall,
    EndCall,
}

pub struct Widget<S: VoiceSdk> {
    config: WidgetConfig,
    sdk: S,
    panel_open: bool,
    state: SessionState,
    status: String,
    chat_log: Vec<ChatMessage>,
    order: Option<OrderSummary>,
    error: Option<WidgetError>,
    session: Option<Box<dyn VoiceSession>>,
    pending_start: Option<PendingStart>,
    events: Option<EventRx>,
    next_message_seq: u64,
}

impl<S: VoiceSdk> Widget<S> {
    /// Mounts the widget. Without a public key the widget starts out showing
    /// the configuration error.
    pub fn new(config: WidgetConfig, sdk: S) -> Self {
        let mut widget = Self {
            config,
            sdk,
            panel_open: false,
            state: SessionState::Idle,
            status: STATUS_IDLE.to_string(),
            chat_log: Vec::new(),
            order: None,
            error: None,
            session: None,
            pending_start: None,
            events: None,
            next_message_seq: 0,
        };
        if !widget.config.has_public_key() {
            tracing::warn!("voice widget mounted without a public key");
            widget.error = Some(WidgetError::MissingCredential);
            widget.status = "Error: Missing API Key".to_string();
        }
        widget
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    pub fn order(&self) -> Option<&OrderSummary> {
        self.order.as_ref()
    }

    pub fn error(&self) -> Option<&WidgetError> {
        self.error.as_ref()
    }

    /// A session exists, started or still connecting.
    pub fn has_session(&self) -> bool {
        self.session.is_some() || self.pending_start.is_some()
    }

    pub fn view(&self) -> WidgetView {
        let call_active = self.state.is_call_active();
        let blocked = self.error.as_ref().is_some_and(WidgetError::is_persistent);
        WidgetView {
            panel_open: self.panel_open,
            state: self.state,
            status: self.status.clone(),
            call_active,
            can_start_call: !self.state.is_live() && !blocked,
            chat_log: self.chat_log.clone(),
            order: self.order.as_ref().map(OrderView::from),
            error: match (&self.order, &self.error) {
                (None, Some(error)) => Some(error.to_string()),
                _ => None,
            },
        }
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
        self.clear_transient_error();
    }

    /// Hides the panel, ending any live call first. A failed teardown stays
    /// on record.
    pub async fn close_panel(&mut self) {
        self.clear_transient_error();
        if self.state.is_live() {
            let _ = self.end_call().await;
        }
        self.panel_open = false;
    }

    pub async fn toggle_panel(&mut self) {
        if self.panel_open {
            self.close_panel().await;
        } else {
            self.open_panel();
        }
    }

    /// Starts a call and waits until the service accepted it.
    pub async fn start_call(&mut self) -> Result<(), WidgetError> {
        self.begin_call()?;
        let outcome = finish_start(&mut self.pending_start).await;
        self.pending_start = None;
        self.on_started(outcome)
    }

    /// Moves to `Connecting`, creates the session and subscribes to its
    /// events. The connect itself is left pending and is driven by
    /// [`Widget::run`] or [`Widget::start_call`].
    pub fn begin_call(&mut self) -> Result<(), WidgetError> {
        if self.state.is_live() {
            tracing::warn!(state = ?self.state, "start requested while a call is live");
            return Err(WidgetError::AlreadyActive);
        }

        let Some(public_key) = self.config.public_key().cloned() else {
            let error = WidgetError::MissingCredential;
            self.state = SessionState::Error;
            self.status = status_excerpt("Failed", "Missing Vapi Public Key");
            self.error = Some(error.clone());
            return Err(error);
        };

        self.error = None;
        self.chat_log.clear();
        self.state = SessionState::Connecting;
        self.status = "Connecting...".to_string();

        let mut session = match self.sdk.create(&public_key) {
            Ok(session) => session,
            Err(e) => return Err(self.connection_failed(e)),
        };
        let events = match session.take_events() {
            Ok(events) => events,
            Err(e) => return Err(self.connection_failed(e)),
        };

        let target = self.config.start_target();
        let connect_timeout = self.config.connect_timeout();
        self.pending_start = Some(
            async move {
                let started = match connect_timeout {
                    Some(limit) => match tokio::time::timeout(limit, session.start(target)).await {
                        Ok(result) => result,
                        Err(_) => Err(anyhow!(
                            "Timed out after {}s waiting for the call to connect",
                            limit.as_secs()
                        )),
                    },
                    None => session.start(target).await,
                };
                (session, started)
            }
            .boxed(),
        );
        self.events = Some(events);
        tracing::info!("voice call connecting");
        Ok(())
    }

    fn on_started(
        &mut self,
        (session, started): (Box<dyn VoiceSession>, anyhow::Result<()>),
    ) -> Result<(), WidgetError> {
        match started {
            Ok(()) => {
                tracing::info!("voice call starting");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => Err(self.connection_failed(e)),
        }
    }

    /// Asks the service to hang up. If that fails the widget resets itself
    /// anyway so the visitor is never stuck in a call. A call still
    /// connecting is abandoned on the spot.
    pub async fn end_call(&mut self) -> Result<(), WidgetError> {
        if self.pending_start.is_some() {
            tracing::info!("voice call cancelled while connecting");
            self.release_session();
            self.reset_to_idle();
            return Ok(());
        }

        let Some(session) = self.session.as_mut() else {
            self.reset_to_idle();
            return Ok(());
        };

        self.state = SessionState::Ending;
        self.status = "Ending Call...".to_string();
        match session.stop().await {
            Ok(()) => {
                tracing::info!("voice call stop requested");
                Ok(())
            }
            Err(e) => {
                tracing::error!("error ending call: {:#}", e);
                let error = WidgetError::Teardown(e.to_string());
                self.release_session();
                self.reset_to_idle();
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Applies one event from the voice session.
    pub fn handle_event(&mut self, event: VoiceEvent) {
        tracing::debug!(event = event.kind(), state = ?self.state, "voice event");
        match event {
            VoiceEvent::CallStart => {
                if self.state == SessionState::Connecting {
                    self.state = SessionState::Listening;
                    self.status = "Call Active - Listening...".to_string();
                    self.error = None;
                } else {
                    tracing::debug!(state = ?self.state, "ignoring call-start");
                }
            }
            VoiceEvent::CallEnd => {
                self.release_session();
                self.order = None;
                self.chat_log.clear();
                self.state = SessionState::Ended;
                self.status = "Call Ended".to_string();
                tracing::info!("voice call ended");
            }
            VoiceEvent::SpeechStart => {
                if matches!(self.state, SessionState::Listening | SessionState::Active) {
                    self.state = SessionState::AssistantSpeaking;
                    self.status = "Assistant Speaking...".to_string();
                }
            }
            VoiceEvent::SpeechEnd => {
                if self.state == SessionState::AssistantSpeaking {
                    self.state = SessionState::Listening;
                    self.status = "Listening...".to_string();
                }
            }
            VoiceEvent::Message { message } => self.handle_message(message),
            VoiceEvent::Error { error } => {
                if !self.state.is_live() {
                    tracing::debug!(state = ?self.state, "ignoring error event");
                    return;
                }
                tracing::error!("voice session error: {}", error.message());
                self.release_session();
                self.state = SessionState::Error;
                self.status = status_excerpt("Error", error.message());
                self.error = Some(WidgetError::Connection(error.message().to_string()));
            }
        }
    }

    fn handle_message(&mut self, message: AssistantMessage) {
        match message {
            AssistantMessage::Transcript(transcript) => {
                if !transcript.is_final() {
                    return;
                }
                let speaker = match transcript.role() {
                    Role::User => Speaker::User,
                    Role::Assistant => Speaker::Assistant,
                    _ => return,
                };
                self.next_message_seq += 1;
                self.chat_log.push(ChatMessage::new(
                    self.next_message_seq,
                    speaker,
                    transcript.transcript(),
                ));
            }
            AssistantMessage::FunctionCall { function_call } => {
                match OrderSummary::from_function_call(&function_call) {
                    Some(order) => {
                        tracing::info!(total = %order.total(), "order details received");
                        self.order = Some(order);
                        self.status = "Order Details Received".to_string();
                        if self.state == SessionState::Listening {
                            self.state = SessionState::Active;
                        }
                    }
                    None => {
                        tracing::debug!(name = function_call.name(), "ignoring function call");
                    }
                }
            }
            AssistantMessage::Other => {}
        }
    }

    /// Waits for and applies the next session event. Returns `false` when
    /// there is no session to listen to.
    pub async fn process_next_event(&mut self) -> bool {
        if self.events.is_none() {
            return false;
        }
        let event = recv_event(&mut self.events).await;
        self.on_event(event);
        true
    }

    fn on_event(&mut self, event: Option<VoiceEvent>) {
        match event {
            Some(event) => self.handle_event(event),
            None => {
                self.events = None;
                if self.has_session() {
                    tracing::info!("voice event stream closed without call-end");
                    self.handle_event(VoiceEvent::CallEnd);
                }
            }
        }
    }

    async fn apply(&mut self, command: WidgetCommand) {
        tracing::debug!(?command, "widget command");
        match command {
            WidgetCommand::Open => self.open_panel(),
            WidgetCommand::Close => self.close_panel().await,
            WidgetCommand::Toggle => self.toggle_panel().await,
            WidgetCommand::StartCall => {
                if let Err(e) = self.begin_call() {
                    tracing::warn!("call not started: {}", e);
                }
            }
            WidgetCommand::EndCall => {
                if let Err(e) = self.end_call().await {
                    tracing::warn!("call not ended cleanly: {}", e);
                }
            }
        }
    }

    /// Drives the widget until `commands` closes, publishing a view after
    /// every change. Commands keep being served while a call connects. A
    /// live call is ended on the way out.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<WidgetCommand>,
        views: mpsc::Sender<WidgetView>,
    ) {
        if views.send(self.view()).await.is_err() {
            return;
        }
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.apply(command).await,
                    None => break,
                },
                event = recv_event(&mut self.events) => self.on_event(event),
                outcome = finish_start(&mut self.pending_start) => {
                    self.pending_start = None;
                    if let Err(e) = self.on_started(outcome) {
                        tracing::warn!("call not started: {}", e);
                    }
                }
            }
            if views.send(self.view()).await.is_err() {
                break;
            }
        }
        self.unmount().await;
    }

    /// Tears down any live call. Called when the page goes away.
    pub async fn unmount(&mut self) {
        if self.state.is_live() {
            let _ = self.end_call().await;
        }
        self.release_session();
    }

    fn connection_failed(&mut self, e: anyhow::Error) -> WidgetError {
        tracing::error!("error starting call: {:#}", e);
        let message = e.to_string();
        self.release_session();
        self.state = SessionState::Error;
        self.status = status_excerpt("Failed", &message);
        let error = WidgetError::Connection(message);
        self.error = Some(error.clone());
        error
    }

    /// Drops the session, cancelling a pending connect.
    fn release_session(&mut self) {
        self.pending_start = None;
        self.session = None;
        self.events = None;
    }

    fn reset_to_idle(&mut self) {
        self.state = SessionState::Idle;
        self.status = STATUS_IDLE.to_string();
        self.order = None;
        self.chat_log.clear();
    }

    fn clear_transient_error(&mut self) {
        if self.error.as_ref().is_some_and(|e| !e.is_persistent()) {
            self.error = None;
        }
    }
}

async fn recv_event(events: &mut Option<EventRx>) -> Option<VoiceEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn finish_start(
    pending: &mut Option<PendingStart>,
) -> (Box<dyn VoiceSession>, anyhow::Result<()>) {
    match pending {
        Some(start) => start.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{MockVoiceSdk, MockVoiceSession};
    use async_trait::async_trait;
    use mamamia_types::{StartTarget, TranscriptType};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn keyed_config() -> WidgetConfig {
        WidgetConfig::builder().with_public_key("pk_test").build()
    }

    /// A session that starts and stops cleanly, plus the sender feeding its events.
    fn live_session() -> (MockVoiceSession, mpsc::Sender<VoiceEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let mut session = MockVoiceSession::new();
        session.expect_take_events().return_once(move || Ok(rx));
        session.expect_start().returning(|_| Ok(()));
        session.expect_stop().returning(|| Ok(()));
        (session, tx)
    }

    fn sdk_with(session: MockVoiceSession) -> MockVoiceSdk {
        let mut sdk = MockVoiceSdk::new();
        sdk.expect_create()
            .times(1)
            .return_once(move |_| Ok(Box::new(session) as Box<dyn VoiceSession>));
        sdk
    }

    /// Skips views until one matches. Connect completion publishes its own view.
    async fn next_view_where(
        views: &mut mpsc::Receiver<WidgetView>,
        matches: impl Fn(&WidgetView) -> bool,
    ) -> WidgetView {
        loop {
            let view = tokio::time::timeout(Duration::from_secs(1), views.recv())
                .await
                .expect("no view in time")
                .expect("view channel closed");
            if matches(&view) {
                return view;
            }
        }
    }

    fn final_transcript(role: Role, text: &str) -> VoiceEvent {
        VoiceEvent::message(AssistantMessage::transcript(role, TranscriptType::Final, text))
    }

    fn partial_transcript(role: Role, text: &str) -> VoiceEvent {
        VoiceEvent::message(AssistantMessage::transcript(role, TranscriptType::Partial, text))
    }

    fn display_order(description: &str, total: serde_json::Value) -> VoiceEvent {
        VoiceEvent::message(AssistantMessage::function_call(
            "display_order",
            json!({"description": description, "total": total}),
        ))
    }

    #[tokio::test]
    async fn missing_credential_never_creates_a_session() {
        let mut sdk = MockVoiceSdk::new();
        sdk.expect_create().never();
        let mut widget = Widget::new(WidgetConfig::default(), sdk);

        assert_eq!(widget.error(), Some(&WidgetError::MissingCredential));
        assert!(!widget.view().can_start_call);

        widget.open_panel();
        let err = widget.start_call().await.unwrap_err();
        assert_eq!(err, WidgetError::MissingCredential);
        assert_eq!(widget.state(), SessionState::Error);
        assert!(!widget.has_session());

        // Still shown after the panel is toggled.
        widget.toggle_panel().await;
        widget.toggle_panel().await;
        assert_eq!(widget.error(), Some(&WidgetError::MissingCredential));
    }

    #[tokio::test]
    async fn call_lifecycle_follows_service_events() {
        let (session, _tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.open_panel();

        widget.start_call().await.unwrap();
        assert_eq!(widget.state(), SessionState::Connecting);
        assert_eq!(widget.status(), "Connecting...");

        widget.handle_event(VoiceEvent::CallStart);
        assert_eq!(widget.state(), SessionState::Listening);
        assert_eq!(widget.status(), "Call Active - Listening...");
        assert!(widget.view().call_active);

        widget.handle_event(VoiceEvent::SpeechStart);
        assert_eq!(widget.state(), SessionState::AssistantSpeaking);
        assert_eq!(widget.status(), "Assistant Speaking...");

        widget.handle_event(VoiceEvent::SpeechEnd);
        assert_eq!(widget.state(), SessionState::Listening);
        assert_eq!(widget.status(), "Listening...");
    }

    #[tokio::test]
    async fn only_final_transcripts_are_logged_in_order() {
        let (session, _tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);

        widget.handle_event(partial_transcript(Role::User, "one lar"));
        widget.handle_event(final_transcript(Role::User, "One large pepperoni"));
        widget.handle_event(partial_transcript(Role::Assistant, "Sure"));
        widget.handle_event(final_transcript(Role::Assistant, "Sure, anything else?"));
        widget.handle_event(final_transcript(Role::System, "internal note"));
        widget.handle_event(final_transcript(Role::User, "Garlic knots"));

        let log = widget.chat_log();
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["One large pepperoni", "Sure, anything else?", "Garlic knots"]);
        assert_eq!(log[0].speaker, Speaker::User);
        assert_eq!(log[1].speaker, Speaker::Assistant);
        assert_eq!(log[0].id, "1-user");
        assert_eq!(log[1].id, "2-assistant");
    }

    #[tokio::test]
    async fn order_signal_is_last_write_wins() {
        let (session, _tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);

        widget.handle_event(display_order("Large Pepperoni", json!(20)));
        widget.handle_event(display_order("Large Pepperoni, Garlic Knots", json!(25.0)));
        assert_eq!(widget.state(), SessionState::Active);
        assert_eq!(widget.status(), "Order Details Received");

        let view = widget.view();
        let order = view.order.unwrap();
        assert_eq!(order.description, "Large Pepperoni, Garlic Knots");
        assert_eq!(order.total, "$25.00");

        // Malformed payloads change nothing.
        widget.handle_event(VoiceEvent::message(AssistantMessage::function_call(
            "display_order",
            json!({"description": "Nothing"}),
        )));
        assert_eq!(
            widget.order().unwrap().description(),
            "Large Pepperoni, Garlic Knots"
        );
    }

    #[tokio::test]
    async fn call_end_clears_chat_and_order() {
        let (session, _tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);
        widget.handle_event(final_transcript(Role::User, "Two sodas"));
        widget.handle_event(display_order("Two sodas", json!("4.00")));

        widget.handle_event(VoiceEvent::CallEnd);
        assert_eq!(widget.state(), SessionState::Ended);
        assert!(widget.chat_log().is_empty());
        assert!(widget.order().is_none());
        assert!(!widget.has_session());
        assert!(widget.view().can_start_call);
    }

    #[tokio::test]
    async fn error_event_releases_session_and_allows_retry() {
        let mut sdk = MockVoiceSdk::new();
        sdk.expect_create().times(2).returning(|_| {
            let (session, _tx) = live_session();
            Ok(Box::new(session) as Box<dyn VoiceSession>)
        });
        let mut widget = Widget::new(keyed_config(), sdk);

        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);
        widget.handle_event(VoiceEvent::error("Meeting has ended"));

        assert_eq!(widget.state(), SessionState::Error);
        assert!(!widget.has_session());
        assert_eq!(widget.view().error.as_deref(), Some("Meeting has ended"));
        assert_eq!(widget.status(), "Error: Meeting has ended...");

        widget.start_call().await.unwrap();
        assert_eq!(widget.state(), SessionState::Connecting);
        assert!(widget.error().is_none());
    }

    #[tokio::test]
    async fn start_while_live_is_rejected() {
        let (session, _tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();

        assert_eq!(widget.start_call().await, Err(WidgetError::AlreadyActive));
        assert_eq!(widget.state(), SessionState::Connecting);
        assert!(widget.has_session());
    }

    #[tokio::test]
    async fn failed_start_becomes_connection_error() {
        let (_tx, rx) = mpsc::channel(1);
        let mut session = MockVoiceSession::new();
        session.expect_take_events().return_once(move || Ok(rx));
        session
            .expect_start()
            .returning(|_| Err(anyhow!("Invalid public key")));
        let mut widget = Widget::new(keyed_config(), sdk_with(session));

        let err = widget.start_call().await.unwrap_err();
        assert_eq!(err, WidgetError::Connection("Invalid public key".to_string()));
        assert_eq!(widget.state(), SessionState::Error);
        assert_eq!(widget.status(), "Failed: Invalid public key...");
        assert!(!widget.has_session());
        assert!(widget.view().can_start_call);
    }

    #[tokio::test]
    async fn teardown_failure_forces_idle() {
        let (tx, rx) = mpsc::channel(4);
        let mut session = MockVoiceSession::new();
        session.expect_take_events().return_once(move || Ok(rx));
        session.expect_start().returning(|_| Ok(()));
        session
            .expect_stop()
            .times(1)
            .returning(|| Err(anyhow!("socket already closed")));
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.open_panel();
        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);
        widget.handle_event(final_transcript(Role::User, "Hello"));

        let err = widget.end_call().await.unwrap_err();
        assert_eq!(err, WidgetError::Teardown("socket already closed".to_string()));
        assert_eq!(widget.state(), SessionState::Idle);
        assert!(widget.chat_log().is_empty());
        assert!(!widget.has_session());
        assert!(tx.is_closed());

        // Transient: gone on the next panel toggle and never blocks a call.
        assert!(widget.view().can_start_call);
        widget.close_panel().await;
        assert!(widget.error().is_none());
    }

    #[tokio::test]
    async fn end_without_session_resets_to_idle() {
        let mut sdk = MockVoiceSdk::new();
        sdk.expect_create().never();
        let mut widget = Widget::new(keyed_config(), sdk);
        widget.end_call().await.unwrap();
        assert_eq!(widget.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn closing_the_panel_ends_a_live_call() {
        let (tx, rx) = mpsc::channel(4);
        let mut session = MockVoiceSession::new();
        session.expect_take_events().return_once(move || Ok(rx));
        session.expect_start().returning(|_| Ok(()));
        session.expect_stop().times(1).returning(|| Ok(()));
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.open_panel();
        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);

        widget.close_panel().await;
        assert!(!widget.is_panel_open());
        assert_eq!(widget.state(), SessionState::Ending);

        tx.send(VoiceEvent::CallEnd).await.unwrap();
        assert!(widget.process_next_event().await);
        assert_eq!(widget.state(), SessionState::Ended);
    }

    #[tokio::test]
    async fn closed_event_stream_counts_as_call_end() {
        let (session, tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();
        tx.send(VoiceEvent::CallStart).await.unwrap();
        tx.send(final_transcript(Role::User, "Hi")).await.unwrap();
        drop(tx);

        assert!(widget.process_next_event().await);
        assert!(widget.process_next_event().await);
        assert_eq!(widget.chat_log().len(), 1);
        assert!(widget.process_next_event().await);
        assert_eq!(widget.state(), SessionState::Ended);
        assert!(widget.chat_log().is_empty());
        assert!(!widget.process_next_event().await);
    }

    #[tokio::test]
    async fn inline_assistant_is_used_without_assistant_id() {
        let (_tx, rx) = mpsc::channel(1);
        let mut session = MockVoiceSession::new();
        session.expect_take_events().return_once(move || Ok(rx));
        session
            .expect_start()
            .withf(|target| matches!(target, StartTarget::Inline(config) if config.first_message().is_some()))
            .times(1)
            .returning(|_| Ok(()));
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();
    }

    /// Never finishes connecting within a test. Flags `released` when dropped.
    struct StalledSession {
        rx: Option<EventRx>,
        released: Arc<AtomicBool>,
    }

    impl Drop for StalledSession {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn stalled_sdk(released: Arc<AtomicBool>) -> (MockVoiceSdk, mpsc::Sender<VoiceEvent>) {
        let (tx, rx) = mpsc::channel(4);
        let mut sdk = MockVoiceSdk::new();
        sdk.expect_create().times(1).return_once(move |_| {
            Ok(Box::new(StalledSession {
                rx: Some(rx),
                released,
            }) as Box<dyn VoiceSession>)
        });
        (sdk, tx)
    }

    #[async_trait]
    impl VoiceSession for StalledSession {
        fn take_events(&mut self) -> anyhow::Result<EventRx> {
            self.rx.take().ok_or_else(|| anyhow!("taken"))
        }

        async fn start(&mut self, _target: StartTarget) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }

        async fn stop(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn connect_timeout_turns_a_stalled_start_into_an_error() {
        let (sdk, _events) = stalled_sdk(Arc::default());
        let config = WidgetConfig::builder()
            .with_public_key("pk_test")
            .with_connect_timeout(Duration::from_millis(20))
            .build();
        let mut widget = Widget::new(config, sdk);

        let err = widget.start_call().await.unwrap_err();
        assert!(matches!(err, WidgetError::Connection(ref m) if m.starts_with("Timed out")));
        assert_eq!(widget.state(), SessionState::Error);
    }

    #[tokio::test]
    async fn run_publishes_views_and_hangs_up_on_unmount() {
        let (session, events) = live_session();
        let widget = Widget::new(keyed_config(), sdk_with(session));
        let (command_tx, command_rx) = mpsc::channel(8);
        let (view_tx, mut view_rx) = mpsc::channel(8);
        let handle = tokio::spawn(widget.run(command_rx, view_tx));

        let initial = view_rx.recv().await.unwrap();
        assert_eq!(initial.state, SessionState::Idle);
        assert!(!initial.panel_open);

        command_tx.send(WidgetCommand::Open).await.unwrap();
        assert!(view_rx.recv().await.unwrap().panel_open);

        command_tx.send(WidgetCommand::StartCall).await.unwrap();
        assert_eq!(view_rx.recv().await.unwrap().state, SessionState::Connecting);

        events.send(VoiceEvent::CallStart).await.unwrap();
        next_view_where(&mut view_rx, |v| v.state == SessionState::Listening).await;

        events
            .send(final_transcript(Role::User, "A large Hawaiian"))
            .await
            .unwrap();
        let view = view_rx.recv().await.unwrap();
        assert_eq!(view.chat_log.len(), 1);
        assert_eq!(view.chat_log[0].text, "A large Hawaiian");

        drop(command_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn run_keeps_serving_commands_while_connecting() {
        let released = Arc::new(AtomicBool::new(false));
        let (sdk, _events) = stalled_sdk(released.clone());
        let widget = Widget::new(keyed_config(), sdk);
        let (command_tx, command_rx) = mpsc::channel(8);
        let (view_tx, mut view_rx) = mpsc::channel(8);
        let handle = tokio::spawn(widget.run(command_rx, view_tx));
        view_rx.recv().await.unwrap();

        command_tx.send(WidgetCommand::Open).await.unwrap();
        command_tx.send(WidgetCommand::StartCall).await.unwrap();
        let connecting =
            next_view_where(&mut view_rx, |v| v.state == SessionState::Connecting).await;
        assert_eq!(connecting.status, "Connecting...");
        assert!(!connecting.can_start_call);

        command_tx.send(WidgetCommand::Close).await.unwrap();
        let closed = next_view_where(&mut view_rx, |v| !v.panel_open).await;
        assert_eq!(closed.state, SessionState::Idle);
        assert!(closed.can_start_call);
        assert!(released.load(Ordering::SeqCst));

        drop(command_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn end_call_abandons_a_pending_connect() {
        let released = Arc::new(AtomicBool::new(false));
        let (sdk, _events) = stalled_sdk(released.clone());
        let mut widget = Widget::new(keyed_config(), sdk);

        widget.begin_call().unwrap();
        assert_eq!(widget.state(), SessionState::Connecting);
        assert!(widget.has_session());
        assert_eq!(widget.begin_call(), Err(WidgetError::AlreadyActive));

        widget.end_call().await.unwrap();
        assert_eq!(widget.state(), SessionState::Idle);
        assert!(!widget.has_session());
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn error_while_connecting_releases_the_session() {
        let released = Arc::new(AtomicBool::new(false));
        let (sdk, _events) = stalled_sdk(released.clone());
        let mut widget = Widget::new(keyed_config(), sdk);
        widget.begin_call().unwrap();

        widget.handle_event(VoiceEvent::error("Assistant not found"));
        assert_eq!(widget.state(), SessionState::Error);
        assert_eq!(widget.status(), "Error: Assistant not found...");
        assert!(!widget.has_session());
        assert!(released.load(Ordering::SeqCst));
        assert!(widget.view().can_start_call);
    }

    #[tokio::test]
    async fn error_right_after_start_moves_connecting_to_error() {
        let (session, _tx) = live_session();
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.start_call().await.unwrap();
        assert_eq!(widget.state(), SessionState::Connecting);

        widget.handle_event(VoiceEvent::error("Meeting has ended"));
        assert_eq!(widget.state(), SessionState::Error);
        assert!(!widget.has_session());
    }

    #[tokio::test]
    async fn failed_teardown_on_close_stays_visible() {
        let (_tx, rx) = mpsc::channel(4);
        let mut session = MockVoiceSession::new();
        session.expect_take_events().return_once(move || Ok(rx));
        session.expect_start().returning(|_| Ok(()));
        session
            .expect_stop()
            .times(1)
            .returning(|| Err(anyhow!("socket already closed")));
        let mut widget = Widget::new(keyed_config(), sdk_with(session));
        widget.open_panel();
        widget.start_call().await.unwrap();
        widget.handle_event(VoiceEvent::CallStart);

        widget.close_panel().await;
        assert!(!widget.is_panel_open());
        assert_eq!(widget.state(), SessionState::Idle);
        assert_eq!(
            widget.error(),
            Some(&WidgetError::Teardown("socket already closed".to_string()))
        );
        assert_eq!(widget.view().error.as_deref(), Some("socket already closed"));

        // The next toggle clears it.
        widget.toggle_panel().await;
        assert!(widget.error().is_none());
    }
}
