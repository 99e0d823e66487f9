use anyhow::Result;
use async_trait::async_trait;
use mamamia_types::{StartTarget, VoiceEvent};
#[cfg(test)]
use mockall::automock;
use secrecy::SecretString;

pub type EventRx = tokio::sync::mpsc::Receiver<VoiceEvent>;

/// Entry point of a hosted voice-assistant service.
///
/// The widget only ever needs one thing from it: a fresh session bound to
/// the page's public key. Everything else goes through [`VoiceSession`].
#[cfg_attr(test, automock)]
pub trait VoiceSdk: Send + Sync {
    fn create(&self, public_key: &SecretString) -> Result<Box<dyn VoiceSession>>;
}

/// One call with the hosted assistant.
///
/// Events are delivered in the order the service emits them. The stream
/// ends when the session is torn down.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VoiceSession: Send {
    /// Hands out the event stream. Only the first call succeeds.
    fn take_events(&mut self) -> Result<EventRx>;

    /// Starts the call against a hosted assistant or an inline description.
    async fn start(&mut self, target: StartTarget) -> Result<()>;

    /// Asks the service to hang up. A `call-end` event follows on success.
    async fn stop(&mut self) -> Result<()>;
}
