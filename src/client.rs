use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use mamamia_types::{ClientFrame, StartTarget, VoiceEvent};
use secrecy::SecretString;
use tokio_tungstenite::tungstenite::Message;

use crate::sdk::{EventRx, VoiceSdk, VoiceSession};

mod config;
pub(crate) mod consts;
mod utils;

pub use config::{Config, ConfigBuilder};

type FrameTx = tokio::sync::mpsc::Sender<ClientFrame>;
type EventTx = tokio::sync::mpsc::Sender<VoiceEvent>;

struct Connection {
    send_handle: tokio::task::JoinHandle<()>,
    recv_handle: tokio::task::JoinHandle<()>,
}

/// Voice service reached over a websocket carrying JSON frames.
pub struct WsVoiceSdk {
    config: Config,
}

impl WsVoiceSdk {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }
}

impl VoiceSdk for WsVoiceSdk {
    fn create(&self, public_key: &SecretString) -> Result<Box<dyn VoiceSession>> {
        Ok(Box::new(WsVoiceSession::new(self.config.clone(), public_key.clone())))
    }
}

pub struct WsVoiceSession {
    config: Config,
    public_key: SecretString,
    c_tx: Option<FrameTx>,
    s_tx: Option<EventTx>,
    s_rx: Option<EventRx>,
    connection: Option<Connection>,
}

impl WsVoiceSession {
    fn new(config: Config, public_key: SecretString) -> Self {
        let (s_tx, s_rx) = tokio::sync::mpsc::channel(config.capacity());
        Self {
            config,
            public_key,
            c_tx: None,
            s_tx: Some(s_tx),
            s_rx: Some(s_rx),
            connection: None,
        }
    }

    async fn connect(&mut self) -> Result<()> {
        if self.c_tx.is_some() {
            return Err(anyhow!("already connected"));
        }
        let s_tx = self
            .s_tx
            .take()
            .ok_or_else(|| anyhow!("session was already used"))?;

        let request = utils::build_request(&self.config, &self.public_key)?;
        let (ws_stream, _) = tokio_tungstenite::connect_async(request).await?;

        let (mut write, mut read) = ws_stream.split();

        let (c_tx, mut c_rx) = tokio::sync::mpsc::channel::<ClientFrame>(self.config.capacity());
        self.c_tx = Some(c_tx);

        let send_handle = tokio::spawn(async move {
            while let Some(frame) = c_rx.recv().await {
                match serde_json::to_string(&frame) {
                    Ok(text) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            tracing::error!("failed to send frame: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("failed to serialize frame: {}", e);
                    }
                }
            }
            // All senders dropped: the call is over from our side.
            if let Err(e) = write.close().await {
                tracing::debug!("failed to close websocket: {}", e);
            }
        });

        let recv_handle = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                let message = match message {
                    Err(e) => {
                        tracing::error!("failed to read message: {}", e);
                        let _ = s_tx.send(VoiceEvent::error(&e.to_string())).await;
                        break;
                    }
                    Ok(message) => message,
                };
                match message {
                    Message::Text(text) => match serde_json::from_str::<VoiceEvent>(&text) {
                        Ok(event) => {
                            tracing::debug!("received event: {}", event.kind());
                            if s_tx.send(event).await.is_err() {
                                tracing::debug!("event receiver dropped, stopping reader");
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("failed to deserialize event: {}, text=> {:?}", e, text);
                        }
                    },
                    Message::Binary(bin) => {
                        tracing::warn!("unexpected binary message of {} bytes", bin.len());
                    }
                    Message::Close(reason) => {
                        tracing::info!("connection closed: {:?}", reason);
                        break;
                    }
                    _ => {}
                }
            }
        });

        self.connection = Some(Connection {
            send_handle,
            recv_handle,
        });
        Ok(())
    }

    async fn send_frame(&mut self, frame: ClientFrame) -> Result<()> {
        match self.c_tx {
            Some(ref tx) => {
                tx.send(frame).await?;
                Ok(())
            }
            None => Err(anyhow!("not connected yet")),
        }
    }
}

#[async_trait]
impl VoiceSession for WsVoiceSession {
    fn take_events(&mut self) -> Result<EventRx> {
        self.s_rx
            .take()
            .ok_or_else(|| anyhow!("event stream has already been taken"))
    }

    async fn start(&mut self, target: StartTarget) -> Result<()> {
        self.connect().await?;
        self.send_frame(ClientFrame::from(target)).await
    }

    async fn stop(&mut self) -> Result<()> {
        self.send_frame(ClientFrame::Stop).await?;
        // Dropping the frame sender lets the writer close the socket.
        self.c_tx = None;
        Ok(())
    }
}

impl Drop for WsVoiceSession {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.send_handle.abort();
            connection.recv_handle.abort();
        }
    }
}
