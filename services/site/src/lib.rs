//! HTTP surface of the restaurant site.
//!
//! Serves the composed page, the menu as JSON, price quotes for the pizza
//! builder, and one voice widget per websocket connection.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use mamamia_pizza::builder::{BuilderError, Quote};
use mamamia_pizza::menu::{Menu, Size};
use mamamia_pizza::page::{Page, PageError};
use mamamia_pizza::sdk::VoiceSdk;
use mamamia_pizza::{client, Widget, WidgetCommand, WidgetConfig, WsVoiceSdk};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;

const WIDGET_CHANNEL_CAPACITY: usize = 32;

#[derive(Clone)]
pub struct AppState {
    page: Arc<Page>,
    menu: Arc<Menu>,
    widget: WidgetConfig,
    voice: client::Config,
}

impl AppState {
    pub fn new(widget: WidgetConfig, voice: client::Config) -> Result<Self, PageError> {
        Ok(Self {
            page: Arc::new(Page::new()?),
            menu: Arc::new(Menu::house()),
            widget,
            voice,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Builder(#[from] BuilderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Page(e) => {
                tracing::error!("{}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
            }
            AppError::Builder(e) => (StatusCode::BAD_REQUEST, Json(e.notice())).into_response(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct QuoteRequest {
    pub size: Size,
    #[serde(default)]
    pub toppings: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/menu", get(menu))
        .route("/api/builder/quote", post(quote))
        .route("/ws/widget", get(widget_socket))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.page.render(&state.menu)?))
}

async fn menu(State(state): State<AppState>) -> Json<Menu> {
    Json(state.menu.as_ref().clone())
}

async fn quote(Json(request): Json<QuoteRequest>) -> Result<Json<Quote>, AppError> {
    let quote = Quote::new(request.size, &request.toppings)?;
    tracing::debug!(total = %quote.total, "quoted custom pizza");
    Ok(Json(quote))
}

async fn widget_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    tracing::info!("widget websocket upgrade request received");
    ws.on_upgrade(move |socket| async move {
        let widget = Widget::new(state.widget, WsVoiceSdk::new(state.voice));
        serve_widget(socket, widget).await;
    })
}

/// Relays visitor commands into `widget` and its views back out until the
/// socket closes. The widget hangs up any live call on the way out.
pub async fn serve_widget<S: VoiceSdk + 'static>(socket: WebSocket, widget: Widget<S>) {
    tracing::info!("widget connection established");
    let (mut sink, mut stream) = socket.split();
    let (command_tx, command_rx) = mpsc::channel::<WidgetCommand>(WIDGET_CHANNEL_CAPACITY);
    let (view_tx, mut view_rx) = mpsc::channel(WIDGET_CHANNEL_CAPACITY);
    let widget_handle = tokio::spawn(widget.run(command_rx, view_tx));

    loop {
        tokio::select! {
            view = view_rx.recv() => {
                let Some(view) = view else { break };
                let text = match serde_json::to_string(&view) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!("failed to serialize widget view: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<WidgetCommand>(text.as_str()) {
                        Ok(command) => {
                            if command_tx.send(command).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!("ignoring widget command: {}, text=> {:?}", e, text.as_str()),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::info!("widget websocket error: {}", e);
                    break;
                }
            }
        }
    }

    drop(command_tx);
    drop(view_rx);
    if let Err(e) = widget_handle.await {
        tracing::error!("widget task failed: {}", e);
    }
    tracing::info!("widget connection closed");
}
