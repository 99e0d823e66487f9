pub mod builder;
pub mod client;
pub mod menu;
pub mod page;
pub mod sdk;
pub mod widget;

pub use mamamia_types as types;
pub use client::{WsVoiceSdk, WsVoiceSession};
pub use widget::{Widget, WidgetCommand, WidgetConfig, WidgetView};
