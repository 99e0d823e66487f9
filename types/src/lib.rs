pub mod assistant;
pub mod events;
pub mod message;
pub mod order;
pub mod tools;

pub use assistant::{AssistantConfig, StartTarget};
pub use events::{ClientFrame, VoiceEvent};
pub use message::{AssistantMessage, FunctionCall, Role, Transcript, TranscriptType};
pub use order::{OrderSummary, OrderTotal};
