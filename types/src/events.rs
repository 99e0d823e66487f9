mod error;

pub use error::ErrorDetails;

use crate::assistant::{AssistantConfig, StartTarget};
use crate::message::AssistantMessage;

/// Events emitted by the hosted voice service for one call.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum VoiceEvent {
    #[serde(rename = "call-start")]
    CallStart,
    #[serde(rename = "call-end")]
    CallEnd,
    #[serde(rename = "speech-start")]
    SpeechStart,
    #[serde(rename = "speech-end")]
    SpeechEnd,
    #[serde(rename = "message")]
    Message { message: AssistantMessage },
    #[serde(rename = "error")]
    Error { error: ErrorDetails },
}

impl VoiceEvent {
    /// The wire name of the event, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            VoiceEvent::CallStart => "call-start",
            VoiceEvent::CallEnd => "call-end",
            VoiceEvent::SpeechStart => "speech-start",
            VoiceEvent::SpeechEnd => "speech-end",
            VoiceEvent::Message { .. } => "message",
            VoiceEvent::Error { .. } => "error",
        }
    }

    pub fn message(message: AssistantMessage) -> Self {
        VoiceEvent::Message { message }
    }

    pub fn error(message: &str) -> Self {
        VoiceEvent::Error {
            error: ErrorDetails::new(message),
        }
    }
}

/// Frames sent to the hosted voice service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "start")]
    Start {
        #[serde(rename = "assistantId", skip_serializing_if = "Option::is_none")]
        assistant_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        assistant: Option<AssistantConfig>,
    },
    #[serde(rename = "stop")]
    Stop,
}

impl From<StartTarget> for ClientFrame {
    fn from(target: StartTarget) -> Self {
        match target {
            StartTarget::AssistantId(id) => ClientFrame::Start {
                assistant_id: Some(id),
                assistant: None,
            },
            StartTarget::Inline(config) => ClientFrame::Start {
                assistant_id: None,
                assistant: Some(config),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Role, TranscriptType};

    #[test]
    fn decodes_lifecycle_events() {
        let event: VoiceEvent = serde_json::from_str(r#"{"type":"call-start"}"#).unwrap();
        assert!(matches!(event, VoiceEvent::CallStart));

        let event: VoiceEvent = serde_json::from_str(r#"{"type":"speech-end"}"#).unwrap();
        assert_eq!(event.kind(), "speech-end");
    }

    #[test]
    fn decodes_transcript_message() {
        let raw = r#"{
            "type": "message",
            "message": {
                "type": "transcript",
                "role": "user",
                "transcriptType": "final",
                "transcript": "One large pepperoni please"
            }
        }"#;
        let event: VoiceEvent = serde_json::from_str(raw).unwrap();
        match event {
            VoiceEvent::Message {
                message: AssistantMessage::Transcript(t),
            } => {
                assert_eq!(t.role(), Role::User);
                assert_eq!(t.transcript_type(), TranscriptType::Final);
                assert_eq!(t.transcript(), "One large pepperoni please");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn unknown_message_kinds_decode_as_other() {
        let raw = r#"{"type":"message","message":{"type":"status-update","status":"ringing"}}"#;
        let event: VoiceEvent = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            event,
            VoiceEvent::Message {
                message: AssistantMessage::Other
            }
        ));
    }

    #[test]
    fn decodes_error_event() {
        let raw = r#"{"type":"error","error":{"message":"Meeting has ended"}}"#;
        let event: VoiceEvent = serde_json::from_str(raw).unwrap();
        match event {
            VoiceEvent::Error { error } => assert_eq!(error.message(), "Meeting has ended"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn start_frame_carries_assistant_id_only() {
        let frame = ClientFrame::from(StartTarget::AssistantId("asst_123".to_string()));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "start");
        assert_eq!(json["assistantId"], "asst_123");
        assert!(json.get("assistant").is_none());
    }
}
