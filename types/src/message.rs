/// Payload of a `message` event.
///
/// Only transcripts and function calls are modelled; every other message
/// kind the service emits (status updates, model output, hang notices...)
/// decodes as `Other` and is ignored by consumers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum AssistantMessage {
    #[serde(rename = "transcript")]
    Transcript(Transcript),
    #[serde(rename = "function-call")]
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    #[serde(other)]
    Other,
}

impl AssistantMessage {
    pub fn transcript(role: Role, transcript_type: TranscriptType, text: &str) -> Self {
        AssistantMessage::Transcript(Transcript::new(role, transcript_type, text))
    }

    pub fn function_call(name: &str, parameters: serde_json::Value) -> Self {
        AssistantMessage::FunctionCall {
            function_call: FunctionCall::new(name, parameters),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    /// Interim recognition result, may still change.
    Partial,
    Final,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Transcript {
    role: Role,
    #[serde(rename = "transcriptType")]
    transcript_type: TranscriptType,
    transcript: String,
}

impl Transcript {
    pub fn new(role: Role, transcript_type: TranscriptType, transcript: &str) -> Self {
        Self {
            role,
            transcript_type,
            transcript: transcript.to_string(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn transcript_type(&self) -> TranscriptType {
        self.transcript_type
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn is_final(&self) -> bool {
        self.transcript_type == TranscriptType::Final
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionCall {
    name: String,
    #[serde(default)]
    parameters: serde_json::Value,
}

impl FunctionCall {
    pub fn new(name: &str, parameters: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }
}
