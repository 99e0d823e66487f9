use crate::order::DISPLAY_ORDER_FUNCTION;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Tool {
    #[serde(rename = "function")]
    Function { function: FunctionTool },
}

impl Tool {
    pub fn function(function: FunctionTool) -> Self {
        Tool::Function { function }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionTool {
    /// The name of the function
    name: String,

    /// The description of the function
    description: String,

    /// The parameters of the function in JSON Schema format
    parameters: serde_json::Value,
}

impl FunctionTool {
    pub fn new(name: String, description: String, parameters: serde_json::Value) -> Self {
        Self {
            name,
            description,
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }
}

/// The tool the assistant calls once the caller's order is settled.
pub fn display_order_tool() -> Tool {
    Tool::function(FunctionTool::new(
        DISPLAY_ORDER_FUNCTION.to_string(),
        "Show the customer a summary of their order and the total price.".to_string(),
        serde_json::json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "Every item in the order, with size and toppings"
                },
                "total": {
                    "type": "number",
                    "description": "Order total in US dollars"
                }
            },
            "required": ["description", "total"]
        }),
    ))
}
