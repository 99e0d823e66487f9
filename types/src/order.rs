use std::fmt;

use crate::message::FunctionCall;

/// Name of the function the assistant calls to put an order on screen.
pub const DISPLAY_ORDER_FUNCTION: &str = "display_order";

/// Order details pushed by the assistant for display.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderSummary {
    description: String,
    total: OrderTotal,
}

/// The assistant may send the total as a number or as preformatted text.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum OrderTotal {
    Amount(f64),
    Text(String),
}

impl fmt::Display for OrderTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderTotal::Amount(amount) => write!(f, "{:.2}", amount),
            OrderTotal::Text(text) => f.write_str(text),
        }
    }
}

impl OrderSummary {
    pub fn new(description: &str, total: OrderTotal) -> Self {
        Self {
            description: description.to_string(),
            total,
        }
    }

    /// Validates a `display_order` call. Returns `None` for any other
    /// function name or for parameters missing a string `description` or a
    /// numeric/string `total`.
    pub fn from_function_call(call: &FunctionCall) -> Option<Self> {
        if call.name() != DISPLAY_ORDER_FUNCTION {
            return None;
        }
        let params = call.parameters().as_object()?;
        let description = params.get("description")?.as_str()?;
        let total = match params.get("total")? {
            serde_json::Value::Number(n) => OrderTotal::Amount(n.as_f64()?),
            serde_json::Value::String(s) => OrderTotal::Text(s.clone()),
            _ => return None,
        };
        Some(Self::new(description, total))
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total(&self) -> &OrderTotal {
        &self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_total() {
        let call = FunctionCall::new(
            DISPLAY_ORDER_FUNCTION,
            json!({"description": "Large Supreme, Garlic Knots", "total": 25.5}),
        );
        let order = OrderSummary::from_function_call(&call).unwrap();
        assert_eq!(order.description(), "Large Supreme, Garlic Knots");
        assert_eq!(order.total().to_string(), "25.50");
    }

    #[test]
    fn accepts_text_total() {
        let call = FunctionCall::new(
            DISPLAY_ORDER_FUNCTION,
            json!({"description": "Small Margherita", "total": "10.00"}),
        );
        let order = OrderSummary::from_function_call(&call).unwrap();
        assert_eq!(order.total(), &OrderTotal::Text("10.00".to_string()));
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cases = [
            FunctionCall::new("transfer_call", json!({"description": "x", "total": 1})),
            FunctionCall::new(DISPLAY_ORDER_FUNCTION, json!({"total": 12})),
            FunctionCall::new(DISPLAY_ORDER_FUNCTION, json!({"description": 3, "total": 12})),
            FunctionCall::new(DISPLAY_ORDER_FUNCTION, json!({"description": "x"})),
            FunctionCall::new(DISPLAY_ORDER_FUNCTION, json!({"description": "x", "total": null})),
            FunctionCall::new(DISPLAY_ORDER_FUNCTION, json!("display it")),
        ];
        for call in cases.iter() {
            assert!(OrderSummary::from_function_call(call).is_none(), "{:?}", call);
        }
    }
}
