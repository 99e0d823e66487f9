pub const PUBLIC_KEY_ENV: &str = "VAPI_PUBLIC_KEY";
pub const ASSISTANT_ID_ENV: &str = "VAPI_ASSISTANT_ID";
pub const BASE_URL_ENV: &str = "VAPI_BASE_URL";
pub const CONNECT_TIMEOUT_ENV: &str = "VAPI_CONNECT_TIMEOUT_SECS";

pub const BASE_URL: &str = "wss://api.vapi.ai";
pub const CALL_PATH: &str = "/call/web";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
