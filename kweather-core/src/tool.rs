//! Function-tool contract consumed by the chat agent.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::region::supported_names;

pub const TOOL_NAME: &str = "get_weather";

/// Arguments of a `get_weather` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetWeatherArgs {
    pub location: String,
}

/// Tool definition in the function-calling format, listing every supported region.
pub fn definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": TOOL_NAME,
            "description": "주어진 위치의 현재 날씨 정보를 가져옵니다.",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": format!("도시 이름 또는 서울 구 이름 (예: {})", supported_names()),
                    }
                },
                "required": ["location"]
            }
        }
    })
}
