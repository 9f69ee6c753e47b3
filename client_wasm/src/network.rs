//! Network message handling

use proto::{ClientMsg, ServerMsg};

/// Decode an incoming text frame
pub fn decode_server_message(text: &str) -> Result<ServerMsg, String> {
    ServerMsg::from_json(text).map_err(|e| format!("Failed to parse server message: {e}"))
}

/// Encode an outgoing message as a text frame
pub fn encode_client_message(msg: &ClientMsg) -> Result<String, String> {
    msg.to_json()
        .map_err(|e| format!("Failed to serialize {msg:?}: {e}"))
}

/// WebSocket endpoint on the same host that served the page
pub fn socket_url(page_protocol: &str, host: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}/ws")
}
