pub mod config;
pub mod qr;
pub mod relay;
pub mod session;


pub use config::RelayConfig;
pub use qr::{QrEncoder, QrError, SvgQrEncoder};
pub use relay::{Environment, GameClient, Relay, WasmEnv};
pub use session::{ConnectionId, Envelope, Session, SessionEvent, SessionPhase};

use std::cell::RefCell;
use worker::*;

/// Single lobby: one screen, up to two controllers
#[durable_object]
pub struct RelayDO {
    state: State,
    #[allow(dead_code)]
    env: Env,
    relay: RefCell<Relay>,
}

impl DurableObject for RelayDO {
    fn new(state: State, env: Env) -> Self {
        let config = RelayConfig::from_env(&env);
        console_log!("DO: Relay starting, public origin {}", config.public_origin);
        let mut relay = Relay::new(
            Box::new(WasmEnv),
            Box::new(SvgQrEncoder::default()),
            config,
        );

        // Sockets accepted before hibernation keep their ids; claim them
        // before any new socket is numbered
        let restored: Vec<(ConnectionId, Box<dyn GameClient>)> = state
            .get_websockets()
            .into_iter()
            .filter_map(|ws| {
                let id = attachment_id(&ws)?;
                Some((id, Box::new(ws) as Box<dyn GameClient>))
            })
            .collect();
        relay.restore(restored);

        Self {
            state,
            env,
            relay: RefCell::new(relay),
        }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        let upgrade_header = req.headers().get("Upgrade");

        match upgrade_header {
            Ok(Some(header)) if header.eq_ignore_ascii_case("websocket") => {
                let pair = match WebSocketPair::new() {
                    Ok(pair) => pair,
                    Err(err) => {
                        console_error!("DO: Failed to create WebSocket pair: {:?}", err);
                        return Response::error("Failed to create WebSocket pair", 500);
                    }
                };

                let server = pair.server;
                let client = pair.client;

                #[allow(clippy::needless_borrows_for_generic_args)]
                self.state.accept_web_socket(&server);

                let id = self.relay.borrow_mut().connect(Box::new(server.clone()));
                if let Err(err) = server.serialize_attachment(id) {
                    console_error!("DO: Failed to tag socket {:?}: {:?}", id, err);
                }

                match Response::from_websocket(client) {
                    Ok(resp) => Ok(resp),
                    Err(err) => {
                        console_error!("DO: Failed to create WebSocket response: {:?}", err);
                        Response::error("Failed to create WebSocket response", 500)
                    }
                }
            }
            Ok(header_opt) => {
                console_error!("DO: Unexpected Upgrade header state: {:?}", header_opt);
                Response::error("Expected WebSocket upgrade request", 426)
            }
            Err(err) => {
                console_error!("DO: Failed to read Upgrade header: {:?}", err);
                Response::error("Failed to read request headers", 500)
            }
        }
    }

    async fn websocket_message(
        &self,
        ws: WebSocket,
        message: durable::WebSocketIncomingMessage,
    ) -> Result<()> {
        let Some(id) = attachment_id(&ws) else {
            console_warn!("DO: Message on untagged socket, ignoring");
            return Ok(());
        };

        match message {
            durable::WebSocketIncomingMessage::String(text) => {
                let mut relay = self.relay.borrow_mut();
                if !relay.is_connected(id) {
                    relay.reattach(id, Box::new(ws));
                }
                relay.handle_text(id, &text);
            }
            durable::WebSocketIncomingMessage::Binary(bytes) => {
                console_warn!(
                    "DO: Dropping {} byte binary frame from {:?}",
                    bytes.len(),
                    id
                );
            }
        }
        Ok(())
    }

    async fn websocket_close(
        &self,
        ws: WebSocket,
        code: usize,
        reason: String,
        _was_clean: bool,
    ) -> Result<()> {
        console_log!(
            "DO: WebSocket close event (code: {}, reason: {})",
            code,
            reason
        );

        if let Some(id) = attachment_id(&ws) {
            self.relay.borrow_mut().disconnect(id);
        }
        Ok(())
    }

    async fn websocket_error(&self, _ws: WebSocket, error: Error) -> Result<()> {
        console_error!("DO: WebSocket error: {:?}", error);
        Ok(())
    }
}

fn attachment_id(ws: &WebSocket) -> Option<ConnectionId> {
    match ws.deserialize_attachment::<ConnectionId>() {
        Ok(id) => id,
        Err(err) => {
            console_error!("DO: Failed to read socket attachment: {:?}", err);
            None
        }
    }
}
