use crate::config::RelayConfig;
use crate::qr::QrEncoder;
use crate::session::{ConnectionId, Envelope, Session, SessionEvent};
use proto::ClientMsg;
use std::collections::HashMap;
use worker::*;

// Abstract connection for testing
pub trait GameClient {
    fn send_text(&self, text: &str) -> Result<()>;
}

impl GameClient for WebSocket {
    fn send_text(&self, text: &str) -> Result<()> {
        self.send_with_str(text)
    }
}

// Abstract environment (logging)
pub trait Environment {
    fn log(&self, msg: String);
    fn warn(&self, msg: String);
}

pub struct WasmEnv;

impl Environment for WasmEnv {
    fn log(&self, msg: String) {
        console_log!("{}", msg);
    }

    fn warn(&self, msg: String) {
        console_warn!("{}", msg);
    }
}

/// Owns the live sockets and the session, and turns inbound frames into
/// outbound ones.
pub struct Relay {
    pub env: Box<dyn Environment>,
    qr: Box<dyn QrEncoder>,
    pub session: Session,
    clients: HashMap<ConnectionId, Box<dyn GameClient>>,
    next_id: u64,
}

impl Relay {
    pub fn new(env: Box<dyn Environment>, qr: Box<dyn QrEncoder>, config: RelayConfig) -> Self {
        Self {
            env,
            qr,
            session: Session::new(config),
            clients: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Track a freshly accepted socket and hand back its id
    pub fn connect(&mut self, client: Box<dyn GameClient>) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.clients.insert(id, client);
        self.env.log(format!("DO: {id:?} connected ({} open)", self.clients.len()));
        id
    }

    /// Re-attach a socket whose id survived in its attachment. The id is
    /// reserved so `connect` never hands it out again.
    pub fn reattach(&mut self, id: ConnectionId, client: Box<dyn GameClient>) {
        self.next_id = self.next_id.max(id.0 + 1);
        if self.clients.insert(id, client).is_some() {
            self.env
                .warn(format!("DO: {id:?} re-attached over a tracked socket"));
        }
    }

    /// Take back every socket that outlived a hibernation
    pub fn restore(&mut self, sockets: Vec<(ConnectionId, Box<dyn GameClient>)>) {
        let count = sockets.len();
        for (id, client) in sockets {
            self.reattach(id, client);
        }
        if count > 0 {
            self.env.log(format!(
                "DO: Restored {count} sockets, next id {}",
                self.next_id
            ));
        }
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Parse a text frame and apply it. Malformed frames are dropped.
    pub fn handle_text(&mut self, from: ConnectionId, text: &str) {
        match ClientMsg::from_json(text) {
            Ok(msg) => self.handle_message(from, msg),
            Err(e) => self
                .env
                .warn(format!("DO: Dropping malformed frame from {from:?}: {e}")),
        }
    }

    pub fn handle_message(&mut self, from: ConnectionId, msg: ClientMsg) {
        let out = self.session.apply(
            SessionEvent::Message(from, msg),
            self.env.as_ref(),
            self.qr.as_ref(),
        );
        self.deliver(&out);
    }

    pub fn disconnect(&mut self, id: ConnectionId) {
        if self.clients.remove(&id).is_some() {
            self.env
                .log(format!("DO: {id:?} closed ({} open)", self.clients.len()));
        }
        let out = self
            .session
            .apply(SessionEvent::Disconnect(id), self.env.as_ref(), self.qr.as_ref());
        self.deliver(&out);
    }

    /// Fire-and-forget send of each envelope; failures are logged and skipped
    fn deliver(&self, envelopes: &[Envelope]) {
        for envelope in envelopes {
            let Some(client) = self.clients.get(&envelope.to) else {
                self.env
                    .warn(format!("DO: No socket for {:?}, dropping", envelope.to));
                continue;
            };
            let text = match envelope.msg.to_json() {
                Ok(text) => text,
                Err(e) => {
                    self.env.warn(format!("DO: Failed to serialize message: {e}"));
                    continue;
                }
            };
            if let Err(e) = client.send_text(&text) {
                self.env
                    .warn(format!("DO: Send to {:?} failed: {e:?}", envelope.to));
            }
        }
    }
}
