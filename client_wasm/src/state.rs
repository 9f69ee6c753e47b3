//! What the screen page shows around the playfield

pub const STATUS_WAITING: &str = "Scan the QR code with your phone to join";
pub const STATUS_PLAYER1: &str = "Player 1 connected. Waiting for player 2...";

/// DOM-facing view model, synced to the page after every event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub qr_image: Option<String>,
    pub controller_url: Option<String>,
    pub qr_visible: bool,
    pub canvas_visible: bool,
    pub status: String,
}

impl Default for ScreenView {
    fn default() -> Self {
        Self {
            qr_image: None,
            controller_url: None,
            qr_visible: true,
            canvas_visible: false,
            status: STATUS_WAITING.to_string(),
        }
    }
}

impl ScreenView {
    pub fn set_qr(&mut self, image: String, url: String) {
        // An empty image means the relay could not render one; the url still works
        self.qr_image = (!image.is_empty()).then_some(image);
        self.controller_url = Some(url);
    }

    pub fn show_playfield(&mut self) {
        self.qr_visible = false;
        self.canvas_visible = true;
        self.status.clear();
    }

    pub fn show_lobby(&mut self) {
        self.qr_visible = true;
        self.canvas_visible = false;
        self.status = STATUS_WAITING.to_string();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}
