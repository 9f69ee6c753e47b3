//! QR rendering for the controller link shown on the screen

use qrcode::render::svg;
use qrcode::QrCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    #[error("Nothing to encode")]
    EmptyInput,

    #[error("Failed to encode QR code: {0}")]
    Encode(String),
}

/// Turns a url into an image the screen can put in an `<img src>`
pub trait QrEncoder {
    fn encode(&self, url: &str) -> Result<String, QrError>;
}

/// Renders an SVG QR code and wraps it in a `data:` URL
#[derive(Debug, Clone, Copy)]
pub struct SvgQrEncoder {
    pub min_size: u32,
}

impl Default for SvgQrEncoder {
    fn default() -> Self {
        Self { min_size: 200 }
    }
}

impl QrEncoder for SvgQrEncoder {
    fn encode(&self, url: &str) -> Result<String, QrError> {
        if url.is_empty() {
            return Err(QrError::EmptyInput);
        }
        let code = QrCode::new(url.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();
        Ok(svg_data_url(&image))
    }
}

fn svg_data_url(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len() + 32);
    out.push_str("data:image/svg+xml,");
    for ch in svg.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '"' => out.push('\''),
            '\n' | '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
