//! Symbol renderer: turns a `GenerationRequest` into a vector QR symbol.
//!
//! Encoding is delegated to the `qrcode` crate. This module only lays the
//! modules out as SVG geometry, one merged `h` run per horizontal stretch of
//! dark modules, with the requested pixel size as the outer dimensions.

use crate::request::GenerationRequest;
use crate::{Error, Result};
use log::debug;
use qrcode::{Color, EcLevel, QrCode};

/// Identifier carried by the root `<svg>` element of every preview.
pub const SYMBOL_ID: &str = "qr-code";

/// A rendered vector QR symbol.
///
/// This is a pure function of the request it was rendered from; it is
/// replaced, never mutated, when the request changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorSymbol {
    id: String,
    markup: String,
    size: u32,
    modules: usize,
    cells: Vec<bool>,
}

impl VectorSymbol {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Serialized SVG markup of the symbol.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Logical width and height in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Side length of the drawn grid in modules (including any margin).
    pub fn modules(&self) -> usize {
        self.modules
    }

    /// Whether the module at grid position (`x`, `y`) is drawn in the
    /// foreground color. Out-of-range positions are light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        if x >= self.modules || y >= self.modules {
            return false;
        }
        self.cells[y * self.modules + x]
    }
}

/// Renders QR symbols with a fixed error-correction level and margin.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRenderer {
    ec_level: EcLevel,
    margin: usize,
}

impl Default for SymbolRenderer {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            margin: 0,
        }
    }
}

impl SymbolRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light quiet zone of `margin` modules around the symbol.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_ec_level(mut self, ec_level: EcLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    pub fn render(&self, request: &GenerationRequest) -> Result<VectorSymbol> {
        let content = request.effective_content();
        let code = QrCode::with_error_correction_level(content.as_bytes(), self.ec_level)
            .map_err(|e| Error::EncodeError(format!("{} ({} bytes)", e, content.len())))?;

        let width = code.width();
        let modules = width + 2 * self.margin;
        let colors = code.to_colors();
        let mut cells = vec![false; modules * modules];
        for y in 0..width {
            for x in 0..width {
                if colors[y * width + x] == Color::Dark {
                    cells[(y + self.margin) * modules + x + self.margin] = true;
                }
            }
        }

        let markup = to_svg_markup(
            &cells,
            modules,
            request.size(),
            request.foreground(),
            request.background(),
        );
        debug!(
            "rendered {}x{} module symbol at {}px ({} bytes of markup)",
            modules,
            modules,
            request.size(),
            markup.len()
        );

        Ok(VectorSymbol {
            id: SYMBOL_ID.to_string(),
            markup,
            size: request.size(),
            modules,
            cells,
        })
    }
}

fn to_svg_markup(cells: &[bool], modules: usize, size: u32, fg: &str, bg: &str) -> String {
    let mut d = String::new();
    for y in 0..modules {
        let row = &cells[y * modules..(y + 1) * modules];
        let mut x = 0;
        while x < modules {
            if !row[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < modules && row[x] {
                x += 1;
            }
            if !d.is_empty() {
                d.push(' ');
            }
            d += &format!("M{},{}h{}v1H{}z", start, y, x - start, start);
        }
    }

    let mut svg = String::new();
    svg += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"{id}\" width=\"{s}\" height=\"{s}\" viewBox=\"0 0 {n} {n}\" shape-rendering=\"crispEdges\">",
        id = SYMBOL_ID,
        s = size,
        n = modules
    );
    svg += &format!(
        "<path fill=\"{}\" d=\"M0,0h{n}v{n}H0z\"/>",
        escape_attr(bg),
        n = modules
    );
    svg += &format!("<path fill=\"{}\" d=\"{}\"/>", escape_attr(fg), d);
    svg += "</svg>";
    svg
}

// Colors are not interpreted, only kept from breaking out of the attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
