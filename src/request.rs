//! The user-editable state that drives both the preview and the export.

/// Content rendered when the text field is empty.
pub const DEFAULT_CONTENT: &str = "https://example.com";
pub const DEFAULT_FOREGROUND: &str = "#000000";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_SIZE: u32 = 256;

pub const MIN_SIZE: u32 = 128;
pub const MAX_SIZE: u32 = 512;
pub const SIZE_STEP: u32 = 64;

/// Every size the slider can produce, smallest first.
pub fn allowed_sizes() -> impl Iterator<Item = u32> {
    (MIN_SIZE..=MAX_SIZE).step_by(SIZE_STEP as usize)
}

/// Snap an arbitrary pixel size onto the slider domain.
///
/// Values are clamped to `[MIN_SIZE, MAX_SIZE]` and rounded to the nearest
/// multiple of `SIZE_STEP` above `MIN_SIZE` (ties round up).
pub fn snap_size(size: u32) -> u32 {
    let clamped = size.clamp(MIN_SIZE, MAX_SIZE);
    let steps = (clamped - MIN_SIZE + SIZE_STEP / 2) / SIZE_STEP;
    (MIN_SIZE + steps * SIZE_STEP).min(MAX_SIZE)
}

/// Current generation parameters.
///
/// Colors are kept as the raw strings the user typed; they are never parsed
/// or validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    content: String,
    foreground: String,
    background: String,
    size: u32,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT.to_string(),
            foreground: DEFAULT_FOREGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            size: DEFAULT_SIZE,
        }
    }
}

impl GenerationRequest {
    pub fn new(
        content: impl Into<String>,
        foreground: impl Into<String>,
        background: impl Into<String>,
        size: u32,
    ) -> Self {
        Self {
            content: content.into(),
            foreground: foreground.into(),
            background: background.into(),
            size: snap_size(size),
        }
    }

    /// Raw content as typed, possibly empty.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content handed to the encoder: the placeholder replaces empty input.
    pub fn effective_content(&self) -> &str {
        if self.content.is_empty() {
            DEFAULT_CONTENT
        } else {
            &self.content
        }
    }

    pub fn foreground(&self) -> &str {
        &self.foreground
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_foreground(&mut self, color: impl Into<String>) {
        self.foreground = color.into();
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.background = color.into();
    }

    /// Set the pixel size, snapping it onto the slider domain.
    pub fn set_size(&mut self, size: u32) {
        self.size = snap_size(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_form_state() {
        let r = GenerationRequest::default();
        assert_eq!(r.content(), "https://example.com");
        assert_eq!(r.foreground(), "#000000");
        assert_eq!(r.background(), "#ffffff");
        assert_eq!(r.size(), 256);
    }

    #[test]
    fn empty_content_falls_back_to_placeholder() {
        let mut r = GenerationRequest::default();
        r.set_content("");
        assert_eq!(r.content(), "");
        assert_eq!(r.effective_content(), DEFAULT_CONTENT);

        r.set_content("TEST");
        assert_eq!(r.effective_content(), "TEST");
    }

    #[test]
    fn sizes_snap_to_slider_steps() {
        assert_eq!(snap_size(0), 128);
        assert_eq!(snap_size(128), 128);
        assert_eq!(snap_size(159), 128);
        assert_eq!(snap_size(160), 192);
        assert_eq!(snap_size(300), 320);
        assert_eq!(snap_size(512), 512);
        assert_eq!(snap_size(10_000), 512);
    }

    #[test]
    fn allowed_sizes_cover_the_slider() {
        let sizes: Vec<u32> = allowed_sizes().collect();
        assert_eq!(sizes, vec![128, 192, 256, 320, 384, 448, 512]);
        assert!(sizes.iter().all(|s| snap_size(*s) == *s));
    }

    #[test]
    fn colors_are_stored_verbatim() {
        let mut r = GenerationRequest::default();
        r.set_foreground("rebeccapurple");
        r.set_background("not a color");
        assert_eq!(r.foreground(), "rebeccapurple");
        assert_eq!(r.background(), "not a color");
    }
}
