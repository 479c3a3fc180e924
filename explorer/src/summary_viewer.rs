use crate::sanitizer::HtmlSanitizer;

/// Single-slot overlay for summaries coming from either driver.
#[derive(Default)]
pub struct SummaryViewer {
    sanitizer: HtmlSanitizer,
    visible: Option<String>,
}

impl SummaryViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `raw` after sanitizing it, replacing whatever was visible.
    pub fn show(&mut self, raw: &str) {
        if self.visible.is_some() {
            log::debug!("Replacing visible summary");
        }
        self.visible = Some(self.sanitizer.sanitize(raw));
    }

    pub fn dismiss(&mut self) {
        self.visible = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }

    /// Sanitized HTML of the visible summary.
    pub fn content(&self) -> Option<&str> {
        self.visible.as_deref()
    }

    pub fn content_as_text(&self) -> Option<String> {
        self.visible
            .as_deref()
            .map(|html| self.sanitizer.plain_text(html))
    }

    pub fn sanitizer(&self) -> &HtmlSanitizer {
        &self.sanitizer
    }
}
