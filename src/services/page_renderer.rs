use tera::{Context, Tera};

use crate::assets::AssetLoader;
use crate::models::{AppConfig, DisplaySnapshot};

const PAGE_TEMPLATE: &str = "index.html";

/// Error type for page rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the live display page with Tera
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Compile the embedded page template
    pub fn new() -> Result<Self, TemplateError> {
        let source = AssetLoader::read_static_string(PAGE_TEMPLATE)?;
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE, &source)?;
        tracing::debug!("Page template compiled");
        Ok(Self { tera })
    }

    /// Render the page with the current snapshot inlined
    pub fn render(
        &self,
        config: &AppConfig,
        snapshot: &DisplaySnapshot,
    ) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("title", &config.title);
        context.insert("precision", &config.precision);
        context.insert("channels", &snapshot.channels);
        context.insert("connected", &snapshot.connected);
        // inline JSON for the script; tera autoescapes strings in HTML templates
        let initial = serde_json::to_string(snapshot).map_err(tera::Error::json)?;
        context.insert("initial_json", &initial);

        Ok(self.tera.render(PAGE_TEMPLATE, &context)?)
    }
}
