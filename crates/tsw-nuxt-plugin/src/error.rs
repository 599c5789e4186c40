use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}
