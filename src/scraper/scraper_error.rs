use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    #[error("Bad link '{0}'")]
    BadLink(String),
    #[error("Config error: {0}")]
    Config(String),
}
