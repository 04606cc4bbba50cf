use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("statistics fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("malformed statistics entry: {0}")]
    MalformedEntry(String),

    #[error("formatting error: {0}")]
    Format(String),

    #[error("template render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Keyring(#[from] keyring::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
