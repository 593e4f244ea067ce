use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input device error: {0}")]
    Device(#[from] std::io::Error),

    #[error("character '{0}' cannot be typed (no keycode mapping)")]
    UntypableCharacter(char),

    #[error("input sink failed: {0}")]
    Sink(String),

    #[error("gaussian sampler exhausted its rejection budget")]
    SamplerExhausted,

    #[error("config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
