use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrError {
    #[error("QR code generation failed: {0}")]
    EncodeError(String),

    #[error("Invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("Logo could not be embedded: {0}")]
    LogoError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, QrError>;
