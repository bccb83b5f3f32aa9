use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum PresetError {
    StringError(String),
    IoError(Arc<std::io::Error>),
    JsonError(Arc<serde_json::Error>),
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            PresetError::StringError(_) => None,
            PresetError::IoError(ref e) => Some(&**e),
            PresetError::JsonError(ref e) => Some(&**e),
        }
    }
}

impl core::fmt::Display for PresetError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            PresetError::StringError(ref e) => e.fmt(fmt),
            PresetError::IoError(ref e) => e.fmt(fmt),
            PresetError::JsonError(ref e) => e.fmt(fmt),
        }
    }
}

impl From<&str> for PresetError {
    fn from(str: &str) -> Self {
        PresetError::StringError(str.to_string())
    }
}

impl From<String> for PresetError {
    fn from(string: String) -> Self {
        PresetError::StringError(string)
    }
}

impl From<std::io::Error> for PresetError {
    fn from(error: std::io::Error) -> Self {
        PresetError::IoError(Arc::new(error))
    }
}

impl From<serde_json::Error> for PresetError {
    fn from(error: serde_json::Error) -> Self {
        PresetError::JsonError(Arc::new(error))
    }
}

pub type PresetResult<T> = Result<T, PresetError>;
