#[derive(Debug)]
pub enum DecodeError {
    EmptyName,
    InvalidFormat(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::EmptyName => write!(f, "Empty name"),
            DecodeError::InvalidFormat(name) => write!(f, "Invalid Format: {}", name),
        }
    }
}

impl std::error::Error for DecodeError {}
