use crate::tsw_board::BoardError;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    TomlSerialize(toml::ser::Error),
    TomlDeserialize(toml::de::Error),
    Board(BoardError),
    Logger(log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IO(value)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(value: toml::ser::Error) -> Self {
        Error::TomlSerialize(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::TomlDeserialize(value)
    }
}

impl From<BoardError> for Error {
    fn from(value: BoardError) -> Self {
        Error::Board(value)
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(value: log::SetLoggerError) -> Self {
        Error::Logger(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => write!(f, "IO error: {e}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialization error: {e}"),
            Self::TomlDeserialize(e) => write!(f, "TOML deserialization error: {e}"),
            Self::Board(e) => write!(f, "board error: {e}"),
            Self::Logger(e) => write!(f, "logger error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(e) => Some(e),
            Self::TomlSerialize(e) => Some(e),
            Self::TomlDeserialize(e) => Some(e),
            Self::Board(e) => Some(e),
            Self::Logger(e) => Some(e),
        }
    }
}
