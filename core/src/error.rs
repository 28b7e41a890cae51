use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Board did not settle after {passes} passes")]
    CannotSettle { passes: u32 },
}

pub type Result<T> = core::result::Result<T, GameError>;
