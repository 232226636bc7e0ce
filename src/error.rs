use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("Invalid input - {0}")]
    InvalidInput(String),

    #[error("Tick {tick} out of range [-887272, 887272]")]
    OutOfRange { tick: i32 },

    #[error("sqrtPriceX96 out of range - {0}")]
    SqrtPriceOutOfRange(String),

    #[error("Invalid position range - tick_lower {tick_lower}, tick_upper {tick_upper}")]
    InvalidRange { tick_lower: i32, tick_upper: i32 },
}

pub type Result<T> = std::result::Result<T, MathError>;
