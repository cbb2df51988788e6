/// Big integer operation errors.
#[derive(Debug, thiserror::Error)]
pub enum BintError {
    // Input errors
    #[error("invalid integer literal {input:?}: expected 0x[0-9a-fA-F]+ or [0-9]+")]
    Parse { input: String },
    #[error("invalid argument")]
    InvalidArg,
    #[error("invalid shift amount: {0}")]
    InvalidShiftAmount(i64),

    // Arithmetic errors
    #[error("big integer: division by zero")]
    DivisionByZero,
    #[error("big integer: modulus is zero")]
    ZeroModulus,
    #[error("big integer: no modular inverse")]
    NoInverse,
    #[error("big integer: value out of range for {target}")]
    OutOfRange { target: &'static str },

    // Environment errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BintError {
    /// Build a parse error that records the rejected text.
    pub fn parse(input: impl Into<String>) -> Self {
        BintError::Parse {
            input: input.into(),
        }
    }
}
