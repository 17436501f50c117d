use core::fmt;

/// Failure of a pulse measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The pulse timer overflowed before the falling edge arrived.
    Timeout,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Timeout => f.write_str("pulse measurement timed out"),
        }
    }
}
