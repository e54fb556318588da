//! Error taxonomy shared by the settlement core
//!
//! Every concrete error in the workspace maps onto one `ErrorKind`; callers
//! branch on the kind, the message carries the offending key.

use thiserror::Error;

/// Fixed classification of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input rejected before any mutation (empty hash, bad amount, bad id).
    Validation,
    /// Lookup miss.
    NotFound,
    /// Duplicate or write-once violation.
    Conflict,
    /// Malformed bytes in a record stream.
    Decode,
    /// Arithmetic would leave the representable range.
    Overflow,
}

/// Amount arithmetic and parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("Amount overflow: {lhs} with {rhs}")]
    Overflow { lhs: String, rhs: String },

    #[error("Amount is not an integer: {0}")]
    NotInteger(String),

    #[error("Invalid amount {input}: {reason}")]
    Parse { input: String, reason: String },
}

impl AmountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AmountError::Overflow { .. } => ErrorKind::Overflow,
            AmountError::NotInteger(_) | AmountError::Parse { .. } => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_error_display() {
        let err = AmountError::NotInteger("1.5".to_string());
        assert_eq!(err.to_string(), "Amount is not an integer: 1.5");
    }

    #[test]
    fn test_amount_error_kind() {
        let err = AmountError::Overflow {
            lhs: "1".to_string(),
            rhs: "2".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(AmountError::NotInteger("x".into()).kind(), ErrorKind::Validation);
    }
}
