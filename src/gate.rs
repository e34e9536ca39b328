use thiserror::Error;

pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Incorrect password! Please try again.")]
    IncorrectPassword,
}

/// Single shared secret guarding destructive operations (delete, clear all).
#[derive(Clone, Debug)]
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn authorize(&self, entered: &str) -> Result<(), GateError> {
        if entered.trim() == self.secret {
            Ok(())
        } else {
            Err(GateError::IncorrectPassword)
        }
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_PASSWORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entered_password_is_trimmed() {
        let gate = AccessGate::default();
        assert!(gate.authorize(" 123456\n").is_ok());
        assert_eq!(
            gate.authorize("12345").unwrap_err().to_string(),
            "Incorrect password! Please try again."
        );
    }
}
