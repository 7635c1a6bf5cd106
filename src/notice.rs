//! Transient user-facing notices

use colored::Colorize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
    Info(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Notice::Failure(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice::Info(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Failure(m) | Notice::Info(m) => m,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::Failure(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(m) => write!(f, "{} {}", "✓".green(), m.green()),
            Notice::Failure(m) => write!(f, "{} {}", "✗".red(), m.red()),
            Notice::Info(m) => write!(f, "{}", m.yellow()),
        }
    }
}
