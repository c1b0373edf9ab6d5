use std::fmt;

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum WebtagError {
    /// No tag carries the requested label (exit code 2)
    LabelNotFound(String),
    /// A tagging pass or snapshot returned data that does not decode (exit code 3)
    MalformedInventory(String),
    /// WebDriver connection failed (exit code 4)
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl WebtagError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            WebtagError::LabelNotFound(_) => 2,
            WebtagError::MalformedInventory(_) => 3,
            WebtagError::WebDriverFailed(_) => 4,
            WebtagError::Timeout(_) => 5,
            WebtagError::Other(_) => 1,
        }
    }

    /// Short machine-readable kind, used in JSON error output
    pub fn kind(&self) -> &'static str {
        match self {
            WebtagError::LabelNotFound(_) => "label_not_found",
            WebtagError::MalformedInventory(_) => "malformed_inventory",
            WebtagError::WebDriverFailed(_) => "webdriver_failed",
            WebtagError::Timeout(_) => "timeout",
            WebtagError::Other(_) => "error",
        }
    }
}

impl fmt::Display for WebtagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebtagError::LabelNotFound(msg) => write!(f, "{}", msg),
            WebtagError::MalformedInventory(msg) => write!(f, "{}", msg),
            WebtagError::WebDriverFailed(msg) => {
                write!(f, "WebDriver connection failed: {}", msg)
            }
            WebtagError::Timeout(msg) => {
                write!(f, "Operation timed out: {}", msg)
            }
            WebtagError::Other(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for WebtagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebtagError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for WebtagError {
    fn from(err: anyhow::Error) -> Self {
        // Context layers hide the root cause from `to_string()`
        let msg = format!("{:#}", err);

        if msg.contains("Label not found") {
            WebtagError::LabelNotFound(msg)
        } else if msg.contains("Malformed") {
            WebtagError::MalformedInventory(msg)
        } else if msg.contains("Failed to connect to WebDriver")
            || msg.contains("WebDriver")
            || msg.contains("geckodriver")
            || msg.contains("chromedriver")
        {
            WebtagError::WebDriverFailed(msg)
        } else if msg.contains("timeout") || msg.contains("timed out") {
            WebtagError::Timeout(msg)
        } else {
            WebtagError::Other(err)
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
