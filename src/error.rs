//! Error types for monit-exporter
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Status document decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The declared character set is not a known encoding label
    #[error("Unknown document encoding '{0}'")]
    UnknownEncoding(String),

    /// The body contains byte sequences that are invalid in the declared encoding
    #[error("Document contains characters that are invalid in {encoding}")]
    InvalidCharacters { encoding: &'static str },

    /// Malformed or truncated XML structure
    #[error("Malformed status document: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

/// Collector 모듈 에러 타입
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// 인증 실패
    #[error("Authentication with monit failed")]
    Authentication,

    /// HTTP 상태 코드 에러 (401 제외)
    #[error("Monit returned {0}")]
    UpstreamStatus(String),

    /// 연결, 타임아웃, 응답 읽기 실패
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// 상태 문서 디코딩 실패
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl CollectorError {
    /// Stable label for the error class, used by the internal error counters
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectorError::Authentication => ErrorKind::Authentication,
            CollectorError::UpstreamStatus(_) => ErrorKind::UpstreamStatus,
            CollectorError::HttpClientInit(_) | CollectorError::Transport(_) => {
                ErrorKind::Transport
            }
            CollectorError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Whether the transport failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, CollectorError::Transport(e) if e.is_timeout())
    }
}

/// Poll failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    UpstreamStatus,
    Transport,
    Decode,
}

impl ErrorKind {
    /// Every kind, in exposition order
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Authentication,
        ErrorKind::UpstreamStatus,
        ErrorKind::Transport,
        ErrorKind::Decode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::UpstreamStatus => "upstream_status",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
        }
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Collector error
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_labels() {
        let labels: Vec<&str> = ErrorKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            labels,
            vec!["authentication", "upstream_status", "transport", "decode"]
        );
    }

    #[test]
    fn test_collector_error_kind() {
        assert_eq!(
            CollectorError::Authentication.kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            CollectorError::UpstreamStatus("500 Internal Server Error".to_string()).kind(),
            ErrorKind::UpstreamStatus
        );
        assert_eq!(
            CollectorError::Decode(DecodeError::UnknownEncoding("x-bogus".to_string())).kind(),
            ErrorKind::Decode
        );
    }

    #[test]
    fn test_upstream_status_message() {
        let err = CollectorError::UpstreamStatus("503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "Monit returned 503 Service Unavailable");
    }

    #[test]
    fn test_app_error_wraps_collector_error() {
        let err: AppError = CollectorError::Authentication.into();
        assert_eq!(
            err.to_string(),
            "Collector error: Authentication with monit failed"
        );
    }
}
