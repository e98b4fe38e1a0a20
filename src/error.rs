//! 에러 타입
//!
//! 매칭 엔진 자체는 에러를 내지 않습니다. 에러는 지식베이스 로딩과
//! 설정 파일 처리 경계에서만 발생합니다.

use std::path::PathBuf;

use thiserror::Error;

/// 라이브러리 공용 Result
pub type Result<T> = std::result::Result<T, FaqError>;

/// 지식베이스 로딩 / 설정 에러
#[derive(Debug, Error)]
pub enum FaqError {
    /// 파일 읽기/쓰기 실패
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 응답 상태 코드 오류
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// JSON 파싱 실패
    #[error("invalid JSON document: {0}")]
    Parse(#[from] serde_json::Error),

    /// 지식베이스 위치 해석 실패
    #[error("invalid knowledge source: {0}")]
    InvalidSource(String),

    /// 잘못된 매칭 설정
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}

impl FaqError {
    /// 경로 정보를 포함한 I/O 에러 생성
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FaqError::HttpStatus {
            url: "https://example.com/kb.json".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 while fetching https://example.com/kb.json"
        );

        let err = FaqError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/tmp/missing.json"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
        let err: FaqError = parse_err.into();
        assert!(matches!(err, FaqError::Parse(_)));
    }
}
