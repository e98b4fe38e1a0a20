//! 지식베이스 소스 - 로컬 파일 / HTTP 로딩
//!
//! 정적 JSON 문서를 한 번 읽어 `KnowledgeBase` 로 만듭니다.
//! 재시도나 부분 로딩은 하지 않습니다. 실패하면 호출자가 상태를
//! `NotReady` 로 유지합니다.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{FaqError, Result};

use super::base::KnowledgeBase;
use super::entry::parse_entries;

/// 지식베이스 위치 환경변수
pub const KB_ENV_VAR: &str = "FAQ_CHAT_KB";

/// 기본 파일 이름
pub const DEFAULT_KB_FILE: &str = "knowledge.json";

/// HTTP 요청 타임아웃
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Data Directory
// ============================================================================

/// 데이터 디렉토리 경로 (~/.faq-chat/)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".faq-chat")
}

/// 기본 지식베이스 경로
pub fn default_kb_path() -> PathBuf {
    get_data_dir().join(DEFAULT_KB_FILE)
}

/// 지식베이스 위치 결정
///
/// 우선순위: 명시 인자 > FAQ_CHAT_KB 환경변수 > 데이터 디렉토리 기본 파일
pub fn resolve_location(explicit: Option<&str>) -> String {
    if let Some(location) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return location.to_string();
    }

    if let Ok(location) = std::env::var(KB_ENV_VAR) {
        if !location.trim().is_empty() {
            tracing::debug!("Using knowledge base from {}", KB_ENV_VAR);
            return location.trim().to_string();
        }
    }

    default_kb_path().display().to_string()
}

// ============================================================================
// KnowledgeSource Trait
// ============================================================================

/// 지식베이스 원본 문서 제공자
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// 원본 JSON 문서 읽기
    async fn fetch(&self) -> Result<String>;

    /// 사람이 읽을 수 있는 위치 표기
    fn describe(&self) -> String;

    /// 읽어서 파싱까지 수행
    async fn load(&self) -> Result<KnowledgeBase> {
        let raw = self.fetch().await?;
        let entries = parse_entries(&raw)?;

        tracing::info!(
            "Loaded knowledge base: {} ({} entries)",
            self.describe(),
            entries.len()
        );

        Ok(KnowledgeBase::new(entries, self.describe()))
    }
}

// ============================================================================
// FileSource
// ============================================================================

/// 로컬 JSON 파일
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KnowledgeSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FaqError::io(&self.path, e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// HttpSource
// ============================================================================

/// HTTP(S) 로 제공되는 정적 JSON 문서
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("faq-chat/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl KnowledgeSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Fetching knowledge base: {}", self.url);

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FaqError::HttpStatus {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

// ============================================================================
// Factory Functions
// ============================================================================

/// 위치 문자열로 소스 생성
///
/// `http://` / `https://` 는 HTTP, `file://` 과 그 외는 로컬 파일로 취급합니다.
pub fn source_from_location(location: &str) -> Result<Box<dyn KnowledgeSource>> {
    let location = location.trim();
    if location.is_empty() {
        return Err(FaqError::InvalidSource("empty location".to_string()));
    }

    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpSource::new(url)?))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| FaqError::InvalidSource(location.to_string()))?;
            Ok(Box::new(FileSource::new(path)))
        }
        // 윈도우 드라이브 문자(C:\...)는 한 글자 스킴으로 파싱됨
        Ok(url) if url.scheme().len() > 1 => Err(FaqError::InvalidSource(format!(
            "unsupported scheme '{}' in {}",
            url.scheme(),
            location
        ))),
        _ => Ok(Box::new(FileSource::new(location))),
    }
}

/// 위치 문자열에서 바로 로드
pub async fn load_from_location(location: &str) -> Result<KnowledgeBase> {
    source_from_location(location)?.load().await
}

// ============================================================================
// Tests
// ============================================================================
