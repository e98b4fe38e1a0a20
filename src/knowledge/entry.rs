//! 지식베이스 엔트리 타입과 JSON 문서 파싱
//!
//! 누락되거나 `null` 인 필드, 타입이 맞지 않는 필드는 모두 빈 값으로 처리합니다.
//! 엔트리 하나가 불완전하다고 로딩이 실패하지는 않습니다.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Types
// ============================================================================

/// FAQ 엔트리 하나
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    /// 답변 본문 (간단한 마크업이 섞여 있을 수 있음, 엔진은 그대로 전달)
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_optional")]
    pub category: Option<String>,
    /// 출처 표기
    #[serde(default, deserialize_with = "lenient_optional")]
    pub source: Option<String>,
    /// 표시 전용
    #[serde(default, alias = "lastUpdated", deserialize_with = "lenient_optional")]
    pub last_updated: Option<String>,
}

impl KnowledgeEntry {
    /// 질문/답변만으로 생성
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 비어있지 않은 출처가 있는지
    pub fn has_source(&self) -> bool {
        self.source_label().is_some()
    }

    /// 공백을 제거한 출처 (없으면 None)
    pub fn source_label(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 공백을 제거한 카테고리 (없으면 None)
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Lenient Field Deserializers
// ============================================================================

/// 스칼라 값을 문자열로 (문자열/숫자/불리언만, 나머지는 None)
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

fn lenient_optional<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// 태그: 배열이면 스칼라 원소만, 문자열 하나면 태그 하나
fn lenient_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        ref other => scalar_text(other).into_iter().collect(),
    };
    Ok(tags)
}

// ============================================================================
// Document Parsing
// ============================================================================

/// 지식베이스 JSON 문서 형태
///
/// 최상위 배열 또는 `{ "entries": [...] }` (`faqs` 별칭) 객체를 허용합니다.
/// 래퍼 객체에 목록 키가 없으면 에러입니다.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KnowledgeDocument {
    List(Vec<Value>),
    Wrapped {
        #[serde(alias = "faqs")]
        entries: Vec<Value>,
    },
}

/// JSON 문서에서 엔트리 목록 파싱
///
/// 객체가 아닌 원소는 경고 후 건너뜁니다.
pub fn parse_entries(json: &str) -> Result<Vec<KnowledgeEntry>> {
    let document: KnowledgeDocument = serde_json::from_str(json)?;

    let items = match document {
        KnowledgeDocument::List(items) => items,
        KnowledgeDocument::Wrapped { entries } => entries,
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            tracing::warn!("Skipping entry #{}: expected an object", index);
            continue;
        }
        match serde_json::from_value::<KnowledgeEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Skipping entry #{}: {}", index, e),
        }
    }

    Ok(entries)
}

// ============================================================================
// Tests
// ============================================================================
