//! Knowledge Base - 로드된 엔트리 컬렉션과 준비 상태
//!
//! 로딩이 끝나기 전에는 `KnowledgeState::NotReady` 이고, 이 상태는
//! 매칭 측면에서 빈 컬렉션과 동일하게 동작합니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entry::KnowledgeEntry;

// ============================================================================
// KnowledgeBase
// ============================================================================

/// 로드 완료된 읽기 전용 지식베이스
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    origin: String,
    loaded_at: DateTime<Utc>,
}

/// 지식베이스 통계
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
    pub entry_count: usize,
    pub tagged_count: usize,
    pub attributed_count: usize,
    /// 카테고리별 엔트리 수 (카테고리 없는 엔트리는 제외)
    pub categories: BTreeMap<String, usize>,
}

impl KnowledgeBase {
    /// 엔트리 목록으로 생성
    ///
    /// # Arguments
    /// * `entries` - 엔트리 목록 (순서는 동점 처리에 사용됨)
    /// * `origin` - 로드한 위치 (파일 경로 / URL)
    pub fn new(entries: Vec<KnowledgeEntry>, origin: impl Into<String>) -> Self {
        Self {
            entries,
            origin: origin.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// 카테고리 필터 (대소문자 무시)
    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a KnowledgeEntry> + 'a {
        self.entries.iter().filter(move |e| {
            e.category_label()
                .map(|c| c.eq_ignore_ascii_case(category.trim()))
                .unwrap_or(false)
        })
    }

    /// 통계
    pub fn stats(&self) -> KnowledgeStats {
        let mut categories = BTreeMap::new();
        for category in self.entries.iter().filter_map(|e| e.category_label()) {
            *categories.entry(category.to_string()).or_insert(0) += 1;
        }

        KnowledgeStats {
            entry_count: self.entries.len(),
            tagged_count: self.entries.iter().filter(|e| !e.tags.is_empty()).count(),
            attributed_count: self.entries.iter().filter(|e| e.has_source()).count(),
            categories,
        }
    }
}

// ============================================================================
// KnowledgeState
// ============================================================================

/// 지식베이스 준비 상태
#[derive(Debug, Clone, Default)]
pub enum KnowledgeState {
    /// 아직 로드되지 않았거나 로드에 실패
    #[default]
    NotReady,
    /// 로드 완료
    Ready(KnowledgeBase),
}

impl KnowledgeState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// 매칭에 사용할 엔트리 (준비 전에는 빈 슬라이스)
    pub fn entries(&self) -> &[KnowledgeEntry] {
        match self {
            Self::Ready(kb) => kb.entries(),
            Self::NotReady => &[],
        }
    }

    pub fn base(&self) -> Option<&KnowledgeBase> {
        match self {
            Self::Ready(kb) => Some(kb),
            Self::NotReady => None,
        }
    }
}

impl From<KnowledgeBase> for KnowledgeState {
    fn from(kb: KnowledgeBase) -> Self {
        Self::Ready(kb)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        KnowledgeBase::new(
            vec![
                KnowledgeEntry::new("Q1", "A1")
                    .with_category("Billing")
                    .with_tags(["refund"])
                    .with_source("FAQ"),
                KnowledgeEntry::new("Q2", "A2").with_category("billing"),
                KnowledgeEntry::new("Q3", "A3").with_category("General"),
                KnowledgeEntry::new("Q4", "A4"),
            ],
            "memory",
        )
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.entry_count, 4);
        assert_eq!(stats.tagged_count, 1);
        assert_eq!(stats.attributed_count, 1);
        assert_eq!(stats.categories.get("Billing"), Some(&1));
        assert_eq!(stats.categories.get("billing"), Some(&1));
        assert_eq!(stats.categories.get("General"), Some(&1));
    }

    #[test]
    fn test_by_category_ignores_case() {
        let kb = sample();
        let questions: Vec<_> = kb.by_category("BILLING").map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_state_not_ready_is_empty() {
        let state = KnowledgeState::default();
        assert!(!state.is_ready());
        assert!(state.entries().is_empty());
        assert!(state.base().is_none());
    }

    #[test]
    fn test_state_ready() {
        let state: KnowledgeState = sample().into();
        assert!(state.is_ready());
        assert_eq!(state.entries().len(), 4);
        assert_eq!(state.base().map(|kb| kb.origin()), Some("memory"));
    }
}
