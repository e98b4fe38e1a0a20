//! faq-chat - FAQ 매칭 챗 엔진
//!
//! 사용자 메시지를 정적 FAQ 엔트리(질문/답변/태그/카테고리/출처)와
//! 가중치 키워드 스코어링으로 비교해 가장 적합한 답변을 찾습니다.
//! 임계값을 넘는 엔트리가 없으면 기본 응답으로 대체합니다.
//!
//! ## 사용법
//! ```rust
//! use faq_chat::{KnowledgeEntry, Matcher};
//!
//! let entries = vec![
//!     KnowledgeEntry::new("What is Twin Health?", "Twin Health is a metabolic care platform.")
//!         .with_tags(["twin health", "overview"])
//!         .with_source("FAQ"),
//! ];
//!
//! let matcher = Matcher::default();
//! let result = matcher.find_best_match("twin health", &entries).unwrap();
//! assert_eq!(result.source, "FAQ");
//! assert!(matcher.find_best_match("pizza recipe", &entries).is_none());
//! ```

pub mod chat;
pub mod cli;
pub mod error;
pub mod knowledge;
pub mod matcher;

// Re-exports
pub use chat::{ChatConfig, ChatSession, ChatTurn, Reply, ReplyKind};
pub use error::{FaqError, Result};
pub use knowledge::{
    load_from_location, resolve_location, FileSource, HttpSource, KnowledgeBase, KnowledgeEntry,
    KnowledgeSource, KnowledgeState, KnowledgeStats,
};
pub use matcher::{
    normalize, tokenize, MatchResult, Matcher, MatcherConfig, ScoreBreakdown, ScoredEntry,
    ScoringWeights, DEFAULT_SOURCE,
};
