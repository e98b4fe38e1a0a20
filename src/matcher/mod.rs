//! Matcher 모듈 - 텍스트 매칭 엔진
//!
//! - Normalizer: 정규화, 토큰화, 키워드 추출
//! - Scoring: 보정된 가중치 테이블과 엔트리별 점수
//! - Engine: 최고 점수 선택, 임계값 판정, 결과 생성

mod engine;
pub mod normalizer;
mod scoring;

// Re-exports
pub use engine::{MatchResult, Matcher, ScoredEntry, DEFAULT_SOURCE};
pub use normalizer::{extract_keywords, normalize, tokenize, STOP_WORDS};
pub use scoring::{
    score_entry, MatcherConfig, PreparedQuery, ScoreBreakdown, ScoringWeights,
    DEFAULT_MIN_SCORE,
};
