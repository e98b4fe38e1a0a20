//! 스코어링 - 가중치 테이블과 엔트리별 점수 계산
//!
//! 가중치와 임계값은 함께 보정된 하나의 테이블입니다.
//! 한쪽만 바꾸면 보정이 깨지므로 `MatcherConfig` 로 묶어서 다룹니다.
//!
//! | 항목                | 기본값 |
//! |---------------------|--------|
//! | containment_bonus   | 100.0  |
//! | tag_match           | 10.0   |
//! | tag_keyword         | 2.0    |
//! | category_match      | 5.0    |
//! | category_keyword    | 1.0    |
//! | question_token      | 3.0    |
//! | answer_token        | 1.0    |
//! | source_epsilon      | 0.01   |
//! | min_score           | 6.0    |
//!
//! epsilon 을 제외한 가중치는 모두 정수여야 합니다 (`validate` 에서 강제).
//! 따라서 실제 점수 차이는 최소 1.0 이고, 1 미만인 출처 보너스는
//! 동점 처리에만 영향을 줍니다.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FaqError, Result};
use crate::knowledge::KnowledgeEntry;

use super::normalizer::{contains_text, keyword_set, normalize};

// ============================================================================
// Configuration
// ============================================================================

/// 필드별 가중치
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// 메시지 ⊂ 질문 (또는 역방향) 일 때의 보너스
    pub containment_bonus: f64,
    /// 태그 구문이 메시지에 포함될 때 (태그당)
    pub tag_match: f64,
    /// 태그와 공유하는 키워드당 부분 점수
    pub tag_keyword: f64,
    /// 카테고리 구문이 메시지에 포함될 때
    pub category_match: f64,
    /// 카테고리와 공유하는 키워드당 부분 점수
    pub category_keyword: f64,
    /// 질문과 겹치는 메시지 키워드당
    pub question_token: f64,
    /// 답변과 겹치는 메시지 키워드당
    pub answer_token: f64,
    /// 출처가 있는 엔트리 동점 처리용
    pub source_epsilon: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            containment_bonus: 100.0,
            tag_match: 10.0,
            tag_keyword: 2.0,
            category_match: 5.0,
            category_keyword: 1.0,
            question_token: 3.0,
            answer_token: 1.0,
            source_epsilon: 0.01,
        }
    }
}

/// 기본 임계값
pub const DEFAULT_MIN_SCORE: f64 = 6.0;

/// 매처 설정 (가중치 + 임계값)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub weights: ScoringWeights,
    /// 매칭으로 인정하는 최소 점수 (이상이면 통과)
    pub min_score: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl MatcherConfig {
    /// 임계값만 바꾼 설정
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// JSON 설정 파일 로드 (누락된 항목은 기본값)
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| FaqError::io(path, e))?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!("Loaded matcher config from {:?}", path);
        Ok(config)
    }

    /// 가중치/임계값 검증
    ///
    /// 모든 값은 유한한 0 이상의 수여야 합니다. 출처 보너스가 0 보다 크면
    /// 나머지 가중치는 정수, 출처 보너스는 1 미만이어야 합니다.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let named = [
            ("containment_bonus", w.containment_bonus),
            ("tag_match", w.tag_match),
            ("tag_keyword", w.tag_keyword),
            ("category_match", w.category_match),
            ("category_keyword", w.category_keyword),
            ("question_token", w.question_token),
            ("answer_token", w.answer_token),
            ("source_epsilon", w.source_epsilon),
            ("min_score", self.min_score),
        ];

        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(FaqError::InvalidConfig(format!(
                    "{} must be a finite non-negative number (got {})",
                    name, value
                )));
            }
        }

        if w.source_epsilon > 0.0 {
            // 정수 가중치끼리의 합은 최소 1.0 차이가 나므로 epsilon 이 뒤집을 수 없음
            if let Some((name, value)) = named[..7].iter().find(|(_, v)| v.fract() != 0.0) {
                return Err(FaqError::InvalidConfig(format!(
                    "{} must be a whole number when source_epsilon is set (got {})",
                    name, value
                )));
            }

            if w.source_epsilon >= 1.0 {
                return Err(FaqError::InvalidConfig(format!(
                    "source_epsilon must be smaller than 1.0 (got {})",
                    w.source_epsilon
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Prepared Query
// ============================================================================

/// 한 번 정규화해 두고 모든 엔트리에 재사용하는 질의
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub normalized: String,
    pub keywords: HashSet<String>,
}

impl PreparedQuery {
    pub fn new(message: &str) -> Self {
        Self {
            normalized: normalize(message),
            keywords: keyword_set(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

// ============================================================================
// Score Breakdown
// ============================================================================

/// 항목별 점수 (진단용)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub containment: f64,
    pub tags: f64,
    pub category: f64,
    pub question_overlap: f64,
    pub answer_overlap: f64,
    pub source_bonus: f64,
}

impl ScoreBreakdown {
    /// 총점 (항상 같은 순서로 합산)
    pub fn total(&self) -> f64 {
        self.containment
            + self.tags
            + self.category
            + self.question_overlap
            + self.answer_overlap
            + self.source_bonus
    }
}

/// 엔트리 하나의 점수 계산
pub fn score_entry(
    query: &PreparedQuery,
    entry: &KnowledgeEntry,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    if query.is_empty() {
        return breakdown;
    }

    // 1. 질문 전체 포함
    let question_norm = normalize(&entry.question);
    let question_keywords = keyword_set(&entry.question);
    if question_contains(query, &question_norm) {
        breakdown.containment = weights.containment_bonus;
    }

    // 2. 태그
    for tag in &entry.tags {
        breakdown.tags += field_score(query, tag, weights.tag_match, weights.tag_keyword);
    }

    // 3. 카테고리
    if let Some(ref category) = entry.category {
        breakdown.category = field_score(
            query,
            category,
            weights.category_match,
            weights.category_keyword,
        );
    }

    // 4. 질문 토큰 겹침
    breakdown.question_overlap =
        overlap_count(&query.keywords, &question_keywords) as f64 * weights.question_token;

    // 5. 답변 토큰 겹침
    let answer_keywords = keyword_set(&entry.answer);
    breakdown.answer_overlap =
        overlap_count(&query.keywords, &answer_keywords) as f64 * weights.answer_token;

    // 6. 출처 동점 처리
    if entry.has_source() {
        breakdown.source_bonus = weights.source_epsilon;
    }

    breakdown
}

/// 메시지 ⊂ 질문 또는 질문 ⊂ 메시지 (정규화 문자열의 부분 문자열)
fn question_contains(query: &PreparedQuery, question_norm: &str) -> bool {
    contains_text(question_norm, &query.normalized)
        || contains_text(&query.normalized, question_norm)
}

/// 태그/카테고리 공통 점수: 메시지가 필드를 포함하면 전체 가중치, 아니면 키워드 부분 점수
fn field_score(query: &PreparedQuery, field: &str, full: f64, per_keyword: f64) -> f64 {
    let field_norm = normalize(field);
    if field_norm.is_empty() {
        return 0.0;
    }
    if contains_text(&query.normalized, &field_norm) {
        return full;
    }

    let field_keywords = keyword_set(field);
    overlap_count(&query.keywords, &field_keywords) as f64 * per_keyword
}

fn overlap_count(query_keywords: &HashSet<String>, field_keywords: &HashSet<String>) -> usize {
    query_keywords
        .iter()
        .filter(|k| field_keywords.contains(*k))
        .count()
}

// ============================================================================
// Tests
// ============================================================================
