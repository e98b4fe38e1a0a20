//! 매칭 엔진 - 최고 점수 엔트리 선택
//!
//! 순수 계산만 수행합니다 (I/O 없음, 내부 상태 변경 없음).
//! 같은 입력에는 항상 같은 결과를 돌려줍니다.

use serde::Serialize;

use crate::error::Result;
use crate::knowledge::KnowledgeEntry;

use super::scoring::{score_entry, MatcherConfig, PreparedQuery, ScoreBreakdown};

/// 출처가 없는 엔트리에 붙는 표기
pub const DEFAULT_SOURCE: &str = "Knowledge Base";

// ============================================================================
// Types
// ============================================================================

/// 매칭 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// 엔트리 답변 (원문 그대로)
    pub answer: String,
    /// 출처 표기 (없으면 DEFAULT_SOURCE)
    pub source: String,
    /// 진단용 점수
    pub score: f64,
    /// 매칭된 질문
    pub question: String,
    pub category: Option<String>,
    pub last_updated: Option<String>,
    /// 컬렉션 내 위치
    pub index: usize,
}

impl MatchResult {
    fn from_entry(index: usize, entry: &KnowledgeEntry, score: f64) -> Self {
        Self {
            answer: entry.answer.clone(),
            source: entry.source_label().unwrap_or(DEFAULT_SOURCE).to_string(),
            score,
            question: entry.question.clone(),
            category: entry.category.clone(),
            last_updated: entry.last_updated.clone(),
            index,
        }
    }
}

/// 엔트리별 점수 상세 (explain 용)
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry {
    pub index: usize,
    pub question: String,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
    /// 임계값 통과 여부
    pub accepted: bool,
}

// ============================================================================
// Matcher
// ============================================================================

/// FAQ 매처
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// 설정 검증 후 생성
    pub fn try_new(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// 최고 점수 엔트리 찾기
    ///
    /// 빈 메시지나 빈 컬렉션이면 점수 계산 없이 `None`.
    /// 동점이면 먼저 나온 엔트리가 이깁니다.
    /// 최고 점수가 `min_score` 미만이면 `None`.
    pub fn find_best_match(
        &self,
        message: &str,
        entries: &[KnowledgeEntry],
    ) -> Option<MatchResult> {
        if message.trim().is_empty() || entries.is_empty() {
            return None;
        }

        let query = PreparedQuery::new(message);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;

        for (index, entry) in entries.iter().enumerate() {
            let score = score_entry(&query, entry, &self.config.weights).total();
            tracing::trace!("entry #{} score={:.2} q={:?}", index, score, entry.question);

            // 같은 점수로는 교체하지 않음
            let replace = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if replace {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;

        if !self.accepts(score) {
            tracing::debug!(
                "No match for {:?}: best score {:.2} < threshold {:.2}",
                message,
                score,
                self.config.min_score
            );
            return None;
        }

        tracing::debug!("Matched entry #{} (score={:.2})", index, score);
        Some(MatchResult::from_entry(index, &entries[index], score))
    }

    /// 임계값을 넘은 상위 N 개 (점수 내림차순, 동점은 원래 순서)
    pub fn rank(
        &self,
        message: &str,
        entries: &[KnowledgeEntry],
        limit: usize,
    ) -> Vec<MatchResult> {
        if message.trim().is_empty() || entries.is_empty() || limit == 0 {
            return Vec::new();
        }

        let query = PreparedQuery::new(message);
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, score_entry(&query, e, &self.config.weights).total()))
            .filter(|(_, score)| self.accepts(*score))
            .collect();

        // sort_by 는 안정 정렬
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(i, score)| MatchResult::from_entry(i, &entries[i], score))
            .collect()
    }

    /// 모든 엔트리의 점수 상세 (점수 내림차순)
    pub fn explain(&self, message: &str, entries: &[KnowledgeEntry]) -> Vec<ScoredEntry> {
        let query = PreparedQuery::new(message);

        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let breakdown = score_entry(&query, entry, &self.config.weights);
                let score = breakdown.total();
                ScoredEntry {
                    index,
                    question: entry.question.clone(),
                    breakdown,
                    score,
                    accepted: !query.is_empty() && self.accepts(score),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored
    }

    /// 임계값 통과 여부 (NaN 은 어느 쪽이든 탈락)
    fn accepts(&self, score: f64) -> bool {
        score >= self.config.min_score
    }

    /// 엔트리 하나의 총점
    pub fn score(&self, message: &str, entry: &KnowledgeEntry) -> f64 {
        score_entry(&PreparedQuery::new(message), entry, &self.config.weights).total()
    }
}

// ============================================================================
// Tests
// ============================================================================
