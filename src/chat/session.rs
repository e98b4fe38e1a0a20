//! 채팅 세션 - 매처 호출과 기본 응답 처리
//!
//! 세션은 매처 설정과 지식베이스 준비 상태를 명시적으로 들고 있습니다.
//! 매칭 실패(`None`)를 기본 응답으로 바꾸는 것은 이 계층의 책임입니다.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FaqError, Result};
use crate::knowledge::{KnowledgeBase, KnowledgeState};
use crate::matcher::{MatchResult, Matcher};

use super::format::strip_markup;

// ============================================================================
// Configuration
// ============================================================================

/// 채팅 응답 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 매칭 실패 시 응답
    pub default_response: String,
    /// 지식베이스 준비 전 응답
    pub not_ready_response: String,
    /// 답변 아래에 출처 표기
    pub show_source: bool,
    /// 표시용 답변에서 마크업 제거
    pub strip_markup: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_response: "I'm sorry, I couldn't find an answer to that. \
                               Try rephrasing your question or ask about a specific topic."
                .to_string(),
            not_ready_response: "The knowledge base is still loading. Please try again in a moment."
                .to_string(),
            show_source: true,
            strip_markup: true,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// 응답 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// 엔트리 매칭 성공
    Answer,
    /// 매칭 실패 / 빈 입력
    Fallback,
    /// 지식베이스 미준비
    NotReady,
}

/// 사용자 메시지에 대한 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    /// 표시용 텍스트
    pub text: String,
    /// 매칭 결과 (Answer 일 때만)
    pub matched: Option<MatchResult>,
}

/// 대화 기록 한 턴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub reply: String,
    pub kind: ReplyKind,
    pub source: Option<String>,
    pub score: Option<f64>,
    pub at: DateTime<Utc>,
}

// ============================================================================
// ChatSession
// ============================================================================

/// 채팅 세션
#[derive(Debug, Clone)]
pub struct ChatSession {
    matcher: Matcher,
    state: KnowledgeState,
    config: ChatConfig,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    /// 지식베이스 없이 생성 (NotReady)
    pub fn new(matcher: Matcher, config: ChatConfig) -> Self {
        Self {
            matcher,
            state: KnowledgeState::NotReady,
            config,
            history: Vec::new(),
        }
    }

    /// 로드된 지식베이스로 생성
    pub fn with_knowledge(matcher: Matcher, config: ChatConfig, kb: KnowledgeBase) -> Self {
        let mut session = Self::new(matcher, config);
        session.set_knowledge(kb);
        session
    }

    /// 지식베이스 교체 (NotReady -> Ready)
    pub fn set_knowledge(&mut self, kb: KnowledgeBase) {
        tracing::debug!("Session knowledge ready: {} entries", kb.len());
        self.state = KnowledgeState::Ready(kb);
    }

    pub fn state(&self) -> &KnowledgeState {
        &self.state
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// 기록 없이 응답만 계산
    pub fn respond(&self, message: &str) -> Reply {
        if !self.state.is_ready() {
            return Reply {
                kind: ReplyKind::NotReady,
                text: self.config.not_ready_response.clone(),
                matched: None,
            };
        }

        match self.matcher.find_best_match(message, self.state.entries()) {
            Some(result) => Reply {
                kind: ReplyKind::Answer,
                text: self.format_answer(&result),
                matched: Some(result),
            },
            None => Reply {
                kind: ReplyKind::Fallback,
                text: self.config.default_response.clone(),
                matched: None,
            },
        }
    }

    /// 응답 계산 후 대화 기록에 추가
    pub fn reply(&mut self, message: &str) -> Reply {
        let reply = self.respond(message);

        self.history.push(ChatTurn {
            user: message.to_string(),
            reply: reply.text.clone(),
            kind: reply.kind,
            source: reply.matched.as_ref().map(|m| m.source.clone()),
            score: reply.matched.as_ref().map(|m| m.score),
            at: Utc::now(),
        });

        reply
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// 대화 기록을 JSON 으로 저장
    pub async fn save_transcript(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.history)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FaqError::io(parent, e))?;
            }
        }

        tokio::fs::write(path, json)
            .await
            .map_err(|e| FaqError::io(path, e))?;

        tracing::info!("Saved transcript ({} turns) to {:?}", self.history.len(), path);
        Ok(())
    }

    /// 표시용 답변 텍스트
    fn format_answer(&self, result: &MatchResult) -> String {
        let mut text = if self.config.strip_markup {
            strip_markup(&result.answer)
        } else {
            result.answer.clone()
        };

        if self.config.show_source {
            text.push_str("\n\nSource: ");
            text.push_str(&result.source);
            if let Some(updated) = result.last_updated.as_deref().filter(|s| !s.trim().is_empty()) {
                text.push_str(&format!(" (updated {})", updated.trim()));
            }
        }

        text
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;

    fn kb() -> KnowledgeBase {
        let mut entry = KnowledgeEntry::new(
            "What is Twin Health?",
            "<b>Twin Health</b> is a metabolic care platform.",
        )
        .with_tags(["twin health", "overview"])
        .with_source("FAQ");
        entry.last_updated = Some("2024-05-01".to_string());

        KnowledgeBase::new(
            vec![entry, KnowledgeEntry::new("How do I log in?", "Use the app.")],
            "memory",
        )
    }

    #[test]
    fn test_not_ready_reply() {
        let session = ChatSession::new(Matcher::default(), ChatConfig::default());
        let reply = session.respond("What is Twin Health?");

        assert_eq!(reply.kind, ReplyKind::NotReady);
        assert_eq!(reply.text, ChatConfig::default().not_ready_response);
        assert!(reply.matched.is_none());
    }

    #[test]
    fn test_answer_with_source() {
        let session = ChatSession::with_knowledge(Matcher::default(), ChatConfig::default(), kb());
        let reply = session.respond("What is Twin Health?");

        assert_eq!(reply.kind, ReplyKind::Answer);
        assert_eq!(
            reply.text,
            "Twin Health is a metabolic care platform.\n\nSource: FAQ (updated 2024-05-01)"
        );

        // 매칭 결과의 답변은 원문 그대로
        let matched = reply.matched.unwrap();
        assert_eq!(matched.answer, "<b>Twin Health</b> is a metabolic care platform.");
    }

    #[test]
    fn test_answer_without_formatting() {
        let config = ChatConfig {
            show_source: false,
            strip_markup: false,
            ..Default::default()
        };
        let session = ChatSession::with_knowledge(Matcher::default(), config, kb());
        let reply = session.respond("twin health");
        assert_eq!(reply.text, "<b>Twin Health</b> is a metabolic care platform.");
    }

    #[test]
    fn test_fallback_reply() {
        let session = ChatSession::with_knowledge(Matcher::default(), ChatConfig::default(), kb());

        let reply = session.respond("pizza recipe");
        assert_eq!(reply.kind, ReplyKind::Fallback);
        assert_eq!(reply.text, ChatConfig::default().default_response);

        let reply = session.respond("   ");
        assert_eq!(reply.kind, ReplyKind::Fallback);
    }

    #[test]
    fn test_set_knowledge_makes_ready() {
        let mut session = ChatSession::new(Matcher::default(), ChatConfig::default());
        assert!(!session.state().is_ready());

        session.set_knowledge(kb());
        assert!(session.state().is_ready());
        assert_eq!(session.respond("twin health").kind, ReplyKind::Answer);
    }

    #[test]
    fn test_history_recorded() {
        let mut session =
            ChatSession::with_knowledge(Matcher::default(), ChatConfig::default(), kb());
        session.reply("twin health");
        session.reply("pizza recipe");

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, ReplyKind::Answer);
        assert_eq!(history[0].source.as_deref(), Some("FAQ"));
        assert!(history[0].score.is_some());
        assert_eq!(history[1].kind, ReplyKind::Fallback);
        assert!(history[1].source.is_none());

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_save_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("transcript.json");

        let mut session =
            ChatSession::with_knowledge(Matcher::default(), ChatConfig::default(), kb());
        session.reply("twin health");
        session.save_transcript(&path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let turns: Vec<ChatTurn> = serde_json::from_str(&raw).unwrap();
        assert_eq!(turns, session.history());
    }
}
