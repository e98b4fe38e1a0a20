//! Chat 모듈 - 매처를 감싸는 대화 계층
//!
//! - Session: 준비 상태 관리, 기본 응답, 대화 기록
//! - Format: 표시용 마크업 제거 / 자르기

mod format;
mod session;

// Re-exports
pub use format::{strip_markup, truncate_text};
pub use session::{ChatConfig, ChatSession, ChatTurn, Reply, ReplyKind};
