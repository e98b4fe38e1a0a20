//! Knowledge 모듈 - FAQ 지식베이스
//!
//! - Entry: FAQ 엔트리 타입 + JSON 문서 파싱
//! - Base: 로드된 컬렉션과 준비 상태 (NotReady / Ready)
//! - Source: 로컬 파일 / HTTP 로딩

mod base;
mod entry;
mod source;

// Re-exports
pub use base::{KnowledgeBase, KnowledgeState, KnowledgeStats};
pub use entry::{parse_entries, KnowledgeEntry};
pub use source::{
    default_kb_path, get_data_dir, load_from_location, resolve_location, source_from_location,
    FileSource, HttpSource, KnowledgeSource, DEFAULT_KB_FILE, KB_ENV_VAR,
};
