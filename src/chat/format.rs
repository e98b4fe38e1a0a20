//! 답변 표시용 포맷팅
//!
//! 엔진이 돌려준 답변 원문은 건드리지 않고, 터미널 출력용 사본만 만듭니다.

use std::sync::OnceLock;

use regex::Regex;

fn break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</li>").expect("valid regex"))
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<li[^>]*>").expect("valid regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

/// 간단한 HTML 마크업 제거
///
/// `<br>`, `</p>`, `</li>` 는 줄바꿈으로, `<li>` 는 `- ` 로 바꾸고
/// 나머지 태그는 지웁니다. 기본 엔티티 몇 개만 복원합니다.
pub fn strip_markup(text: &str) -> String {
    let text = break_re().replace_all(text, "\n");
    let text = list_item_re().replace_all(&text, "- ");
    let text = tag_re().replace_all(&text, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");

    blank_lines_re()
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

/// 텍스트 자르기 (UTF-8 안전)
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// ============================================================================
// Tests
// ============================================================================
