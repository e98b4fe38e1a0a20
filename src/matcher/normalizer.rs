//! 텍스트 정규화 / 토큰화
//!
//! 모든 매칭은 이 모듈을 거친 문자열 위에서 이루어집니다.
//! - 소문자 변환
//! - `[a-z0-9_]` 와 공백 이외의 문자는 공백으로 치환
//! - 연속 공백 축약, 앞뒤 공백 제거
//!
//! 아포스트로피도 구두점으로 취급하므로 `don't` 는 `don`, `t` 두 토큰이
//! 됩니다. 짧은 조각(`t`)은 키워드 추출 단계에서 걸러집니다.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

// ============================================================================
// Stop Words
// ============================================================================

/// 키워드 추출에서 제외할 영어 기능어 목록 (관사, 전치사, 조동사, 대명사 등)
pub const STOP_WORDS: &[&str] = &[
    // 관사 / 한정사
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
    "all", "both", "either", "neither", "such", "other", "another",
    // 전치사
    "about", "above", "across", "after", "against", "along", "among", "around", "at",
    "before", "behind", "below", "beneath", "beside", "between", "beyond", "by", "down",
    "during", "except", "for", "from", "in", "inside", "into", "near", "of", "off", "on",
    "onto", "out", "outside", "over", "since", "through", "throughout", "till", "to",
    "toward", "towards", "under", "until", "up", "upon", "via", "with", "within", "without",
    // 접속사
    "and", "but", "or", "nor", "so", "yet", "if", "then", "than", "because", "while",
    "although", "though", "whether", "as",
    // 조동사 / be 동사
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "doing",
    "done", "have", "has", "had", "having", "can", "could", "will", "would", "shall",
    "should", "may", "might", "must", "ought",
    // 대명사
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves",
    "he", "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself",
    "we", "us", "our", "ours", "ourselves", "they", "them", "their", "theirs",
    "themselves",
    // 의문사
    "what", "which", "who", "whom", "whose", "when", "where", "why", "how",
    // 기타 빈출어
    "not", "no", "yes", "also", "just", "only", "very", "too", "there", "here", "please",
    "tell", "know", "get", "got",
];

/// 키워드로 인정하는 최소 길이 (이 길이 이하는 제외)
pub const MIN_KEYWORD_LEN: usize = 2;

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_\s]").expect("valid regex"))
}

// ============================================================================
// Normalization
// ============================================================================

/// 텍스트 정규화
///
/// 빈 문자열이나 공백만 있는 입력은 빈 문자열이 됩니다.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let replaced = non_word_re().replace_all(&lowered, " ");

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 정규화 후 공백 기준 토큰 분리
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// 불용어 여부
pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// 키워드 추출 (길이 2 이하 / 불용어 제거, 순서 유지)
pub fn extract_keywords(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() > MIN_KEYWORD_LEN && !is_stop_word(t))
        .collect()
}

/// 키워드 집합 (중복 제거)
pub fn keyword_set(text: &str) -> HashSet<String> {
    extract_keywords(text).into_iter().collect()
}

/// 정규화된 문자열 간 부분 문자열 포함 여부
///
/// 두 인자 모두 이미 정규화된 문자열이어야 합니다. 토큰 경계는 보지 않으므로
/// `"pricing plan"` 은 `"what pricing plans exist"` 에 포함됩니다.
/// 빈 문자열은 어디에도 포함되지 않습니다.
pub fn contains_text(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && !haystack.is_empty() && haystack.contains(needle)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("What is Twin Health?"), "what is twin health");
        assert_eq!(normalize("  Hello,   WORLD!!  "), "hello world");
        assert_eq!(normalize("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n "), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_normalize_non_ascii_becomes_space() {
        assert_eq!(normalize("café au lait"), "caf au lait");
        assert_eq!(normalize("a—b"), "a b");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize("Can I cancel my <b>subscription</b>?");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_tokenize_contractions_split() {
        assert_eq!(tokenize("Don't stop"), vec!["don", "t", "stop"]);
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = extract_keywords("What is the cost of the Twin program?");
        assert_eq!(keywords, vec!["cost", "twin", "program"]);
    }

    #[test]
    fn test_extract_keywords_drops_short_tokens() {
        assert!(extract_keywords("an ox is ok").is_empty());
        assert_eq!(extract_keywords("Don't worry"), vec!["don", "worry"]);
    }

    #[test]
    fn test_stop_words_are_normalized() {
        for word in STOP_WORDS {
            assert_eq!(normalize(word), *word, "stop word must be pre-normalized");
        }
    }

    #[test]
    fn test_contains_text_substring() {
        assert!(contains_text("what are the pricing plans", "pricing plans"));
        assert!(contains_text("twin health", "twin health"));
        assert!(contains_text("what pricing plans exist", "pricing plan"));
        assert!(contains_text("pricing plans", "plan"));
        assert!(!contains_text("pricing plans", "plans pricing"));
    }

    #[test]
    fn test_contains_text_empty_never_matches() {
        assert!(!contains_text("pricing", ""));
        assert!(!contains_text("", "pricing"));
        assert!(!contains_text("", ""));
    }
}
