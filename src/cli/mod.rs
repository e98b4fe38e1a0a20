//! CLI 모듈
//!
//! faq-chat CLI 명령어 정의 및 구현

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::{truncate_text, ChatConfig, ChatSession, ReplyKind};
use crate::knowledge::{get_data_dir, load_from_location, resolve_location, KnowledgeBase};
use crate::matcher::{Matcher, MatcherConfig};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "faq-chat")]
#[command(version, about = "FAQ 매칭 챗봇", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// 공통 옵션
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// 지식베이스 위치 (파일 경로 또는 http(s) URL, 기본: $FAQ_CHAT_KB)
    #[arg(long, global = true)]
    pub kb: Option<String>,

    /// 매처 설정 JSON 파일 (가중치 / 임계값)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 매칭 임계값 덮어쓰기
    #[arg(long, global = true)]
    pub threshold: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 질문 하나에 답변
    Ask {
        /// 사용자 메시지
        message: String,

        /// JSON 으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 대화형 채팅 (/quit 로 종료)
    Chat {
        /// 종료 시 대화 기록 저장 경로
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// 엔트리별 점수 상세
    Explain {
        /// 사용자 메시지
        message: String,

        /// 결과 개수 제한
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// 임계값을 넘은 후보 목록
    Suggest {
        /// 사용자 메시지
        message: String,

        /// 결과 개수 제한
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// 엔트리 목록
    List {
        /// 카테고리 필터
        #[arg(short, long)]
        category: Option<String>,

        /// 결과 개수 제한
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let options = cli.options;

    match cli.command {
        Commands::Ask { message, json } => cmd_ask(&options, &message, json).await,
        Commands::Chat { save } => cmd_chat(&options, save).await,
        Commands::Explain { message, limit } => cmd_explain(&options, &message, limit).await,
        Commands::Suggest { message, limit } => cmd_suggest(&options, &message, limit).await,
        Commands::List { category, limit } => cmd_list(&options, category, limit).await,
        Commands::Status => cmd_status(&options).await,
    }
}

// ============================================================================
// Setup Helpers
// ============================================================================

/// 옵션으로 매처 생성
fn build_matcher(options: &GlobalOptions) -> Result<Matcher> {
    let mut config = match options.config {
        Some(ref path) => MatcherConfig::from_file(path)
            .with_context(|| format!("매처 설정 로드 실패: {}", path.display()))?,
        None => MatcherConfig::default(),
    };

    if let Some(threshold) = options.threshold {
        config = config.with_min_score(threshold);
    }

    Matcher::try_new(config).context("잘못된 매처 설정")
}

/// 지식베이스 로드 (실패 시 에러)
async fn load_knowledge(options: &GlobalOptions) -> Result<KnowledgeBase> {
    let location = resolve_location(options.kb.as_deref());

    load_from_location(&location)
        .await
        .with_context(|| format!("지식베이스 로드 실패: {}", location))
}

/// 채팅 세션 준비
///
/// 로드 실패 시 경고만 출력하고 NotReady 세션을 돌려줍니다.
async fn open_session(options: &GlobalOptions) -> Result<ChatSession> {
    let matcher = build_matcher(options)?;
    let mut session = ChatSession::new(matcher, ChatConfig::default());

    match load_knowledge(options).await {
        Ok(kb) => session.set_knowledge(kb),
        Err(e) => {
            tracing::warn!("Knowledge base unavailable: {:#}", e);
            eprintln!("[!] {:#}", e);
        }
    }

    Ok(session)
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 단일 질문 명령어 (ask)
async fn cmd_ask(options: &GlobalOptions, message: &str, json: bool) -> Result<()> {
    let session = open_session(options).await?;
    let reply = session.respond(message);

    if json {
        let out = serde_json::to_string_pretty(&reply).context("JSON 직렬화 실패")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", reply.text);

    if let Some(ref matched) = reply.matched {
        tracing::debug!("matched #{} score={:.2}", matched.index, matched.score);
    }

    Ok(())
}

/// 대화형 채팅 명령어 (chat)
async fn cmd_chat(options: &GlobalOptions, save: Option<PathBuf>) -> Result<()> {
    let mut session = open_session(options).await?;

    match session.state().base() {
        Some(kb) => println!("[OK] 지식베이스: {} ({} 건)", kb.origin(), kb.len()),
        None => println!("[!] 지식베이스가 준비되지 않았습니다."),
    }
    println!("    /quit 종료, /clear 기록 삭제, /history 기록 보기\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().context("stdout flush 실패")?;

        let Some(line) = lines.next_line().await.context("입력 읽기 실패")? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear_history();
                println!("[OK] 기록 삭제됨\n");
                continue;
            }
            "/history" => {
                for (i, turn) in session.history().iter().enumerate() {
                    println!("  {}. {} -> {}", i + 1, turn.user, truncate_text(&turn.reply, 60));
                }
                println!();
                continue;
            }
            _ => {}
        }

        let reply = session.reply(line);
        let marker = match reply.kind {
            ReplyKind::Answer => "bot",
            ReplyKind::Fallback => "bot?",
            ReplyKind::NotReady => "bot!",
        };
        println!("[{}] {}\n", marker, reply.text);
    }

    if let Some(ref path) = save {
        session
            .save_transcript(path)
            .await
            .context("대화 기록 저장 실패")?;
        println!("[OK] 대화 기록 저장: {}", path.display());
    }

    Ok(())
}

/// 점수 상세 명령어 (explain)
async fn cmd_explain(options: &GlobalOptions, message: &str, limit: usize) -> Result<()> {
    let matcher = build_matcher(options)?;
    let kb = load_knowledge(options).await?;

    let explained = matcher.explain(message, kb.entries());
    let threshold = matcher.config().min_score;

    println!("[*] \"{}\" (임계값 {:.2})\n", message, threshold);

    for scored in explained.iter().take(limit) {
        let b = &scored.breakdown;
        println!(
            "  #{:<4} [{}] {:>7.2}  {}",
            scored.index,
            if scored.accepted { "OK" } else { "--" },
            scored.score,
            truncate_text(&scored.question, 60)
        );
        println!(
            "        포함 {:.0} | 태그 {:.0} | 카테고리 {:.0} | 질문 {:.0} | 답변 {:.0} | 출처 {:.2}",
            b.containment, b.tags, b.category, b.question_overlap, b.answer_overlap, b.source_bonus
        );
    }

    if explained.is_empty() {
        println!("[!] 엔트리가 없습니다.");
    }

    Ok(())
}

/// 후보 목록 명령어 (suggest)
async fn cmd_suggest(options: &GlobalOptions, message: &str, limit: usize) -> Result<()> {
    let matcher = build_matcher(options)?;
    let kb = load_knowledge(options).await?;

    let ranked = matcher.rank(message, kb.entries(), limit);

    if ranked.is_empty() {
        println!("[!] 임계값을 넘은 후보가 없습니다.");
        return Ok(());
    }

    println!("[OK] 후보 ({} 건):\n", ranked.len());
    for (i, result) in ranked.iter().enumerate() {
        println!("{}. [점수: {:.2}] {}", i + 1, result.score, result.question);
        println!("   출처: {}", result.source);
        println!("   답변: {}", truncate_text(&crate::chat::strip_markup(&result.answer), 120));
        println!();
    }

    Ok(())
}

/// 목록 명령어 (list)
async fn cmd_list(options: &GlobalOptions, category: Option<String>, limit: usize) -> Result<()> {
    let kb = load_knowledge(options).await?;

    let entries: Vec<_> = match category {
        Some(ref c) => kb.by_category(c).take(limit).collect(),
        None => kb.entries().iter().take(limit).collect(),
    };

    if entries.is_empty() {
        println!("[!] 엔트리가 없습니다.");
        return Ok(());
    }

    println!("[OK] 엔트리 ({} / {} 건):\n", entries.len(), kb.len());

    for entry in entries {
        let cat = entry.category_label().unwrap_or("-");
        println!("  [{}] {}", cat, truncate_text(&entry.question, 70));
        if !entry.tags.is_empty() {
            println!("        태그: {}", entry.tags.join(", "));
        }
        if let Some(source) = entry.source_label() {
            println!("        출처: {}", source);
        }
    }

    Ok(())
}

/// 상태 명령어 (status)
async fn cmd_status(options: &GlobalOptions) -> Result<()> {
    println!("faq-chat v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("[*] 데이터 디렉토리: {}", get_data_dir().display());
    println!("[*] 지식베이스 위치: {}", resolve_location(options.kb.as_deref()));

    match build_matcher(options) {
        Ok(matcher) => println!("[OK] 매칭 임계값: {:.2}", matcher.config().min_score),
        Err(e) => println!("[!] 매처 설정 오류: {:#}", e),
    }

    match load_knowledge(options).await {
        Ok(kb) => {
            let stats = kb.stats();
            println!("[OK] 엔트리: {} 건", stats.entry_count);
            println!(
                "     태그 있음: {}, 출처 있음: {}",
                stats.tagged_count, stats.attributed_count
            );
            for (category, count) in &stats.categories {
                println!("     - {}: {}", category, count);
            }
            println!("     로드 시각: {}", kb.loaded_at().format("%Y-%m-%d %H:%M:%S"));
        }
        Err(e) => {
            println!("[!] {:#}", e);
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from([
            "faq-chat",
            "ask",
            "What is Twin Health?",
            "--kb",
            "kb.json",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.options.kb.as_deref(), Some("kb.json"));
        match cli.command {
            Commands::Ask { message, json } => {
                assert_eq!(message, "What is Twin Health?");
                assert!(json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_cli_global_threshold() {
        let cli = Cli::try_parse_from(["faq-chat", "--threshold", "12.5", "status"]).unwrap();
        assert_eq!(cli.options.threshold, Some(12.5));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_build_matcher_threshold_override() {
        let options = GlobalOptions {
            threshold: Some(20.0),
            ..Default::default()
        };
        let matcher = build_matcher(&options).unwrap();
        assert_eq!(matcher.config().min_score, 20.0);

        let options = GlobalOptions {
            threshold: Some(-1.0),
            ..Default::default()
        };
        assert!(build_matcher(&options).is_err());
    }

    #[tokio::test]
    async fn test_open_session_missing_kb_is_not_ready() {
        let options = GlobalOptions {
            kb: Some("/nonexistent/faq-chat/kb.json".to_string()),
            ..Default::default()
        };
        let session = open_session(&options).await.unwrap();
        assert!(!session.state().is_ready());
        assert_eq!(session.respond("anything").kind, ReplyKind::NotReady);
    }

    #[tokio::test]
    async fn test_open_session_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"[{ "question": "What is Twin Health?", "answer": "A platform.", "source": "FAQ" }]"#,
        )
        .unwrap();

        let options = GlobalOptions {
            kb: Some(path.display().to_string()),
            ..Default::default()
        };
        let session = open_session(&options).await.unwrap();
        let reply = session.respond("twin health");
        assert_eq!(reply.kind, ReplyKind::Answer);
        assert_eq!(reply.matched.unwrap().source, "FAQ");
    }
}
