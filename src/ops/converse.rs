//! Interactive mood chat that ends in a saved diary entry.
//!
//! The loop drives a `ConversationSession`: pick a mood, chat, `/save` to get
//! a summary and keyword suggestions, pick keywords, and the entry is stored.
//! Errors from a single step are printed and the loop carries on.

use crate::ai::Generator;
use crate::constants::DEFAULT_AI_NAME;
use crate::diary_core::Mood;
use crate::errors::AppResult;
use crate::ops::{entries, settings, trash};
use crate::session::{AuxView, ConversationSession, PendingSummary};
use crate::store::DiaryStore;
use chrono::NaiveDateTime;
use std::io::{BufRead, Write};
use tracing::{debug, info};

const CMD_SAVE: &str = "/save";
const CMD_RESET: &str = "/reset";
const CMD_QUIT: &str = "/quit";
const CMD_EXIT: &str = "/exit";

const VIEW_COMMANDS: [(&str, AuxView); 4] = [
    ("/trash", AuxView::Trash),
    ("/calendar", AuxView::Calendar),
    ("/stats", AuxView::Statistics),
    ("/settings", AuxView::Settings),
];

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

enum MoodChoice {
    Mood(Mood),
    View(AuxView),
    Quit,
}

enum SaveOutcome {
    Saved,
    BackToChat,
    Reset,
    Quit,
}

/// Runs the chat loop until the user quits or input ends.
///
/// `clock` is read when an entry is confirmed so a long session gets the
/// time of saving, not the time it started.
///
/// # Errors
///
/// Only I/O errors on `input`/`output` end the loop early. Generator and
/// validation errors are shown to the user and the loop continues.
pub fn run_conversation<G, R, W, C>(
    store: &DiaryStore,
    session: &mut ConversationSession<G>,
    input: &mut R,
    output: &mut W,
    clock: C,
) -> AppResult<()>
where
    G: Generator,
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDateTime,
{
    info!("Starting conversation {}", session.id());
    print_banner(output)?;

    'mood: loop {
        let mood = match prompt_mood(input, output)? {
            MoodChoice::Mood(mood) => mood,
            MoodChoice::View(view) => {
                session.open_view(view);
                show_view(store, output, view, clock())?;
                session.close_view()?;
                continue;
            }
            MoodChoice::Quit => break,
        };

        let ai_name = store
            .settings()
            .map(|s| s.ai_name)
            .unwrap_or_else(|_| DEFAULT_AI_NAME.to_string());
        let greeting = session.select_mood(mood, &ai_name)?;
        writeln!(output, "\n{}: {}\n", ai_name, greeting)?;

        loop {
            write!(output, "나: ")?;
            output.flush()?;

            let line = match read_line(input)? {
                Some(line) => line,
                None => break 'mood,
            };

            match line.as_str() {
                "" => continue,
                CMD_QUIT | CMD_EXIT => break 'mood,
                CMD_RESET => {
                    session.reset();
                    writeln!(output, "\n대화를 지웠어요. 처음부터 다시 시작해요.\n")?;
                    continue 'mood;
                }
                CMD_SAVE => match save_flow(store, session, input, output, &clock)? {
                    SaveOutcome::Saved | SaveOutcome::Reset => continue 'mood,
                    SaveOutcome::BackToChat => continue,
                    SaveOutcome::Quit => break 'mood,
                },
                text => match session.submit(store, text) {
                    Ok(turn) => writeln!(output, "\n{}: {}\n", ai_name, turn.reply)?,
                    Err(e) => {
                        writeln!(output, "\n❌ {}", e)?;
                        if e.is_retryable() {
                            writeln!(output, "   같은 메시지를 다시 보내 주세요.\n")?;
                        }
                    }
                },
            }
        }
    }

    writeln!(output, "\n👋 오늘도 이야기 나눠줘서 고마워요.")?;
    debug!("Conversation used {} tokens", session.tokens_used());
    Ok(())
}

fn save_flow<G, R, W, C>(
    store: &DiaryStore,
    session: &mut ConversationSession<G>,
    input: &mut R,
    output: &mut W,
    clock: &C,
) -> AppResult<SaveOutcome>
where
    G: Generator,
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDateTime,
{
    writeln!(output, "\n📝 대화를 정리하고 있어요...")?;
    let pending = match session.request_save() {
        Ok(pending) => pending.clone(),
        Err(e) => {
            writeln!(output, "❌ {}\n", e)?;
            return Ok(SaveOutcome::BackToChat);
        }
    };
    print_pending(output, &pending)?;

    loop {
        write!(
            output,
            "키워드를 골라주세요 (번호 또는 직접 입력, 쉼표로 구분, {} 취소): ",
            CMD_RESET
        )?;
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(SaveOutcome::Quit),
        };
        if line == CMD_RESET {
            session.reset();
            writeln!(output, "\n저장하지 않고 대화를 지웠어요.\n")?;
            return Ok(SaveOutcome::Reset);
        }

        let selected = parse_keyword_selection(&line, &pending.suggested_keywords);
        match session.confirm(store, &selected, clock()) {
            Ok(saved) => {
                writeln!(output, "\n✅ 일기를 저장했어요 (#{})", saved.id)?;
                if let Some(streak) = saved.streak {
                    writeln!(output, "🔥 {}일 연속으로 기록하고 있어요!", streak)?;
                }
                writeln!(output)?;
                return Ok(SaveOutcome::Saved);
            }
            Err(e) => writeln!(output, "❌ {}", e)?,
        }
    }
}

/// Turns a keyword answer like `1, 3, 설렘` into keyword strings.
///
/// Numbers pick from `suggestions` (1-based); anything else is taken as a
/// user-written keyword. Out-of-range numbers are kept as text, which the
/// keyword rules will then reject as custom keywords.
pub fn parse_keyword_selection(input: &str, suggestions: &[String]) -> Vec<String> {
    input
        .split(|c| c == ',' || c == '，')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<usize>() {
            Ok(n) if n >= 1 && n <= suggestions.len() => suggestions[n - 1].clone(),
            _ => token.to_string(),
        })
        .collect()
}

fn print_banner<W: Write>(output: &mut W) -> AppResult<()> {
    writeln!(output, "\n🌙 mindtalk")?;
    writeln!(output, "{}", DIVIDER)?;
    writeln!(output, "오늘 하루를 함께 이야기해요.")?;
    writeln!(output)?;
    writeln!(output, "  • {}  대화를 정리해서 일기로 저장", CMD_SAVE)?;
    writeln!(output, "  • {} 대화를 지우고 다시 시작", CMD_RESET)?;
    writeln!(output, "  • {}  끝내기", CMD_QUIT)?;
    writeln!(output, "  • 기분을 고르기 전에: /calendar /stats /trash /settings")?;
    writeln!(output, "{}", DIVIDER)?;
    Ok(())
}

fn print_pending<W: Write>(output: &mut W, pending: &PendingSummary) -> AppResult<()> {
    writeln!(output, "\n{}", DIVIDER)?;
    writeln!(output, "요약: {}", pending.draft.summary)?;
    if !pending.draft.action_items.is_empty() {
        writeln!(output, "오늘의 제안:")?;
        for item in &pending.draft.action_items {
            writeln!(output, "  - {}", item)?;
        }
    }
    writeln!(output, "\n추천 감정 키워드:")?;
    for (i, keyword) in pending.suggested_keywords.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, keyword)?;
    }
    writeln!(output, "{}", DIVIDER)?;
    Ok(())
}

/// Asks until a valid mood or a view command is given.
fn prompt_mood<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<MoodChoice> {
    loop {
        write!(output, "\n오늘 기분은 어땠나요? ")?;
        for (i, mood) in Mood::ALL.iter().enumerate() {
            write!(output, "{}) {}  ", i + 1, mood.label())?;
        }
        write!(output, ": ")?;
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(MoodChoice::Quit),
        };
        if line == CMD_QUIT || line == CMD_EXIT {
            return Ok(MoodChoice::Quit);
        }
        if let Some((_, view)) = VIEW_COMMANDS.iter().find(|(cmd, _)| *cmd == line) {
            return Ok(MoodChoice::View(*view));
        }
        match line.parse::<Mood>() {
            Ok(mood) => return Ok(MoodChoice::Mood(mood)),
            Err(e) => writeln!(output, "❌ {}", e)?,
        }
    }
}

/// Prints a side view. Storage errors are shown, not propagated.
fn show_view<W: Write>(
    store: &DiaryStore,
    output: &mut W,
    view: AuxView,
    now: NaiveDateTime,
) -> AppResult<()> {
    writeln!(output)?;
    let shown = match view {
        AuxView::Trash => trash::list_trash(store, output, now),
        AuxView::Calendar => entries::list_entries(store, output),
        AuxView::Statistics => entries::show_stats(store, output)
            .and_then(|_| entries::show_streak(store, output, now.date())),
        AuxView::Settings => settings::show_settings(store, output),
    };
    if let Err(e) = shown {
        writeln!(output, "❌ {}", e)?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{ScriptedGenerator, SUMMARY_BLOCK};
    use chrono::NaiveDate;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, DiaryStore) {
        let dir = TempDir::new().unwrap();
        let store = DiaryStore::open(&dir.path().join("diary.db")).unwrap();
        (dir, store)
    }

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 12)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    fn run(store: &DiaryStore, generator: ScriptedGenerator, script: &str) -> String {
        let mut session = ConversationSession::new(generator);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run_conversation(store, &mut session, &mut input, &mut output, clock).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_keyword_selection() {
        let suggestions = strings(&["#기쁨", "#설렘", "#평온"]);
        assert_eq!(
            parse_keyword_selection("1, 3", &suggestions),
            strings(&["#기쁨", "#평온"])
        );
        assert_eq!(
            parse_keyword_selection("2,뿌듯함,", &suggestions),
            strings(&["#설렘", "뿌듯함"])
        );
        assert_eq!(parse_keyword_selection("9", &suggestions), strings(&["9"]));
        assert!(parse_keyword_selection("  ", &suggestions).is_empty());
    }

    #[test]
    fn test_chat_and_save_creates_entry() {
        let (_dir, store) = open_store();
        let generator = ScriptedGenerator::new()
            .reply("정말 좋았겠어요.", 10)
            .reply(SUMMARY_BLOCK, 30)
            .reply("#기쁨, #설렘, #뿌듯함", 20);

        let out = run(&store, generator, "1\n오늘 발표를 잘 끝냈어\n/save\n1,2\n/quit\n");

        assert!(out.contains("정말 좋았겠어요."));
        assert!(out.contains("일기를 저장했어요"));
        assert!(out.contains("1일 연속"));

        let entries = store.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, Mood::Good);
        assert_eq!(entries[0].keywords, strings(&["#기쁨", "#설렘"]));
        assert_eq!(entries[0].date, clock().date());
    }

    #[test]
    fn test_generation_error_is_shown_and_loop_continues() {
        let (_dir, store) = open_store();
        let generator = ScriptedGenerator::new().fail().reply("다시 말해줘서 고마워요.", 5);

        let out = run(&store, generator, "2\n안녕\n안녕\n");

        assert!(out.contains("❌"));
        assert!(out.contains("다시 말해줘서 고마워요."));
        assert!(store.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_save_without_messages_warns_and_stays_in_chat() {
        let (_dir, store) = open_store();
        let out = run(&store, ScriptedGenerator::new(), "3\n/save\n/quit\n");

        assert!(out.contains("❌"));
        assert!(store.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_keywords_can_be_retried() {
        let (_dir, store) = open_store();
        let generator = ScriptedGenerator::new()
            .reply("그랬군요.", 10)
            .reply(SUMMARY_BLOCK, 30)
            .reply("#기쁨, #설렘", 20);

        let out = run(&store, generator, "1\n좋았어\n/save\n\n하나,둘\n1\n");

        assert_eq!(out.matches("❌").count(), 2);
        assert_eq!(store.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_mood_asks_again_and_eof_exits() {
        let (_dir, store) = open_store();
        let out = run(&store, ScriptedGenerator::new(), "최고\n");

        assert!(out.contains("❌"));
        assert!(out.contains("고마워요"));
    }

    #[test]
    fn test_views_from_mood_prompt() {
        let (_dir, store) = open_store();
        store
            .create_entry(&crate::db::entries::tests::sample_entry(12, 9, "산책을 했다"))
            .unwrap();

        let out = run(&store, ScriptedGenerator::new(), "/calendar\n/stats\n/trash\n/settings\n");

        assert!(out.contains("산책을 했다"));
        assert!(out.contains("100.0%"));
        assert!(out.contains("휴지통이 비어 있어요"));
        assert!(out.contains("루나"));
    }

    #[test]
    fn test_reset_in_review_discards_draft() {
        let (_dir, store) = open_store();
        let generator = ScriptedGenerator::new()
            .reply("그랬군요.", 10)
            .reply(SUMMARY_BLOCK, 30)
            .reply("#기쁨", 20);

        let out = run(&store, generator, "1\n좋았어\n/save\n/reset\n/quit\n");

        assert!(out.contains("저장하지 않고"));
        assert!(store.list_entries().unwrap().is_empty());
    }
}
