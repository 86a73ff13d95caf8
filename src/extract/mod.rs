//! Extraction of structured diary fields from free-form generator output.
//!
//! Generator phrasing is not guaranteed, so these parsers never fail. Whatever
//! cannot be recognised is replaced by a fixed default and the caller is told
//! that a default was used.

use crate::constants::{
    DEFAULT_ACTION_ITEM, DEFAULT_KEYWORD, DEFAULT_SUMMARY, FILLER_KEYWORDS, LABEL_ACTION_ITEMS,
    LABEL_KEYWORDS, LABEL_SUMMARY, MAX_ACTION_ITEMS, MAX_EXTRACTED_KEYWORDS,
    SUGGESTED_KEYWORD_COUNT,
};
use crate::diary_core::{normalize_keyword, Mood};
use tracing::debug;

/// Summary, keywords and advice pulled out of a labeled block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDraft {
    pub summary: String,
    /// At most five hashtag keywords.
    pub keywords: Vec<String>,
    /// At most three advice lines.
    pub action_items: Vec<String>,
    /// True when at least one field fell back to its default.
    pub defaulted: bool,
}

impl SummaryDraft {
    /// The draft used when nothing could be extracted.
    pub fn fallback() -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
            keywords: vec![DEFAULT_KEYWORD.to_string()],
            action_items: vec![DEFAULT_ACTION_ITEM.to_string()],
            defaulted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Keywords,
    ActionItems,
}

/// Returns the section a line opens and the text following its label.
fn split_label(line: &str) -> Option<(Section, &str)> {
    let bare = line.trim_start_matches('*').trim_start();
    [
        (LABEL_SUMMARY, Section::Summary),
        (LABEL_KEYWORDS, Section::Keywords),
        (LABEL_ACTION_ITEMS, Section::ActionItems),
    ]
    .iter()
    .find_map(|(label, section)| {
        bare.strip_prefix(*label)
            .map(|rest| (*section, rest.trim_start_matches('*').trim()))
    })
}

fn strip_bullet(line: &str) -> Option<&str> {
    ['-', '•', '*']
        .iter()
        .find_map(|bullet| line.strip_prefix(*bullet))
        .map(str::trim)
}

fn split_keywords(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',').filter_map(normalize_keyword)
}

/// Parses a `요약:` / `감정키워드:` / `액션아이템:` block.
///
/// Lines are read one at a time. A label switches the current section; a
/// summary or keyword label also consumes the rest of its own line. While the
/// advice section is open, bulleted lines become action items. Anything else
/// is ignored. Missing fields get defaults; lists are capped.
///
/// # Examples
///
/// ```
/// use mindtalk::extract::extract_summary;
///
/// let draft = extract_summary("요약: 오늘은 좋았다\n감정키워드: #기쁨, #평온\n액션아이템:\n- 잘했어요\n- 고생했어요");
/// assert_eq!(draft.summary, "오늘은 좋았다");
/// assert_eq!(draft.keywords, vec!["#기쁨", "#평온"]);
/// assert_eq!(draft.action_items, vec!["잘했어요", "고생했어요"]);
/// assert!(!draft.defaulted);
/// ```
pub fn extract_summary(text: &str) -> SummaryDraft {
    let mut summary = String::new();
    let mut keywords: Vec<String> = Vec::new();
    let mut action_items: Vec<String> = Vec::new();
    let mut section: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some((opened, rest)) = split_label(line) {
            section = Some(opened);
            match opened {
                Section::Summary => summary = rest.to_string(),
                Section::Keywords => keywords = split_keywords(rest).collect(),
                Section::ActionItems => {
                    if let Some(item) = strip_bullet(rest).or(Some(rest)).filter(|i| !i.is_empty()) {
                        action_items.push(item.to_string());
                    }
                }
            }
            continue;
        }

        match section {
            Some(Section::Summary) if summary.is_empty() => summary = line.to_string(),
            Some(Section::ActionItems) => {
                if let Some(item) = strip_bullet(line).filter(|i| !i.is_empty()) {
                    action_items.push(item.to_string());
                }
            }
            _ => {}
        }
    }

    let mut defaulted = false;
    if summary.is_empty() {
        summary = DEFAULT_SUMMARY.to_string();
        defaulted = true;
    }
    if keywords.is_empty() {
        keywords.push(DEFAULT_KEYWORD.to_string());
        defaulted = true;
    }
    if action_items.is_empty() {
        action_items.push(DEFAULT_ACTION_ITEM.to_string());
        defaulted = true;
    }
    keywords.truncate(MAX_EXTRACTED_KEYWORDS);
    action_items.truncate(MAX_ACTION_ITEMS);

    if defaulted {
        debug!("Summary block incomplete, defaults applied");
    }

    SummaryDraft {
        summary,
        keywords,
        action_items,
        defaulted,
    }
}

/// Keywords offered for a mood when there is nothing to analyse.
pub fn default_keywords_for(mood: Mood) -> Vec<String> {
    let set: [&str; 5] = match mood {
        Mood::Good => ["#기쁨", "#활기", "#만족", "#희망", "#평온"],
        Mood::Neutral => ["#평범", "#일상", "#차분", "#보통", "#안정"],
        Mood::Bad => ["#우울", "#피곤", "#스트레스", "#불안", "#힘듦"],
    };
    set.iter().map(|k| k.to_string()).collect()
}

/// Parses a comma-separated list of hashtag keyword suggestions.
///
/// Only tokens that already start with `#` are kept, duplicates dropped. The
/// result is padded with filler keywords and always has exactly five entries.
pub fn parse_keyword_suggestions(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::with_capacity(SUGGESTED_KEYWORD_COUNT);

    let tokens = text
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|t| t.starts_with('#'))
        .filter_map(normalize_keyword);
    for token in tokens {
        if keywords.len() == SUGGESTED_KEYWORD_COUNT {
            break;
        }
        if !keywords.contains(&token) {
            keywords.push(token);
        }
    }

    for filler in FILLER_KEYWORDS {
        if keywords.len() == SUGGESTED_KEYWORD_COUNT {
            break;
        }
        if !keywords.iter().any(|k| k == filler) {
            keywords.push(filler.to_string());
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let draft = extract_summary(
            "요약: 오늘은 좋았다\n감정키워드: #기쁨, #평온\n액션아이템:\n- 잘했어요\n- 고생했어요",
        );
        assert_eq!(draft.summary, "오늘은 좋았다");
        assert_eq!(draft.keywords, vec!["#기쁨", "#평온"]);
        assert_eq!(draft.action_items, vec!["잘했어요", "고생했어요"]);
        assert!(!draft.defaulted);
    }

    #[test]
    fn test_no_labels_falls_back_entirely() {
        let draft = extract_summary("I'm sorry, I can't help with that.\n- stray bullet");
        assert_eq!(draft, SummaryDraft::fallback());
        assert_eq!(draft.keywords.len(), 1);
        assert_eq!(draft.action_items.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_summary(""), SummaryDraft::fallback());
    }

    #[test]
    fn test_partial_block_defaults_missing_fields_only() {
        let draft = extract_summary("요약: 시험을 봤다");
        assert_eq!(draft.summary, "시험을 봤다");
        assert_eq!(draft.keywords, vec![DEFAULT_KEYWORD]);
        assert_eq!(draft.action_items, vec![DEFAULT_ACTION_ITEM]);
        assert!(draft.defaulted);
    }

    #[test]
    fn test_lists_are_capped() {
        let draft = extract_summary(
            "요약: 긴 하루\n감정키워드: #a, #b, #c, #d, #e, #f, #g\n액션아이템:\n- 1\n- 2\n- 3\n- 4",
        );
        assert_eq!(draft.keywords.len(), 5);
        assert_eq!(draft.keywords[4], "#e");
        assert_eq!(draft.action_items, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_advice_section_ends_at_next_label() {
        let draft = extract_summary(
            "액션아이템:\n- 물 마시기\n요약: 순서가 바뀐 블록\n- 요약 뒤 불릿은 무시",
        );
        assert_eq!(draft.action_items, vec!["물 마시기"]);
        assert_eq!(draft.summary, "순서가 바뀐 블록");
    }

    #[test]
    fn test_unlabeled_lines_ignored() {
        let draft = extract_summary(
            "다음은 분석 결과입니다.\n요약: 친구와 화해했다\n감정키워드: #안도\n참고로...\n액션아이템:\n그냥 문장\n- 자신을 칭찬해요",
        );
        assert_eq!(draft.summary, "친구와 화해했다");
        assert_eq!(draft.keywords, vec!["#안도"]);
        assert_eq!(draft.action_items, vec!["자신을 칭찬해요"]);
    }

    #[test]
    fn test_markdown_emphasis_and_bare_keywords() {
        let draft = extract_summary("**요약:** 비 오는 날\n**감정키워드:** 차분, #여유\n액션아이템: - 쉬어요");
        assert_eq!(draft.summary, "비 오는 날");
        assert_eq!(draft.keywords, vec!["#차분", "#여유"]);
        assert_eq!(draft.action_items, vec!["쉬어요"]);
    }

    #[test]
    fn test_summary_on_following_line() {
        let draft = extract_summary("요약:\n  발표를 잘 끝냈다  \n감정키워드: #뿌듯");
        assert_eq!(draft.summary, "발표를 잘 끝냈다");
    }

    #[test]
    fn test_keyword_suggestions_parsed_and_padded() {
        let keywords = parse_keyword_suggestions("#설렘, #긴장, 그냥말, #설렘");
        assert_eq!(
            keywords,
            vec!["#설렘", "#긴장", "#감정나눔", "#일상", "#생각"]
        );
    }

    #[test]
    fn test_keyword_suggestions_from_garbage() {
        let keywords = parse_keyword_suggestions("no hashtags here");
        assert_eq!(keywords, FILLER_KEYWORDS.to_vec());
    }

    #[test]
    fn test_keyword_suggestions_truncated_to_five() {
        let keywords = parse_keyword_suggestions("#a, #b\n#c, #d, #e, #f");
        assert_eq!(keywords, vec!["#a", "#b", "#c", "#d", "#e"]);
    }

    #[test]
    fn test_default_keywords_per_mood() {
        assert_eq!(default_keywords_for(Mood::Bad)[0], "#우울");
        assert_eq!(default_keywords_for(Mood::Good).len(), 5);
    }
}
