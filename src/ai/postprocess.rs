//! Cleanup of raw chat replies.

use crate::constants::MAX_REPLY_SENTENCES;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Trims a reply, drops repeated sentences, keeps the first few and makes sure
/// it ends with punctuation.
///
/// ```
/// use mindtalk::ai::postprocess::tidy_response;
///
/// assert_eq!(
///     tidy_response("  좋았겠어요. 좋았겠어요. 무엇이 제일 좋았나요  "),
///     "좋았겠어요. 무엇이 제일 좋았나요."
/// );
/// ```
pub fn tidy_response(raw: &str) -> String {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in raw.trim().chars() {
        current.push(c);
        if TERMINATORS.contains(&c) {
            push_sentence(&mut sentences, &mut current);
        }
    }
    push_sentence(&mut sentences, &mut current);

    sentences.truncate(MAX_REPLY_SENTENCES);
    let mut text = sentences.join(" ");
    if !text.is_empty() && !text.ends_with(TERMINATORS) {
        text.push('.');
    }
    text
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    let bare = sentence.trim_end_matches(TERMINATORS).trim();
    if !bare.is_empty()
        && !sentences
            .iter()
            .any(|s| s.trim_end_matches(TERMINATORS).trim() == bare)
    {
        sentences.push(sentence.to_string());
    }
    current.clear();
}
