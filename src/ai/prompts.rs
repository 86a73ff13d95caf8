//! Prompt builders for chat turns, summaries and keyword suggestions.
//!
//! Prompts are plain text for a completion endpoint. Only user messages feed
//! the summary and keyword prompts; the chat prompt sees the recent transcript
//! from both sides.

use crate::constants::{
    LABEL_ACTION_ITEMS, LABEL_KEYWORDS, LABEL_SUMMARY, RECENT_TRANSCRIPT_WINDOW,
    SUMMARY_INPUT_CHAR_LIMIT,
};
use crate::diary_core::{ChatMessage, Mood, Role};
use crate::safety::SafetyAssessment;

/// Tone and approach lines for a mood.
fn mood_style(mood: Mood) -> (&'static str, &'static str) {
    match mood {
        Mood::Good => (
            "밝고 활기찬 말투로 기쁨을 함께 나누세요",
            "긍정적인 감정을 더 깊이 느낄 수 있도록 격려하세요",
        ),
        Mood::Neutral => (
            "편안하고 자연스러운 말투로 대화하세요",
            "일상의 소소한 의미를 찾을 수 있도록 도와주세요",
        ),
        Mood::Bad => (
            "부드럽고 따뜻한 말투로 위로하세요",
            "힘든 감정을 안전하게 표현할 수 있도록 공간을 만들어주세요",
        ),
    }
}

/// Everything a chat turn needs besides the new message.
#[derive(Debug, Clone, Copy)]
pub struct ChatContext<'a> {
    pub mood: Mood,
    pub ai_name: &'a str,
    /// Transcript before the new message. Only the tail is used.
    pub history: &'a [ChatMessage],
    /// Summaries of earlier sessions, oldest first.
    pub prior_summaries: &'a [String],
    pub safety: SafetyAssessment,
}

/// Builds the prompt for one chat turn.
pub fn chat_prompt(ctx: &ChatContext<'_>, user_message: &str) -> String {
    let (tone, approach) = mood_style(ctx.mood);
    let name = ctx.ai_name;

    let mut prompt = format!(
        r#"당신은 10대를 위한 따뜻하고 공감적인 AI 친구 {name}입니다.

핵심 원칙:
- 친구처럼 편하게 대화하되, 존댓말을 사용하세요
- 판단하지 말고 있는 그대로 공감해주세요
- 자해나 위험한 행동은 절대 권하지 마세요
- 응답은 2-3문장으로 간결하게 해주세요

현재 기분: {mood}
대화 스타일:
- {tone}
- {approach}
- 먼저 짧게 공감하고, 구체적인 질문 1개만 하세요

구체적 대화 가이드:
- 사용자가 구체적인 내용을 언급하면 그것에 대해 구체적으로 반응하세요
- 일반적인 응답 대신 사용자의 상황에 맞춘 질문을 하세요

위험 상황 대응:
- 자해/자살 언급 시: 공감 후 자살예방상담 109번이나 청소년상담 1388번을 안내하세요
- 폭력 상황 언급 시: 안전을 우선하고 112번이나 청소년상담 1388번을 안내하세요
"#,
        name = name,
        mood = ctx.mood.label(),
        tone = tone,
        approach = approach,
    );

    if !ctx.prior_summaries.is_empty() {
        prompt.push_str("\n이전 대화 참고:\n");
        for summary in ctx.prior_summaries {
            prompt.push_str(&format!("지난번에 이야기했던 것: {}\n", summary));
        }
    }

    if let Some(annotation) = ctx.safety.annotation() {
        prompt.push('\n');
        prompt.push_str(&annotation);
        prompt.push('\n');
    }

    prompt.push_str("\n간결하고 자연스러운 대화를 해주세요.\n\n");

    let start = ctx.history.len().saturating_sub(RECENT_TRANSCRIPT_WINDOW);
    for message in &ctx.history[start..] {
        match message.role {
            Role::User => prompt.push_str(&format!("사용자: {}\n", message.content)),
            Role::Assistant => prompt.push_str(&format!("{}: {}\n", name, message.content)),
        }
    }
    prompt.push_str(&format!("사용자: {}\n{}:", user_message, name));

    prompt
}

/// User messages joined by newlines, cut to the summary input limit.
///
/// Returns `None` when the transcript holds no user message.
pub fn user_excerpt(transcript: &[ChatMessage]) -> Option<String> {
    let joined = transcript
        .iter()
        .filter(|m| m.role == Role::User && !m.content.trim().is_empty())
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if joined.is_empty() {
        return None;
    }

    if joined.chars().count() > SUMMARY_INPUT_CHAR_LIMIT {
        let mut cut: String = joined.chars().take(SUMMARY_INPUT_CHAR_LIMIT).collect();
        cut.push_str("...");
        Some(cut)
    } else {
        Some(joined)
    }
}

/// Prompt asking for the labeled summary block the extractor reads.
pub fn summary_prompt(excerpt: &str) -> String {
    format!(
        r#"다음 대화 내용을 분석해서 아래 형식으로 응답해주세요:

대화 내용:
{excerpt}

분석 요청:
1. 오늘 있었던 일을 1-2줄로 요약
2. 대화에서 느껴진 감정 키워드 5개 추출 (예: #기쁨, #불안, #성취감 등)
3. 사용자에게 도움이 될 따뜻하고 친근한 조언 3개 제안 (친구 같은 말투로, ~해요/~랍니다 교차 사용)

응답 형식:
{summary} [1-2줄 요약]
{keywords} #키워드1, #키워드2, #키워드3, #키워드4, #키워드5
{actions}
- [~해요 말투의 따뜻한 조언]
- [~랍니다 말투의 친근한 조언]
- [~해요 말투의 격려 메시지]"#,
        excerpt = excerpt,
        summary = LABEL_SUMMARY,
        keywords = LABEL_KEYWORDS,
        actions = LABEL_ACTION_ITEMS,
    )
}

/// Prompt asking for five hashtag emotion keywords.
pub fn keywords_prompt(excerpt: &str, mood: Mood) -> String {
    format!(
        r#"다음 대화 내용을 분석해서 사용자의 감정을 나타내는 키워드 5개를 제시해주세요.

대화 내용:
{excerpt}

현재 기분: {mood}

요청사항:
- 대화에서 느껴지는 구체적인 감정 키워드 5개
- 각 키워드는 # 붙여서 해시태그 형태로
- 사용자가 실제로 느꼈을 감정들 위주로
- 너무 추상적이지 않고 구체적으로

응답 형식:
#키워드1, #키워드2, #키워드3, #키워드4, #키워드5"#,
        excerpt = excerpt,
        mood = mood.label(),
    )
}

/// Opening line shown when a chat starts. Not part of the transcript.
pub fn greeting(mood: Mood, ai_name: &str) -> String {
    let mood_line = match mood {
        Mood::Good => "오늘 기분이 좋았군요.",
        Mood::Neutral => "오늘은 평범한 하루였군요.",
        Mood::Bad => "오늘 좀 힘드셨군요.",
    };
    format!(
        "안녕하세요! 저는 {}예요. {} 오늘 무슨 일이 있었는지 편하게 얘기해볼까요? 😊",
        ai_name, mood_line
    )
}
