//! Lexical screen for self-harm and violence signals in user text.
//!
//! The screen is deliberately coarse: text is lowercased and stripped of all
//! whitespace, then searched for fixed phrases. A hit never blocks a message;
//! it only attaches an instruction to the context sent to the generator so the
//! reply acknowledges the feeling and points to a help line.

/// Phrases indicating self-harm or suicidal thoughts, in normalized form.
const SELF_HARM_PATTERNS: &[&str] = &[
    "자살",
    "죽고싶",
    "자해",
    "죽고싶어",
    "사라지고싶",
    "끝내고싶",
    "살기싫",
    "살고싶지",
    "죽어버리",
    "죽었으면",
    "베고싶",
    "자살하고",
];

/// Phrases indicating violence or danger, in normalized form.
const VIOLENCE_PATTERNS: &[&str] = &[
    "때리고싶",
    "죽이고싶",
    "칼",
    "총",
    "성폭행",
    "강간",
    "폭행",
    "때렸다",
    "맞았다",
    "협박",
    "폭력",
    "성추행",
];

/// Instruction attached when self-harm is mentioned.
pub const SELF_HARM_ANNOTATION: &str = "중요: 사용자가 자해나 자살 관련 내용을 언급했습니다. \
먼저 공감적으로 반응한 후 자연스럽게 자살예방상담 109번이나 청소년상담 1388번을 안내해주세요.";

/// Instruction attached when violence is mentioned.
pub const VIOLENCE_ANNOTATION: &str = "중요: 사용자가 폭력이나 위험 상황을 언급했습니다. \
안전을 가장 우선시하며 위험하다면 112번이나 청소년상담 1388번에 도움을 요청하도록 안내해주세요.";

/// Result of screening one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafetyAssessment {
    pub self_harm: bool,
    pub violence: bool,
}

impl SafetyAssessment {
    /// True when either signal fired.
    pub fn flagged(&self) -> bool {
        self.self_harm || self.violence
    }

    /// Context to append to the generator request, if any.
    ///
    /// When both signals fire both instructions are included, self-harm first.
    pub fn annotation(&self) -> Option<String> {
        let notes: Vec<&str> = [
            (self.self_harm, SELF_HARM_ANNOTATION),
            (self.violence, VIOLENCE_ANNOTATION),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, note)| *note)
        .collect();

        if notes.is_empty() {
            None
        } else {
            Some(notes.join("\n"))
        }
    }
}

/// Screens `text` for self-harm and violence phrases.
///
/// # Examples
///
/// ```
/// use mindtalk::safety::classify;
///
/// let assessment = classify("요즘 너무 죽고 싶 어");
/// assert!(assessment.self_harm);
/// assert!(!assessment.violence);
/// assert!(assessment.flagged());
/// ```
pub fn classify(text: &str) -> SafetyAssessment {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return SafetyAssessment::default();
    }

    SafetyAssessment {
        self_harm: SELF_HARM_PATTERNS.iter().any(|p| normalized.contains(p)),
        violence: VIOLENCE_PATTERNS.iter().any(|p| normalized.contains(p)),
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_flagged() {
        let assessment = classify("오늘은 친구랑 떡볶이를 먹었어");
        assert!(!assessment.flagged());
        assert_eq!(assessment.annotation(), None);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(classify(""), SafetyAssessment::default());
        assert_eq!(classify(" \n\t "), SafetyAssessment::default());
    }

    #[test]
    fn test_self_harm_detected_across_spacing() {
        assert!(classify("그냥 사라지고 싶다").self_harm);
        assert!(classify("살 기 싫 어").self_harm);
        assert!(classify("자\n해").self_harm);
    }

    #[test]
    fn test_violence_detected() {
        let assessment = classify("형한테 맞았다");
        assert!(assessment.violence);
        assert!(!assessment.self_harm);
        let note = assessment.annotation().unwrap();
        assert!(note.contains("112"));
        assert!(note.contains("1388"));
    }

    #[test]
    fn test_self_harm_annotation_names_crisis_line() {
        let note = classify("자살하고 싶어").annotation().unwrap();
        assert!(note.contains("109"));
        assert!(note.contains("공감"));
    }

    #[test]
    fn test_both_signals_produce_both_annotations() {
        let assessment = classify("죽고 싶고 누구를 때리고 싶어");
        assert!(assessment.self_harm && assessment.violence);
        let note = assessment.annotation().unwrap();
        let self_harm_at = note.find("109").unwrap();
        let violence_at = note.find("112").unwrap();
        assert!(self_harm_at < violence_at);
    }

    #[test]
    fn test_invariant_under_whitespace_and_case() {
        let samples = [
            "I got a 칼 today",
            "나 오늘 폭행 당했어",
            "just a normal day",
            "DEATH 죽고싶어",
        ];
        for sample in samples {
            let base = classify(sample);
            let squeezed: String = sample.split_whitespace().collect();
            let spaced: String = sample
                .chars()
                .flat_map(|c| [c, ' '])
                .collect::<String>()
                .to_uppercase();
            assert_eq!(classify(&squeezed), base, "{}", sample);
            assert_eq!(classify(&spaced), base, "{}", sample);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "협박 받았어";
        assert_eq!(classify(text), classify(text));
    }
}
