//! Keyword + sentiment-signal emotion classifier.

use pulse_core::EmotionLabel;

use crate::scorer::comparative_score;

/// Keyword sets per emotion category, matched as substrings of the
/// lowercased text. The `neutral` category has no keywords; it only scores
/// through the sentiment signal.
const HAPPY_KEYWORDS: &[&str] = &[
    "happy",
    "joy",
    "excited",
    "amazing",
    "wonderful",
    "great",
    "love",
    "awesome",
    "fantastic",
    "brilliant",
    "perfect",
    "best",
    "celebrate",
    "smile",
    "laugh",
    "\u{1f60a}",
    "\u{1f604}",
    "\u{1f603}",
    "\u{1f389}",
    "\u{2764}\u{fe0f}",
];

const ANGRY_KEYWORDS: &[&str] = &[
    "angry",
    "mad",
    "furious",
    "hate",
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "annoyed",
    "frustrated",
    "rage",
    "outrage",
    "\u{1f620}",
    "\u{1f621}",
    "\u{1f92c}",
];

const EXCITED_KEYWORDS: &[&str] = &[
    "excited",
    "thrilled",
    "pumped",
    "energetic",
    "hyped",
    "stoked",
    "ecstatic",
    "elated",
    "fire",
    "lit",
    "\u{1f525}",
    "\u{26a1}",
    "\u{1f4a5}",
];

/// Classify the dominant emotion of a text.
///
/// Counts keyword occurrences per category, then folds in the comparative
/// sentiment score: `> 0.1` adds 2 to happy and 1 to excited, `< -0.1` adds
/// 2 to angry, anything else adds 1 to neutral. The category with the
/// highest accumulated score wins; ties break by the fixed order
/// happy > angry > excited > neutral (strict `>` fold). An all-zero score
/// board classifies as [`EmotionLabel::Neutral`].
#[must_use]
pub fn classify_emotion(text: &str) -> EmotionLabel {
    let lower = text.to_lowercase();

    let count = |keywords: &[&str]| -> i32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let n = keywords.iter().filter(|k| lower.contains(**k)).count() as i32;
        n
    };

    let mut happy = count(HAPPY_KEYWORDS);
    let mut angry = count(ANGRY_KEYWORDS);
    let mut excited = count(EXCITED_KEYWORDS);
    let mut neutral = 0;

    let score = comparative_score(text);
    if score > 0.1 {
        happy += 2;
        excited += 1;
    } else if score < -0.1 {
        angry += 2;
    } else {
        neutral += 1;
    }

    // First-max-wins over a fixed category order keeps ties reproducible.
    let board = [
        (EmotionLabel::Happy, happy),
        (EmotionLabel::Angry, angry),
        (EmotionLabel::Excited, excited),
        (EmotionLabel::Neutral, neutral),
    ];

    let mut winner = EmotionLabel::Neutral;
    let mut max = 0;
    for (label, category_score) in board {
        if category_score > max {
            max = category_score;
            winner = label;
        }
    }

    winner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(classify_emotion(""), EmotionLabel::Neutral);
    }

    #[test]
    fn plain_text_is_neutral() {
        assert_eq!(
            classify_emotion("posting the quarterly schedule"),
            EmotionLabel::Neutral
        );
    }

    #[test]
    fn happy_keywords_win() {
        assert_eq!(
            classify_emotion("Having a great day! #sunshine #happy"),
            EmotionLabel::Happy
        );
    }

    #[test]
    fn angry_keywords_win() {
        assert_eq!(
            classify_emotion("this is horrible and I hate it"),
            EmotionLabel::Angry
        );
    }

    #[test]
    fn excited_keywords_without_sentiment_boost() {
        // "pumped" and "hyped" are excited-only keywords and not in the
        // lexicon, so the sentiment branch adds 1 to neutral: excited=2 wins.
        assert_eq!(
            classify_emotion("so pumped and hyped for tonight"),
            EmotionLabel::Excited
        );
    }

    #[test]
    fn emoji_keywords_count() {
        assert_eq!(classify_emotion("\u{1f525}\u{26a1}"), EmotionLabel::Excited);
        assert_eq!(classify_emotion("\u{1f621}"), EmotionLabel::Angry);
    }

    #[test]
    fn positive_sentiment_bonus_tips_happy() {
        // No keyword hits, but a clearly positive caption gets happy +2.
        assert_eq!(classify_emotion("such a nice win today"), EmotionLabel::Happy);
    }

    #[test]
    fn negative_sentiment_bonus_tips_angry() {
        // "worst" is in the lexicon but not an angry keyword.
        assert_eq!(classify_emotion("worst launch ever"), EmotionLabel::Angry);
    }

    #[test]
    fn happy_beats_excited_on_tie() {
        // happy: "excited" (1) + sentiment bonus (2) = 3.
        // excited: "excited" + "pumped" (2) + sentiment bonus (1) = 3.
        // The fixed order picks happy on the tie.
        assert_eq!(classify_emotion("pumped excited"), EmotionLabel::Happy);
    }
}
