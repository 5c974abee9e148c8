//! Lexicon-based sentiment scorer for post captions.

/// Word polarity weights, AFINN-style.
///
/// Keys are lowercase single words. Weights are integers in `[-5, 5]`;
/// positive means positive polarity. The comparative score normalizes the
/// summed weights by token count, so longer captions dilute single signals.
pub(crate) const LEXICON: &[(&str, i32)] = &[
    // Positive signals
    ("adore", 3),
    ("amazing", 4),
    ("awesome", 4),
    ("beautiful", 3),
    ("best", 3),
    ("blessed", 3),
    ("brilliant", 4),
    ("celebrate", 3),
    ("congrats", 2),
    ("congratulations", 2),
    ("cool", 1),
    ("delicious", 3),
    ("delighted", 3),
    ("ecstatic", 4),
    ("elated", 3),
    ("enjoy", 2),
    ("enjoyed", 2),
    ("epic", 3),
    ("excellent", 3),
    ("excited", 3),
    ("exciting", 3),
    ("fabulous", 4),
    ("fantastic", 4),
    ("favorite", 2),
    ("fun", 4),
    ("glad", 3),
    ("good", 3),
    ("gorgeous", 3),
    ("grateful", 3),
    ("great", 3),
    ("happy", 3),
    ("hilarious", 2),
    ("incredible", 4),
    ("inspiring", 2),
    ("joy", 3),
    ("laugh", 1),
    ("like", 2),
    ("love", 3),
    ("loved", 3),
    ("lovely", 3),
    ("nice", 3),
    ("outstanding", 5),
    ("perfect", 3),
    ("proud", 2),
    ("smile", 2),
    ("stunning", 4),
    ("stoked", 3),
    ("superb", 5),
    ("sweet", 2),
    ("thanks", 2),
    ("thrilled", 5),
    ("win", 4),
    ("winner", 4),
    ("wonderful", 4),
    ("wow", 4),
    // Negative signals
    ("angry", -3),
    ("annoyed", -2),
    ("annoying", -2),
    ("awful", -3),
    ("bad", -3),
    ("boring", -3),
    ("broken", -1),
    ("disappointed", -2),
    ("disappointing", -2),
    ("disaster", -2),
    ("disgusting", -3),
    ("dreadful", -3),
    ("fail", -2),
    ("failed", -2),
    ("frustrated", -2),
    ("frustrating", -2),
    ("furious", -3),
    ("hate", -3),
    ("hated", -3),
    ("horrible", -3),
    ("lame", -2),
    ("lost", -3),
    ("mad", -3),
    ("mess", -2),
    ("miserable", -3),
    ("pathetic", -3),
    ("poor", -2),
    ("rage", -2),
    ("sad", -2),
    ("scam", -2),
    ("stupid", -2),
    ("terrible", -3),
    ("trash", -1),
    ("ugly", -3),
    ("unhappy", -2),
    ("useless", -2),
    ("waste", -1),
    ("worst", -3),
    ("wrong", -2),
];

/// Compute the comparative sentiment score for a text.
///
/// Tokenizes on whitespace, strips non-alphanumeric characters from each
/// token, lowercases, and sums matching lexicon weights. The result is the
/// summed polarity divided by the token count — roughly `[-1, 1]` for
/// ordinary text, unbounded in principle. Empty and no-token text scores 0.
#[must_use]
pub fn comparative_score(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|raw| {
            raw.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return 0.0;
    }

    let mut sum = 0i64;
    for token in &tokens {
        for &(word, weight) in LEXICON {
            if token == word {
                sum += i64::from(weight);
                break;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let denom = tokens.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let numer = sum as f64;
    numer / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(comparative_score(""), 0.0);
    }

    #[test]
    fn whitespace_only_returns_zero() {
        assert_eq!(comparative_score("   "), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(comparative_score("the quick brown fox"), 0.0);
    }

    #[test]
    fn positive_keyword_returns_positive() {
        let score = comparative_score("this launch is great");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn negative_keyword_returns_negative() {
        let score = comparative_score("that was a terrible idea");
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn score_is_normalized_by_token_count() {
        // "great" alone: 3/1. Same word padded with neutral tokens: 3/6.
        let short = comparative_score("great");
        let long = comparative_score("great and also some other stuff");
        assert!(short > long, "dilution expected: {short} vs {long}");
        assert!((short - 3.0).abs() < f64::EPSILON);
        assert!((long - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn punctuation_stripped_from_tokens() {
        // "great!" should match "great"
        let score = comparative_score("great!");
        assert!(score > 0.0, "expected positive score for 'great!', got {score}");
    }

    #[test]
    fn hashtag_words_count_as_tokens() {
        // "#happy" strips to "happy" and both matches and counts.
        let score = comparative_score("Having a great day! #sunshine #happy");
        assert!((score - 1.0).abs() < f64::EPSILON, "got {score}");
    }

    #[test]
    fn emoji_only_tokens_are_not_counted() {
        // An emoji token strips to nothing; only "great" remains.
        let score = comparative_score("great \u{1f525}");
        assert!((score - 3.0).abs() < f64::EPSILON, "got {score}");
    }

    #[test]
    fn mixed_text_sums_weights() {
        // great (+3) + terrible (-3) over 4 tokens = 0.
        let score = comparative_score("great start terrible finish");
        assert!(score.abs() < f64::EPSILON, "got {score}");
    }
}
