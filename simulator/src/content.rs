//! Word-salad text generation.
//!
//! A synthesized status is a run of filler words drawn with replacement from a
//! fixed vocabulary, with one configured keyword planted at the midpoint so
//! that every record matches the downstream keyword filter.

use rand::Rng;

/// Default filler vocabulary.
///
/// Duplicates and trailing punctuation are part of the list.
pub const FILLER_WORDS: [&str; 19] = [
    "Lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet,",
    "consectetur",
    "adipiscing",
    "elit.",
    "Nulla",
    "vitae",
    "gravida",
    "quam.",
    "Praesent",
    "gravida",
    "tristique",
    "risus",
    "sit",
    "amet",
    "elementum.",
];

/// Builds randomized text containing exactly one keyword.
#[derive(Debug, Clone, Copy)]
pub struct ContentSynthesizer {
    vocabulary: &'static [&'static str],
}

impl ContentSynthesizer {
    /// Create a synthesizer over the default [`FILLER_WORDS`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vocabulary: &FILLER_WORDS,
        }
    }

    /// Create a synthesizer over a custom vocabulary.
    ///
    /// # Panics
    ///
    /// Panics if `vocabulary` is empty.
    #[must_use]
    pub const fn with_vocabulary(vocabulary: &'static [&'static str]) -> Self {
        assert!(!vocabulary.is_empty(), "vocabulary must not be empty");
        Self { vocabulary }
    }

    /// The filler words this synthesizer draws from.
    #[must_use]
    pub const fn vocabulary(&self) -> &'static [&'static str] {
        self.vocabulary
    }

    /// Produce `target_length` space-separated tokens.
    ///
    /// Token `target_length / 2` (0-based) is a keyword chosen uniformly from
    /// `keywords`; every other token is a filler word chosen uniformly with
    /// replacement.
    ///
    /// # Pre-conditions
    ///
    /// - `keywords` is non-empty
    /// - `target_length >= 1`
    ///
    /// Both are guaranteed by config validation before a simulator starts.
    ///
    /// # Panics
    ///
    /// Panics if a pre-condition is violated.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        keywords: &[String],
        target_length: usize,
    ) -> String {
        assert!(!keywords.is_empty(), "keywords must not be empty");
        assert!(target_length >= 1, "target_length must be at least 1");

        let midpoint = target_length / 2;
        let mut tokens: Vec<&str> = Vec::with_capacity(target_length);
        for index in 0..target_length {
            if index == midpoint {
                tokens.push(&keywords[rng.random_range(0..keywords.len())]);
            } else {
                tokens.push(self.vocabulary[rng.random_range(0..self.vocabulary.len())]);
            }
        }
        tokens.join(" ")
    }
}

impl Default for ContentSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_exact_token_count() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(1);
        let kws = keywords(&["rust"]);

        for length in 1..40 {
            let text = synth.synthesize(&mut rng, &kws, length);
            assert_eq!(text.split(' ').count(), length, "text: {text}");
        }
    }

    #[test]
    fn test_keyword_at_midpoint() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(2);
        let kws = keywords(&["rust"]);

        let text = synth.synthesize(&mut rng, &kws, 3);
        let tokens: Vec<&str> = text.split(' ').collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], "rust");
        assert!(FILLER_WORDS.contains(&tokens[0]));
        assert!(FILLER_WORDS.contains(&tokens[2]));

        let text = synth.synthesize(&mut rng, &kws, 8);
        let tokens: Vec<&str> = text.split(' ').collect();
        assert_eq!(tokens[4], "rust");
    }

    #[test]
    fn test_single_token_is_keyword() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(3);
        let text = synth.synthesize(&mut rng, &keywords(&["kafka"]), 1);
        assert_eq!(text, "kafka");
    }

    #[test]
    fn test_keyword_drawn_from_list() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(4);
        let kws = keywords(&["java", "kafka", "elastic"]);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let text = synth.synthesize(&mut rng, &kws, 5);
            let keyword = text.split(' ').nth(2).unwrap_or_default().to_string();
            assert!(kws.contains(&keyword), "unexpected keyword {keyword}");
            seen.insert(keyword);
        }

        // 200 uniform draws over 3 keywords should hit all of them
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_no_surrounding_whitespace() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(5);
        let kws = keywords(&["rust"]);

        for length in 1..20 {
            let text = synth.synthesize(&mut rng, &kws, length);
            assert_eq!(text.trim(), text);
            assert!(!text.contains("  "));
        }
    }

    #[test]
    fn test_same_seed_same_text() {
        let synth = ContentSynthesizer::new();
        let kws = keywords(&["a", "b"]);
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        for length in 1..10 {
            assert_eq!(
                synth.synthesize(&mut rng1, &kws, length),
                synth.synthesize(&mut rng2, &kws, length)
            );
        }
    }

    #[test]
    fn test_custom_vocabulary() {
        static WORDS: [&str; 1] = ["filler"];
        let synth = ContentSynthesizer::with_vocabulary(&WORDS);
        let mut rng = StdRng::seed_from_u64(6);
        let text = synth.synthesize(&mut rng, &keywords(&["kw"]), 4);
        assert_eq!(text, "filler filler kw filler");
    }

    #[test]
    #[should_panic(expected = "keywords must not be empty")]
    fn test_empty_keywords_panics() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(7);
        let _ = synth.synthesize(&mut rng, &[], 3);
    }

    #[test]
    #[should_panic(expected = "target_length must be at least 1")]
    fn test_zero_length_panics() {
        let synth = ContentSynthesizer::new();
        let mut rng = StdRng::seed_from_u64(8);
        let _ = synth.synthesize(&mut rng, &keywords(&["rust"]), 0);
    }
}
