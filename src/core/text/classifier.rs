// Rule-based message analysis: question/greeting/farewell detection,
// sentiment, topic and keyword extraction.

use std::collections::HashSet;
use std::fmt;

use super::language_rules::LanguageRules;
use super::normalizer::{normalize, TextNormalizer};
use super::similarity;

/// A token counts as a greeting or farewell above this similarity.
const SALUTATION_MATCH_THRESHOLD: f64 = 0.80;
/// A token counts towards a sentiment above this similarity.
const SENTIMENT_MATCH_THRESHOLD: f64 = 0.70;
/// Upper bound on extracted keywords.
pub const MAX_KEYWORDS: usize = 5;
/// Keywords shorter than this (in chars) are ignored.
const MIN_KEYWORD_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Coarse category used to scope retrieval and canned replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Technology,
    Education,
    Personal,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Technology => "technology",
            Topic::Education => "education",
            Topic::Personal => "personal",
            Topic::General => "general",
        }
    }

    /// Maps a stored topic tag back to a known topic. Caller-supplied tags
    /// outside the fixed set are `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "technology" => Some(Topic::Technology),
            "education" => Some(Topic::Education),
            "personal" => Some(Topic::Personal),
            "general" => Some(Topic::General),
            _ => None,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier knows about one message.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub cleaned_text: String,
    pub tokens: Vec<String>,
    pub is_question: bool,
    pub is_greeting: bool,
    pub is_farewell: bool,
    pub sentiment: Sentiment,
    pub topic: Topic,
    /// At most [`MAX_KEYWORDS`] distinct tokens. Callers must not rely on order.
    pub keywords: Vec<String>,
}

pub struct Classifier {
    normalizer: TextNormalizer,
    question_words: HashSet<String>,
    greetings: Vec<String>,
    farewells: Vec<String>,
    positive_words: Vec<String>,
    negative_words: Vec<String>,
    technology_words: HashSet<String>,
    education_words: HashSet<String>,
    personal_words: HashSet<String>,
}

impl Classifier {
    /// Builds a classifier from word lists. All lists are normalized once here
    /// so that comparisons against tokens are like for like.
    pub fn new(rules: &LanguageRules) -> Self {
        Self {
            normalizer: TextNormalizer::new(&rules.stop_words),
            question_words: normalized_set(&rules.question_words),
            greetings: normalized_list(&rules.greetings),
            farewells: normalized_list(&rules.farewells),
            positive_words: normalized_list(&rules.positive_words),
            negative_words: normalized_list(&rules.negative_words),
            technology_words: normalized_set(&rules.topics.technology),
            education_words: normalized_set(&rules.topics.education),
            personal_words: normalized_set(&rules.topics.personal),
        }
    }

    pub fn analyze(&self, text: &str) -> AnalysisRecord {
        let tokens = self.normalizer.tokenize(text);
        let keywords = keywords_from_tokens(&tokens);

        AnalysisRecord {
            cleaned_text: self.normalizer.normalize(text),
            is_question: self.question_in(text, &tokens),
            is_greeting: fuzzy_hit(&tokens, &self.greetings),
            is_farewell: fuzzy_hit(&tokens, &self.farewells),
            sentiment: self.sentiment_of(&tokens),
            topic: self.topic_of(&keywords),
            keywords,
            tokens,
        }
    }

    pub fn is_question(&self, text: &str) -> bool {
        self.question_in(text, &self.normalizer.tokenize(text))
    }

    pub fn is_greeting(&self, text: &str) -> bool {
        fuzzy_hit(&self.normalizer.tokenize(text), &self.greetings)
    }

    pub fn is_farewell(&self, text: &str) -> bool {
        fuzzy_hit(&self.normalizer.tokenize(text), &self.farewells)
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        self.sentiment_of(&self.normalizer.tokenize(text))
    }

    pub fn topic(&self, text: &str) -> Topic {
        self.topic_of(&self.keywords(text))
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        keywords_from_tokens(&self.normalizer.tokenize(text))
    }

    /// Similarity of two raw texts, compared on their normalized forms.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity::ratio(&normalize(a), &normalize(b))
    }

    fn question_in(&self, raw: &str, tokens: &[String]) -> bool {
        raw.contains('?') || tokens.iter().any(|t| self.question_words.contains(t))
    }

    fn sentiment_of(&self, tokens: &[String]) -> Sentiment {
        let positive = fuzzy_count(tokens, &self.positive_words);
        let negative = fuzzy_count(tokens, &self.negative_words);

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }

    fn topic_of(&self, keywords: &[String]) -> Topic {
        let score = |list: &HashSet<String>| keywords.iter().filter(|k| list.contains(*k)).count();

        if score(&self.technology_words) > 0 {
            Topic::Technology
        } else if score(&self.education_words) > 0 {
            Topic::Education
        } else if score(&self.personal_words) > 0 {
            Topic::Personal
        } else {
            Topic::General
        }
    }
}

fn normalized_list(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| normalize(w))
        .filter(|w| !w.is_empty())
        .collect()
}

fn normalized_set(words: &[String]) -> HashSet<String> {
    normalized_list(words).into_iter().collect()
}

fn fuzzy_hit(tokens: &[String], words: &[String]) -> bool {
    tokens.iter().any(|token| {
        words
            .iter()
            .any(|word| similarity::ratio(token, word) > SALUTATION_MATCH_THRESHOLD)
    })
}

/// Number of (token, word) pairs that match, so one token can count more than once.
fn fuzzy_count(tokens: &[String], words: &[String]) -> usize {
    tokens
        .iter()
        .map(|token| {
            words
                .iter()
                .filter(|word| similarity::ratio(token, word) > SENTIMENT_MATCH_THRESHOLD)
                .count()
        })
        .sum()
}

fn keywords_from_tokens(tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .filter(|t| t.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|t| seen.insert(t.as_str()))
        .take(MAX_KEYWORDS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&LanguageRules::default())
    }

    #[test]
    fn test_greeting_with_question_mark() {
        let analysis = classifier().analyze("Merhaba, nasılsın?");
        assert!(analysis.is_greeting);
        assert!(analysis.is_question);
        assert!(!analysis.is_farewell);
    }

    #[test]
    fn test_greeting_tolerates_typo() {
        assert!(classifier().is_greeting("merhba dostum"));
        assert!(!classifier().is_greeting("bugün hava güzel"));
    }

    #[test]
    fn test_farewell() {
        let c = classifier();
        assert!(c.is_farewell("Teşekkürler, görüşürüz!"));
        assert!(!c.is_farewell("Python nedir?"));
    }

    #[test]
    fn test_question_word_without_mark() {
        let c = classifier();
        assert!(c.is_question("python nedir"));
        assert!(!c.is_question("python güzel"));
    }

    #[test]
    fn test_question_words_are_exact() {
        // "nedirler" is close to "nedir" but not equal.
        assert!(!classifier().is_question("nedirler"));
    }

    #[test]
    fn test_sentiment() {
        let c = classifier();
        assert_eq!(c.sentiment("Bugün hava çok güzel"), Sentiment::Positive);
        assert_eq!(c.sentiment("Çok kötü bir gün"), Sentiment::Negative);
        assert_eq!(c.sentiment("Masa kahverengi"), Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_tie_is_neutral() {
        assert_eq!(classifier().sentiment("güzel ama kötü"), Sentiment::Neutral);
    }

    #[test]
    fn test_topic_priority() {
        let c = classifier();
        assert_eq!(c.topic("Python nedir?"), Topic::Technology);
        // technology wins over education when both are present
        assert_eq!(c.topic("okul ders python"), Topic::Technology);
        assert_eq!(c.topic("kitap okumayı severim"), Topic::Education);
        assert_eq!(c.topic("aile çok önemli"), Topic::Personal);
        assert_eq!(c.topic("hava bulutlu"), Topic::General);
    }

    #[test]
    fn test_topic_membership_is_exact() {
        // "pythonn" would fuzzy-match but topic lists are exact.
        assert_eq!(classifier().topic("pythonn"), Topic::General);
    }

    #[test]
    fn test_keywords_dedup_and_limit() {
        let keywords = classifier().keywords("elma armut elma kiraz muz çilek erik ayva");
        assert_eq!(keywords, vec!["elma", "armut", "kiraz", "muz", "çilek"]);
        // cut off by the cap, not by length
        assert!(!keywords.contains(&"erik".to_string()));
        assert!(!keywords.contains(&"ayva".to_string()));
    }

    #[test]
    fn test_keywords_length_cutoff() {
        let keywords = classifier().keywords("ev kuş at");
        assert_eq!(keywords, vec!["kuş"]);
    }

    #[test]
    fn test_keywords_count_chars() {
        // "öğr" is three chars but more than three bytes; "ab" is too short
        let keywords = classifier().keywords("öğr ab");
        assert_eq!(keywords, vec!["öğr"]);
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let analysis = classifier().analyze("   ");
        assert_eq!(analysis.cleaned_text, "");
        assert!(analysis.tokens.is_empty());
        assert!(!analysis.is_question);
        assert!(!analysis.is_greeting);
        assert!(!analysis.is_farewell);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert_eq!(analysis.topic, Topic::General);
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_empty_rules_never_match() {
        let c = Classifier::new(&LanguageRules::empty());
        let analysis = c.analyze("merhaba ve python");
        assert!(!analysis.is_greeting);
        assert_eq!(analysis.topic, Topic::General);
        assert_eq!(analysis.tokens, vec!["merhaba", "ve", "python"]);
    }

    #[test]
    fn test_similarity_normalizes_first() {
        let c = classifier();
        assert_eq!(c.similarity("Python nedir?", "  python   NEDIR? "), 1.0);
    }

    #[test]
    fn test_topic_tags_roundtrip() {
        for topic in [Topic::Technology, Topic::Education, Topic::Personal, Topic::General] {
            assert_eq!(Topic::from_tag(topic.as_str()), Some(topic));
        }
        assert_eq!(Topic::from_tag("cooking"), None);
    }
}
