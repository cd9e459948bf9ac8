use serde::{Deserialize, Serialize};

/// Word lists driving tokenization and classification.
///
/// Every list has a built-in Turkish default, so a rules file only needs to
/// name the lists it wants to replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRules {
    /// Dropped by the tokenizer.
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
    /// Exact-match question markers.
    #[serde(default = "default_question_words")]
    pub question_words: Vec<String>,
    /// Fuzzy-matched greeting words.
    #[serde(default = "default_greetings")]
    pub greetings: Vec<String>,
    /// Fuzzy-matched farewell words.
    #[serde(default = "default_farewells")]
    pub farewells: Vec<String>,
    #[serde(default = "default_positive_words")]
    pub positive_words: Vec<String>,
    #[serde(default = "default_negative_words")]
    pub negative_words: Vec<String>,
    #[serde(default)]
    pub topics: TopicKeywords,
}

/// Exact-match keyword lists per topic. Checked in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicKeywords {
    #[serde(default = "default_technology_words")]
    pub technology: Vec<String>,
    #[serde(default = "default_education_words")]
    pub education: Vec<String>,
    #[serde(default = "default_personal_words")]
    pub personal: Vec<String>,
}

impl Default for LanguageRules {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            question_words: default_question_words(),
            greetings: default_greetings(),
            farewells: default_farewells(),
            positive_words: default_positive_words(),
            negative_words: default_negative_words(),
            topics: TopicKeywords::default(),
        }
    }
}

impl Default for TopicKeywords {
    fn default() -> Self {
        Self {
            technology: default_technology_words(),
            education: default_education_words(),
            personal: default_personal_words(),
        }
    }
}

impl LanguageRules {
    /// Rules with every list empty. Nothing is a stop word, question word,
    /// greeting or topic keyword.
    pub fn empty() -> Self {
        Self {
            stop_words: Vec::new(),
            question_words: Vec::new(),
            greetings: Vec::new(),
            farewells: Vec::new(),
            positive_words: Vec::new(),
            negative_words: Vec::new(),
            topics: TopicKeywords {
                technology: Vec::new(),
                education: Vec::new(),
                personal: Vec::new(),
            },
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_stop_words() -> Vec<String> {
    words(&[
        "ve", "ile", "veya", "ama", "fakat", "bir", "bu", "şu", "o", "da", "de", "ki", "için",
        "gibi", "daha", "en", "her", "ya",
    ])
}

fn default_question_words() -> Vec<String> {
    words(&[
        "ne", "nedir", "neden", "niye", "niçin", "nasıl", "kim", "kimdir", "nerede", "nereye",
        "hangi", "kaç", "mi", "mı", "mu", "mü",
    ])
}

fn default_greetings() -> Vec<String> {
    words(&["merhaba", "selam", "selamlar", "günaydın", "hey", "naber"])
}

fn default_farewells() -> Vec<String> {
    words(&["görüşürüz", "hoşçakal", "hoşça", "güle", "elveda", "bye"])
}

fn default_positive_words() -> Vec<String> {
    words(&[
        "güzel", "harika", "mükemmel", "iyi", "süper", "mutlu", "sevindim", "teşekkürler",
        "seviyorum", "başarılı",
    ])
}

fn default_negative_words() -> Vec<String> {
    words(&[
        "kötü", "berbat", "üzgün", "mutsuz", "sinirli", "yorgun", "sıkıldım", "korkunç",
        "nefret", "başarısız",
    ])
}

fn default_technology_words() -> Vec<String> {
    words(&["python", "kod", "program", "bilgisayar", "yazılım", "uygulama"])
}

fn default_education_words() -> Vec<String> {
    words(&["öğren", "ders", "kitap", "okul", "öğretmen", "öğrenci"])
}

fn default_personal_words() -> Vec<String> {
    words(&["ben", "sen", "biz", "hayat", "aile", "arkadaş"])
}
