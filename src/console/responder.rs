// Turns one user message into one reply: stored answer first, canned reply
// otherwise, and feeds meaningful exchanges back into the knowledge base.

use crate::core::knowledge::{KnowledgeBase, KnowledgePersistence};
use crate::core::text::{AnalysisRecord, Sentiment, Topic};

use super::replies::{self, ReplySelector};

/// Prefix for answers that came out of the knowledge base.
pub const LEARNED_PREFIX: &str = "(hatırlıyorum) ";

/// Messages shorter than this many tokens are not worth learning.
const MIN_TOKENS_TO_LEARN: usize = 3;

pub struct Responder<P: KnowledgePersistence, S: ReplySelector> {
    knowledge: KnowledgeBase<P>,
    selector: S,
    messages_handled: usize,
}

impl<P: KnowledgePersistence, S: ReplySelector> Responder<P, S> {
    pub fn new(knowledge: KnowledgeBase<P>, selector: S) -> Self {
        Self {
            knowledge,
            selector,
            messages_handled: 0,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase<P> {
        &self.knowledge
    }

    pub fn knowledge_mut(&mut self) -> &mut KnowledgeBase<P> {
        &mut self.knowledge
    }

    /// Messages answered in this session.
    pub fn messages_handled(&self) -> usize {
        self.messages_handled
    }

    pub fn respond(&mut self, text: &str) -> String {
        if text.trim().is_empty() {
            return replies::EMPTY_INPUT.to_string();
        }
        self.messages_handled += 1;

        let analysis = self.knowledge.analyze(text);

        if let Some(answer) = self.knowledge.best_answer(text) {
            // Already known; learning it again would only duplicate the entry.
            return format!("{}{}", LEARNED_PREFIX, answer);
        }

        let reply = self.fallback_reply(&analysis);
        self.learn_from(text, &reply, &analysis);
        reply
    }

    fn fallback_reply(&self, analysis: &AnalysisRecord) -> String {
        if analysis.is_farewell {
            return self.pick(replies::FAREWELLS);
        }
        if analysis.is_greeting {
            return self.pick(replies::GREETINGS);
        }
        if analysis.is_question {
            return self.answer_question(analysis.topic);
        }

        match analysis.topic {
            Topic::Technology => self.pick(replies::TECHNOLOGY),
            Topic::Education => self.pick(replies::EDUCATION),
            Topic::Personal => match analysis.sentiment {
                Sentiment::Positive => self.pick(replies::PERSONAL_POSITIVE),
                Sentiment::Negative => self.pick(replies::PERSONAL_NEGATIVE),
                Sentiment::Neutral => self.pick(replies::PERSONAL_NEUTRAL),
            },
            Topic::General => self.pick(replies::GENERAL),
        }
    }

    fn answer_question(&self, topic: Topic) -> String {
        match self.knowledge.by_topic(topic.as_str(), 1).first() {
            Some(entry) => format!(
                "{} konusunda şunu biliyorum: {}",
                topic_label(topic),
                entry.answer_text
            ),
            None => self.pick(replies::UNKNOWN_QUESTION),
        }
    }

    fn learn_from(&mut self, text: &str, reply: &str, analysis: &AnalysisRecord) {
        if analysis.tokens.len() < MIN_TOKENS_TO_LEARN
            || analysis.is_greeting
            || analysis.is_farewell
        {
            return;
        }

        match self
            .knowledge
            .learn(text, reply, Some(analysis.topic.as_str()))
        {
            Ok(id) => tracing::debug!(entry_id = %id, "Learned from conversation"),
            Err(e) => tracing::warn!("Could not learn from conversation: {}", e),
        }
    }

    fn pick(&self, options: &[&str]) -> String {
        self.selector
            .select(options)
            .and_then(|idx| options.get(idx))
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}

fn topic_label(topic: Topic) -> &'static str {
    match topic {
        Topic::Technology => "Teknoloji",
        Topic::Education => "Eğitim",
        Topic::Personal => "Kişisel",
        Topic::General => "Genel",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::replies::FirstSelector;
    use crate::core::knowledge::KnowledgeSettings;
    use crate::core::text::{Classifier, LanguageRules};
    use crate::infra::knowledge::InMemoryKnowledgeStore;

    fn responder() -> Responder<InMemoryKnowledgeStore, FirstSelector> {
        let kb = KnowledgeBase::open(
            InMemoryKnowledgeStore::new(),
            Classifier::new(&LanguageRules::default()),
            KnowledgeSettings::default(),
        );
        Responder::new(kb, FirstSelector)
    }

    #[test]
    fn test_empty_input() {
        let mut r = responder();
        assert_eq!(r.respond("   "), replies::EMPTY_INPUT);
        assert_eq!(r.messages_handled(), 0);
    }

    #[test]
    fn test_greeting_and_farewell_are_not_learned() {
        let mut r = responder();
        assert_eq!(r.respond("Merhaba, nasılsın bugün dostum?"), replies::GREETINGS[0]);
        assert_eq!(r.respond("Tamam o zaman görüşürüz"), replies::FAREWELLS[0]);
        assert!(r.knowledge().is_empty());
        assert_eq!(r.messages_handled(), 2);
    }

    #[test]
    fn test_unknown_question_then_topic_answer() {
        let mut r = responder();
        assert_eq!(r.respond("Python nedir?"), replies::UNKNOWN_QUESTION[0]);
        // too short to learn
        assert!(r.knowledge().is_empty());

        r.knowledge_mut()
            .learn("Python kodu nasıl yazılır", "Bol pratikle.", Some("technology"))
            .unwrap();
        let reply = r.respond("Bilgisayar nasıl çalışır?");
        assert_eq!(reply, "Teknoloji konusunda şunu biliyorum: Bol pratikle.");
    }

    #[test]
    fn test_learns_and_then_reuses() {
        let mut r = responder();
        let first = r.respond("Bugün hava çok güzel gerçekten");
        assert_eq!(first, replies::GENERAL[0]);
        assert_eq!(r.knowledge().len(), 1);

        let second = r.respond("Bugün hava çok güzel gerçekten");
        assert_eq!(second, format!("{}{}", LEARNED_PREFIX, replies::GENERAL[0]));
        // reuse does not create a duplicate
        assert_eq!(r.knowledge().len(), 1);
    }

    #[test]
    fn test_personal_reply_follows_sentiment() {
        let mut r = responder();
        assert_eq!(
            r.respond("ailem ve ben harika hissediyorum"),
            replies::PERSONAL_POSITIVE[0]
        );
        assert_eq!(
            r.respond("arkadaş yüzünden çok üzgün ve yorgunum"),
            replies::PERSONAL_NEGATIVE[0]
        );
    }

    #[test]
    fn test_topic_replies() {
        let mut r = responder();
        assert_eq!(r.respond("yazılım geliştirmek eğlenceli"), replies::TECHNOLOGY[0]);
        assert_eq!(r.respond("okul yarın başlıyor"), replies::EDUCATION[0]);
    }
}
