// Canned replies and the strategy that picks one of them.

use rand::Rng;

/// Chooses one reply out of a pool.
///
/// Returns the index of the chosen option, `None` for an empty pool.
pub trait ReplySelector {
    fn select(&self, options: &[&str]) -> Option<usize>;
}

/// Uniformly random choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl ReplySelector for RandomSelector {
    fn select(&self, options: &[&str]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        Some(rand::thread_rng().gen_range(0..options.len()))
    }
}

/// Always the first option. Keeps tests deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSelector;

impl ReplySelector for FirstSelector {
    fn select(&self, options: &[&str]) -> Option<usize> {
        if options.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

pub const EMPTY_INPUT: &str = "Bir şey söylemedin. Benimle sohbet etmek ister misin?";

pub const FAREWELLS: &[&str] = &[
    "Görüşmek üzere! Keyifli günler!",
    "Hoşça kal! Tekrar konuşmak için sabırsızlanıyorum!",
    "Güle güle! Benimle sohbet ettiğin için teşekkürler!",
];

pub const GREETINGS: &[&str] = &[
    "Merhaba! Nasılsın?",
    "Selam! Seninle tanışmak güzel! Bugün nasıl geçiyor?",
    "Hey! Benimle sohbet etmek için geldin, bu harika!",
];

pub const UNKNOWN_QUESTION: &[&str] = &[
    "Bu konuda henüz yeterince bilgim yok, ama öğrenmeye açığım! Bana daha fazla anlatır mısın?",
    "İlginç bir soru! Bu konuda benimle paylaşacağın bilgiler var mı?",
    "Bu soruyu cevaplamak için daha fazla bilgiye ihtiyacım var. Bana yardım eder misin?",
];

pub const TECHNOLOGY: &[&str] = &[
    "Teknoloji gerçekten heyecan verici! Bu konuda daha fazla bilgi paylaşır mısın?",
    "Yazılım geliştirme konusunda meraklıyım. Hangi teknolojilerle çalışıyorsun?",
    "Teknolojik gelişmeler beni de etkiliyor! Bu konuda neler düşünüyorsun?",
];

pub const EDUCATION: &[&str] = &[
    "Öğrenmeyi çok seviyorum! Sen de sürekli öğrenmeyi seviyor musun?",
    "Eğitim hayatımızı şekillendiren önemli bir süreç. Bu konuda ne düşünüyorsun?",
    "Bilgi paylaşmak güzel! Bana da öğretmek istediğin şeyler var mı?",
];

pub const PERSONAL_POSITIVE: &[&str] = &[
    "Bu güzel! Mutlu olduğunu duyduğuma sevindim!",
    "Harika! Olumlu enerjin beni de mutlu ediyor!",
    "Ne güzel! Böyle pozitif şeyler duymak çok hoş!",
];

pub const PERSONAL_NEGATIVE: &[&str] = &[
    "Üzgün olduğunu duyduğuma ben de üzüldüm. Konuşmak ister misin?",
    "Zor zamanlar geçirdiğin anlaşılıyor. Buradayım, dinliyorum.",
    "Her şey geçecek, merak etme. Seninle konuşmak beni mutlu ediyor.",
];

pub const PERSONAL_NEUTRAL: &[&str] = &[
    "Anlıyorum. Bu konuda nasıl hissettiğini merak ediyorum.",
    "İlginç bir durum. Bunun hakkında ne düşünüyorsun?",
    "Bu konuda daha fazla detay verebilir misin?",
];

pub const GENERAL: &[&str] = &[
    "Anlıyorum! Bu konuda benimle daha fazla konuşmak ister misin?",
    "İlginç! Bana bu konuda daha fazla bilgi verebilir misin?",
    "Senin bakış açın çok değerli. Daha fazla detay paylaşır mısın?",
    "Bu konuda öğrenmeye açığım. Bana öğretir misin?",
];
