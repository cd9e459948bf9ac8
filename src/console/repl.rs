// Line-oriented chat loop over any async reader/writer pair.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::core::knowledge::{KnowledgePersistence, Statistics};

use super::replies::ReplySelector;
use super::responder::Responder;

const PROMPT: &str = "Sen: ";
const ASSISTANT: &str = "Asistan: ";

const BANNER: &str = "\
Öğrenen asistan hazır. Yazdıklarından öğrenirim.
Komutlar için 'yardım' yaz, çıkmak için 'çıkış'.
";

const HELP: &str = "\
Komutlar:
  yardım, help            bu mesaj
  istatistik, stats       bilgi tabanı istatistikleri
  kaydet, save            bilgi tabanını şimdi kaydet
  çıkış, exit, quit       kaydet ve çık
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Exit,
    Stats,
    Save,
    Help,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "exit" | "quit" | "çıkış" => Some(Command::Exit),
            "stats" | "istatistik" | "istatistikler" => Some(Command::Stats),
            "save" | "kaydet" => Some(Command::Save),
            "help" | "yardım" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Runs the chat loop until an exit command, end of input or `interrupt`
/// resolving. The knowledge base is saved on the way out in every case.
pub async fn run<P, S, R, W, I>(
    responder: &mut Responder<P, S>,
    reader: R,
    mut writer: W,
    interrupt: I,
) -> anyhow::Result<()>
where
    P: KnowledgePersistence,
    S: ReplySelector,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Future<Output = ()>,
{
    writer.write_all(BANNER.as_bytes()).await?;
    let mut lines = reader.lines();
    tokio::pin!(interrupt);

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let next = tokio::select! {
            biased;
            _ = &mut interrupt => {
                tracing::info!("Interrupted");
                writer.write_all(b"\n").await?;
                save_and_report(responder, &mut writer).await?;
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = next else {
            tracing::info!("Input closed");
            writer.write_all(b"\n").await?;
            save_and_report(responder, &mut writer).await?;
            break;
        };
        let input = line.trim();

        match Command::parse(input) {
            Some(Command::Exit) => {
                save_and_report(responder, &mut writer).await?;
                writer.write_all("Görüşmek üzere!\n".as_bytes()).await?;
                break;
            }
            Some(Command::Stats) => {
                let text = format_stats(&responder.knowledge().stats(), responder.messages_handled());
                writer.write_all(text.as_bytes()).await?;
            }
            Some(Command::Save) => save_and_report(responder, &mut writer).await?,
            Some(Command::Help) => writer.write_all(HELP.as_bytes()).await?,
            None if input.is_empty() => {}
            None => {
                let reply = responder.respond(input);
                writer
                    .write_all(format!("{}{}\n", ASSISTANT, reply).as_bytes())
                    .await?;
            }
        }
    }

    writer.flush().await?;
    Ok(())
}

async fn save_and_report<P, S, W>(responder: &Responder<P, S>, writer: &mut W) -> anyhow::Result<()>
where
    P: KnowledgePersistence,
    S: ReplySelector,
    W: AsyncWrite + Unpin,
{
    let message = match responder.knowledge().save() {
        Ok(()) => {
            tracing::info!(entries = responder.knowledge().len(), "Knowledge base saved");
            "Bilgi tabanı kaydedildi.\n".to_string()
        }
        Err(e) => {
            tracing::error!("Failed to save knowledge base: {}", e);
            format!("Kaydetme başarısız: {}\n", e)
        }
    };
    writer.write_all(message.as_bytes()).await?;
    Ok(())
}

fn format_stats(stats: &Statistics, session_messages: usize) -> String {
    let last_learned = stats
        .last_learned
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "henüz yok".to_string());

    format!(
        "İstatistikler:\n  \
         Toplam bilgi: {}\n  \
         Konu sayısı: {}\n  \
         Başarılı öğrenme: {}\n  \
         Başarısız öğrenme: {}\n  \
         Başarı oranı: %{:.1}\n  \
         Son öğrenme: {}\n  \
         Bu oturumdaki mesajlar: {}\n",
        stats.total_entries,
        stats.topic_count,
        stats.successful_learnings,
        stats.failed_learnings,
        stats.success_rate,
        last_learned,
        session_messages,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::replies::{self, FirstSelector};
    use crate::core::knowledge::{KnowledgeBase, KnowledgeSettings};
    use crate::core::text::{Classifier, LanguageRules};
    use crate::infra::knowledge::{InMemoryKnowledgeStore, JsonKnowledgeStore};
    use tempfile::TempDir;

    fn responder_with<P: KnowledgePersistence>(store: P) -> Responder<P, FirstSelector> {
        let kb = KnowledgeBase::open(
            store,
            Classifier::new(&LanguageRules::default()),
            KnowledgeSettings::default(),
        );
        Responder::new(kb, FirstSelector)
    }

    async fn session<P: KnowledgePersistence>(
        responder: &mut Responder<P, FirstSelector>,
        input: &str,
    ) -> String {
        let mut out = Vec::new();
        run(responder, input.as_bytes(), &mut out, std::future::pending())
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("ÇIKIŞ"), None);
        assert_eq!(Command::parse("çıkış"), Some(Command::Exit));
        assert_eq!(Command::parse("Quit"), Some(Command::Exit));
        assert_eq!(Command::parse("istatistik"), Some(Command::Stats));
        assert_eq!(Command::parse("istatistikler"), Some(Command::Stats));
        assert_eq!(Command::parse("kaydet"), Some(Command::Save));
        assert_eq!(Command::parse("yardım"), Some(Command::Help));
        assert_eq!(Command::parse("merhaba"), None);
    }

    #[tokio::test]
    async fn test_conversation_then_exit() {
        let mut responder = responder_with(InMemoryKnowledgeStore::new());
        let output = session(&mut responder, "merhaba\n\nexit\nbu satır okunmaz\n").await;

        assert!(output.contains(&format!("{}{}", ASSISTANT, replies::GREETINGS[0])));
        assert!(output.contains("Bilgi tabanı kaydedildi."));
        assert!(output.contains("Görüşmek üzere!"));
        // the blank line is skipped and nothing after exit is processed
        assert_eq!(responder.messages_handled(), 1);
    }

    #[tokio::test]
    async fn test_stats_and_help() {
        let mut responder = responder_with(InMemoryKnowledgeStore::new());
        let output = session(
            &mut responder,
            "Bugün hava çok güzel gerçekten\nstats\nhelp\nquit\n",
        )
        .await;

        assert!(output.contains("Toplam bilgi: 1"));
        assert!(output.contains("Başarı oranı: %100.0"));
        assert!(output.contains("Bu oturumdaki mesajlar: 1"));
        assert!(output.contains("Komutlar:"));
    }

    #[tokio::test]
    async fn test_eof_saves_to_disk() {
        let dir = TempDir::new().unwrap();
        let knowledge = dir.path().join("knowledge_base.json");
        let history = dir.path().join("learning_history.json");
        let settings = KnowledgeSettings {
            auto_save: false,
            ..Default::default()
        };
        let kb = KnowledgeBase::open(
            JsonKnowledgeStore::new(&knowledge, &history),
            Classifier::new(&LanguageRules::default()),
            settings,
        );
        let mut responder = Responder::new(kb, FirstSelector);

        let output = session(&mut responder, "Bugün hava çok güzel gerçekten").await;
        assert!(output.contains("Bilgi tabanı kaydedildi."));
        assert!(knowledge.exists());
        assert!(history.exists());

        let reloaded = responder_with(JsonKnowledgeStore::new(&knowledge, &history));
        assert_eq!(reloaded.knowledge().len(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_saves_reuse_counts() {
        let dir = TempDir::new().unwrap();
        let knowledge = dir.path().join("knowledge_base.json");
        let history = dir.path().join("learning_history.json");
        let mut responder = responder_with(JsonKnowledgeStore::new(&knowledge, &history));

        let id = responder
            .knowledge_mut()
            .learn("Bugün hava çok güzel gerçekten", "Evet!", Some("general"))
            .unwrap();
        // reuse bumps use_count in memory only
        responder.respond("Bugün hava çok güzel gerçekten");
        assert_eq!(responder.knowledge().entry(&id).unwrap().use_count, 2);

        let mut out = Vec::new();
        run(
            &mut responder,
            "bu satır okunmaz\n".as_bytes(),
            &mut out,
            std::future::ready(()),
        )
        .await
        .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Bilgi tabanı kaydedildi."));
        assert_eq!(responder.messages_handled(), 1);

        let reloaded = responder_with(JsonKnowledgeStore::new(&knowledge, &history));
        assert_eq!(reloaded.knowledge().entry(&id).unwrap().use_count, 2);
    }

    #[tokio::test]
    async fn test_failed_save_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("knowledge_base.json");
        std::fs::create_dir_all(&blocked).unwrap();
        let mut responder = responder_with(JsonKnowledgeStore::new(
            &blocked,
            dir.path().join("learning_history.json"),
        ));

        let output = session(&mut responder, "kaydet\nçıkış\n").await;
        assert!(output.contains("Kaydetme başarısız"));
    }
}
