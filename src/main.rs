// Entry point of the learning assistant.
//
// This file's job is to:
// 1. Load configuration
// 2. Pick a persistence adapter and open the knowledge base
// 3. Run the chat loop on stdin/stdout

use learning_assistant::console::{repl, RandomSelector, Responder};
use learning_assistant::core::knowledge::{KnowledgeBase, KnowledgePersistence};
use learning_assistant::core::text::Classifier;
use learning_assistant::infra::config::{AssistantConfig, StorageBackend};
use learning_assistant::infra::knowledge::{InMemoryKnowledgeStore, JsonKnowledgeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the conversation.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AssistantConfig::from_env();
    tracing::info!(
        backend = ?config.storage.backend,
        similarity_threshold = config.knowledge.similarity_threshold,
        reuse_threshold = config.knowledge.reuse_threshold,
        auto_save = config.knowledge.auto_save,
        "Configuration loaded"
    );

    let persistence: Box<dyn KnowledgePersistence> = match config.storage.backend {
        StorageBackend::Json => Box::new(JsonKnowledgeStore::new(
            &config.storage.knowledge_path,
            &config.storage.history_path,
        )),
        StorageBackend::Memory => Box::new(InMemoryKnowledgeStore::new()),
    };

    let classifier = Classifier::new(&config.rules);
    let knowledge = KnowledgeBase::open(persistence, classifier, config.knowledge.clone());
    let mut responder = Responder::new(knowledge, RandomSelector);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    repl::run(&mut responder, stdin, tokio::io::stdout(), interrupt).await
}
