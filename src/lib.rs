// A small conversational assistant that learns from what it is told.
//
// **Architecture Overview:**
// - `core/` = Business logic (text analysis, knowledge base, persistence port)
// - `infra/` = Implementations of core traits (JSON files, memory) and config
// - `console/` = Terminal adapter (reply selection, chat loop)

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
#[path = "console/console_layer.rs"]
pub mod console;
