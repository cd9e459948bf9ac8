// The core module contains all business logic.
// Nothing in here touches the filesystem or the terminal.

#[path = "text/mod.rs"]
pub mod text;

#[path = "knowledge/mod.rs"]
pub mod knowledge;
