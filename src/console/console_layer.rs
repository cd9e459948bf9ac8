// Console adapter: turns the knowledge base into a chat partner on a terminal.

#[path = "replies.rs"]
pub mod replies;

#[path = "responder.rs"]
pub mod responder;

#[path = "repl.rs"]
pub mod repl;

pub use replies::{FirstSelector, RandomSelector, ReplySelector};
pub use responder::Responder;
