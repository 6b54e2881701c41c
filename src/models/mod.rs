mod message;
mod session;

pub use message::{expand_history, Message, MessageKind};
pub use session::Session;
