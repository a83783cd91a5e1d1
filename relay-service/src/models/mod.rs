pub mod conversation;
pub mod enquiry;

pub use conversation::{
    append_turn, normalize_history, Author, ChatMessage, ConversationTurn, Role,
};
pub use enquiry::{is_bot_submission, normalize_website, Enquiry, LeadRequest};
