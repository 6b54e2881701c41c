pub mod output;

pub use output::{
    display_conversation, display_message, display_notice, display_resolution, display_sessions,
    display_thinking, display_welcome,
};
