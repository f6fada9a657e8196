mod backend;
mod message;
mod slash_commands;
mod stream_event;
mod user_role;

pub use backend::*;
pub use message::*;
pub use slash_commands::*;
pub use stream_event::*;
pub use user_role::*;
