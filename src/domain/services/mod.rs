mod chat_session;
mod demux;
mod frames;
mod transcript;

pub use chat_session::*;
pub use demux::*;
pub use frames::*;
pub use transcript::*;
