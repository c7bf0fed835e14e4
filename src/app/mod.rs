mod messages;
mod state;
mod update;

pub use messages::Message;
pub use state::{App, Panes, PageView};
pub use update::{Effect, EffectRunner, Session, SessionHandle, parse_command};
