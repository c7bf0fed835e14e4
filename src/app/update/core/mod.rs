mod commands;
mod reducer;
mod runtime;
mod session;

use super::super::messages::Message;
use super::super::state::App;

pub use commands::parse_command;
pub use runtime::EffectRunner;
pub use session::{Session, SessionHandle};

impl App {
    pub fn update(&mut self, message: Message, runner: &EffectRunner) {
        for effect in self.reduce(message) {
            runner.run(effect);
        }
    }
}
