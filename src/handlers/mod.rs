mod command;
mod reminder;

pub use command::*;
pub use reminder::*;
