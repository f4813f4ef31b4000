pub mod dev;
pub mod page;

pub use dev::{handle_events, DevState, RELOAD_SCRIPT};
pub use page::handle_page;
