pub mod dispatch;
pub mod event;
pub mod offset;
pub mod poller;
pub mod queue;

pub use dispatch::{Dispatcher, EventHandler, HandlerContext};
pub use event::Event;
pub use offset::OffsetTracker;
pub use poller::{Backoff, Poller, FAILURE_THRESHOLD};
pub use queue::EventQueue;
