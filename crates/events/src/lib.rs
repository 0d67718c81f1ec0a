//! Change notification plumbing.
//!
//! Two delivery styles are offered:
//!
//! - [`Listeners`]: synchronous callbacks, invoked before the publishing call
//!   returns. This is what the catalog store uses to keep readers in step.
//! - [`EventBus`]: channel fan-out, for consumers that poll at their own pace.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod listeners;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use listeners::{ListenerHandle, Listeners};
