pub mod events;
mod poller;
mod state;

pub use poller::{AvailabilityPoller, PollExit, POLL_INTERVAL};
pub use state::{
    transition, AvailabilityTracker, Latches, PairAvailability, PollEffect, PollStep, Transition,
};
