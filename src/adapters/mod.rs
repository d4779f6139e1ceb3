// Adapters layer: concrete implementations of the domain ports.

pub mod delivery;

pub use delivery::{
    build_message_link, LogOpener, MessagingLinkDelivery, RecordingOpener, SimulatedDelivery,
};
