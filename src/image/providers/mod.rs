//! Image generation providers.

mod pollinations;

pub use pollinations::{PollinationsProvider, PollinationsProviderBuilder};
