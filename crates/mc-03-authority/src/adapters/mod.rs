//! Adapter implementations of the outbound ports

mod clock;
mod signer;

pub use clock::{ManualClock, SystemClock};
pub use signer::KeyPairSigner;
