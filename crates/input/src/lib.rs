//! Keyboard input mapped to camera intent.
//!
//! Hosts forward raw key events here; nothing in this crate listens for
//! events on its own.
//!
//! # Invariants
//! - Every accumulator component stays within [-1, 1].
//! - Opposing keys cancel; releasing one leaves the other active.

pub mod key;
pub mod state;

pub use key::{Accumulator, Axis, Binding, InputError, Key};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "walkthrough-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
