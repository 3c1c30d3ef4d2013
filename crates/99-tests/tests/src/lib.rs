//! End-to-end scenarios for the helm control plane.
//!
//! Each module drives a fully assembled [`app::Application`] against the
//! headless renderer. The threaded ones pace themselves on what the control
//! plane publishes (vocabulary, renderer ledger) rather than on sleeps.

#[cfg(test)]
mod support;

#[cfg(test)]
mod console_e2e;

#[cfg(test)]
mod native_e2e;

#[cfg(test)]
mod replay_e2e;
