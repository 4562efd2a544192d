//! The thin facade a transport drives: feed it raw datagram bytes, it
//! decodes them and dispatches every contained message through an
//! [`AddressTree`](crate::address::AddressTree). It never opens a socket or
//! runs an event loop itself.

use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use crate::address::{AddressTree, CallbackId};
use crate::errors::OscError;
use crate::types::{OscMessage, OscPacket};

/// Wraps an [`AddressTree`] behind a lock so it can be shared across however
/// many tasks or threads feed it datagrams, and drives message dispatch.
///
/// Registration (`add_callback`/`remove_callback`/...) takes a write lock
/// for the duration of the mutation. Dispatch takes a read lock only long
/// enough to clone out the matched callbacks, then releases it before
/// invoking any of them — a callback that registers or removes another
/// callback won't deadlock, and a slow callback doesn't block unrelated
/// dispatch.
#[derive(Clone)]
pub struct Receiver {
    tree: Arc<RwLock<AddressTree>>,
}

impl Receiver {
    /// A receiver over an empty address tree.
    pub fn new() -> Self {
        Receiver {
            tree: Arc::new(RwLock::new(AddressTree::new())),
        }
    }

    /// Registers `callback` at `address`. See
    /// [`AddressTree::add_callback`] for the address rules.
    pub fn add_callback<F>(&self, address: &str, callback: F) -> Result<CallbackId, OscError>
    where
        F: Fn(&OscMessage) + Send + Sync + 'static,
    {
        self.tree
            .write()
            .expect("address tree lock poisoned")
            .add_callback(address, callback)
    }

    /// Removes a single callback previously returned by `add_callback`.
    pub fn remove_callback(&self, address: &str, id: CallbackId) -> Result<(), OscError> {
        self.tree
            .write()
            .expect("address tree lock poisoned")
            .remove_callback(address, id)
    }

    /// Removes every callback registered exactly at `address`.
    pub fn remove_all_callbacks(&self, address: &str) -> Result<usize, OscError> {
        self.tree
            .write()
            .expect("address tree lock poisoned")
            .remove_all_callbacks(address)
    }

    /// Decodes `datagram` and dispatches every message it contains — a
    /// bundle's elements are walked recursively in the order they appear,
    /// depth-first. `source` is passed through to `tracing` events only; the
    /// crate does not otherwise use it.
    ///
    /// A decode failure is logged and returned without touching the tree. A
    /// callback that panics is caught and logged; it does not stop the
    /// remaining callbacks (for this message or later ones) from running.
    pub fn on_datagram(&self, datagram: &[u8], source: SocketAddr) -> Result<(), OscError> {
        let (packet, _) = crate::decoder::decode(datagram).map_err(|e| {
            tracing::warn!(%source, error = %e, "failed to decode OSC datagram");
            e
        })?;
        self.dispatch_packet(&packet, source);
        Ok(())
    }

    fn dispatch_packet(&self, packet: &OscPacket, source: SocketAddr) {
        match packet {
            OscPacket::Message(msg) => self.dispatch_message(msg, source),
            OscPacket::Bundle(bundle) => {
                for element in &bundle.content {
                    self.dispatch_packet(element, source);
                }
            }
        }
    }

    fn dispatch_message(&self, msg: &OscMessage, source: SocketAddr) {
        let matched = {
            let tree = self.tree.read().expect("address tree lock poisoned");
            match tree.matching_callbacks(&msg.addr) {
                Ok(callbacks) => callbacks,
                Err(e) => {
                    tracing::warn!(%source, addr = %msg.addr, error = %e, "address dispatch failed");
                    return;
                }
            }
        };

        tracing::trace!(%source, addr = %msg.addr, matches = matched.len(), "dispatching message");

        for callback in matched {
            let result = catch_unwind(AssertUnwindSafe(|| callback(msg)));
            if result.is_err() {
                tracing::warn!(%source, addr = %msg.addr, "callback panicked during dispatch");
            }
        }
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Receiver::new()
    }
}
