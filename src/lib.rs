//! **oscore** is a bit-exact codec and address-pattern dispatcher for
//! [OSC 1.1](http://opensoundcontrol.org/spec-1_1) carried over UDP.
//!
//! The crate is split into two halves that mirror the two places all of the
//! interesting engineering lives:
//!
//! - [`decoder`]/[`encoder`]: a fixed-width, big-endian, four-byte-padded
//!   wire format for messages and (recursively nested) bundles.
//! - [`address`]: a trie of address parts that resolves glob-style OSC
//!   address patterns (`*`, `?`, `[...]`, `{...}`) against registered
//!   callbacks, and [`receiver`], the thin facade that walks a decoded
//!   packet and dispatches every contained message through that trie.
//!
//! Neither half opens a socket or runs an event loop: the crate is driven by
//! whatever transport the embedder chooses, via [`receiver::Receiver::on_datagram`].

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as core;
#[cfg(feature = "std")]
#[macro_use]
extern crate std as alloc;

extern crate nom;

/// Crate specific error types.
mod errors;
/// OSC data types: arguments, messages, bundles, time tags.
mod types;

pub use crate::errors::*;
pub use crate::types::*;

/// The address tree: registration, removal, and glob-pattern lookup of
/// callbacks keyed by OSC address.
#[cfg(feature = "std")]
pub mod address;
/// Provides a decoding method for OSC packets.
pub mod decoder;
/// Encodes an `OscPacket` to a byte vector.
pub mod encoder;
/// Stand-alone glob matcher used by the address tree (`*`, `?`, `[...]`, `{...}`).
pub mod pattern;
/// The pure `(bytes, source_addr) -> dispatch` facade a transport drives.
#[cfg(feature = "std")]
pub mod receiver;
