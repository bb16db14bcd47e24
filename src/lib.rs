//! # mdns-engine
//!
//! The receive-and-dispatch core of a multicast DNS (mDNS) engine.
//!
//! This crate provides the inbound path of an mDNS-style service discovery
//! engine: a dedicated [`Listener`] thread that continuously pulls datagrams
//! off a multicast socket, classifies each as a query or a response, and
//! routes it to the engine's handlers, while cooperating with the engine's
//! lifecycle (canceling, closing, recovering from transient socket failure).
//!
//! ## What is mDNS?
//!
//! Multicast DNS (mDNS) is a protocol that allows devices on a local network
//! to discover each other without a central DNS server. It's commonly used
//! for service discovery (finding printers, media servers, etc.) and
//! zero-configuration networking (Bonjour, Avahi).
//!
//! ## Design
//!
//! The listener is the only place where concurrency, blocking I/O,
//! cancellation races, and failure recovery all meet:
//!
//! - **One thread per listener**: a named background thread blocks in
//!   `recv_from` for the engine's lifetime; no worker pool, no pipelining.
//!   Packets are processed strictly in receipt order.
//! - **Polled, flag-based shutdown**: the engine flips [`LifecycleFlags`]
//!   (monotonic, one-way booleans) which the listener polls at the loop head
//!   and again right after each receive. A blocked receive is unblocked by
//!   the engine closing the socket, never by forced thread interruption.
//! - **Two failure classes**: per-message faults (malformed packets, handler
//!   errors) are logged and the loop continues; a transport-level receive
//!   failure terminates the loop, triggering [`PacketDispatcher::recover`]
//!   when no shutdown flag explains it.
//! - **Traits at the seams**: the socket ([`PacketSocket`]), the self-packet
//!   filter ([`PacketFilter`]), and the handler surface
//!   ([`PacketDispatcher`]) are traits, so the loop can be driven
//!   deterministically in tests without any network I/O.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdns_engine::{
//!     EngineConfig, LifecycleFlags, Listener, LocalHostFilter, MulticastSocket,
//! };
//! use std::sync::Arc;
//! # use mdns_engine::{IncomingMessage, PacketDispatcher, Result};
//! # use std::net::IpAddr;
//! # struct Engine;
//! # impl PacketDispatcher for Engine {
//! #     fn handle_query(&self, _: &IncomingMessage, _: IpAddr, _: u16) -> Result<()> { Ok(()) }
//! #     fn handle_response(&self, _: &IncomingMessage) -> Result<()> { Ok(()) }
//! #     fn recover(&self) {}
//! # }
//!
//! # fn main() -> Result<()> {
//! let config = EngineConfig::default().with_name("my-engine");
//! let lifecycle = Arc::new(LifecycleFlags::new());
//! let socket = Arc::new(MulticastSocket::new().into_std()?);
//! let dispatcher = Arc::new(Engine); // your PacketDispatcher impl
//!
//! let listener = Listener::new(
//!     &config,
//!     Arc::clone(&lifecycle),
//!     socket,
//!     LocalHostFilter::default(),
//!     dispatcher,
//! );
//! listener.spawn()?;
//!
//! // ... later, shut down: set the flags, then close the socket to unblock
//! // the listener's in-flight receive.
//! lifecycle.set_canceling();
//! # Ok(())
//! # }
//! ```
//!
//! ## Protocol Details
//!
//! - **Multicast Address**: 224.0.0.251:5353 (IPv4)
//! - **Maximum message size**: 8972 bytes (9000 less IP/UDP headers)
//! - A query arriving from a port other than 5353 is dispatched twice: once
//!   to its actual source address/port (targeted reply path), then to the
//!   group address and well-known port (group-wide path), in that order.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod listener;
pub mod message;
pub mod socket;

pub use config::{EngineConfig, MAX_MSG_SIZE, MDNS_DEST_ADDR, MDNS_MULTICAST_IPV4, MDNS_PORT};
pub use error::{Error, Result};
pub use filter::{LocalHostFilter, PacketFilter};
pub use lifecycle::LifecycleFlags;
pub use listener::{Listener, PacketDispatcher};
pub use message::{Header, IncomingMessage, IncomingPacket, OpCode, RCode};
pub use socket::{MulticastSocket, PacketSocket};
