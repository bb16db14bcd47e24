//! The receive-and-dispatch loop of the engine's inbound path.
//!
//! One [`Listener`] runs per engine instance, on its own dedicated thread. It
//! pulls datagrams off the multicast socket, classifies each as a query or a
//! response, and routes it to the engine's [`PacketDispatcher`]. Nothing in
//! the engine depends on the listener; it is the leaf driver of the inbound
//! path.
//!
//! Shutdown is cooperative and flag-based. The lifecycle flags are polled at
//! the top of every iteration and again right after each receive; a listener
//! parked in a blocking receive is unblocked only by the engine closing the
//! socket, which surfaces as a receive error. That leaves a bounded race
//! window between a shutdown request and the listener noticing it, bounded by
//! however long the in-flight receive takes to return.

use std::net::IpAddr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bytes::BytesMut;

use crate::config::{EngineConfig, MAX_MSG_SIZE};
use crate::error::Result;
use crate::filter::PacketFilter;
use crate::lifecycle::LifecycleFlags;
use crate::message::{IncomingMessage, IncomingPacket};
use crate::socket::PacketSocket;

/// The engine's handler surface for classified inbound messages.
///
/// `handle_query` and `handle_response` may themselves perform I/O; their
/// errors are logged by the listener and never escape the loop. `recover` is
/// invoked at most once per listener lifetime, only when the receive call
/// fails while no shutdown flag is set; its contract is to rebuild the socket
/// and spin up a replacement listener.
pub trait PacketDispatcher {
    /// Handle an inbound query, addressed to `addr`:`port`.
    ///
    /// For a query received from a port other than the well-known port this
    /// is called twice: first with the packet's actual source address and
    /// port, then with the group address and well-known port.
    fn handle_query(&self, msg: &IncomingMessage, addr: IpAddr, port: u16) -> Result<()>;

    /// Handle an inbound response.
    fn handle_response(&self, msg: &IncomingMessage) -> Result<()>;

    /// Rebuild the transport after an unexpected receive failure.
    fn recover(&self);
}

/// Listen for multicast packets.
///
/// Owns a reusable receive buffer sized [`MAX_MSG_SIZE`] and, once
/// [`spawn`](Listener::spawn)ed, a dedicated thread named after the owning
/// engine. The thread exits cleanly on all paths: explicit cancellation,
/// shutdown-triggered receive failure, or unexpected failure after triggering
/// recovery. The engine observes termination through the lifecycle flags it
/// itself sets; no join handle is kept.
pub struct Listener<S, F, D> {
    name: String,
    group_address: IpAddr,
    well_known_port: u16,
    throttle_delay: Duration,
    lifecycle: Arc<LifecycleFlags>,
    socket: Arc<S>,
    filter: F,
    dispatcher: Arc<D>,
}

impl<S, F, D> Listener<S, F, D>
where
    S: PacketSocket,
    F: PacketFilter,
    D: PacketDispatcher,
{
    /// Create a listener bound to one engine instance.
    pub fn new(
        config: &EngineConfig,
        lifecycle: Arc<LifecycleFlags>,
        socket: Arc<S>,
        filter: F,
        dispatcher: Arc<D>,
    ) -> Self {
        Self {
            name: config.name.clone(),
            group_address: IpAddr::V4(config.group_address),
            well_known_port: config.well_known_port,
            throttle_delay: config.throttle_delay,
            lifecycle,
            socket,
            filter,
            dispatcher,
        }
    }

    /// Name of the owning engine instance, for identification and logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dispatcher this listener routes to.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Returns `true` if the sleep was cut short by a shutdown request.
    fn throttle(&self) -> bool {
        if self.throttle_delay > Duration::ZERO {
            return self.lifecycle.wait_timeout(self.throttle_delay);
        }
        false
    }

    /// Drive the receive loop until a terminal condition.
    ///
    /// Runs on the calling thread; production code uses
    /// [`spawn`](Listener::spawn) instead. Public so the loop can be driven
    /// deterministically in tests.
    pub fn run(self) {
        let mut buf = BytesMut::zeroed(MAX_MSG_SIZE);

        while !self.lifecycle.is_canceling() && !self.lifecycle.is_canceled() {
            // An early wake from the throttle is a cooperative cancellation
            // signal; return to the loop check instead of blocking in a
            // receive that shutdown would then have to unblock.
            if self.throttle() {
                continue;
            }

            // A previous short packet must not leak a stale length into this
            // iteration.
            buf.resize(MAX_MSG_SIZE, 0);

            let (len, src) = match self.socket.receive(&mut buf) {
                Ok(v) => v,
                Err(err) => {
                    if !self.lifecycle.any_set() {
                        log::warn!("{}: receive failed: {err}", self.name);
                        self.dispatcher.recover();
                    }
                    break;
                }
            };

            // A packet arriving in the shutdown race window is discarded, not
            // processed.
            if self.lifecycle.any_set() {
                break;
            }

            let packet = IncomingPacket {
                data: &buf[..len],
                addr: src.ip(),
                port: src.port(),
            };

            if self.filter.should_ignore(&packet) {
                continue;
            }

            self.process(&packet);
        }

        log::trace!("{}: run() exiting", self.name);
    }

    /// Decode, validate, and dispatch one datagram.
    ///
    /// All faults here are per-message: logged and swallowed so the loop
    /// continues with the next receive.
    fn process(&self, packet: &IncomingPacket<'_>) {
        let msg = match IncomingMessage::decode(packet) {
            Ok(msg) => msg,
            Err(err) => {
                log::warn!(
                    "{}: dropping malformed packet from {}:{}: {err}",
                    self.name,
                    packet.addr,
                    packet.port
                );
                return;
            }
        };

        if !msg.is_valid_response_code() {
            log::debug!("{}: in message with error code: {msg}", self.name);
            return;
        }

        log::trace!("{}: in: {msg}", self.name);

        if msg.is_query() {
            if packet.port != self.well_known_port {
                // Unicast-origin query: targeted reply path first.
                if let Err(err) = self.dispatcher.handle_query(&msg, packet.addr, packet.port) {
                    log::warn!("{}: query handler failed: {err}", self.name);
                }
            }
            // Then the group-wide path, regardless of origin port.
            if let Err(err) =
                self.dispatcher
                    .handle_query(&msg, self.group_address, self.well_known_port)
            {
                log::warn!("{}: query handler failed: {err}", self.name);
            }
        } else if let Err(err) = self.dispatcher.handle_response(&msg) {
            log::warn!("{}: response handler failed: {err}", self.name);
        }
    }
}

impl<S, F, D> Listener<S, F, D>
where
    S: PacketSocket + Send + Sync + 'static,
    F: PacketFilter + Send + 'static,
    D: PacketDispatcher + Send + Sync + 'static,
{
    /// Start the receive loop on its own thread.
    ///
    /// The thread is named `SocketListener(<engine name>)` and its handle is
    /// dropped: the listener never blocks process shutdown, and the engine
    /// tracks completion via the lifecycle flags instead of a join.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(self) -> Result<()> {
        let thread_name = format!("SocketListener({})", self.name);
        thread::Builder::new()
            .name(thread_name)
            .spawn(move || self.run())?;
        Ok(())
    }
}
