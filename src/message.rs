//! Header-level decoding of inbound mDNS datagrams.
//!
//! The inbound path only needs enough of the wire format to classify a
//! datagram: is it a query or a response, and does it carry an error code.
//! Section contents are left to the engine's handlers.

use std::fmt;
use std::net::IpAddr;

use crate::error::{Error, Result};

// An OpCode is a DNS operation code.
pub type OpCode = u16;

// An RCode is a DNS response status code.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum RCode {
    #[default]
    Success = 0,
    FormatError = 1,
    ServerFailure = 2,
    NameError = 3,
    NotImplemented = 4,
    Refused = 5,
    Unsupported,
}

impl From<u8> for RCode {
    fn from(v: u8) -> Self {
        match v {
            0 => RCode::Success,
            1 => RCode::FormatError,
            2 => RCode::ServerFailure,
            3 => RCode::NameError,
            4 => RCode::NotImplemented,
            5 => RCode::Refused,
            _ => RCode::Unsupported,
        }
    }
}

impl fmt::Display for RCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RCode::Success => "RCodeSuccess",
            RCode::FormatError => "RCodeFormatError",
            RCode::ServerFailure => "RCodeServerFailure",
            RCode::NameError => "RCodeNameError",
            RCode::NotImplemented => "RCodeNotImplemented",
            RCode::Refused => "RCodeRefused",
            RCode::Unsupported => "RCodeUnsupported",
        };
        write!(f, "{s}")
    }
}

// HEADER_LEN is the length (in bytes) of a DNS header.
//
// A header is comprised of 6 uint16s and no padding.
const HEADER_LEN: usize = 12;

const HEADER_BIT_QR: u16 = 1 << 15; // query/response (response=1)
const HEADER_BIT_AA: u16 = 1 << 10; // authoritative
const HEADER_BIT_TC: u16 = 1 << 9; // truncated
const HEADER_BIT_RD: u16 = 1 << 8; // recursion desired
const HEADER_BIT_RA: u16 = 1 << 7; // recursion available

const HEADER_MASK_OPCODE: u16 = 0x7800;
const HEADER_MASK_RCODE: u16 = 0x000F;

fn unpack_uint16(msg: &[u8], off: usize) -> Result<(u16, usize)> {
    if off + 2 > msg.len() {
        return Err(Error::ErrShortHeader);
    }
    Ok((u16::from_be_bytes([msg[off], msg[off + 1]]), off + 2))
}

// Header is a representation of a DNS message header.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub response: bool,
    pub op_code: OpCode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub rcode: RCode,
    pub questions: u16,
    pub answers: u16,
    pub authorities: u16,
    pub additionals: u16,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dnsmessage.Header{{id: {}, response: {}, op_code: {}, authoritative: {}, truncated: {}, recursion_desired: {}, rcode: {}}}",
            self.id,
            self.response,
            self.op_code,
            self.authoritative,
            self.truncated,
            self.recursion_desired,
            self.rcode
        )
    }
}

impl Header {
    // Unpack parses a header from the start of msg.
    pub fn unpack(msg: &[u8]) -> Result<Header> {
        let (id, off) = unpack_uint16(msg, 0)?;
        let (bits, off) = unpack_uint16(msg, off)?;
        let (questions, off) = unpack_uint16(msg, off)?;
        let (answers, off) = unpack_uint16(msg, off)?;
        let (authorities, off) = unpack_uint16(msg, off)?;
        let (additionals, _) = unpack_uint16(msg, off)?;

        Ok(Header {
            id,
            response: bits & HEADER_BIT_QR != 0,
            op_code: (bits & HEADER_MASK_OPCODE) >> 11,
            authoritative: bits & HEADER_BIT_AA != 0,
            truncated: bits & HEADER_BIT_TC != 0,
            recursion_desired: bits & HEADER_BIT_RD != 0,
            recursion_available: bits & HEADER_BIT_RA != 0,
            rcode: RCode::from((bits & HEADER_MASK_RCODE) as u8),
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

/// One datagram as it came off the socket.
///
/// Borrows the listener's receive buffer; lives for a single loop iteration.
#[derive(Debug, Clone, Copy)]
pub struct IncomingPacket<'a> {
    /// The datagram payload.
    pub data: &'a [u8],
    /// Source IP address of the datagram.
    pub addr: IpAddr,
    /// Source port of the datagram.
    pub port: u16,
}

/// A decoded view over one [`IncomingPacket`].
///
/// Carries just the header: enough to tell queries from responses and to
/// reject messages with a non-zero response code. Owned by the current loop
/// iteration and discarded after dispatch.
///
/// # Example
///
/// ```rust
/// use mdns_engine::{IncomingMessage, IncomingPacket};
/// use std::net::{IpAddr, Ipv4Addr};
///
/// // A query header: id 0, all flag bits clear, one question.
/// let wire = [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];
/// let packet = IncomingPacket {
///     data: &wire,
///     addr: IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)),
///     port: 5353,
/// };
///
/// let msg = IncomingMessage::decode(&packet).unwrap();
/// assert!(msg.is_query());
/// assert!(msg.is_valid_response_code());
/// ```
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub header: Header,
}

impl IncomingMessage {
    /// Decode the header of a raw datagram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ErrShortHeader`](crate::Error::ErrShortHeader) if the
    /// payload is shorter than the 12-byte DNS header.
    pub fn decode(packet: &IncomingPacket<'_>) -> Result<IncomingMessage> {
        if packet.data.len() < HEADER_LEN {
            return Err(Error::ErrShortHeader);
        }
        let header = Header::unpack(packet.data)?;
        Ok(IncomingMessage { header })
    }

    /// Whether this message is a query (QR bit clear).
    pub fn is_query(&self) -> bool {
        !self.header.response
    }

    /// Whether the response code is `Success`.
    ///
    /// Messages carrying any other code are logged and discarded without
    /// being dispatched.
    pub fn is_valid_response_code(&self) -> bool {
        self.header.rcode == RCode::Success
    }
}

impl fmt::Display for IncomingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dnsmessage.Message{{Header: {}, Questions: {}, Answers: {}, Authorities: {}, Additionals: {}}}",
            self.header,
            self.header.questions,
            self.header.answers,
            self.header.authorities,
            self.header.additionals
        )
    }
}
