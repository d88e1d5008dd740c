//! OSC 1.0 packet encoding and decoding
//!
//! Only the subset the bridge emits is supported: messages with float32
//! arguments, and bundles of such messages.
//!
//! # Message layout
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┬────────────────────────┐
//! │ Address (OSC-string) │ Type tags ",fff..."  │ Arguments (BE float32) │
//! │ NUL-terminated,      │ NUL-terminated,      │ 4 bytes each           │
//! │ padded to 4 bytes    │ padded to 4 bytes    │                        │
//! └──────────────────────┴──────────────────────┴────────────────────────┘
//! ```
//!
//! # Bundle layout
//!
//! ```text
//! ┌────────────┬──────────────────┬───────────────┬─────────────┬─────┐
//! │ "#bundle\0"│ Time tag (u64 BE)│ Size (i32 BE) │ Element ... │ ... │
//! │ 8 bytes    │ 1 = immediately  │               │             │     │
//! └────────────┴──────────────────┴───────────────┴─────────────┴─────┘
//! ```

use crate::error::{Error, Result};
use std::sync::Arc;

/// Bundle identifier, including the terminating NUL
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// NTP time tag meaning "process on receipt"
pub const IMMEDIATELY: u64 = 1;

/// Addressed message with float32 arguments
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: Arc<str>,
    pub args: Vec<f32>,
}

/// Group of packets delivered as one unit
#[derive(Debug, Clone, PartialEq)]
pub struct OscBundle {
    pub time_tag: u64,
    pub content: Vec<OscPacket>,
}

/// Top-level OSC packet
#[derive(Debug, Clone, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

/// Bytes needed for `s` as an OSC-string (NUL plus padding)
#[inline]
fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    let pad = padded_len(s.len()) - s.len();
    buf.extend(std::iter::repeat(0u8).take(pad));
}

impl OscMessage {
    pub fn new(address: impl Into<Arc<str>>, args: Vec<f32>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        padded_len(self.address.len()) + padded_len(1 + self.args.len()) + 4 * self.args.len()
    }

    /// Append the encoded message to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        write_str(buf, &self.address);

        buf.push(b',');
        buf.extend(std::iter::repeat(b'f').take(self.args.len()));
        let tags = 1 + self.args.len();
        buf.extend(std::iter::repeat(0u8).take(padded_len(tags) - tags));

        for arg in &self.args {
            buf.extend_from_slice(&arg.to_be_bytes());
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }
}

impl OscBundle {
    /// Bundle of messages marked for immediate delivery
    pub fn immediate(messages: Vec<OscMessage>) -> Self {
        Self {
            time_tag: IMMEDIATELY,
            content: messages.into_iter().map(OscPacket::Message).collect(),
        }
    }

    /// Direct message children, in order
    pub fn messages(&self) -> impl Iterator<Item = &OscMessage> {
        self.content.iter().filter_map(|p| match p {
            OscPacket::Message(m) => Some(m),
            OscPacket::Bundle(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn encoded_len(&self) -> usize {
        BUNDLE_TAG.len()
            + 8
            + self
                .content
                .iter()
                .map(|p| 4 + p.encoded_len())
                .sum::<usize>()
    }

    /// Append the encoded bundle to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(BUNDLE_TAG);
        buf.extend_from_slice(&self.time_tag.to_be_bytes());
        for packet in &self.content {
            let size_at = buf.len();
            buf.extend_from_slice(&[0u8; 4]);
            packet.encode_into(buf);
            let size = (buf.len() - size_at - 4) as i32;
            buf[size_at..size_at + 4].copy_from_slice(&size.to_be_bytes());
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }
}

impl OscPacket {
    pub fn encoded_len(&self) -> usize {
        match self {
            OscPacket::Message(m) => m.encoded_len(),
            OscPacket::Bundle(b) => b.encoded_len(),
        }
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            OscPacket::Message(m) => m.encode_into(buf),
            OscPacket::Bundle(b) => b.encode_into(buf),
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode one packet (message or bundle) occupying all of `bytes`
pub fn decode(bytes: &[u8]) -> Result<OscPacket> {
    if bytes.len() % 4 != 0 {
        return Err(Error::Osc(format!(
            "packet length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    if bytes.starts_with(BUNDLE_TAG) {
        decode_bundle(bytes).map(OscPacket::Bundle)
    } else {
        decode_message(bytes).map(OscPacket::Message)
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::Osc(format!(
                "truncated packet: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_str(&mut self) -> Result<&'a str> {
        let rest = &self.data[self.pos..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::Osc("unterminated string".to_string()))?;
        let s = std::str::from_utf8(&rest[..nul])
            .map_err(|e| Error::Osc(format!("invalid UTF-8 in string: {}", e)))?;
        self.take(padded_len(nul))?;
        Ok(s)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let hi = self.read_u32()? as u64;
        let lo = self.read_u32()? as u64;
        Ok((hi << 32) | lo)
    }
}

fn decode_message(bytes: &[u8]) -> Result<OscMessage> {
    let mut reader = Reader::new(bytes);
    let address = reader.read_str()?;
    if !address.starts_with('/') {
        return Err(Error::Osc(format!("invalid address '{}'", address)));
    }

    let tags = reader.read_str()?;
    let tags = tags
        .strip_prefix(',')
        .ok_or_else(|| Error::Osc("type tag string must start with ','".to_string()))?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        match tag {
            'f' => args.push(f32::from_bits(reader.read_u32()?)),
            other => {
                return Err(Error::Osc(format!("unsupported type tag '{}'", other)));
            }
        }
    }

    if reader.remaining() != 0 {
        return Err(Error::Osc(format!(
            "{} trailing bytes after message {}",
            reader.remaining(),
            address
        )));
    }

    Ok(OscMessage::new(address, args))
}

fn decode_bundle(bytes: &[u8]) -> Result<OscBundle> {
    let mut reader = Reader::new(bytes);
    reader.take(BUNDLE_TAG.len())?;
    let time_tag = reader.read_u64()?;

    let mut content = Vec::new();
    while reader.remaining() > 0 {
        let size = reader.read_u32()? as usize;
        let element = reader.take(size)?;
        content.push(decode(element)?);
    }

    Ok(OscBundle { time_tag, content })
}
