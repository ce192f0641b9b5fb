// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The values carried through the fabric.

use std::fmt;

/// A unit of data traffic.
///
/// `destination` is the node id a switch should route towards; producers
/// that talk directly to a single consumer may leave it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: String,
    pub destination: Option<String>,
    pub payload: Option<Vec<u8>>,
}

impl Packet {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            destination: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Some(dst) => write!(f, "Packet({} -> {dst})", self.id),
            None => write!(f, "Packet({})", self.id),
        }
    }
}

/// The credit-return unit emitted by an [`InputPort`](crate::port::InputPort)
/// when it drains a packet. It carries no payload: its only role is to
/// occupy a slot in a [`Link`](crate::link::Link)'s credit pipeline for the
/// duration of the return trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditPacket;

impl fmt::Display for CreditPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CreditPacket")
    }
}
