// SPDX-License-Identifier: MPL-2.0
//! Client for the venue booking server.
//!
//! The module is split by responsibility:
//! - [`client`] owns the HTTP transport and endpoint map
//! - [`outcome`] normalizes every response into one result shape
//! - [`models`] mirrors the server's JSON payloads
//!
//! Screens never branch on transport errors; they receive an
//! [`Outcome`] and a [`Request`] describing which call finished.

pub mod client;
pub mod models;
pub mod outcome;

pub use client::Client;
pub use models::{
    ConversationMessage, ConversationSummary, DeliveryState, Direction, Estado, NewReservation,
    OutgoingMessage, Reservation,
};
pub use outcome::{BatchResult, Failure, Outcome};

/// Identifies a finished server call so the app layer can route its
/// [`Outcome`] to the right follow-up.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadReservations,
    LoadMessages,
    LoadConversations,
    LoadConversation { telefono: String },
    UpdateReservation { id: i64 },
    DeleteReservation { id: i64 },
    ChangeEstado { id: i64, estado: Estado },
    SendMessage { telefono: String },
}
