// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Native window and keyboard events are routed on every screen; the
//! timed subscriptions are gated so the runtime sleeps when nothing
//! animates and no screen needs polling.

use super::{Message, Screen};
use iced::keyboard::{self, key::Named};
use iced::{event, time, Subscription};
use std::time::Duration;

/// Window close requests and the Escape key, handled on every screen.
///
/// Escape is only taken when no widget captured it, so a focused text
/// input keeps its own handling.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| {
        if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
            return Some(Message::WindowCloseRequested(window_id));
        }

        if let event::Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(Named::Escape),
            ..
        }) = &event
        {
            if status == event::Status::Ignored {
                return Some(Message::EscapePressed);
            }
        }

        None
    })
}

/// 100 ms animation tick for toast expiry, overlay fades and dialog
/// exits. Runs only while one of them still has timing work.
pub fn create_tick_subscription(has_pending_work: bool) -> Subscription<Message> {
    if has_pending_work {
        time::every(Duration::from_millis(100)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

/// Refreshes the conversation list while the messaging screen is open.
///
/// A zero interval disables the poll rather than spinning.
pub fn create_conversations_poll(screen: Screen, poll_secs: u64) -> Subscription<Message> {
    if screen == Screen::Messages && poll_secs > 0 {
        time::every(Duration::from_secs(poll_secs)).map(Message::PollConversations)
    } else {
        Subscription::none()
    }
}

/// Refreshes the open conversation at a faster cadence than the list.
pub fn create_conversation_poll(
    screen: Screen,
    has_active_conversation: bool,
    poll_secs: u64,
) -> Subscription<Message> {
    if screen == Screen::Messages && has_active_conversation && poll_secs > 0 {
        time::every(Duration::from_secs(poll_secs)).map(Message::PollConversation)
    } else {
        Subscription::none()
    }
}

/// Drains queued diagnostics events into the ring buffer once a second.
pub fn create_diagnostics_subscription() -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(Message::ProcessDiagnostics)
}
