//! Output seams of the engine
//!
//! The engine never talks to the virtual bus driver or the OS keyboard
//! backend directly; it hands completed frames to a [`VirtualPadSink`] and
//! key events to a [`KeyInjector`]. Both calls are fire-and-forget from the
//! engine's point of view: a failing collaborator costs one delivery, never
//! the next report.
//!
//! The channel-backed implementations below are what the binary wires up:
//! the real backends sit on the receiving end of the channels, in their own
//! tasks.

use crate::report::OutputFrame;
use thiserror::Error;
use tokio::sync::mpsc;

/// Delivery failures towards a collaborator
#[derive(Debug, Error)]
pub enum SinkError {
    /// Receiver is gone or the channel is full
    #[error("Zustellung fehlgeschlagen: {0}")]
    DeliveryError(String),
}

/// One key event for the injection backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u16,
    pub pressed: bool,
}

/// Accepts completed virtual-pad frames, keyed by their pad slot
pub trait VirtualPadSink: Send + 'static {
    fn submit(&self, frame: OutputFrame) -> Result<(), SinkError>;
}

/// Accepts key-down/key-up events for injection
pub trait KeyInjector: Send + 'static {
    fn inject(&self, event: KeyEvent) -> Result<(), SinkError>;
}

/// Channel-backed pad sink; the bus-driver task holds the receiver
#[derive(Clone, Debug)]
pub struct ChannelPadSink {
    tx: mpsc::Sender<OutputFrame>,
}

impl ChannelPadSink {
    pub fn new(tx: mpsc::Sender<OutputFrame>) -> Self {
        Self { tx }
    }
}

impl VirtualPadSink for ChannelPadSink {
    fn submit(&self, frame: OutputFrame) -> Result<(), SinkError> {
        self.tx
            .try_send(frame)
            .map_err(|e| SinkError::DeliveryError(e.to_string()))
    }
}

/// Channel-backed key injector; the keyboard backend holds the receiver
#[derive(Clone, Debug)]
pub struct ChannelKeyInjector {
    tx: mpsc::Sender<KeyEvent>,
}

impl ChannelKeyInjector {
    pub fn new(tx: mpsc::Sender<KeyEvent>) -> Self {
        Self { tx }
    }
}

impl KeyInjector for ChannelKeyInjector {
    fn inject(&self, event: KeyEvent) -> Result<(), SinkError> {
        self.tx
            .try_send(event)
            .map_err(|e| SinkError::DeliveryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_sink_delivers_frames() {
        let (tx, mut rx) = mpsc::channel(4);
        let sink = ChannelPadSink::new(tx);

        sink.submit(OutputFrame::reset(1)).expect("delivery");
        let frame = rx.recv().await.expect("frame");
        assert_eq!(frame.pad_slot, 1);
    }

    #[tokio::test]
    async fn closed_channel_surfaces_as_delivery_error() {
        let (tx, rx) = mpsc::channel::<KeyEvent>(1);
        drop(rx);

        let injector = ChannelKeyInjector::new(tx);
        let result = injector.inject(KeyEvent {
            code: 0x41,
            pressed: true,
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn full_channel_does_not_block_the_caller() {
        let (tx, _rx) = mpsc::channel(1);
        let sink = ChannelPadSink::new(tx);

        sink.submit(OutputFrame::reset(0)).expect("first fits");
        // Zweite Zustellung scheitert sofort statt zu blockieren
        assert!(sink.submit(OutputFrame::reset(0)).is_err());
    }
}
