//! Channel-backed failover request sink.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::health::ports::{FailoverRequest, FailoverRequestSink};

/// Failover sink backed by an unbounded tokio channel.
///
/// The receiving half is handed to whatever drives the failover coordinator;
/// requests sent after the receiver is dropped are discarded with a warning.
#[derive(Debug, Clone)]
pub struct ChannelFailoverSink {
    sender: mpsc::UnboundedSender<FailoverRequest>,
}

impl ChannelFailoverSink {
    /// Creates a sink and its paired receiver.
    #[must_use]
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<FailoverRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl FailoverRequestSink for ChannelFailoverSink {
    async fn request_failover(&self, request: FailoverRequest) {
        if self.sender.send(request).is_err() {
            warn!(session_id = %request.session_id, "failover request dropped: receiver gone");
        }
    }
}
