use super::{AddOutcome, Error, LoadOutcome, MatchOutcome};
use bytes::Bytes;
use futures::{
    channel::{mpsc, oneshot},
    SinkExt,
};

/// Requests accepted by the store actor.
pub enum Message {
    Add {
        start: i64,
        end: i64,
        value: f64,
        response: oneshot::Sender<AddOutcome>,
    },
    Match {
        key: i64,
        response: oneshot::Sender<MatchOutcome>,
    },
    Load {
        label: String,
        data: Bytes,
        response: oneshot::Sender<LoadOutcome>,
    },
    Unknown {
        payload: Bytes,
        response: oneshot::Sender<Bytes>,
    },
    Stop {
        response: oneshot::Sender<()>,
    },
}

/// Cloneable handle used to deliver requests to the store actor.
///
/// The mailbox is bounded: senders wait for capacity when the actor is
/// behind (a long-running load holds the actor for its entire duration).
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Message>,
}

impl Mailbox {
    pub(super) fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    async fn send(&mut self, message: Message) -> Result<(), Error> {
        self.sender.send(message).await.map_err(|_| Error::Closed)
    }

    /// Insert the interval `[start, end]` with `value`.
    pub async fn add(&mut self, start: i64, end: i64, value: f64) -> Result<AddOutcome, Error> {
        let (response, receiver) = oneshot::channel();
        self.send(Message::Add {
            start,
            end,
            value,
            response,
        })
        .await?;
        receiver.await.map_err(|_| Error::Cancelled)
    }

    /// Find the stored interval containing `key`.
    pub async fn match_key(&mut self, key: i64) -> Result<MatchOutcome, Error> {
        let (response, receiver) = oneshot::channel();
        self.send(Message::Match { key, response }).await?;
        receiver.await.map_err(|_| Error::Cancelled)
    }

    /// Bulk-load a dump into the live map. `label` identifies the source in
    /// the reply and in logs.
    pub async fn load(&mut self, label: String, data: Bytes) -> Result<LoadOutcome, Error> {
        let (response, receiver) = oneshot::channel();
        self.send(Message::Load {
            label,
            data,
            response,
        })
        .await?;
        receiver.await.map_err(|_| Error::Cancelled)
    }

    /// Deliver a payload that did not decode into any known request shape.
    ///
    /// The actor logs it and echoes it back unchanged; no state is touched.
    pub async fn unrecognized(&mut self, payload: Bytes) -> Result<Bytes, Error> {
        let (response, receiver) = oneshot::channel();
        self.send(Message::Unknown { payload, response }).await?;
        receiver.await.map_err(|_| Error::Cancelled)
    }

    /// Stop the actor. Acknowledged once the actor exits its loop; requests
    /// sent afterwards fail with [Error::Closed].
    pub async fn stop(&mut self) -> Result<(), Error> {
        let (response, receiver) = oneshot::channel();
        self.send(Message::Stop { response }).await?;
        receiver.await.map_err(|_| Error::Cancelled)
    }
}
