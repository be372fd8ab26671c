use super::{
    ingress::{Mailbox, Message},
    AddOutcome, Config, LoadOutcome, MatchOutcome,
};
use crate::{dump, interval::IntervalMap};
use bytes::Bytes;
use futures::{channel::mpsc, StreamExt};
use prometheus_client::{
    metrics::{counter::Counter, gauge::Gauge},
    registry::Registry,
};
use tracing::{debug, info, warn};

/// Owns the only [IntervalMap](crate::interval::IntervalMap) and processes
/// requests one at a time, in arrival order.
pub struct Actor {
    map: IntervalMap,
    receiver: mpsc::Receiver<Message>,

    adds: Counter,
    malformed: Counter,
    matched: Counter,
    missed: Counter,
    loads: Counter,
    load_failures: Counter,
    unknown: Counter,
    entries: Gauge,
}

impl Actor {
    /// Create a new actor and a [Mailbox] for reaching it, registering its
    /// metrics with the given registry.
    pub fn new(cfg: Config, registry: &mut Registry) -> (Self, Mailbox) {
        let adds = Counter::default();
        let malformed = Counter::default();
        let matched = Counter::default();
        let missed = Counter::default();
        let loads = Counter::default();
        let load_failures = Counter::default();
        let unknown = Counter::default();
        let entries = Gauge::default();
        registry.register("adds", "Number of intervals added", adds.clone());
        registry.register(
            "malformed",
            "Number of add requests rejected by validation",
            malformed.clone(),
        );
        registry.register(
            "matched",
            "Number of match requests that found an interval",
            matched.clone(),
        );
        registry.register(
            "missed",
            "Number of match requests that found nothing",
            missed.clone(),
        );
        registry.register("loads", "Number of dumps loaded", loads.clone());
        registry.register(
            "load_failures",
            "Number of dump loads aborted by a bad field",
            load_failures.clone(),
        );
        registry.register(
            "unknown",
            "Number of unrecognized request payloads",
            unknown.clone(),
        );
        registry.register("entries", "Number of stored intervals", entries.clone());

        let (sender, receiver) = mpsc::channel(cfg.mailbox_size);
        (
            Self {
                map: IntervalMap::new(),
                receiver,
                adds,
                malformed,
                matched,
                missed,
                loads,
                load_failures,
                unknown,
                entries,
            },
            Mailbox::new(sender),
        )
    }

    /// Process requests until [Mailbox::stop] is called or every mailbox is
    /// dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.receiver.next().await {
            match message {
                Message::Add {
                    start,
                    end,
                    value,
                    response,
                } => {
                    let _ = response.send(self.add(start, end, value));
                }
                Message::Match { key, response } => {
                    let _ = response.send(self.lookup(key));
                }
                Message::Load {
                    label,
                    data,
                    response,
                } => {
                    let _ = response.send(self.load(label, data));
                }
                Message::Unknown { payload, response } => {
                    warn!(len = payload.len(), "unrecognized request payload");
                    self.unknown.inc();
                    let _ = response.send(payload);
                }
                Message::Stop { response } => {
                    let _ = response.send(());
                    break;
                }
            }
        }
        info!(entries = self.map.len(), "store shutdown");
    }

    fn add(&mut self, start: i64, end: i64, value: f64) -> AddOutcome {
        if start > end || !value.is_finite() {
            debug!(start, end, value, "rejected malformed interval");
            self.malformed.inc();
            return AddOutcome::Malformed { start, end, value };
        }
        self.map.insert(start, end, value);
        self.adds.inc();
        self.entries.set(self.map.len() as i64);
        debug!(start, end, value, "interval added");
        AddOutcome::Added { start, end, value }
    }

    fn lookup(&self, key: i64) -> MatchOutcome {
        match self.map.search(key) {
            Some(entry) => {
                self.matched.inc();
                MatchOutcome::Matched {
                    key,
                    start: entry.start,
                    end: entry.end,
                    value: entry.value,
                }
            }
            None => {
                self.missed.inc();
                MatchOutcome::Missed { key }
            }
        }
    }

    fn load(&mut self, label: String, data: Bytes) -> LoadOutcome {
        let result = dump::parse(&data, &mut self.map);
        self.entries.set(self.map.len() as i64);
        match result {
            Ok(applied) => {
                self.loads.inc();
                info!(%label, applied, "dump loaded");
                LoadOutcome::Loaded { label, applied }
            }
            Err(failure) => {
                self.load_failures.inc();
                warn!(%label, %failure, "dump load aborted");
                LoadOutcome::ParseFailed { label, failure }
            }
        }
    }
}
