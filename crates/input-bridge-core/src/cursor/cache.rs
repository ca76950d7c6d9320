//! Content-addressed cursor identity cache.
//!
//! Every cursor image seen during a session is identified by its content
//! hash.  Hashes registered from the platform's stock cursor set keep their
//! well-known id; any other hash gets the next custom id on first sighting
//! and keeps it for the rest of the session.
//!
//! Ids and the hash maps are session-global, but payload delivery is tracked
//! per subscriber: a subscriber that registers after a custom cursor was first
//! seen still receives that cursor's bitmap once before it is referred to by id.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::cursor::well_known::WellKnownCursor;
use crate::cursor::{ContentHash, CursorSnapshot};
use crate::protocol::codec::encode_cursor_payload;

/// Identifier chosen by the remote side when it subscribes to cursor images.
pub type CallbackId = i64;

/// How one cursor change is reported.
///
/// Serializes as `{"classification": "newCustom", "idOrHash": 3, "payload": [..]}`,
/// with `payload` present only for new custom cursors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "classification", rename_all = "camelCase")]
pub enum Classification {
    /// A stock cursor the receiver can draw from its own resources.
    WellKnown {
        #[serde(rename = "idOrHash")]
        id: u32,
    },
    /// A cursor whose bitmap this receiver already holds.
    CachedCustom {
        #[serde(rename = "idOrHash")]
        id: u32,
    },
    /// A cursor whose bitmap must be transmitted, as an encoded payload record.
    NewCustom {
        #[serde(rename = "idOrHash")]
        id: u32,
        #[serde(serialize_with = "serialize_payload")]
        payload: Arc<[u8]>,
    },
}

fn serialize_payload<S: Serializer>(payload: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(payload.iter())
}

impl Classification {
    pub fn id(&self) -> u32 {
        match self {
            Self::WellKnown { id } | Self::CachedCustom { id } | Self::NewCustom { id, .. } => *id,
        }
    }

    /// Wire name of the classification.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WellKnown { .. } => "wellKnown",
            Self::CachedCustom { .. } => "cachedCustom",
            Self::NewCustom { .. } => "newCustom",
        }
    }
}

/// The classification delivered to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberOutcome {
    pub callback_id: CallbackId,
    pub classification: Classification,
}

/// Result of classifying one cursor change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorClassification {
    /// Same content as the previous change; nothing is emitted.
    Unchanged,
    Changed {
        /// Session-level classification, independent of any subscriber.
        classification: Classification,
        /// One entry per subscriber, ordered by callback id.
        outcomes: Vec<SubscriberOutcome>,
    },
}

#[derive(Debug, Default)]
struct Subscriber {
    hook_all: bool,
    delivered: HashSet<ContentHash>,
}

#[derive(Debug, Clone, Copy)]
enum Identity {
    WellKnown(u32),
    Custom { id: u32, first_sighting: bool },
}

impl Identity {
    fn id(self) -> u32 {
        match self {
            Self::WellKnown(id) | Self::Custom { id, .. } => id,
        }
    }
}

/// Deduplicates cursor images and assigns them stable ids.
#[derive(Debug)]
pub struct CursorIdentityCache {
    well_known: HashMap<ContentHash, WellKnownCursor>,
    custom: HashMap<ContentHash, u32>,
    next_custom_id: u32,
    last_seen: Option<ContentHash>,
    current: Option<CursorSnapshot>,
    subscribers: BTreeMap<CallbackId, Subscriber>,
}

impl Default for CursorIdentityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorIdentityCache {
    pub fn new() -> Self {
        Self {
            well_known: HashMap::new(),
            custom: HashMap::new(),
            next_custom_id: 1,
            last_seen: None,
            current: None,
            subscribers: BTreeMap::new(),
        }
    }

    /// Creates a cache with the platform's stock cursors pre-registered.
    pub fn with_system_cursors(
        cursors: impl IntoIterator<Item = (WellKnownCursor, CursorSnapshot)>,
    ) -> Self {
        let mut cache = Self::new();
        for (cursor, snapshot) in cursors {
            cache.register_well_known(cursor, &snapshot);
        }
        cache
    }

    /// Registers `snapshot` as the image of a stock cursor.
    pub fn register_well_known(&mut self, cursor: WellKnownCursor, snapshot: &CursorSnapshot) {
        let hash = snapshot.content_hash();
        self.custom.remove(&hash);
        self.well_known.insert(hash, cursor);
    }

    /// Adds or replaces a subscriber.
    ///
    /// Re-subscribing an existing callback id replaces its hook-all flag and
    /// forgets which payloads it has received.
    pub fn subscribe(&mut self, callback_id: CallbackId, hook_all: bool) {
        self.subscribers.insert(
            callback_id,
            Subscriber {
                hook_all,
                delivered: HashSet::new(),
            },
        );
        info!(callback_id, hook_all, "cursor image subscriber registered");
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, callback_id: CallbackId) -> bool {
        let removed = self.subscribers.remove(&callback_id).is_some();
        if removed {
            info!(callback_id, "cursor image subscriber removed");
        }
        removed
    }

    pub fn is_subscribed(&self, callback_id: CallbackId) -> bool {
        self.subscribers.contains_key(&callback_id)
    }

    pub fn subscriber_ids(&self) -> impl Iterator<Item = CallbackId> + '_ {
        self.subscribers.keys().copied()
    }

    /// Classifies a cursor change for every subscriber.
    ///
    /// The bitmap payload is encoded at most once per call and shared among
    /// the subscribers that need it.
    pub fn classify(&mut self, snapshot: &CursorSnapshot) -> CursorClassification {
        let hash = snapshot.content_hash();
        if self.last_seen == Some(hash) {
            return CursorClassification::Unchanged;
        }
        self.last_seen = Some(hash);
        self.current = Some(snapshot.clone());

        let identity = self.identify(hash);
        let mut payload: Option<Arc<[u8]>> = None;
        let mut payload_for = || {
            payload
                .get_or_insert_with(|| Arc::from(encode_cursor_payload(snapshot)))
                .clone()
        };

        let classification = match identity {
            Identity::WellKnown(id) => Classification::WellKnown { id },
            Identity::Custom { id, first_sighting: true } => Classification::NewCustom {
                id,
                payload: payload_for(),
            },
            Identity::Custom { id, .. } => Classification::CachedCustom { id },
        };

        let outcomes = self
            .subscribers
            .iter_mut()
            .map(|(&callback_id, sub)| SubscriberOutcome {
                callback_id,
                classification: deliver(sub, hash, identity, &mut payload_for),
            })
            .collect();

        CursorClassification::Changed {
            classification,
            outcomes,
        }
    }

    /// Full-image delivery of the current cursor to a freshly registered hook-all subscriber.
    ///
    /// Returns `None` if the subscriber is unknown, not in hook-all mode, or no
    /// cursor has been classified yet.
    pub fn initial_outcome(&mut self, callback_id: CallbackId) -> Option<SubscriberOutcome> {
        let snapshot = self.current.clone()?;
        if !self.subscribers.get(&callback_id)?.hook_all {
            return None;
        }
        let hash = snapshot.content_hash();
        let identity = self.identify(hash);
        let sub = self.subscribers.get_mut(&callback_id)?;
        let mut payload_for = || -> Arc<[u8]> { Arc::from(encode_cursor_payload(&snapshot)) };
        Some(SubscriberOutcome {
            callback_id,
            classification: deliver(sub, hash, identity, &mut payload_for),
        })
    }

    pub fn last_seen_hash(&self) -> Option<ContentHash> {
        self.last_seen
    }

    /// Number of custom cursors seen this session. Entries are never evicted.
    pub fn custom_len(&self) -> usize {
        self.custom.len()
    }

    pub fn well_known_len(&self) -> usize {
        self.well_known.len()
    }

    fn identify(&mut self, hash: ContentHash) -> Identity {
        if let Some(cursor) = self.well_known.get(&hash) {
            return Identity::WellKnown(cursor.id());
        }
        if let Some(&id) = self.custom.get(&hash) {
            return Identity::Custom {
                id,
                first_sighting: false,
            };
        }
        let id = self.allocate_custom_id();
        self.custom.insert(hash, id);
        debug!(id, %hash, "new custom cursor");
        Identity::Custom {
            id,
            first_sighting: true,
        }
    }

    fn allocate_custom_id(&mut self) -> u32 {
        // Custom ids never land on a reserved well-known id.
        while WellKnownCursor::is_reserved_id(self.next_custom_id) {
            self.next_custom_id += 1;
        }
        let id = self.next_custom_id;
        self.next_custom_id += 1;
        id
    }
}

fn deliver(
    sub: &mut Subscriber,
    hash: ContentHash,
    identity: Identity,
    payload_for: &mut impl FnMut() -> Arc<[u8]>,
) -> Classification {
    if let Identity::WellKnown(id) = identity {
        if !sub.hook_all {
            return Classification::WellKnown { id };
        }
    }
    let id = identity.id();
    if sub.delivered.insert(hash) {
        Classification::NewCustom {
            id,
            payload: payload_for(),
        }
    } else {
        Classification::CachedCustom { id }
    }
}
