// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::traits::{ErrorEvent, Event};
use actix::prelude::*;
use bloom::{BloomFilter, ASMS};
use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use tracing::info;

//////////////////////////////////////////////////////////////////////////////
// Configuration
//////////////////////////////////////////////////////////////////////////////

/// Configuration for EventBus behavior
pub struct EventBusConfig {
    pub deduplicate: bool,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { deduplicate: true }
    }
}

fn default_bloomfilter() -> BloomFilter {
    let num_items = 1_000_000;
    let fp_rate = 0.001;
    BloomFilter::with_rate(fp_rate, num_items)
}

//////////////////////////////////////////////////////////////////////////////
// EventBus Implementation
//////////////////////////////////////////////////////////////////////////////

/// Fan-out bus for registry events. Listeners subscribe by event type or to `*` for everything.
/// Events are delivered in the order the bus receives them.
pub struct EventBus<E: Event> {
    config: EventBusConfig,
    ids: BloomFilter,
    listeners: HashMap<String, Vec<Recipient<E>>>,
}

impl<E: Event> Actor for EventBus<E> {
    type Context = Context<Self>;
}

impl<E: Event> EventBus<E> {
    pub fn new(config: EventBusConfig) -> Self {
        EventBus {
            config,
            listeners: HashMap::new(),
            ids: default_bloomfilter(),
        }
    }

    /// Attach a collector that records every event published on `source`.
    pub fn history(source: &Addr<EventBus<E>>) -> Addr<HistoryCollector<E>> {
        let addr = HistoryCollector::<E>::new().start();
        source.do_send(Subscribe::new("*", addr.clone().recipient()));
        addr
    }

    fn track(&mut self, event: &E) {
        self.ids.insert(&event.event_id());
    }

    fn is_duplicate(&self, event: &E) -> bool {
        self.config.deduplicate && self.ids.contains(&event.event_id())
    }
}

impl<E: ErrorEvent> EventBus<E> {
    /// Attach a collector that only records error events.
    pub fn error(source: &Addr<EventBus<E>>) -> Addr<HistoryCollector<E>> {
        let addr = HistoryCollector::<E>::new().start();
        source.do_send(Subscribe::new("SelectorError", addr.clone().recipient()));
        addr
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(EventBusConfig::default())
    }
}

impl<E: Event> Handler<E> for EventBus<E> {
    type Result = ();

    fn handle(&mut self, event: E, _: &mut Context<Self>) {
        if self.is_duplicate(&event) {
            return;
        }

        if let Some(listeners) = self.listeners.get("*") {
            for listener in listeners {
                listener.do_send(event.clone());
            }
        }

        if let Some(listeners) = self.listeners.get(&event.event_type()) {
            for listener in listeners {
                listener.do_send(event.clone());
            }
        }

        tracing::debug!(">>> {}", event);
        self.track(&event);
    }
}

//////////////////////////////////////////////////////////////////////////////
// Subscribe Message
//////////////////////////////////////////////////////////////////////////////

#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe<E: Event> {
    pub event_type: String,
    pub listener: Recipient<E>,
}

impl<E: Event> Subscribe<E> {
    pub fn new(event_type: impl Into<String>, listener: Recipient<E>) -> Self {
        Self {
            event_type: event_type.into(),
            listener,
        }
    }
}

impl<E: Event> Handler<Subscribe<E>> for EventBus<E> {
    type Result = ();

    fn handle(&mut self, msg: Subscribe<E>, _: &mut Context<Self>) {
        self.listeners
            .entry(msg.event_type)
            .or_default()
            .push(msg.listener);
    }
}

//////////////////////////////////////////////////////////////////////////////
// History Management
//////////////////////////////////////////////////////////////////////////////

#[derive(Message)]
#[rtype(result = "Vec<E>")]
pub struct GetEvents<E: Event>(PhantomData<E>);

impl<E: Event> GetEvents<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: Event> Default for GetEvents<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove and return the next `amount` events, waiting for them to arrive if needed.
#[derive(Message)]
#[rtype(result = "Vec<E>")]
pub struct TakeEvents<E: Event> {
    amount: usize,
    _d: PhantomData<E>,
}

impl<E: Event> TakeEvents<E> {
    pub fn new(amount: usize) -> Self {
        Self {
            amount,
            _d: PhantomData,
        }
    }
}

struct PendingTake<E: Event> {
    count: usize,
    responder: tokio::sync::oneshot::Sender<Vec<E>>,
}

//////////////////////////////////////////////////////////////////////////////
// History Collector
//////////////////////////////////////////////////////////////////////////////

/// Actor to subscribe to EventBus to capture all history
pub struct HistoryCollector<E: Event> {
    history: VecDeque<E>,
    pending: VecDeque<PendingTake<E>>,
}

impl<E: Event> HistoryCollector<E> {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            pending: VecDeque::new(),
        }
    }

    /// Serve waiting takes in arrival order while enough history is buffered.
    fn fulfill_pending(&mut self) {
        while let Some(front) = self.pending.front() {
            if self.history.len() < front.count {
                return;
            }
            let Some(take) = self.pending.pop_front() else {
                return;
            };
            let events: Vec<E> = self.history.drain(..take.count).collect();
            let _ = take.responder.send(events);
        }
    }
}

impl<E: Event> Default for HistoryCollector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> Actor for HistoryCollector<E> {
    type Context = Context<Self>;
}

impl<E: Event> Handler<E> for HistoryCollector<E> {
    type Result = ();

    fn handle(&mut self, msg: E, _: &mut Context<Self>) {
        self.history.push_back(msg);
        self.fulfill_pending();
    }
}

impl<E: Event> Handler<GetEvents<E>> for HistoryCollector<E> {
    type Result = Vec<E>;

    fn handle(&mut self, _: GetEvents<E>, _: &mut Context<Self>) -> Vec<E> {
        self.history.iter().cloned().collect()
    }
}

impl<E: Event> Handler<TakeEvents<E>> for HistoryCollector<E> {
    type Result = ResponseFuture<Vec<E>>;

    fn handle(&mut self, msg: TakeEvents<E>, _: &mut Context<Self>) -> Self::Result {
        let (tx, rx) = tokio::sync::oneshot::channel();
        if self.history.len() < msg.amount || !self.pending.is_empty() {
            info!(
                "Requesting {} events but only {} in the buffer. waiting for more...",
                msg.amount,
                self.history.len()
            );
        }
        self.pending.push_back(PendingTake {
            count: msg.amount,
            responder: tx,
        });
        self.fulfill_pending();

        Box::pin(async move { rx.await.unwrap_or_default() })
    }
}
