// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr, Context, Handler};
use std::marker::PhantomData;
use tracing::{error, info};
use veil_events::{ErrorEvent, Event, EventBus, SelectorEvent, Subscribe};

pub trait EventLogging: Event {
    fn log(&self, logger_name: &str);
}

/// Writes every event seen on a bus to `tracing`.
pub struct SimpleLogger<E: EventLogging> {
    name: String,
    _p: PhantomData<E>,
}

impl<E: EventLogging> SimpleLogger<E> {
    pub fn attach(name: &str, bus: Addr<EventBus<E>>) -> Addr<Self> {
        let addr = Self {
            name: name.to_owned(),
            _p: PhantomData,
        }
        .start();
        bus.do_send(Subscribe::<E>::new("*", addr.clone().recipient()));
        info!(logger = %name, "Event logger attached");
        addr
    }
}

impl<E: EventLogging> Actor for SimpleLogger<E> {
    type Context = Context<Self>;
}

impl<E: EventLogging> Handler<E> for SimpleLogger<E> {
    type Result = ();

    fn handle(&mut self, msg: E, _: &mut Self::Context) -> Self::Result {
        msg.log(&self.name);
    }
}

impl EventLogging for SelectorEvent {
    fn log(&self, logger_name: &str) {
        if let Some(err) = self.as_error() {
            error!(me = logger_name, kind = ?err.err_type, "{}", err.message);
            return;
        }
        match self.get_registry() {
            Some(registry) => {
                info!(me = logger_name, evt = %self, id = %self.get_id(), registry = %registry, "Event Broadcasted")
            }
            None => info!(me = logger_name, evt = %self, id = %self.get_id(), "Event Broadcasted"),
        }
    }
}
