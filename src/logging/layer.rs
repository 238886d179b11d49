//! `tracing_subscriber` layer that forwards events into a `Logger`
//!
//! Lets a host application keep using the `tracing` macros while getting the
//! indented, multi-sink output of a legion logger. Events emitted by this crate
//! itself are skipped: they are internal diagnostics, and forwarding them could
//! re-enter the logger while it is writing.

use super::{Level, Logger};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

pub struct LegionLayer {
    logger: Arc<Logger>,
}

impl LegionLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Collects the `message` field plus `key=value` pairs for the others
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S> Layer<S> for LegionLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        visitor.message.push_str(&visitor.fields);

        // A layer has nowhere to report sink failures.
        let _ = self.logger.log_from(
            Level::from(metadata.level()),
            metadata.target(),
            &visitor.message,
        );
    }
}
