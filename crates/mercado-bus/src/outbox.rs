//! Outbox reconciliation: re-publish stored events the bus never saw.
//!
//! A publish that fails after the store write, or a crash between the two
//! steps, leaves an event stored with its `published` marker unset. The
//! sweeper periodically re-sends those envelopes and marks them. Re-sending
//! an event the broker already accepted is possible and fine: delivery is
//! at-least-once.

use std::sync::Arc;
use std::time::Duration;

use mercado_core::bus::MessageBus;
use mercado_core::clock::Clock;
use mercado_core::store::EventStore;

/// Sweep cadence and scope.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweeps.
    pub interval: Duration,
    /// Minimum age of an event before the sweep will touch it, so in-flight
    /// publishes are never raced.
    pub grace: chrono::Duration,
    /// Maximum events re-sent per sweep.
    pub batch_size: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            grace: chrono::Duration::seconds(30),
            batch_size: 100,
        }
    }
}

/// Periodic re-publisher of orphaned events.
pub struct OutboxSweeper {
    store: Arc<dyn EventStore>,
    bus: Arc<dyn MessageBus>,
    clock: Arc<dyn Clock>,
    config: SweepConfig,
}

impl OutboxSweeper {
    /// Creates a sweeper over the given store and bus.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        bus: Arc<dyn MessageBus>,
        clock: Arc<dyn Clock>,
        config: SweepConfig,
    ) -> Self {
        Self {
            store,
            bus,
            clock,
            config,
        }
    }

    /// Runs one sweep, returning how many events were re-published.
    ///
    /// Failures on individual events are logged and left for the next
    /// sweep; the sweep itself never fails.
    pub async fn sweep_once(&self) -> usize {
        let cutoff = self.clock.now() - self.config.grace;
        let orphans = match self
            .store
            .find_unpublished(cutoff, self.config.batch_size)
            .await
        {
            Ok(orphans) => orphans,
            Err(e) => {
                tracing::warn!(error = %e, "outbox sweep could not read the store");
                return 0;
            }
        };

        let mut republished = 0;
        for record in orphans {
            let envelope = record.envelope();
            if let Err(e) = self
                .bus
                .publish(record.topic, record.event_id, &envelope)
                .await
            {
                tracing::warn!(event_id = %record.event_id, error = %e, "outbox re-publish failed");
                continue;
            }
            if let Err(e) = self.store.mark_published(record.event_id).await {
                tracing::warn!(event_id = %record.event_id, error = %e, "outbox marker update failed");
                continue;
            }
            republished += 1;
        }

        if republished > 0 {
            tracing::info!(republished, "outbox sweep re-published orphaned events");
        }
        republished
    }

    /// Sweeps forever at the configured interval. Spawn as a task; abort the
    /// task to stop.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }
}
