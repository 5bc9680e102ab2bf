// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{sync::Arc, time::Duration};

use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{MissedTickBehavior, interval},
};
use tracing::info;

use crate::{callback::stopped, registry::ConnectionRegistry};

/// Periodically log how many connections are open and which.
pub(crate) fn spawn_stats_logger(
	registry: Arc<ConnectionRegistry>,
	period: Duration,
	mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = interval(period);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		ticker.tick().await;

		loop {
			tokio::select! {
				_ = stopped(&mut shutdown) => break,
				_ = ticker.tick() => {
					let ids: Vec<String> = registry.ids().into_iter().map(String::from).collect();
					info!(count = ids.len(), ids = ?ids, "db connection stats");
				}
			}
		}
	})
}
