//! Consumer that composes the feed cache with the access controller, as a
//! presentation layer would.

use std::time::Duration;

use crate::{
    access::{
        AccessController, AccessTier, GateCountdown, GateError, UnlockOffer, gate::drive,
    },
    feed::{FeedCache, FeedError, FeedSource, PredictionRecord, RecordSet},
};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(FeedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub showing: usize,
    pub total: usize,
    pub remaining: usize,
}

pub struct Session<S> {
    feed: FeedCache<S>,
    access: AccessController,
    records: RecordSet,
    status: LoadStatus,
    gate: Option<GateCountdown>,
    gate_duration_secs: u32,
}

impl<S: FeedSource> Session<S> {
    pub fn new(feed: FeedCache<S>, gate_duration_secs: u32) -> Self {
        Self {
            feed,
            access: AccessController::new(),
            records: RecordSet::default(),
            status: LoadStatus::Loading,
            gate: None,
            gate_duration_secs,
        }
    }

    pub fn feed(&self) -> &FeedCache<S> {
        &self.feed
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn tier(&self) -> AccessTier {
        self.access.tier()
    }

    /// Loads from the cache when possible.
    pub async fn load(&mut self) -> Result<(), FeedError> {
        self.reload(false).await
    }

    /// Always goes to the network. The current tier is kept.
    pub async fn refresh(&mut self) -> Result<(), FeedError> {
        self.reload(true).await
    }

    async fn reload(&mut self, force_refresh: bool) -> Result<(), FeedError> {
        self.status = LoadStatus::Loading;
        match self.feed.fetch_all(force_refresh).await {
            Ok(records) => {
                self.records = records;
                self.status = LoadStatus::Ready;
                Ok(())
            }
            Err(err) => {
                self.status = LoadStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    pub fn visible(&self) -> &[PredictionRecord] {
        match self.status {
            LoadStatus::Ready => self.access.visible(&self.records),
            LoadStatus::Loading | LoadStatus::Failed(_) => &[],
        }
    }

    pub fn summary(&self) -> Summary {
        let showing = self.visible().len();
        let total = match self.status {
            LoadStatus::Ready => self.records.len(),
            LoadStatus::Loading | LoadStatus::Failed(_) => 0,
        };
        Summary {
            showing,
            total,
            remaining: total - showing,
        }
    }

    pub fn unlock_offer(&self) -> Option<UnlockOffer> {
        match self.status {
            LoadStatus::Ready => self.access.unlock_offer(&self.records),
            LoadStatus::Loading | LoadStatus::Failed(_) => None,
        }
    }

    pub async fn record(&self, id: &str) -> Result<Option<PredictionRecord>, FeedError> {
        self.feed.get_by_id(id).await
    }

    pub fn gate(&self) -> Option<&GateCountdown> {
        self.gate.as_ref()
    }

    pub fn open_gate(&mut self) -> Result<GateCountdown, GateError> {
        if self.gate.is_some() {
            return Err(GateError::AlreadyOpen);
        }
        if self.unlock_offer().is_none() {
            return Err(GateError::NothingToUnlock);
        }

        let countdown = GateCountdown::new(self.gate_duration_secs);
        self.gate = Some(countdown);
        tracing::debug!(
            target: "session",
            tier = %self.access.tier(),
            countdown_secs = self.gate_duration_secs,
            "gate_opened"
        );
        Ok(countdown)
    }

    pub fn tick_gate(&mut self) -> Result<u32, GateError> {
        let countdown = self.gate.as_mut().ok_or(GateError::NotOpen)?;
        Ok(countdown.tick())
    }

    /// Ticks the open gate in real time until it may be completed.
    pub async fn run_gate<F>(&mut self, period: Duration, on_tick: F) -> Result<(), GateError>
    where
        F: FnMut(u32),
    {
        let countdown = self.gate.as_mut().ok_or(GateError::NotOpen)?;
        drive(countdown, period, on_tick).await;
        Ok(())
    }

    pub fn complete_gate(&mut self) -> Result<AccessTier, GateError> {
        let countdown = self.gate.as_ref().ok_or(GateError::NotOpen)?;
        if !countdown.may_advance() {
            return Err(GateError::CountdownRunning {
                remaining_secs: countdown.remaining_secs(),
            });
        }

        self.gate = None;
        Ok(self.access.advance())
    }

    /// Closes the gate without unlocking anything.
    pub fn dismiss_gate(&mut self) {
        if self.gate.take().is_some() {
            tracing::debug!(target: "session", "gate_dismissed");
        }
    }
}
