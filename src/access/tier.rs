use std::fmt;

pub const TIER1_VISIBLE: usize = 3;
pub const TIER2_VISIBLE: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessTier {
    #[default]
    Tier1,
    Tier2,
    FullAccess,
}

impl AccessTier {
    /// Number of leading records visible at this tier, `None` meaning all of them.
    pub fn visible_limit(self) -> Option<usize> {
        match self {
            AccessTier::Tier1 => Some(TIER1_VISIBLE),
            AccessTier::Tier2 => Some(TIER2_VISIBLE),
            AccessTier::FullAccess => None,
        }
    }

    pub fn next(self) -> AccessTier {
        match self {
            AccessTier::Tier1 => AccessTier::Tier2,
            AccessTier::Tier2 | AccessTier::FullAccess => AccessTier::FullAccess,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == AccessTier::FullAccess
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccessTier::Tier1 => "tier1",
            AccessTier::Tier2 => "tier2",
            AccessTier::FullAccess => "full_access",
        };
        f.write_str(label)
    }
}

/// The visible records are always a prefix, so anything shown stays shown as the tier grows.
pub fn visible_subset<T>(records: &[T], tier: AccessTier) -> &[T] {
    match tier.visible_limit() {
        Some(limit) => &records[..limit.min(records.len())],
        None => records,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockOffer {
    /// Records the next advance reveals.
    pub reveals: usize,
    /// Whether that advance leaves nothing locked.
    pub exhausts: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AccessController {
    tier: AccessTier,
}

impl AccessController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self) -> AccessTier {
        self.tier
    }

    /// Moves one tier up. Advancing at `FullAccess` is a no-op.
    pub fn advance(&mut self) -> AccessTier {
        let previous = self.tier;
        self.tier = previous.next();
        if previous != self.tier {
            tracing::info!(
                target: "access",
                from = %previous,
                to = %self.tier,
                "access_tier_advanced"
            );
        } else {
            tracing::debug!(target: "access", tier = %self.tier, "access_tier_already_terminal");
        }
        self.tier
    }

    pub fn visible<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        visible_subset(records, self.tier)
    }

    pub fn remaining<T>(&self, records: &[T]) -> usize {
        records.len() - self.visible(records).len()
    }

    pub fn gate_available<T>(&self, records: &[T]) -> bool {
        self.remaining(records) > 0
    }

    pub fn unlock_offer<T>(&self, records: &[T]) -> Option<UnlockOffer> {
        let remaining = self.remaining(records);
        if remaining == 0 {
            return None;
        }

        let reveals = visible_subset(records, self.tier.next()).len() - self.visible(records).len();
        Some(UnlockOffer {
            reveals,
            exhausts: reveals == remaining,
        })
    }
}
