use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::ShopkeeperError;

/// Shop category. Decides how many mentions a shop receives on creation
/// and on every renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Platinum,
    Gold,
    Vip,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Platinum, Tier::Gold, Tier::Vip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Platinum => "PLATINUM",
            Tier::Gold => "GOLD",
            Tier::Vip => "VIP",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ShopkeeperError;

    /// Exact, case-sensitive match on the uppercase tier name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ShopkeeperError::InvalidType {
                value: s.to_string(),
            })
    }
}

/// Mentions granted to a shop of a given tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allotment {
    pub mention_everyone: u32,
    pub mention_here: u32,
    pub mention_stores: u32,
}

impl Allotment {
    pub const fn new(mention_everyone: u32, mention_here: u32, mention_stores: u32) -> Self {
        Self {
            mention_everyone,
            mention_here,
            mention_stores,
        }
    }

    /// Largest of the three values.
    pub fn max_value(&self) -> u32 {
        self.mention_everyone
            .max(self.mention_here)
            .max(self.mention_stores)
    }
}

/// Allotment per tier. Built from the defaults below, then overridden by
/// `[tiers.*]` sections of `config.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    allotments: BTreeMap<Tier, Allotment>,
}

impl TierTable {
    pub fn allotment(&self, tier: Tier) -> Allotment {
        self.allotments
            .get(&tier)
            .copied()
            .unwrap_or_else(|| default_allotment(tier))
    }

    /// Replace the allotment of a single tier.
    pub fn set(&mut self, tier: Tier, allotment: Allotment) {
        self.allotments.insert(tier, allotment);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, Allotment)> + '_ {
        self.allotments.iter().map(|(t, a)| (*t, *a))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            allotments: Tier::ALL
                .into_iter()
                .map(|t| (t, default_allotment(t)))
                .collect(),
        }
    }
}

fn default_allotment(tier: Tier) -> Allotment {
    match tier {
        Tier::Platinum => Allotment::new(500, 750, 1000),
        Tier::Gold => Allotment::new(200, 300, 400),
        Tier::Vip => Allotment::new(100, 150, 200),
    }
}
