use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::ShopkeeperError;
use crate::core::models::tier::{Allotment, Tier};

/// One of the three mention counters kept per shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MentionField {
    MentionEveryone,
    MentionHere,
    MentionStores,
}

impl MentionField {
    pub const ALL: [MentionField; 3] = [
        MentionField::MentionEveryone,
        MentionField::MentionHere,
        MentionField::MentionStores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MentionField::MentionEveryone => "mentionEveryone",
            MentionField::MentionHere => "mentionHere",
            MentionField::MentionStores => "mentionStores",
        }
    }

    /// The share of an allotment that belongs to this counter.
    pub fn of(&self, allotment: &Allotment) -> u32 {
        match self {
            MentionField::MentionEveryone => allotment.mention_everyone,
            MentionField::MentionHere => allotment.mention_here,
            MentionField::MentionStores => allotment.mention_stores,
        }
    }
}

impl fmt::Display for MentionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentionField {
    type Err = ShopkeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MentionField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ShopkeeperError::InvalidField {
                value: s.to_string(),
            })
    }
}

/// A managed storefront and its remaining mention quota.
///
/// The counter fields are only changed through `Shop::counter_mut`, which
/// the ledger operations in `ShopService` use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: u64,
    pub owner: String,
    pub name: String,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub mention_everyone: u32,
    pub mention_here: u32,
    pub mention_stores: u32,
}

impl Shop {
    pub fn counter(&self, field: MentionField) -> u32 {
        match field {
            MentionField::MentionEveryone => self.mention_everyone,
            MentionField::MentionHere => self.mention_here,
            MentionField::MentionStores => self.mention_stores,
        }
    }

    pub(crate) fn counter_mut(&mut self, field: MentionField) -> &mut u32 {
        match field {
            MentionField::MentionEveryone => &mut self.mention_everyone,
            MentionField::MentionHere => &mut self.mention_here,
            MentionField::MentionStores => &mut self.mention_stores,
        }
    }
}

/// A shop that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShop {
    pub owner: String,
    pub name: String,
    pub tier: Tier,
    pub counters: Allotment,
}

impl NewShop {
    pub fn into_shop(self, id: u64) -> Shop {
        Shop {
            id,
            owner: self.owner,
            name: self.name,
            tier: self.tier,
            mention_everyone: self.counters.mention_everyone,
            mention_here: self.counters.mention_here,
            mention_stores: self.counters.mention_stores,
        }
    }
}

/// Mutable fields accepted by `ShopService::update_shop`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShopUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tier: Option<String>,
}
