use crate::error::AppError;
use crate::market::types::{MarketAsset, MarketCategory, FEATURED_ASSET_COUNT};
use serde::Serialize;
use std::collections::BTreeMap;

/// Last known result for one category tab.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlot {
    pub category: MarketCategory,
    pub loading: bool,
    pub assets: Vec<MarketAsset>,
    pub error: Option<String>,
    pub updated_at_ms: Option<i64>,
}

impl CategorySlot {
    fn pending(category: MarketCategory) -> Self {
        Self {
            category,
            loading: true,
            assets: Vec::new(),
            error: None,
            updated_at_ms: None,
        }
    }

    pub fn featured(&self) -> &[MarketAsset] {
        let count = self.assets.len().min(FEATURED_ASSET_COUNT);
        &self.assets[..count]
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySnapshot {
    pub category: MarketCategory,
    pub loading: bool,
    pub assets: Vec<MarketAsset>,
    pub featured: Vec<MarketAsset>,
    pub error: Option<String>,
    pub updated_at_ms: Option<i64>,
}

impl From<&CategorySlot> for CategorySnapshot {
    fn from(slot: &CategorySlot) -> Self {
        Self {
            category: slot.category,
            loading: slot.loading,
            assets: slot.assets.clone(),
            featured: slot.featured().to_vec(),
            error: slot.error.clone(),
            updated_at_ms: slot.updated_at_ms,
        }
    }
}

/// Per-category asset lists as the overview screens see them. A failed
/// refresh keeps the previously shown assets next to the error.
#[derive(Debug, Clone)]
pub struct MarketBoard {
    slots: BTreeMap<MarketCategory, CategorySlot>,
}

impl Default for MarketBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketBoard {
    pub fn new() -> Self {
        let slots = MarketCategory::ALL
            .into_iter()
            .map(|category| (category, CategorySlot::pending(category)))
            .collect();
        Self { slots }
    }

    fn slot_mut(&mut self, category: MarketCategory) -> &mut CategorySlot {
        self.slots
            .entry(category)
            .or_insert_with(|| CategorySlot::pending(category))
    }

    pub fn begin_fetch(&mut self, category: MarketCategory) {
        self.slot_mut(category).loading = true;
    }

    pub fn complete(
        &mut self,
        category: MarketCategory,
        result: Result<Vec<MarketAsset>, AppError>,
        completed_at_ms: i64,
    ) -> &CategorySlot {
        let slot = self.slot_mut(category);
        slot.loading = false;
        match result {
            Ok(assets) => {
                slot.assets = assets;
                slot.error = None;
                slot.updated_at_ms = Some(completed_at_ms);
            }
            Err(error) => slot.error = Some(error.to_string()),
        }
        slot
    }

    pub fn slot(&self, category: MarketCategory) -> Option<&CategorySlot> {
        self.slots.get(&category)
    }

    pub fn loaded_categories(&self) -> Vec<MarketCategory> {
        self.slots
            .values()
            .filter(|slot| slot.updated_at_ms.is_some())
            .map(|slot| slot.category)
            .collect()
    }

    /// Case-insensitive substring match over ticker and name, across every
    /// category. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<MarketAsset> {
        let needle = term.trim().to_lowercase();
        self.slots
            .values()
            .flat_map(|slot| slot.assets.iter())
            .filter(|asset| {
                needle.is_empty()
                    || asset.ticker.to_lowercase().contains(&needle)
                    || asset.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}
