use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::zakat::Metal;

/// Price of one troy ounce on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

type CacheKey = (Metal, String);

/// In-memory cache of metal quotes, per (metal, currency).
///
/// - Past dates are fetched once and trusted forever.
/// - Today's quote is refreshed at most once per day.
///
/// Points are kept sorted by date so lookups are binary searches.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    points: HashMap<CacheKey, Vec<PricePoint>>,
    refreshed_on: HashMap<CacheKey, NaiveDate>,
}

fn key(metal: Metal, currency: &str) -> CacheKey {
    (metal, currency.to_uppercase())
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metal: Metal, currency: &str, date: NaiveDate) -> Option<f64> {
        let points = self.points.get(&key(metal, currency))?;
        points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| points[idx].price)
    }

    /// Most recent cached quote on or before `date`.
    pub fn latest_on_or_before(&self, metal: Metal, currency: &str, date: NaiveDate) -> Option<PricePoint> {
        let points = self.points.get(&key(metal, currency))?;
        let end = match points.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        };
        end.checked_sub(1).map(|idx| points[idx])
    }

    /// Insert or overwrite the quote for `date`.
    pub fn insert(&mut self, metal: Metal, currency: &str, date: NaiveDate, price: f64) {
        let points = self.points.entry(key(metal, currency)).or_default();
        match points.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => points[idx].price = price,
            Err(idx) => points.insert(idx, PricePoint { date, price }),
        }
    }

    pub fn is_fresh(&self, metal: Metal, currency: &str, today: NaiveDate) -> bool {
        self.refreshed_on
            .get(&key(metal, currency))
            .is_some_and(|&d| d == today)
    }

    pub fn mark_refreshed(&mut self, metal: Metal, currency: &str, today: NaiveDate) {
        self.refreshed_on.insert(key(metal, currency), today);
    }

    /// Total number of cached quotes.
    pub fn len(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop quotes dated before `before`. Returns how many were removed.
    pub fn prune_before(&mut self, before: NaiveDate) -> usize {
        let mut removed = 0;
        for points in self.points.values_mut() {
            let split = points.partition_point(|p| p.date < before);
            removed += split;
            points.drain(..split);
        }
        self.points.retain(|_, v| !v.is_empty());
        let points = &self.points;
        self.refreshed_on
            .retain(|k, refreshed| points.contains_key(k) && *refreshed >= before);
        removed
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.refreshed_on.clear();
    }
}
