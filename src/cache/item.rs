//! Cache Item Module
//!
//! Defines a single cache slot: key, value, hit flag and absolute expiry.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cache Item ==
/// One cache slot, independent of whether it has been persisted.
///
/// The key is fixed at construction. The value and expiry are mutated through
/// fluent setters and only reach a repository when an item pool saves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheItem<V> {
    key: String,
    value: Option<V>,
    hit: bool,
    expires_at: Option<DateTime<FixedOffset>>,
}

impl<V> CacheItem<V> {
    // == Constructors ==
    /// Creates a miss item: no value, not a hit, never expires.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            hit: false,
            expires_at: None,
        }
    }

    /// Creates an item with an explicit hit flag.
    ///
    /// The value is only kept for a hit; a miss always reads as `None`.
    pub fn with_value(key: impl Into<String>, value: Option<V>, hit: bool) -> Self {
        Self {
            key: key.into(),
            value: if hit { value } else { None },
            hit,
            expires_at: None,
        }
    }

    // == Accessors ==
    /// Returns the item's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the current value, `None` on a miss.
    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// True if the value existed when the item was retrieved.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Returns the absolute expiry, `None` if the item never expires.
    pub fn expiration(&self) -> Option<DateTime<FixedOffset>> {
        self.expires_at
    }

    // == Mutators ==
    /// Replaces the value.
    pub fn set(&mut self, value: V) -> &mut Self {
        self.value = Some(value);
        self
    }

    /// Sets the absolute expiry. `None` means the item never expires.
    ///
    /// Timestamps in other zones convert with `.fixed_offset()` or `.into()`.
    pub fn expires_at(&mut self, expires_at: Option<DateTime<FixedOffset>>) -> &mut Self {
        self.expires_at = expires_at;
        self
    }

    /// Sets the absolute expiry from an RFC 3339 timestamp.
    ///
    /// # Errors
    /// `CacheError::InvalidExpiration` if the input does not parse.
    pub fn expires_at_str(&mut self, timestamp: &str) -> Result<&mut Self> {
        let expires_at = DateTime::parse_from_rfc3339(timestamp).map_err(|e| {
            CacheError::InvalidExpiration(format!("{:?} is not RFC 3339: {}", timestamp, e))
        })?;
        Ok(self.expires_at(Some(expires_at)))
    }

    /// Sets the expiry to now plus `ttl`. `None` means the item never expires.
    ///
    /// # Errors
    /// `CacheError::InvalidExpiration` if now plus `ttl` is out of range.
    pub fn expires_after(&mut self, ttl: Option<TimeDelta>) -> Result<&mut Self> {
        let expires_at = match ttl {
            Some(ttl) => Some(
                Utc::now()
                    .fixed_offset()
                    .checked_add_signed(ttl)
                    .ok_or_else(|| {
                        CacheError::InvalidExpiration(format!("ttl {} is out of range", ttl))
                    })?,
            ),
            None => None,
        };
        Ok(self.expires_at(expires_at))
    }

    /// Sets the expiry to now plus a std duration.
    pub fn expires_after_std(&mut self, ttl: std::time::Duration) -> Result<&mut Self> {
        let ttl = TimeDelta::from_std(ttl).map_err(|_| {
            CacheError::InvalidExpiration(format!("ttl {:?} is out of range", ttl))
        })?;
        self.expires_after(Some(ttl))
    }

    // == Is Expired ==
    /// True if the item carries an expiry strictly before the current time.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| expires < Utc::now().fixed_offset())
    }
}

// == Pool Item Trait ==
/// Read access a pool needs to save an item.
///
/// Implementors without their own expiry are stored without one.
pub trait PoolItem<V> {
    fn key(&self) -> &str;

    fn value(&self) -> Option<&V>;

    fn expiration(&self) -> Option<DateTime<FixedOffset>> {
        None
    }
}

impl<V> PoolItem<V> for CacheItem<V> {
    fn key(&self) -> &str {
        CacheItem::key(self)
    }

    fn value(&self) -> Option<&V> {
        self.get()
    }

    fn expiration(&self) -> Option<DateTime<FixedOffset>> {
        CacheItem::expiration(self)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn johannesburg() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn test_new_item_is_miss() {
        let item: CacheItem<String> = CacheItem::new("first_name");

        assert_eq!(item.key(), "first_name");
        assert!(item.get().is_none());
        assert!(!item.is_hit());
        assert!(item.expiration().is_none());
    }

    #[test]
    fn test_with_value() {
        let item = CacheItem::with_value("first_name", Some("Matthew".to_string()), true);

        assert_eq!(item.get().map(String::as_str), Some("Matthew"));
        assert!(item.is_hit());
    }

    #[test]
    fn test_with_value_miss_reads_none() {
        let mut item = CacheItem::with_value("first_name", Some("Matthew".to_string()), false);

        assert!(item.get().is_none());
        assert!(!item.is_hit());

        item.set("Bob".to_string());
        assert_eq!(item.get().map(String::as_str), Some("Bob"));
        assert!(!item.is_hit());
    }

    #[test]
    fn test_hit_with_null_value() {
        let item: CacheItem<String> = CacheItem::with_value("first_name", None, true);

        assert!(item.get().is_none());
        assert!(item.is_hit());
    }

    #[test]
    fn test_set_is_fluent() {
        let mut item = CacheItem::with_value("first_name", Some("Matthew".to_string()), true);
        item.set("Bob".to_string()).set("Bobby".to_string());

        assert_eq!(item.get().map(String::as_str), Some("Bobby"));
        assert!(item.is_hit());
    }

    #[test]
    fn test_expires_at() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        let dt = johannesburg()
            .with_ymd_and_hms(2017, 6, 30, 14, 30, 0)
            .unwrap();

        item.expires_at(Some(dt));
        assert_eq!(item.expiration(), Some(dt));
        assert_eq!(item.expiration().unwrap().offset(), &johannesburg());

        item.expires_at(None);
        assert!(item.expiration().is_none());
    }

    #[test]
    fn test_expires_at_from_utc() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        let dt = Utc.with_ymd_and_hms(2017, 6, 30, 12, 30, 0).unwrap();

        item.expires_at(Some(dt.into()));
        let local = johannesburg()
            .with_ymd_and_hms(2017, 6, 30, 14, 30, 0)
            .unwrap();
        assert_eq!(item.expiration(), Some(local));
    }

    #[test]
    fn test_expires_at_str() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        item.expires_at_str("2017-06-30T14:30:00+02:00").unwrap();

        let expected = johannesburg()
            .with_ymd_and_hms(2017, 6, 30, 14, 30, 0)
            .unwrap();
        assert_eq!(item.expiration(), Some(expected));
    }

    #[test]
    fn test_expires_at_str_malformed() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        let result = item.expires_at_str("next tuesday");

        assert!(matches!(result, Err(CacheError::InvalidExpiration(_))));
        assert!(item.expiration().is_none());
    }

    #[test]
    fn test_expires_after() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");

        item.expires_after(Some(TimeDelta::seconds(60))).unwrap();
        let remaining = item.expiration().unwrap() - Utc::now().fixed_offset();
        assert!(remaining <= TimeDelta::seconds(60));
        assert!(remaining > TimeDelta::seconds(58));

        item.expires_after(Some(TimeDelta::minutes(5))).unwrap();
        let remaining = item.expiration().unwrap() - Utc::now().fixed_offset();
        assert!(remaining > TimeDelta::seconds(298));

        item.expires_after(None).unwrap();
        assert!(item.expiration().is_none());
    }

    #[test]
    fn test_expires_after_std() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        item.expires_after_std(std::time::Duration::from_secs(120))
            .unwrap();

        assert!(item.expiration().is_some());
        assert!(!item.is_expired());
    }

    #[test]
    fn test_expires_after_out_of_range() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        let result = item.expires_after(Some(TimeDelta::MAX));

        assert!(matches!(result, Err(CacheError::InvalidExpiration(_))));
        assert!(item.expiration().is_none());
    }

    #[test]
    fn test_is_expired() {
        let mut item: CacheItem<String> = CacheItem::new("first_name");
        assert!(!item.is_expired());

        item.expires_after(Some(TimeDelta::seconds(-1))).unwrap();
        assert!(item.is_expired());

        item.expires_after(Some(TimeDelta::hours(1))).unwrap();
        assert!(!item.is_expired());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = CacheItem::with_value("first_name", Some("Bob".to_string()), true);
        let copy = original.clone();
        original.set("Matthew".to_string());

        assert_eq!(copy.get().map(String::as_str), Some("Bob"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut item = CacheItem::with_value("first_name", Some(42u32), true);
        item.expires_at_str("2057-06-30T14:30:00+02:00").unwrap();

        let json = serde_json::to_string(&item).unwrap();
        let back: CacheItem<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
