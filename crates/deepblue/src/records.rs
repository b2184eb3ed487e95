//! Core record types for deepblue.
//!
//! This module defines the persisted record collections (spare-part
//! inventory, statutory certificates, rest-hour log) and the identifier
//! generation used when new records are added.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fill ratio (percent) below which an inventory item counts as low stock.
pub const LOW_STOCK_PERCENT: f64 = 35.0;

/// Days before expiry at which a certificate is flagged as expiring soon.
pub const CERT_WARNING_DAYS: i64 = 90;

/// A spare part tracked in the shipboard inventory.
///
/// Invariant: `stock` is clamped into `0..=max_stock` on every construction
/// and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique, stable identifier.
    pub id: String,

    /// Display label.
    pub name: String,

    /// Units currently on board.
    pub stock: u32,

    /// Storage capacity for this part.
    pub max_stock: u32,

    /// Free-text category label.
    pub category: String,
}

impl InventoryItem {
    /// Create a new item, clamping `stock` into `0..=max_stock`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stock: u32,
        max_stock: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock: stock.min(max_stock),
            max_stock,
            category: category.into(),
        }
    }

    /// Adjust the stock level by `delta` units, clamping into `0..=max_stock`.
    pub fn adjust_stock(&mut self, delta: i64) {
        let adjusted = i64::from(self.stock).saturating_add(delta);
        self.stock = u32::try_from(adjusted.clamp(0, i64::from(self.max_stock)))
            .unwrap_or(self.max_stock);
    }

    /// Fraction of capacity currently stocked, as a percentage.
    #[must_use]
    pub fn fill_percent(&self) -> f64 {
        if self.max_stock == 0 {
            return 0.0;
        }
        f64::from(self.stock) / f64::from(self.max_stock) * 100.0
    }

    /// Whether the item is below the low-stock display threshold.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.fill_percent() < LOW_STOCK_PERCENT
    }
}

/// A statutory ship certificate with an absolute expiry timestamp.
///
/// Past expiry dates are valid data; expiry is a state computed at read
/// time, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Unique, stable identifier.
    pub id: String,

    /// Display label.
    pub name: String,

    /// Absolute expiry timestamp (RFC 3339 serialized).
    pub expiry_date: DateTime<Utc>,
}

/// Read-time status of a certificate relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    /// The expiry date has passed.
    Expired {
        /// Whole days since expiry.
        days_overdue: i64,
    },
    /// Expiry is within the warning window.
    ExpiringSoon {
        /// Whole days until expiry.
        days_left: i64,
    },
    /// Expiry is comfortably in the future.
    Valid {
        /// Whole days until expiry.
        days_left: i64,
    },
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired { days_overdue } => write!(f, "expired {days_overdue}d ago"),
            Self::ExpiringSoon { days_left } => write!(f, "expires in {days_left}d"),
            Self::Valid { .. } => write!(f, "valid"),
        }
    }
}

impl CertificateStatus {
    /// Whether the certificate has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// Whether the certificate is inside the warning window.
    #[must_use]
    pub fn is_expiring_soon(&self) -> bool {
        matches!(self, Self::ExpiringSoon { .. })
    }
}

impl Certificate {
    /// Create a new certificate.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        expiry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expiry_date,
        }
    }

    /// Compute the status of this certificate at the given instant.
    ///
    /// Whole days are counted by floor division, so a certificate that
    /// expired earlier today is already `Expired`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> CertificateStatus {
        let days = (self.expiry_date - now).num_seconds().div_euclid(86_400);
        if days < 0 {
            CertificateStatus::Expired { days_overdue: -days }
        } else if days < CERT_WARNING_DAYS {
            CertificateStatus::ExpiringSoon { days_left: days }
        } else {
            CertificateStatus::Valid { days_left: days }
        }
    }

    /// Compute the status of this certificate as of now.
    #[must_use]
    pub fn status(&self) -> CertificateStatus {
        self.status_at(Utc::now())
    }
}

/// One day of hourly duty flags: `true` = on duty, `false` = resting.
///
/// Always exactly 24 slots; serializes as a bare JSON array of booleans.
/// Nothing here enforces a minimum rest requirement; violations are
/// computed for display by [`crate::calc::rest_compliance`], never
/// prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestLog([bool; RestLog::SLOTS]);

impl RestLog {
    /// Number of hour slots in a day.
    pub const SLOTS: usize = 24;

    /// A fully-rested day (all slots `false`).
    #[must_use]
    pub fn new() -> Self {
        Self([false; Self::SLOTS])
    }

    /// Build a log from explicit slots.
    #[must_use]
    pub fn from_slots(slots: [bool; Self::SLOTS]) -> Self {
        Self(slots)
    }

    /// The raw hour slots.
    #[must_use]
    pub fn slots(&self) -> &[bool; Self::SLOTS] {
        &self.0
    }

    /// Whether the given hour slot is marked on duty.
    ///
    /// Returns `None` for an out-of-range hour.
    #[must_use]
    pub fn is_on_duty(&self, hour: usize) -> Option<bool> {
        self.0.get(hour).copied()
    }

    /// Flip the duty flag for the given hour slot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidInput`] if `hour` is not in
    /// `0..24`.
    pub fn toggle(&mut self, hour: usize) -> crate::error::Result<()> {
        let slot = self.0.get_mut(hour).ok_or_else(|| {
            crate::error::Error::invalid_input(format!("hour {hour} is out of range (0..24)"))
        })?;
        *slot = !*slot;
        Ok(())
    }

    /// Count of resting (off-duty) hours.
    #[must_use]
    pub fn rest_hours(&self) -> u32 {
        u32::try_from(self.0.iter().filter(|on_duty| !**on_duty).count()).unwrap_or(0)
    }

    /// Count of on-duty hours.
    #[must_use]
    pub fn duty_hours(&self) -> u32 {
        u32::try_from(Self::SLOTS).unwrap_or(24) - self.rest_hours()
    }
}

impl Default for RestLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Generator of unique record identifiers, injected into the store.
///
/// Record ids must be unique among existing records at add time; the store
/// re-draws from the generator if a collision is ever observed.
pub trait IdGenerator: Send + std::fmt::Debug {
    /// Produce the next candidate identifier.
    fn next_id(&mut self) -> String;
}

/// Default identifier generator: random UUID v4.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic counter-based generator, mainly for tests.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    last: u64,
}

impl SequenceGenerator {
    /// Create a generator whose first id will be `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            last: first.saturating_sub(1),
        }
    }
}

impl IdGenerator for SequenceGenerator {
    fn next_id(&mut self) -> String {
        self.last += 1;
        self.last.to_string()
    }
}

/// The inventory collection seeded on first access.
#[must_use]
pub fn default_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("1", "Main engine fuel injector", 4, 6, "Mechanical"),
        InventoryItem::new("2", "Hydraulic oil (drum)", 2, 10, "Consumables"),
        InventoryItem::new("3", "Welding electrodes (box)", 15, 20, "Consumables"),
    ]
}

/// The certificate collection seeded on first access.
///
/// One certificate is seeded already expired and one near expiry, so the
/// warning states are visible out of the box.
#[must_use]
pub fn default_certificates(now: DateTime<Utc>) -> Vec<Certificate> {
    vec![
        Certificate::new(
            "1",
            "Safety Management Certificate (SMC)",
            now + Duration::days(150),
        ),
        Certificate::new(
            "2",
            "International Oil Pollution Prevention Certificate (IOPP)",
            now + Duration::days(45),
        ),
        Certificate::new("3", "Load Line Certificate", now - Duration::days(30)),
    ]
}
