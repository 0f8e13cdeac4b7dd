#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use fintrack_core::{
    core::Clock,
    domain::NewTransaction,
    storage::{KeyValueStorage, MemoryStorage},
    LedgerError, Result,
};

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Memory storage whose writes can be switched off to simulate an outage.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    failing: AtomicBool,
}

impl FlakyStorage {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStorage for FlakyStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("disk unavailable".into()));
        }
        self.inner.save(key, bytes)
    }
}

pub fn april(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, day, 0, 0, 0).unwrap()
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 22, 0, 0, 0).unwrap()
}

/// Income 5000 on the 15th, food 500 on the 18th, housing 1200 on the 1st.
pub fn april_scenario() -> Vec<NewTransaction> {
    vec![
        NewTransaction::income(5000.0, "Salary", april(15)),
        NewTransaction::expense(500.0, "Groceries", "food", april(18)),
        NewTransaction::expense(1200.0, "Rent", "housing", april(1)),
    ]
}

/// Deterministic pseudo-random ledger spanning roughly 2024-2025.
pub fn generated_ledger(seed: u64, count: usize) -> Vec<NewTransaction> {
    const CATEGORIES: [&str; 6] = ["food", "housing", "xyz", "shopping", "other", "utilities"];
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|index| {
            let date = base + Duration::hours((next() % (24 * 540)) as i64);
            let amount = 1.0 + (next() % 250_000) as f64 / 100.0;
            if next() % 3 == 0 {
                NewTransaction::income(amount, format!("income {index}"), date)
            } else {
                let category = CATEGORIES[(next() % CATEGORIES.len() as u64) as usize];
                NewTransaction::expense(amount, format!("expense {index}"), category, date)
            }
        })
        .collect()
}
