//! In-process `CustomerApi` for faults HTTP cannot produce

use async_trait::async_trait;
use customer_uploader::core::transport::{NewAddress, NewCustomField, NewCustomer};
use customer_uploader::{CustomerApi, RemoteId, TransportError, TransportResult};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

/// Hands out increasing ids, panics on scripted first names or address lines
/// and tracks how many calls overlap.
pub struct FakeApi {
    panic_on: HashSet<String>,
    reject: HashSet<String>,
    delay: Duration,
    next_id: AtomicI64,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            panic_on: HashSet::new(),
            reject: HashSet::new(),
            delay: Duration::ZERO,
            next_id: AtomicI64::new(1000),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panic_on(mut self, key: &str) -> Self {
        self.panic_on.insert(key.to_string());
        self
    }

    pub fn reject(mut self, key: &str) -> Self {
        self.reject.insert(key.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Highest number of calls observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Keys of every call, in arrival order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, key: &str) -> TransportResult<RemoteId> {
        self.calls.lock().unwrap().push(key.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(key) {
            panic!("scripted fault for {}", key);
        }
        if self.reject.contains(key) {
            return Err(TransportError::http_status("fake://api", 422, "rejected"));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl CustomerApi for FakeApi {
    async fn create_customer(&self, customer: &NewCustomer) -> TransportResult<RemoteId> {
        self.answer(&customer.first_name).await
    }

    async fn create_address(&self, address: &NewAddress) -> TransportResult<RemoteId> {
        self.answer(&address.address).await
    }

    async fn create_custom_field(&self, field: &NewCustomField) -> TransportResult<RemoteId> {
        self.answer(&field.label).await
    }
}
