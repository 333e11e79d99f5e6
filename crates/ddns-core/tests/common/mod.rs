//! Test doubles and common utilities for updater contract tests
//!
//! The doubles count every call so tests can assert not only on outcomes but
//! on which collaborators were (or were not) touched.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{HostnameResolver, ParameterLookup, ParameterStore, Resolution};
use ddns_core::UpdaterConfig;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const HOSTNAME: &str = "home.example.net";
pub const PARAMETER: &str = "/home/current-ip";

/// A resolver whose answer the test controls
#[derive(Clone)]
pub struct ScriptedResolver {
    answer: Arc<Mutex<Resolution>>,
    resolve_call_count: Arc<AtomicUsize>,
    queried: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    pub fn new(answer: Resolution) -> Self {
        Self {
            answer: Arc::new(Mutex::new(answer)),
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
            queried: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolver answering with a fixed address
    pub fn resolving_to(ip: Ipv4Addr) -> Self {
        Self::new(Resolution::Resolved(ip))
    }

    /// Change the answer for subsequent calls
    pub fn set_answer(&self, answer: Resolution) {
        *self.answer.lock().unwrap() = answer;
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }

    /// Hostnames passed to resolve()
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostnameResolver for ScriptedResolver {
    async fn resolve(&self, hostname: &str) -> Resolution {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        self.queried.lock().unwrap().push(hostname.to_string());
        self.answer.lock().unwrap().clone()
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// A parameter store that tracks calls and can be told to fail
#[derive(Clone, Default)]
pub struct MockParameterStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    get_call_count: Arc<AtomicUsize>,
    put_call_count: Arc<AtomicUsize>,
    puts: Arc<Mutex<Vec<(String, String)>>>,
    fail_get: Arc<AtomicBool>,
    fail_put: Arc<AtomicBool>,
}

impl MockParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with_value(name: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        store
    }

    /// Make every get() fail with a storage error
    pub fn fail_reads(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    /// Make every put() fail with a storage error
    pub fn fail_writes(&self) {
        self.fail_put.store(true, Ordering::SeqCst);
    }

    /// Get the number of times get() was called
    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times put() was called
    pub fn put_call_count(&self) -> usize {
        self.put_call_count.load(Ordering::SeqCst)
    }

    /// Every (name, value) passed to put(), in order
    pub fn puts(&self) -> Vec<(String, String)> {
        self.puts.lock().unwrap().clone()
    }

    /// Current value of a parameter
    pub fn value(&self, name: &str) -> Option<String> {
        self.values.lock().unwrap().get(name).cloned()
    }
}

#[async_trait::async_trait]
impl ParameterStore for MockParameterStore {
    async fn get(&self, name: &str) -> Result<ParameterLookup> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Error::backend("mock", "AccessDeniedException: read denied"));
        }

        Ok(match self.values.lock().unwrap().get(name) {
            Some(value) => ParameterLookup::Found(value.clone()),
            None => ParameterLookup::NotFound,
        })
    }

    async fn put(&self, name: &str, value: &str) -> Result<()> {
        self.put_call_count.fetch_add(1, Ordering::SeqCst);
        self.puts
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(Error::backend("mock", "ThrottlingException: write denied"));
        }

        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "mock"
    }
}

/// The configuration every contract test uses
pub fn test_config() -> UpdaterConfig {
    UpdaterConfig::new(HOSTNAME, PARAMETER)
}

/// Build an updater over clones of the given doubles
pub fn updater_for(
    resolver: &ScriptedResolver,
    store: &MockParameterStore,
) -> ddns_core::HomeIpUpdater {
    ddns_core::HomeIpUpdater::new(Arc::new(resolver.clone()), Arc::new(store.clone()))
}
