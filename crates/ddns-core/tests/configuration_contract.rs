//! Contract Test: Configuration
//!
//! Both the hostname and the parameter name are required. Missing either must
//! short-circuit before any DNS or store call and surface as a 500.

mod common;

use common::*;
use ddns_core::config::{HOSTNAME_ENV, PARAMETER_NAME_ENV};
use ddns_core::engine::{MSG_MISSING_CONFIG, STATUS_ERROR};
use ddns_core::{InvocationResult, UpdaterConfig};
use std::collections::HashMap;
use std::net::Ipv4Addr;

fn config_from(vars: &[(&str, &str)]) -> ddns_core::Result<UpdaterConfig> {
    let vars: HashMap<&str, &str> = vars.iter().copied().collect();
    UpdaterConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
}

async fn assert_rejected_without_io(config: ddns_core::Result<UpdaterConfig>) {
    let resolver = ScriptedResolver::resolving_to(Ipv4Addr::new(203, 0, 113, 5));
    let store = MockParameterStore::new();

    let result = updater_for(&resolver, &store).invoke(config).await;

    assert_eq!(result, InvocationResult::error(MSG_MISSING_CONFIG));
    assert_eq!(result.status_code, STATUS_ERROR);
    assert_eq!(resolver.resolve_call_count(), 0, "No DNS lookup without config");
    assert_eq!(store.get_call_count(), 0, "No store read without config");
    assert_eq!(store.put_call_count(), 0, "No store write without config");
}

#[tokio::test]
async fn missing_parameter_name_is_rejected() {
    assert_rejected_without_io(config_from(&[(HOSTNAME_ENV, HOSTNAME)])).await;
}

#[tokio::test]
async fn missing_hostname_is_rejected() {
    assert_rejected_without_io(config_from(&[(PARAMETER_NAME_ENV, PARAMETER)])).await;
}

#[tokio::test]
async fn empty_values_are_rejected() {
    assert_rejected_without_io(config_from(&[(HOSTNAME_ENV, ""), (PARAMETER_NAME_ENV, "")])).await;
}

#[tokio::test]
async fn hand_built_empty_config_is_rejected() {
    assert_rejected_without_io(Ok(UpdaterConfig::new(HOSTNAME, "  "))).await;
}

#[tokio::test]
async fn complete_config_proceeds() {
    let resolver = ScriptedResolver::resolving_to(Ipv4Addr::new(203, 0, 113, 5));
    let store = MockParameterStore::new();
    let config = config_from(&[(HOSTNAME_ENV, HOSTNAME), (PARAMETER_NAME_ENV, PARAMETER)]);

    let result = updater_for(&resolver, &store).invoke(config).await;

    assert!(result.is_success());
    assert_eq!(resolver.queried(), vec![HOSTNAME.to_string()]);
    assert_eq!(store.value(PARAMETER).as_deref(), Some("203.0.113.5"));
}
