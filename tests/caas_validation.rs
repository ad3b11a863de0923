use cm_plugins::application::services::caas_validation::CaasValidation;
use cm_plugins::domain::plugin::ConfigValidator;
use cm_plugins::error::ValidationError;
use cm_plugins::model::snapshot::{CAAS_DOMAIN, ConfigSnapshot, HOSTS_DOMAIN, NETWORKING_DOMAIN};
use serde_json::{Value, json};

fn hosts(profiles: &[&str]) -> String {
    json!({
        "hosts": {
            "controller-1": {"service_profiles": profiles, "network_profiles": ["infra"]},
            "compute-1": {"service_profiles": ["compute"]},
        }
    })
    .to_string()
}

fn networking() -> String {
    json!({
        "infra_external": {"cidr": "10.10.0.0/24", "vlan": 100},
        "networks": [
            {"name": "infra_internal", "cidr": "192.168.12.0/24"},
            {"name": "storage", "subnets": [{"cidr": "172.16.0.0/16"}]},
        ]
    })
    .to_string()
}

fn valid_caas() -> Value {
    json!({
        "docker_size_quota": "10G",
        "chart_name": "caas-infra",
        "chart_version": "1.2.3",
        "helm_operation_timeout": 900,
        "docker0_cidr": "172.17.0.0/16",
        "instantiation_timeout": 60,
        "helm_parameters": {"registry": "registry.kube-system.svc"},
        "encrypted_ca": ["dGVzdA=="],
        "encrypted_ca_key": ["a2V5"],
    })
}

fn snapshot(caas: Value) -> ConfigSnapshot {
    ConfigSnapshot::new()
        .with(HOSTS_DOMAIN, hosts(&["caas_master"]))
        .with(NETWORKING_DOMAIN, networking())
        .with(CAAS_DOMAIN, caas.to_string())
}

fn with_field(field: &str, value: Value) -> ConfigSnapshot {
    let mut caas = valid_caas();
    caas[field] = value;
    snapshot(caas)
}

fn validate(snapshot: &ConfigSnapshot) -> Result<(), ValidationError> {
    CaasValidation::new().validate(snapshot)
}

#[test]
fn test_valid_configuration_passes() {
    assert!(validate(&snapshot(valid_caas())).is_ok());
}

#[test]
fn test_skipped_without_caas_profile() {
    let snapshot = ConfigSnapshot::new()
        .with(HOSTS_DOMAIN, hosts(&["compute", "storage"]))
        .with(CAAS_DOMAIN, "this is not json");
    assert!(validate(&snapshot).is_ok());

    let no_caas = ConfigSnapshot::new().with(HOSTS_DOMAIN, hosts(&["controller"]));
    assert!(validate(&no_caas).is_ok());
}

#[test]
fn test_worker_profile_makes_validation_mandatory() {
    let snapshot = ConfigSnapshot::new().with(HOSTS_DOMAIN, hosts(&["caas_worker"]));
    let err = validate(&snapshot).unwrap_err();
    assert!(err.description.contains("cloud.caas configuration is missing"));
}

#[test]
fn test_empty_caas_document() {
    let err = validate(&snapshot(json!({}))).unwrap_err();
    assert!(err.description.contains("is an empty dictionary"));
}

#[test]
fn test_docker_size_quota() {
    assert!(validate(&with_field("docker_size_quota", json!("10G"))).is_ok());
    assert!(validate(&with_field("docker_size_quota", json!("10X"))).is_err());
    assert!(validate(&with_field("docker_size_quota", json!("G10"))).is_err());
    // 空值视为未设置
    assert!(validate(&with_field("docker_size_quota", json!(""))).is_ok());
}

#[test]
fn test_chart_version() {
    assert!(validate(&with_field("chart_version", json!("1.2.3"))).is_ok());
    assert!(validate(&with_field("chart_version", json!("1.2"))).is_err());
    assert!(validate(&with_field("chart_version", json!("v1.2.3"))).is_err());
}

#[test]
fn test_docker0_cidr_overlap() {
    let mut caas = valid_caas();
    caas["docker0_cidr"] = json!("10.0.0.0/24");
    let overlapping = ConfigSnapshot::new()
        .with(HOSTS_DOMAIN, hosts(&["caas_master"]))
        .with(NETWORKING_DOMAIN, json!({"net": {"cidr": "10.0.0.128/25"}}).to_string())
        .with(CAAS_DOMAIN, caas.to_string());
    let err = validate(&overlapping).unwrap_err();
    assert!(err.description.contains("overlaps with 10.0.0.128/25 from cloud.networking"));

    let disjoint = ConfigSnapshot::new()
        .with(HOSTS_DOMAIN, hosts(&["caas_master"]))
        .with(NETWORKING_DOMAIN, json!({"net": {"cidr": "192.168.0.0/24"}}).to_string())
        .with(CAAS_DOMAIN, caas.to_string());
    assert!(validate(&disjoint).is_ok());
}

#[test]
fn test_docker0_cidr_checks_nested_networks() {
    let err = validate(&with_field("docker0_cidr", json!("172.16.5.0/24"))).unwrap_err();
    assert!(err.description.contains("172.16.0.0/16"));
}

#[test]
fn test_missing_encrypted_ca_fails() {
    let mut caas = valid_caas();
    caas.as_object_mut().unwrap().remove("encrypted_ca");
    let err = validate(&snapshot(caas)).unwrap_err();
    assert!(err.description.starts_with("encrypted_ca cannot be found in"));
}

#[test]
fn test_encrypted_ca_base64() {
    let err = validate(&with_field("encrypted_ca", json!(["not-valid-base64!!"]))).unwrap_err();
    assert!(err.description.starts_with("Invalid encrypted_ca:"));
    assert!(validate(&with_field("encrypted_ca", json!(["dGVzdA=="]))).is_ok());
    assert!(validate(&with_field("encrypted_ca_key", json!([]))).is_err());
}

#[test]
fn test_fail_fast_reports_first_rule() {
    let mut caas = valid_caas();
    caas["chart_version"] = json!("1.2");
    caas["helm_parameters"] = json!("not a map");
    let err = validate(&snapshot(caas)).unwrap_err();
    assert_eq!(err.description, "1.2 is not a valid chart_version!");
    assert_eq!(
        err.to_string(),
        "Validation error in caas_validation: 1.2 is not a valid chart_version!"
    );
}

#[test]
fn test_validator_trait_surface() {
    let validator = CaasValidation::new();
    assert_eq!(validator.name(), "caas_validation");
    assert_eq!(
        validator.subscription_info(),
        r"^cloud\.caas|cloud\.hosts|cloud\.networking$"
    );
    assert!(validator.validate_set(&snapshot(valid_caas())).is_ok());
    assert!(validator.validate_delete(&[CAAS_DOMAIN.to_string()]).is_ok());
}

#[test]
fn test_validator_is_shareable_across_threads() {
    let validator = std::sync::Arc::new(CaasValidation::new());
    let handles: Vec<_> = ["10G", "10X"]
        .into_iter()
        .map(|quota| {
            let validator = validator.clone();
            std::thread::spawn(move || {
                validator
                    .validate(&with_field("docker_size_quota", json!(quota)))
                    .is_ok()
            })
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false]);
}
