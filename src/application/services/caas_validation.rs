use base64::{Engine as _, engine::general_purpose::STANDARD};
use ipnetwork::IpNetwork;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        entities::validation_rule::{FieldRule, RuleContext},
        plugin::ConfigValidator,
        services::key_search::every_key_occurrence,
    },
    error::ValidationError,
    model::{
        config::{ConfigMap, ConfigValue},
        snapshot::{CAAS_DOMAIN, ConfigSnapshot, HOSTS_DOMAIN, NETWORKING_DOMAIN},
    },
};

pub const SUBSCRIPTION: &str = r"^cloud\.caas|cloud\.hosts|cloud\.networking$";

pub const SERVICE_PROFILES: &str = "service_profiles";
pub const CAAS_PROFILE_PATTERN: &str = "caas_master|caas_worker";
pub const CIDR: &str = "cidr";

pub const DOCKER_SIZE_QUOTA: &str = "docker_size_quota";
pub const CHART_NAME: &str = "chart_name";
pub const CHART_VERSION: &str = "chart_version";
pub const HELM_OP_TIMEOUT: &str = "helm_operation_timeout";
pub const DOCKER0_CIDR: &str = "docker0_cidr";
pub const INSTANTIATION_TIMEOUT: &str = "instantiation_timeout";
pub const HELM_PARAMETERS: &str = "helm_parameters";
pub const ENCRYPTED_CA: &str = "encrypted_ca";
pub const ENCRYPTED_CA_KEY: &str = "encrypted_ca_key";

lazy_static! {
    // 只匹配 profile 开头
    static ref CAAS_PROFILE_REGEX: Regex =
        Regex::new(&format!("^(?:{})", CAAS_PROFILE_PATTERN)).unwrap();
    static ref DOCKER_SIZE_QUOTA_REGEX: Regex = Regex::new(r"^\d*[GMK]$").unwrap();
    // 非锚定搜索：只要包含一段合法字符就通过
    static ref CHART_NAME_REGEX: Regex = Regex::new(r"[A-Za-z0-9.\-_]+").unwrap();
    static ref CHART_VERSION_REGEX: Regex = Regex::new(r"^\d+\.\d+\.\d+$").unwrap();
}

// 按顺序执行，遇到第一个错误就返回
pub static CAAS_FIELD_RULES: [FieldRule; 9] = [
    FieldRule::optional(DOCKER_SIZE_QUOTA, check_docker_size_quota),
    FieldRule::optional(CHART_NAME, check_chart_name),
    FieldRule::optional(CHART_VERSION, check_chart_version),
    FieldRule::optional(HELM_OP_TIMEOUT, require_integer),
    FieldRule::optional(DOCKER0_CIDR, check_docker0_cidr),
    FieldRule::optional(INSTANTIATION_TIMEOUT, require_integer),
    FieldRule::optional(HELM_PARAMETERS, require_mapping),
    FieldRule::mandatory(ENCRYPTED_CA, require_base64_head),
    FieldRule::mandatory(ENCRYPTED_CA_KEY, require_base64_head),
];

fn require_match(field: &str, value: &ConfigValue, pattern: &Regex) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if pattern.is_match(s) => Ok(()),
        _ => Err(ValidationError::caas(format!(
            "{} is not a valid {}!",
            value, field
        ))),
    }
}

fn check_docker_size_quota(
    _: &RuleContext<'_>,
    field: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    require_match(field, value, &DOCKER_SIZE_QUOTA_REGEX)
}

fn check_chart_name(
    _: &RuleContext<'_>,
    field: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    require_match(field, value, &CHART_NAME_REGEX)
}

fn check_chart_version(
    ctx: &RuleContext<'_>,
    field: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    if !ctx.conf.get(CHART_NAME).is_some_and(ConfigValue::is_truthy) {
        warn!("{} shall be set only, when {} is set.", field, CHART_NAME);
    }
    require_match(field, value, &CHART_VERSION_REGEX)
}

fn require_integer(
    _: &RuleContext<'_>,
    field: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    match value {
        v if v.is_integer() => Ok(()),
        // 布尔值不当作整数
        ConfigValue::Boolean(_) => Err(ValidationError::caas(format!(
            "{}:{} is not an integer, booleans are not accepted",
            field, value
        ))),
        _ => Err(ValidationError::caas(format!(
            "{}:{} is not an integer",
            field, value
        ))),
    }
}

fn require_mapping(
    _: &RuleContext<'_>,
    _: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    match value {
        ConfigValue::Object(_) => Ok(()),
        other => Err(ValidationError::caas(format!(
            "The given input: {} is not a dictionary!",
            other
        ))),
    }
}

fn parse_network(value: &ConfigValue) -> Result<IpNetwork, String> {
    value
        .as_str()
        .ok_or_else(|| "not a string".to_string())?
        .trim()
        .parse::<IpNetwork>()
        .map_err(|e| e.to_string())
}

fn overlaps(a: &IpNetwork, b: &IpNetwork) -> bool {
    a.contains(b.network()) || b.contains(a.network())
}

fn check_docker0_cidr(
    ctx: &RuleContext<'_>,
    field: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    let docker0_cidr = parse_network(value).map_err(|e| {
        ValidationError::caas(format!("{} is an invalid subnet address: {}", field, e))
    })?;

    let netw_conf = ctx
        .snapshot
        .decode(NETWORKING_DOMAIN)
        .map_err(|e| {
            ValidationError::caas(format!("{} cannot be parsed: {}", NETWORKING_DOMAIN, e))
        })?
        .ok_or_else(|| {
            ValidationError::caas(format!(
                "{} configuration is missing, {} cannot be checked against it!",
                NETWORKING_DOMAIN, field
            ))
        })?;

    for cidr in every_key_occurrence(&netw_conf, CIDR) {
        let network = parse_network(cidr).map_err(|e| {
            ValidationError::caas(format!(
                "{} from {} is an invalid subnet address: {}",
                cidr, NETWORKING_DOMAIN, e
            ))
        })?;
        debug!("checking {} against {}", docker0_cidr, network);
        if overlaps(&docker0_cidr, &network) {
            return Err(ValidationError::caas(format!(
                "CIDR configured for {} shall be an unused IP range, but it overlaps with {} from {}.",
                field, cidr, NETWORKING_DOMAIN
            )));
        }
    }
    Ok(())
}

fn require_base64_head(
    _: &RuleContext<'_>,
    field: &'static str,
    value: &ConfigValue,
) -> Result<(), ValidationError> {
    let encoded = match value.as_array().and_then(|values| values.first()) {
        Some(first) if first.is_truthy() => first,
        _ => {
            return Err(ValidationError::caas(format!(
                "{} shall not be empty !",
                field
            )));
        }
    };
    let encoded = encoded.as_str().ok_or_else(|| {
        ValidationError::caas(format!("Invalid {}: {} is not a string", field, encoded))
    })?;

    // 证书内容可能按行折叠，先去掉空白
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| ValidationError::caas(format!("Invalid {}: {}", field, e)))?;
    Ok(())
}

fn has_caas_profile(profiles: &ConfigValue) -> bool {
    match profiles {
        ConfigValue::String(profile) => CAAS_PROFILE_REGEX.is_match(profile),
        ConfigValue::Array(profiles) => profiles
            .iter()
            .filter_map(ConfigValue::as_str)
            .any(|profile| CAAS_PROFILE_REGEX.is_match(profile)),
        ConfigValue::Object(profiles) => profiles
            .keys()
            .any(|profile| CAAS_PROFILE_REGEX.is_match(profile)),
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct CaasValidation {
    rules: &'static [FieldRule],
}

impl Default for CaasValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl CaasValidation {
    pub fn new() -> Self {
        Self {
            rules: &CAAS_FIELD_RULES,
        }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    pub fn validate(&self, props: &ConfigSnapshot) -> Result<(), ValidationError> {
        if !self.is_caas_mandatory(props)? {
            info!(
                "{} not found in {}, caas validation is not needed.",
                CAAS_PROFILE_PATTERN, HOSTS_DOMAIN
            );
            return Ok(());
        }

        let caas_conf = self.props_pre_check(props)?;
        let ctx = RuleContext {
            conf: &caas_conf,
            snapshot: props,
        };
        for rule in self.rules {
            rule.apply(&ctx)?;
        }
        info!("{} validation passed", CAAS_DOMAIN);
        Ok(())
    }

    pub fn is_caas_mandatory(&self, props: &ConfigSnapshot) -> Result<bool, ValidationError> {
        let hosts_conf = props
            .decode(HOSTS_DOMAIN)
            .map_err(|e| ValidationError::caas(format!("{} cannot be parsed: {}", HOSTS_DOMAIN, e)))?
            .ok_or_else(|| {
                ValidationError::caas(format!("{} configuration is missing!", HOSTS_DOMAIN))
            })?;

        Ok(every_key_occurrence(&hosts_conf, SERVICE_PROFILES).any(has_caas_profile))
    }

    fn props_pre_check(&self, props: &ConfigSnapshot) -> Result<ConfigMap, ValidationError> {
        let caas_conf = props
            .decode(CAAS_DOMAIN)
            .map_err(|e| ValidationError::caas(format!("{} cannot be parsed: {}", CAAS_DOMAIN, e)))?
            .ok_or_else(|| {
                ValidationError::caas(format!(
                    "{} configuration is missing from {:?}!",
                    CAAS_DOMAIN,
                    props.domains().collect::<Vec<_>>()
                ))
            })?;

        match caas_conf {
            ConfigValue::Object(conf) if conf.is_empty() => Err(ValidationError::caas(format!(
                "{{\"{}\": {{}}}} is an empty dictionary!",
                CAAS_DOMAIN
            ))),
            ConfigValue::Object(conf) => Ok(conf),
            other => Err(ValidationError::caas(format!(
                "The given input: {} is not a dictionary!",
                other
            ))),
        }
    }
}

impl ConfigValidator for CaasValidation {
    fn name(&self) -> &str {
        "caas_validation"
    }

    fn subscription_info(&self) -> &str {
        SUBSCRIPTION
    }

    fn validate_set(&self, props: &ConfigSnapshot) -> Result<(), ValidationError> {
        self.validate(props)
    }
}
