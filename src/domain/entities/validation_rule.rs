use std::fmt::{Debug, Formatter};

use tracing::debug;

use crate::{
    domain::services::key_search::is_optional_param_present,
    error::ValidationError,
    model::{
        config::{ConfigMap, ConfigValue},
        snapshot::ConfigSnapshot,
    },
};

pub struct RuleContext<'a> {
    pub conf: &'a ConfigMap,
    // 跨域检查用
    pub snapshot: &'a ConfigSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Mandatory,
}

pub type FieldCheck =
    fn(&RuleContext<'_>, &'static str, &ConfigValue) -> Result<(), ValidationError>;

pub struct FieldRule {
    pub field: &'static str,
    pub presence: Presence,
    pub check: FieldCheck,
}

impl Debug for FieldRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("presence", &self.presence)
            .finish()
    }
}

impl FieldRule {
    pub const fn optional(field: &'static str, check: FieldCheck) -> Self {
        Self {
            field,
            presence: Presence::Optional,
            check,
        }
    }

    pub const fn mandatory(field: &'static str, check: FieldCheck) -> Self {
        Self {
            field,
            presence: Presence::Mandatory,
            check,
        }
    }

    pub fn applies(&self, conf: &ConfigMap) -> Result<bool, ValidationError> {
        match self.presence {
            Presence::Optional => Ok(is_optional_param_present(self.field, conf)),
            Presence::Mandatory if conf.contains_key(self.field) => Ok(true),
            Presence::Mandatory => Err(ValidationError::caas(format!(
                "{} cannot be found in {}",
                self.field,
                ConfigValue::Object(conf.clone())
            ))),
        }
    }

    pub fn apply(&self, ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
        if !self.applies(ctx.conf)? {
            return Ok(());
        }
        match ctx.conf.get(self.field) {
            Some(value) => {
                debug!("validating {}: {}", self.field, value);
                (self.check)(ctx, self.field, value)
            }
            None => Ok(()),
        }
    }
}
