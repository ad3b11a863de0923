pub mod validation_rule;
