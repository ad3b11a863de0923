use tracing::info;

use crate::model::config::{ConfigMap, ConfigValue};

enum Step<'a> {
    Visit(&'a ConfigValue),
    Yield(&'a ConfigValue),
}

// 匹配到的值先返回，再继续往里找
pub struct KeyOccurrences<'a> {
    key: &'a str,
    stack: Vec<Step<'a>>,
}

impl<'a> Iterator for KeyOccurrences<'a> {
    type Item = &'a ConfigValue;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Yield(value) => return Some(value),
                Step::Visit(ConfigValue::Object(obj)) => {
                    for (k, v) in obj {
                        self.stack.push(Step::Visit(v));
                        if k.as_str() == self.key {
                            self.stack.push(Step::Yield(v));
                        }
                    }
                }
                Step::Visit(ConfigValue::Array(arr)) => {
                    self.stack.extend(arr.iter().rev().map(Step::Visit));
                }
                Step::Visit(_) => {}
            }
        }
        None
    }
}

pub fn every_key_occurrence<'a>(value: &'a ConfigValue, key: &'a str) -> KeyOccurrences<'a> {
    KeyOccurrences {
        key,
        stack: vec![Step::Visit(value)],
    }
}

pub fn is_optional_param_present(key: &str, dictionary: &ConfigMap) -> bool {
    match dictionary.get(key) {
        None => {
            info!(
                "{} key is not in the config dictionary, since this is an optional parameter, validation is skipped.",
                key
            );
            false
        }
        Some(value) if !value.is_truthy() => {
            info!(
                "Although {} key is in the config dictionary the corresponding value is empty, since this is an optional parameter, validation is skipped.",
                key
            );
            false
        }
        Some(_) => true,
    }
}
