use regex::Regex;

#[derive(Debug, Clone)]
pub struct Subscription {
    pattern: Regex,
}

impl Subscription {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, domain: &str) -> bool {
        self.pattern.is_match(domain)
    }

    pub fn matches_any<I, S>(&self, domains: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        domains.into_iter().any(|domain| self.matches(domain.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caas_subscription() {
        let subscription =
            Subscription::new(r"^cloud\.caas|cloud\.hosts|cloud\.networking$").unwrap();

        assert!(subscription.matches("cloud.caas"));
        assert!(subscription.matches("cloud.hosts"));
        assert!(subscription.matches("cloud.networking"));
        assert!(!subscription.matches("cloud.storage"));
        assert!(subscription.matches_any(["cloud.storage", "cloud.hosts"]));
        assert!(!subscription.matches_any(Vec::<String>::new()));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Subscription::new("cloud.(").is_err());
    }
}
