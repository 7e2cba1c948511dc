use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitRule {
    const fn new(per_second: u64, burst_size: u32) -> Self {
        Self {
            per_second,
            burst_size,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub public_read: RateLimitRule,
    pub protected: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            public_read: RateLimitRule::new(30, 60),
            protected: RateLimitRule::new(10, 20),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.enabled = env::var("RATE_LIMIT_ENABLED")
            .ok()
            .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" => Some(false),
                _ => None,
            })
            .unwrap_or(cfg.enabled);

        if let Some(rule) = parse_rule_env("RATE_LIMIT_PUBLIC_READ") {
            cfg.public_read = rule;
        }
        if let Some(rule) = parse_rule_env("RATE_LIMIT_PROTECTED") {
            cfg.protected = rule;
        }

        cfg
    }
}

/// Parse a "per_second:burst" pair, e.g. "10:20".
fn parse_rule_env(var_name: &str) -> Option<RateLimitRule> {
    let raw = env::var(var_name).ok()?;
    let rule = parse_rule(&raw);
    if rule.is_none() {
        tracing::warn!("Invalid {} value '{}', using default", var_name, raw);
    }
    rule
}

fn parse_rule(raw: &str) -> Option<RateLimitRule> {
    let (per_second, burst) = raw.trim().split_once(':')?;
    Some(RateLimitRule::new(
        per_second.trim().parse().ok()?,
        burst.trim().parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rule_pair() {
        assert_eq!(parse_rule("10:20"), Some(RateLimitRule::new(10, 20)));
    }

    #[test]
    fn parses_rule_with_whitespace() {
        assert_eq!(parse_rule(" 5 : 15 "), Some(RateLimitRule::new(5, 15)));
    }

    #[test]
    fn rejects_malformed_rule() {
        assert_eq!(parse_rule("10"), None);
        assert_eq!(parse_rule("a:b"), None);
        assert_eq!(parse_rule(""), None);
    }

    #[test]
    fn default_config_is_enabled() {
        let cfg = RateLimitConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.public_read, RateLimitRule::new(30, 60));
    }
}
