use derive_builder::Builder;

/// Firing rules on top of the plain consume / time-gate / produce algorithm.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Reject firings while a place connected by an inhibitor arc holds tokens.
    #[builder(default = "true")]
    pub enforce_inhibitors: bool,
    /// Reject firings after `max_firing_delay` has elapsed since the latest consumed token was
    /// created. Transitions that consume nothing are never rejected by this rule.
    #[builder(default)]
    pub enforce_max_delay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { enforce_inhibitors: true, enforce_max_delay: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let config = EngineConfigBuilder::default().build().unwrap();
        assert_eq!(config, EngineConfig::default());

        let config = EngineConfigBuilder::default()
            .enforce_inhibitors(false)
            .enforce_max_delay(true)
            .build()
            .unwrap();
        assert!(!config.enforce_inhibitors);
        assert!(config.enforce_max_delay);
    }
}
