pub mod backend;
pub mod coach;
pub mod domain;
pub mod impact;
pub mod matching;
pub mod seeds;
pub mod store;

pub mod config {
    use anyhow::Context;

    use crate::store::LeadPolicy;

    /// Ten years.
    pub const MAX_LEAD_EXPIRY_DAYS: i64 = 3650;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub port: u16,
        /// Multiplier applied to mock API latencies. 0 disables them.
        pub latency_scale: f64,
        pub lead_expiry_days: i64,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                port: parse_var("PORT")?.unwrap_or(3000),
                latency_scale: parse_var("SMARTGRANT_LATENCY_SCALE")?.unwrap_or(1.0),
                lead_expiry_days: parse_var("SMARTGRANT_LEAD_EXPIRY_DAYS")?
                    .unwrap_or(LeadPolicy::default().expiry_days),
            }
            .validated()
        }

        pub fn validated(self) -> anyhow::Result<Self> {
            anyhow::ensure!(
                self.latency_scale.is_finite() && self.latency_scale >= 0.0,
                "SMARTGRANT_LATENCY_SCALE must be a finite number >= 0, got {}",
                self.latency_scale
            );
            anyhow::ensure!(
                (0..=MAX_LEAD_EXPIRY_DAYS).contains(&self.lead_expiry_days),
                "SMARTGRANT_LEAD_EXPIRY_DAYS must be within 0..={MAX_LEAD_EXPIRY_DAYS}, got {}",
                self.lead_expiry_days
            );
            Ok(self)
        }

        pub fn lead_policy(&self) -> LeadPolicy {
            LeadPolicy {
                expiry_days: self.lead_expiry_days,
                ..LeadPolicy::default()
            }
        }
    }

    fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match std::env::var(key) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .with_context(|| format!("{key} is not valid: {raw:?}")),
            Err(_) => Ok(None),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn settings(latency_scale: f64, lead_expiry_days: i64) -> Settings {
            Settings {
                sentry_dsn: None,
                port: 3000,
                latency_scale,
                lead_expiry_days,
            }
        }

        #[test]
        fn defaults_pass_validation() {
            let s = settings(1.0, 7).validated().unwrap();
            assert_eq!(s.lead_policy().expiry_days, 7);
            assert_eq!(s.lead_policy().price_credits, 1);
            assert!(settings(0.0, 0).validated().is_ok());
            assert!(settings(2.5, MAX_LEAD_EXPIRY_DAYS).validated().is_ok());
        }

        #[test]
        fn non_finite_or_negative_scale_is_rejected() {
            for scale in [f64::INFINITY, f64::NAN, -0.5] {
                let err = settings(scale, 7).validated().unwrap_err();
                assert!(err.to_string().contains("SMARTGRANT_LATENCY_SCALE"));
            }
        }

        #[test]
        fn huge_or_negative_expiry_is_rejected() {
            for days in [1_000_000_000, MAX_LEAD_EXPIRY_DAYS + 1, -1] {
                let err = settings(1.0, days).validated().unwrap_err();
                assert!(err.to_string().contains("SMARTGRANT_LEAD_EXPIRY_DAYS"));
            }
        }
    }
}
