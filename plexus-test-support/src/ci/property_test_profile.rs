//! Proptest tuning read from the environment.
//!
//! Every property suite in the workspace builds its configuration from a
//! [`ProptestRunProfile`], so CI can raise case counts or enable forking for
//! all suites at once. Malformed overrides are logged and ignored.

use std::env;

/// Number of cases to run per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Runs each property case in a forked subprocess when truthy.
pub const PLEXUS_PBT_FORK_ENV_KEY: &str = "PLEXUS_PBT_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the process environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use plexus_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its
    /// raw value.
    ///
    /// # Examples
    ///
    /// ```
    /// use plexus_test_support::ci::property_test_profile::{
    ///     PROGTEST_CASES_ENV_KEY, ProptestRunProfile,
    /// };
    ///
    /// let profile = ProptestRunProfile::from_lookup(32, false, |key| {
    ///     (key == PROGTEST_CASES_ENV_KEY).then(|| "500".to_owned())
    /// });
    /// assert_eq!(profile.cases(), 500);
    /// ```
    #[must_use]
    pub fn from_lookup(
        default_cases: u32,
        default_fork: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            cases: overridden(&lookup, PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: overridden(&lookup, PLEXUS_PBT_FORK_ENV_KEY, default_fork, parse_switch),
        }
    }

    /// Cases per property.
    #[rustfmt::skip]
    #[must_use]
    pub const fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[rustfmt::skip]
    #[must_use]
    pub const fn fork(&self) -> bool { self.fork }
}

fn overridden<T: Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    parse: fn(&str) -> Option<T>,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(raw.trim()).unwrap_or_else(|| {
        tracing::warn!(env = key, raw = %raw, "ignoring malformed property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Option<u32> {
    raw.replace('_', "")
        .parse::<u32>()
        .ok()
        .filter(|cases| *cases > 0)
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
