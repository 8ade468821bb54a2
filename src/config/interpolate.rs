//! Variable interpolation over raw configuration text.
//!
//! # Responsibilities
//! - Expand `${VAR}` and `${VAR:-default}` references before TOML parsing
//! - Resolve variables from the process environment plus injected overrides
//! - Fail startup when a required variable (no default) is unset
//!
//! # Design Decisions
//! - Expansion happens on the raw text, so any config value can be
//!   parameterized, including host-rule expressions injected by the host
//!   platform
//! - `SUBDOMAIN` falls back to "www" and `WWW_HOSTNAME` falls back to the
//!   value of `SUBDOMAIN`; `PARENT_DNS_DOMAIN` carries no fallback and is
//!   therefore required wherever referenced

use std::collections::HashMap;

use crate::error::RouterError;

/// Resolves `${VAR}` references in configuration text.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    vars: HashMap<String, String>,
}

impl Interpolator {
    /// Create an interpolator seeded from the process environment.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Set a variable, overriding any environment value.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Set a variable only if it is not already present.
    pub fn with_fallback(mut self, name: &str, value: impl Into<String>) -> Self {
        if !self.vars.contains_key(name) {
            self.vars.insert(name.to_string(), value.into());
        }
        self
    }

    /// Apply the hub variable conventions: `SUBDOMAIN` defaults to "www",
    /// `WWW_HOSTNAME` defaults to the value of `SUBDOMAIN`.
    pub fn with_hub_defaults(self) -> Self {
        let with_subdomain = self.with_fallback("SUBDOMAIN", "www");
        let subdomain = with_subdomain.vars["SUBDOMAIN"].clone();
        with_subdomain.with_fallback("WWW_HOSTNAME", subdomain)
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Expand all `${VAR}` / `${VAR:-default}` references in `raw`.
    ///
    /// An unset variable without a default fails with
    /// [`RouterError::MissingVariable`].
    pub fn expand(&self, raw: &str) -> Result<String, RouterError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| {
                RouterError::MissingVariable("unterminated ${...} reference".to_string())
            })?;
            let reference = &after[..end];

            let (name, default) = match reference.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (reference, None),
            };

            match self.vars.get(name) {
                Some(value) => out.push_str(value),
                None => match default {
                    Some(default) => out.push_str(default),
                    None => return Err(RouterError::MissingVariable(name.to_string())),
                },
            }

            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}
