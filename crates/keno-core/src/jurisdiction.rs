//! The fixed set of Keno jurisdictions and the redirect rules between them.
//!
//! Only three state endpoints are actually served upstream. `WA` has no Keno
//! service and is pointed at `NSW`; `NT`, `SA` and `TAS` share the `ACT`
//! endpoint. [`canonicalize`] applies these rules once, at client
//! construction, and reports each redirect as a diagnostic string.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ConfigError;

/// A regional code selecting which state's endpoint and ruleset to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    Act,
    Nsw,
    Qld,
    Vic,
    Wa,
    Nt,
    Sa,
    Tas,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 8] = [
        Jurisdiction::Act,
        Jurisdiction::Nsw,
        Jurisdiction::Qld,
        Jurisdiction::Vic,
        Jurisdiction::Wa,
        Jurisdiction::Nt,
        Jurisdiction::Sa,
        Jurisdiction::Tas,
    ];

    /// Upper-case code as used in the `jurisdiction` query parameter.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Jurisdiction::Act => "ACT",
            Jurisdiction::Nsw => "NSW",
            Jurisdiction::Qld => "QLD",
            Jurisdiction::Vic => "VIC",
            Jurisdiction::Wa => "WA",
            Jurisdiction::Nt => "NT",
            Jurisdiction::Sa => "SA",
            Jurisdiction::Tas => "TAS",
        }
    }

    /// Lower-case code as used in the API host name.
    #[must_use]
    pub fn host_code(self) -> String {
        self.code().to_ascii_lowercase()
    }

    /// The jurisdiction whose endpoint actually serves this one.
    ///
    /// Served jurisdictions map to themselves, so this is idempotent:
    /// `j.canonical().canonical() == j.canonical()`.
    #[must_use]
    pub fn canonical(self) -> Jurisdiction {
        match self {
            Jurisdiction::Wa => Jurisdiction::Nsw,
            Jurisdiction::Nt | Jurisdiction::Sa | Jurisdiction::Tas => Jurisdiction::Act,
            served => served,
        }
    }

    /// Whether upstream serves this jurisdiction under its own code.
    #[must_use]
    pub fn is_served(self) -> bool {
        self.canonical() == self
    }

    fn redirect_diagnostic(self) -> Option<String> {
        match self {
            Jurisdiction::Wa => Some(format!(
                "Keno is not available in WA; requests are redirected to {}",
                self.canonical()
            )),
            Jurisdiction::Nt | Jurisdiction::Sa | Jurisdiction::Tas => Some(format!(
                "Keno is not served separately in {self}; this state uses {}",
                self.canonical()
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = ConfigError;

    /// Parses a jurisdiction code, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Jurisdiction::ALL
            .into_iter()
            .find(|j| j.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownJurisdiction(s.to_owned()))
    }
}

/// Result of [`canonicalize`]: the code the caller asked for, the code that
/// will actually be queried, and any redirect diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub requested: Jurisdiction,
    pub resolved: Jurisdiction,
    pub diagnostics: Vec<String>,
}

/// Validates a jurisdiction code and resolves it to the served jurisdiction.
///
/// Pure: the caller decides how to surface `diagnostics` (the client logs
/// them once at construction).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownJurisdiction`] if `input` is not one of the
/// eight known codes.
pub fn canonicalize(input: &str) -> Result<Canonical, ConfigError> {
    let requested: Jurisdiction = input.parse()?;
    let diagnostics = requested.redirect_diagnostic().into_iter().collect();
    Ok(Canonical {
        requested,
        resolved: requested.canonical(),
        diagnostics,
    })
}
