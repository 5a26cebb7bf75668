//! Feature gates.
//!
//! Gates are parsed once from configuration and passed to the admission
//! entry points, so tests can flip them without touching process state.
//! The syntax matches Kubernetes components: `MachinePool=true,Other=false`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Known feature gates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Feature {
    /// Cluster API MachinePools. AzureMachinePools cannot be created without it.
    MachinePool,
}

impl Feature {
    /// All known gates with their default state.
    pub const ALL: [(Feature, bool); 1] = [(Feature::MachinePool, false)];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::MachinePool => "MachinePool",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .map(|(feature, _)| *feature)
            .find(|feature| feature.name() == s)
            .ok_or_else(|| Error::Config(format!("unknown feature gate '{}'", s)))
    }
}

/// Enabled/disabled state of every known feature gate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureGates {
    gates: BTreeMap<Feature, bool>,
}

impl Default for FeatureGates {
    fn default() -> Self {
        Self {
            gates: Feature::ALL.into_iter().collect(),
        }
    }
}

impl FeatureGates {
    /// Parse a `Name=bool,Name=bool` list on top of the defaults.
    pub fn parse(spec: &str) -> Result<Self, Error> {
        let mut gates = Self::default();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                Error::Config(format!(
                    "feature gate '{}' must be in the form Name=true|false",
                    entry
                ))
            })?;
            let feature: Feature = name.trim().parse()?;
            let enabled: bool = value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "invalid value '{}' for feature gate '{}'",
                    value.trim(),
                    feature
                ))
            })?;
            gates.set(feature, enabled);
        }
        Ok(gates)
    }

    /// Gates with every feature enabled.
    pub fn all_enabled() -> Self {
        Self {
            gates: Feature::ALL.iter().map(|(f, _)| (*f, true)).collect(),
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        self.gates.insert(feature, enabled);
    }

    pub fn enabled(&self, feature: Feature) -> bool {
        self.gates.get(&feature).copied().unwrap_or(false)
    }
}

impl fmt::Display for FeatureGates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .gates
            .iter()
            .map(|(feature, enabled)| format!("{}={}", feature, enabled))
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&rendered)
    }
}
