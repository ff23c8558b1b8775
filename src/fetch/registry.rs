//! Dictionary name → raw artifact registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DxError, Result};

/// Maps short dictionary names to the file names of their raw artifacts in
/// the remote store. Built once and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<String, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// The dictionaries known out of the box.
    pub fn builtin() -> Self {
        Self::from_entries([
            ("honor", "Honor-Dictionary-English_2017.dic"), // Gelfand 2015
            ("threat", "threat.txt"),                       // Gelfand 2022
            ("sleep", "ladis2023-table1.tsv"),              // Ladis 2023
            ("bigtwo_a", "a_AgencyCommunion.dic"),          // Pietraszkiewicz 2018
            ("bigtwo_b", "b_AgencyCommunion.dic"),          // Pietraszkiewicz 2018
        ])
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Raw artifact file name registered for `name`.
    pub fn artifact_for(&self, name: &str) -> Result<&str> {
        self.entries
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| DxError::unknown_dictionary(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
