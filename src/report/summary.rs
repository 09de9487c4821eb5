//! Summary table slots and binding rules.
//!
//! The table has a fixed set of declared slots keyed by stable keys; the
//! payload decides which of them to overwrite. Partial payloads are additive:
//! keys missing from the payload leave their slot untouched. Only a wholly
//! absent payload wipes every slot back to the placeholder.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Placeholder shown for null, absent, or cleared values.
pub const NOT_AVAILABLE: &str = "N/A";

/// One scalar payload value; the endpoint emits strings or numbers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Text(String),
    Number(f64),
}

impl SummaryValue {
    /// Render the value for display in a table cell.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Key-value payload shape for the summary table; `None` entries are JSON
/// nulls and render as the placeholder.
pub type SummaryPayload = BTreeMap<String, Option<SummaryValue>>;

/// A declared, key-addressed display cell for one scalar metric.
#[derive(Clone, Debug)]
pub struct SummarySlot {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// The fixed table of declared slots.
#[derive(Clone, Debug)]
pub struct SummaryTable {
    slots: Vec<SummarySlot>,
}

/// Declared slot keys and row labels, mirroring the dashboard template.
const DECLARED_SLOTS: &[(&str, &str)] = &[
    ("time_RI_estable_menor_5pct", "First time RI stays below 5%"),
    ("time_RI_estable_menor_1pct", "First time RI stays below 1%"),
    ("time_RET_mayor_igual_1pct", "First time RET reaches 1%"),
    ("time_RET_mayor_igual_5pct", "First time RET reaches 5%"),
    (
        "porcentaje_tiempo_estable_RI_5pct",
        "Share of time with RI stable below 5%",
    ),
];

impl Default for SummaryTable {
    fn default() -> Self {
        Self {
            slots: DECLARED_SLOTS
                .iter()
                .map(|(key, label)| SummarySlot {
                    key,
                    label,
                    value: NOT_AVAILABLE.to_string(),
                })
                .collect(),
        }
    }
}

impl SummaryTable {
    /// Apply a payload to the declared slots.
    ///
    /// `Some(payload)` overwrites matching slots only; unknown payload keys
    /// are ignored and slots without a payload entry keep their prior value.
    /// `None` resets every slot to the placeholder.
    pub fn bind(&mut self, summary: Option<&SummaryPayload>) {
        let Some(summary) = summary else {
            self.clear();
            return;
        };
        for (key, value) in summary {
            let Some(slot) = self.slots.iter_mut().find(|slot| slot.key == key) else {
                continue;
            };
            slot.value = match value {
                Some(value) => value.display(),
                None => NOT_AVAILABLE.to_string(),
            };
        }
    }

    /// Reset every declared slot to the placeholder.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.value = NOT_AVAILABLE.to_string();
        }
    }

    /// Declared slots in display order.
    pub fn slots(&self) -> &[SummarySlot] {
        &self.slots
    }

    /// True when every declared slot shows the placeholder.
    pub fn is_cleared(&self) -> bool {
        self.slots.iter().all(|slot| slot.value == NOT_AVAILABLE)
    }

    #[cfg(test)]
    fn value_of(&self, key: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| slot.value.as_str())
    }
}
