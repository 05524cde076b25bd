//! Reference hierarchy of countries, TSOs and balance groups.
//!
//! The hierarchy is immutable for the lifetime of the process. Consumers get
//! it from a [`ReferenceDataProvider`](crate::services::reference_data::ReferenceDataProvider).

use serde::{Deserialize, Serialize};

/// A country owning an ordered list of TSOs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    /// ISO country code, used as the bidding-area code of new schedules.
    pub code: String,
    pub flag: String,
    pub tsos: Vec<Tso>,
}

/// A transmission system operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tso {
    pub id: String,
    pub name: String,
    pub eic_code: String,
    pub country_id: String,
    pub balance_groups: Vec<BalanceGroup>,
}

/// A balance group registered with a TSO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceGroup {
    pub id: String,
    pub name: String,
    pub eic_code: String,
    pub responsible_party: String,
    pub tso_id: String,
}

/// Codes of the currently selected navigation path.
///
/// New schedules and positions copy their party and area fields from here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionContext {
    pub country_code: String,
    pub tso_eic: String,
    pub balance_group_eic: String,
}

impl SelectionContext {
    pub fn from_nodes(country: &Country, tso: &Tso, balance_group: &BalanceGroup) -> Self {
        Self {
            country_code: country.code.clone(),
            tso_eic: tso.eic_code.clone(),
            balance_group_eic: balance_group.eic_code.clone(),
        }
    }

    /// Resolve the path to `balance_group_id` in `hierarchy`.
    pub fn resolve(hierarchy: &[Country], balance_group_id: &str) -> Option<Self> {
        find_balance_group(hierarchy, balance_group_id)
            .map(|(country, tso, bg)| Self::from_nodes(country, tso, bg))
    }
}

/// Locate a balance group together with its owning TSO and country.
pub fn find_balance_group<'a>(
    hierarchy: &'a [Country],
    balance_group_id: &str,
) -> Option<(&'a Country, &'a Tso, &'a BalanceGroup)> {
    hierarchy.iter().find_map(|country| {
        country.tsos.iter().find_map(|tso| {
            tso.balance_groups
                .iter()
                .find(|bg| bg.id == balance_group_id)
                .map(|bg| (country, tso, bg))
        })
    })
}
