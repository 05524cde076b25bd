//! Reference data provider for the country / TSO / balance-group hierarchy.
//!
//! Consumers depend on [`ReferenceDataProvider`] only, so the fixed demo
//! hierarchy can be swapped for a real directory service without touching
//! the views.

use crate::models::{BalanceGroup, Country, Tso};

/// Source of the reference hierarchy.
pub trait ReferenceDataProvider: Send + Sync {
    /// The full hierarchy, in display order.
    fn hierarchy(&self) -> Vec<Country>;
}

/// Fixed hierarchy of German, Austrian and Swiss TSOs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticReferenceData;

impl ReferenceDataProvider for StaticReferenceData {
    fn hierarchy(&self) -> Vec<Country> {
        vec![
            country(
                "germany",
                "Deutschland",
                "DE",
                "🇩🇪",
                vec![
                    tso(
                        "amprion",
                        "Amprion",
                        "10X1001A1001A83F",
                        "germany",
                        &[
                            ("amprion-bg1", "Stadtwerke Düsseldorf", "10X1001A1001A01N", "Stadtwerke Düsseldorf AG"),
                            ("amprion-bg2", "RWE Power", "10X1001A1001A02M", "RWE Power AG"),
                            ("amprion-bg3", "STEAG Energy Services", "10X1001A1001A03L", "STEAG Energy Services GmbH"),
                        ],
                    ),
                    tso(
                        "tennet",
                        "TenneT",
                        "10X1001A1001A82H",
                        "germany",
                        &[
                            ("tennet-bg1", "E.ON Energy Trading", "10X1001A1001A04K", "E.ON Energy Trading SE"),
                            ("tennet-bg2", "Vattenfall Europe", "10X1001A1001A05J", "Vattenfall Europe Generation AG"),
                            ("tennet-bg3", "LEAG", "10X1001A1001A06I", "LEAG Lausitz Energie AG"),
                        ],
                    ),
                    tso(
                        "50hertz",
                        "50Hertz",
                        "10X1001A1001A74G",
                        "germany",
                        &[
                            ("50hertz-bg1", "GASAG", "10X1001A1001A07H", "GASAG AG"),
                            ("50hertz-bg2", "Berliner Stadtwerke", "10X1001A1001A08G", "Berliner Stadtwerke GmbH"),
                            ("50hertz-bg3", "ENGIE Deutschland", "10X1001A1001A09F", "ENGIE Deutschland AG"),
                        ],
                    ),
                    tso(
                        "transnetbw",
                        "TransnetBW",
                        "10X1001A1001A63L",
                        "germany",
                        &[
                            ("transnetbw-bg1", "EnBW Trading", "10X1001A1001A10A", "EnBW Trading GmbH"),
                            ("transnetbw-bg2", "MVV Energie", "10X1001A1001A11Z", "MVV Energie AG"),
                            ("transnetbw-bg3", "Stadtwerke Stuttgart", "10X1001A1001A12Y", "Stadtwerke Stuttgart GmbH"),
                        ],
                    ),
                ],
            ),
            country(
                "austria",
                "Österreich",
                "AT",
                "🇦🇹",
                vec![tso(
                    "apg",
                    "Austrian Power Grid",
                    "10X1001A1001A59C",
                    "austria",
                    &[
                        ("apg-bg1", "Verbund Trading", "10X1001A1001A13X", "Verbund Trading AG"),
                        ("apg-bg2", "Wien Energie", "10X1001A1001A14W", "Wien Energie GmbH"),
                        ("apg-bg3", "Hydro Balance", "10X1001A1001A15V", "Austrian Hydro Power AG"),
                    ],
                )],
            ),
            country(
                "switzerland",
                "Schweiz",
                "CH",
                "🇨🇭",
                vec![tso(
                    "swissgrid",
                    "Swissgrid",
                    "10X1001A1001A39I",
                    "switzerland",
                    &[
                        ("swissgrid-bg1", "Axpo Trading", "10X1001A1001A16U", "Axpo Trading AG"),
                        ("swissgrid-bg2", "BKW Energie", "10X1001A1001A17T", "BKW Energie AG"),
                        ("swissgrid-bg3", "Alpine Balance", "10X1001A1001A18S", "Swiss Alpine Power AG"),
                    ],
                )],
            ),
        ]
    }
}

fn country(id: &str, name: &str, code: &str, flag: &str, tsos: Vec<Tso>) -> Country {
    Country {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        flag: flag.to_string(),
        tsos,
    }
}

// (id, name, eic, responsible party)
fn tso(
    id: &str,
    name: &str,
    eic_code: &str,
    country_id: &str,
    groups: &[(&str, &str, &str, &str)],
) -> Tso {
    Tso {
        id: id.to_string(),
        name: name.to_string(),
        eic_code: eic_code.to_string(),
        country_id: country_id.to_string(),
        balance_groups: groups
            .iter()
            .map(|(bg_id, bg_name, eic, party)| BalanceGroup {
                id: bg_id.to_string(),
                name: bg_name.to_string(),
                eic_code: eic.to_string(),
                responsible_party: party.to_string(),
                tso_id: id.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::find_balance_group;
    use std::collections::HashSet;

    #[test]
    fn test_hierarchy_shape() {
        let hierarchy = StaticReferenceData.hierarchy();
        let codes: Vec<&str> = hierarchy.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["DE", "AT", "CH"]);
        assert_eq!(hierarchy[0].tsos.len(), 4);
        assert!(hierarchy
            .iter()
            .flat_map(|c| &c.tsos)
            .all(|t| t.balance_groups.len() == 3));
    }

    #[test]
    fn test_ids_are_unique() {
        let hierarchy = StaticReferenceData.hierarchy();
        let mut seen = HashSet::new();
        for country in &hierarchy {
            assert!(seen.insert(country.id.clone()));
            for tso in &country.tsos {
                assert!(seen.insert(tso.id.clone()));
                for bg in &tso.balance_groups {
                    assert!(seen.insert(bg.id.clone()));
                }
            }
        }
    }

    #[test]
    fn test_parent_links() {
        let hierarchy = StaticReferenceData.hierarchy();
        let (country, tso, bg) = find_balance_group(&hierarchy, "swissgrid-bg3").unwrap();
        assert_eq!(country.id, "switzerland");
        assert_eq!(tso.country_id, country.id);
        assert_eq!(bg.tso_id, tso.id);
        assert_eq!(bg.responsible_party, "Swiss Alpine Power AG");
    }
}
