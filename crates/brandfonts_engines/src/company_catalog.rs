#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use brandfonts_kernel_contracts::company::{CompanyFontStats, CompanyProfile, CompanySchemaName};
use brandfonts_kernel_contracts::{ContractViolation, Validate};

/// Company profiles available to the valuation wiring, in stable listing order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyCatalog {
    companies: Vec<CompanyProfile>,
}

impl CompanyCatalog {
    pub fn from_profiles(companies: Vec<CompanyProfile>) -> Result<Self, ContractViolation> {
        let mut names: BTreeSet<&CompanySchemaName> = BTreeSet::new();
        for company in &companies {
            company.validate()?;
            if !names.insert(&company.schema_name) {
                return Err(ContractViolation::InvalidValue {
                    field: "company_catalog.schema_name",
                    reason: "schema_name entries must be unique",
                });
            }
        }
        Ok(Self { companies })
    }

    /// Fixture set used by demos and tests while live tenant data is unavailable.
    pub fn fixtures_v1() -> Result<Self, ContractViolation> {
        let rows: [(&str, &str, &str, &str, [u32; 4], u8); 6] = [
            (
                "hormel",
                "Hormel Foods",
                "Hormel Foods Corporation",
                "Food & Beverage",
                [263, 135, 89, 45],
                63,
            ),
            (
                "polaris",
                "Polaris",
                "Polaris Inc.",
                "Recreational Vehicles",
                [2134, 239, 567, 234],
                83,
            ),
            (
                "rpm_international",
                "RPM International",
                "RPM International Inc.",
                "Specialty Chemicals",
                [588, 188, 234, 123],
                74,
            ),
            (
                "genuine_parts",
                "Genuine Parts Company",
                "Genuine Parts Company",
                "Automotive Parts",
                [948, 278, 345, 234],
                46,
            ),
            (
                "greenshield",
                "GreenShield Canada",
                "GreenShield Canada",
                "Healthcare",
                [630, 111, 234, 156],
                17,
            ),
            (
                "oreilly",
                "O'Reilly Auto Parts",
                "O'Reilly Automotive Inc.",
                "Automotive Retail",
                [56, 29, 23, 12],
                36,
            ),
        ];

        let companies = rows
            .into_iter()
            .map(|(schema_name, display, parent, industry, counts, enrichment)| {
                let [total, unique, web, mobile] = counts;
                CompanyProfile::v1(
                    CompanySchemaName::new(schema_name)?,
                    display.to_string(),
                    Some(parent.to_string()),
                    industry.to_string(),
                    CompanyFontStats::v1(total, unique, web, mobile, enrichment)?,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_profiles(companies)
    }

    pub fn get(&self, schema_name: &str) -> Option<&CompanyProfile> {
        self.companies
            .iter()
            .find(|c| c.schema_name.as_str() == schema_name)
    }

    pub fn list(&self) -> &[CompanyProfile] {
        &self.companies
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_catalog_01_fixtures_are_schema_valid_and_ordered() {
        let catalog = CompanyCatalog::fixtures_v1().unwrap();
        assert_eq!(catalog.len(), 6);
        let names: Vec<&str> = catalog.list().iter().map(|c| c.schema_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "hormel",
                "polaris",
                "rpm_international",
                "genuine_parts",
                "greenshield",
                "oreilly"
            ]
        );
    }

    #[test]
    fn at_catalog_02_lookup_by_schema_name() {
        let catalog = CompanyCatalog::fixtures_v1().unwrap();
        let polaris = catalog.get("polaris").unwrap();
        assert_eq!(polaris.display_name, "Polaris");
        assert_eq!(polaris.industry, "Recreational Vehicles");
        assert_eq!(polaris.stats.unique_fonts, 239);
        assert_eq!(polaris.stats.enrichment_percentage, 83);
        assert!(catalog.get("acme").is_none());
    }

    #[test]
    fn at_catalog_03_duplicate_schema_names_are_rejected() {
        let catalog = CompanyCatalog::fixtures_v1().unwrap();
        let mut profiles = catalog.list().to_vec();
        profiles.push(profiles[0].clone());
        assert!(CompanyCatalog::from_profiles(profiles).is_err());
    }
}
