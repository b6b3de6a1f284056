#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_non_negative_finite;
use crate::{validate_text, ContractViolation, SchemaVersion, Validate};

pub const COMPANY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const MAX_SCHEMA_NAME_LEN: usize = 64;
pub const MAX_DISPLAY_NAME_LEN: usize = 128;
pub const MAX_FONT_NAME_LEN: usize = 256;
pub const MAX_TAG_LEN: usize = 64;

pub const USE_CASE_WEB_FONT: &str = "Web Font";
pub const USE_CASE_MOBILE_APP_FONT: &str = "Mobile App Font";
pub const ENVIRONMENT_MOBILE: &str = "Mobile";

/// Tenant key of a company, e.g. `rpm_international`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanySchemaName(String);

impl CompanySchemaName {
    pub fn new(value: impl Into<String>) -> Result<Self, ContractViolation> {
        let n = Self(value.into());
        n.validate()?;
        Ok(n)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for CompanySchemaName {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("company_schema_name", &self.0, MAX_SCHEMA_NAME_LEN)?;
        if !self
            .0
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ContractViolation::InvalidValue {
                field: "company_schema_name",
                reason: "must be lowercase ascii, digits or underscore",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFontStats {
    pub total_instances: u32,
    pub unique_fonts: u32,
    pub web_fonts: u32,
    pub mobile_fonts: u32,
    pub enrichment_percentage: u8,
}

impl CompanyFontStats {
    pub fn v1(
        total_instances: u32,
        unique_fonts: u32,
        web_fonts: u32,
        mobile_fonts: u32,
        enrichment_percentage: u8,
    ) -> Result<Self, ContractViolation> {
        let s = Self {
            total_instances,
            unique_fonts,
            web_fonts,
            mobile_fonts,
            enrichment_percentage,
        };
        s.validate()?;
        Ok(s)
    }

    pub fn empty() -> Self {
        Self {
            total_instances: 0,
            unique_fonts: 0,
            web_fonts: 0,
            mobile_fonts: 0,
            enrichment_percentage: 0,
        }
    }
}

impl Validate for CompanyFontStats {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.unique_fonts > self.total_instances {
            return Err(ContractViolation::InvalidValue {
                field: "company_font_stats.unique_fonts",
                reason: "must be <= total_instances",
            });
        }
        if self.web_fonts > self.total_instances {
            return Err(ContractViolation::InvalidValue {
                field: "company_font_stats.web_fonts",
                reason: "must be <= total_instances",
            });
        }
        if self.mobile_fonts > self.total_instances {
            return Err(ContractViolation::InvalidValue {
                field: "company_font_stats.mobile_fonts",
                reason: "must be <= total_instances",
            });
        }
        if self.enrichment_percentage > 100 {
            return Err(ContractViolation::InvalidValue {
                field: "company_font_stats.enrichment_percentage",
                reason: "must be <= 100",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub schema_version: SchemaVersion,
    pub schema_name: CompanySchemaName,
    pub display_name: String,
    pub parent_company: Option<String>,
    pub industry: String,
    pub stats: CompanyFontStats,
}

impl CompanyProfile {
    pub fn v1(
        schema_name: CompanySchemaName,
        display_name: String,
        parent_company: Option<String>,
        industry: String,
        stats: CompanyFontStats,
    ) -> Result<Self, ContractViolation> {
        let p = Self {
            schema_version: COMPANY_CONTRACT_VERSION,
            schema_name,
            display_name,
            parent_company,
            industry,
            stats,
        };
        p.validate()?;
        Ok(p)
    }
}

impl Validate for CompanyProfile {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != COMPANY_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "company_profile.schema_version",
                reason: "must match COMPANY_CONTRACT_VERSION",
            });
        }
        self.schema_name.validate()?;
        validate_text(
            "company_profile.display_name",
            &self.display_name,
            MAX_DISPLAY_NAME_LEN,
        )?;
        if let Some(parent) = &self.parent_company {
            validate_text(
                "company_profile.parent_company",
                parent,
                MAX_DISPLAY_NAME_LEN,
            )?;
        }
        validate_text("company_profile.industry", &self.industry, MAX_TAG_LEN)?;
        self.stats.validate()?;
        Ok(())
    }
}

/// One detected font usage inside a company's digital estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInstance {
    pub original_font_name: String,
    pub standardized_font_name: String,
    pub use_case: String,
    pub environment: String,
    pub confidence_score: Option<f64>,
}

impl FontInstance {
    pub fn v1(
        original_font_name: String,
        standardized_font_name: String,
        use_case: String,
        environment: String,
        confidence_score: Option<f64>,
    ) -> Result<Self, ContractViolation> {
        let f = Self {
            original_font_name,
            standardized_font_name,
            use_case,
            environment,
            confidence_score,
        };
        f.validate()?;
        Ok(f)
    }

    pub fn is_web_font(&self) -> bool {
        self.use_case == USE_CASE_WEB_FONT
    }

    pub fn is_mobile_font(&self) -> bool {
        self.environment == ENVIRONMENT_MOBILE || self.use_case == USE_CASE_MOBILE_APP_FONT
    }

    pub fn is_enriched(&self) -> bool {
        self.confidence_score.is_some_and(|c| c > 0.0)
    }
}

impl Validate for FontInstance {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text(
            "font_instance.original_font_name",
            &self.original_font_name,
            MAX_FONT_NAME_LEN,
        )?;
        validate_text(
            "font_instance.standardized_font_name",
            &self.standardized_font_name,
            MAX_FONT_NAME_LEN,
        )?;
        // Unclassified instances arrive with empty tags.
        if !self.use_case.is_empty() {
            validate_text("font_instance.use_case", &self.use_case, MAX_TAG_LEN)?;
        }
        if !self.environment.is_empty() {
            validate_text("font_instance.environment", &self.environment, MAX_TAG_LEN)?;
        }
        if let Some(score) = self.confidence_score {
            // Sources report either a 0..1 ratio or a percentage.
            validate_non_negative_finite("font_instance.confidence_score", score, f64::MAX)?;
        }
        Ok(())
    }
}
