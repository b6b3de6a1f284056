#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use brandfonts_kernel_contracts::company::{CompanyFontStats, FontInstance};
use brandfonts_kernel_contracts::{ContractViolation, Validate};

/// Rolls a company's detected font instances up into dashboard statistics.
///
/// `enrichment_percentage` is the share of instances with a positive confidence
/// score, rounded half up to a whole percent. An empty inventory yields all zeros.
pub fn aggregate_font_stats(
    instances: &[FontInstance],
) -> Result<CompanyFontStats, ContractViolation> {
    if instances.is_empty() {
        return Ok(CompanyFontStats::empty());
    }
    let total = u32::try_from(instances.len()).map_err(|_| ContractViolation::InvalidValue {
        field: "font_instances",
        reason: "must be <= u32::MAX entries",
    })?;

    let mut unique: BTreeSet<&str> = BTreeSet::new();
    let mut web_fonts = 0u32;
    let mut mobile_fonts = 0u32;
    let mut enriched = 0u32;
    for instance in instances {
        instance.validate()?;
        unique.insert(instance.standardized_font_name.as_str());
        if instance.is_web_font() {
            web_fonts += 1;
        }
        if instance.is_mobile_font() {
            mobile_fonts += 1;
        }
        if instance.is_enriched() {
            enriched += 1;
        }
    }

    CompanyFontStats::v1(
        total,
        unique.len() as u32,
        web_fonts,
        mobile_fonts,
        round_half_up_percent(enriched, total),
    )
}

fn round_half_up_percent(part: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part as u64 * 200 + total as u64) / (total as u64 * 2);
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandfonts_kernel_contracts::company::{
        ENVIRONMENT_MOBILE, USE_CASE_MOBILE_APP_FONT, USE_CASE_WEB_FONT,
    };

    fn font(name: &str, use_case: &str, environment: &str, confidence: Option<f64>) -> FontInstance {
        FontInstance::v1(
            format!("{name} Regular"),
            name.to_string(),
            use_case.to_string(),
            environment.to_string(),
            confidence,
        )
        .unwrap()
    }

    #[test]
    fn at_font_stats_01_empty_inventory_is_all_zero() {
        assert_eq!(aggregate_font_stats(&[]).unwrap(), CompanyFontStats::empty());
    }

    #[test]
    fn at_font_stats_02_counts_unique_web_and_mobile() {
        let instances = vec![
            font("Helvetica", USE_CASE_WEB_FONT, "Desktop", Some(0.9)),
            font("Helvetica", USE_CASE_WEB_FONT, ENVIRONMENT_MOBILE, Some(0.8)),
            font("Gotham", USE_CASE_MOBILE_APP_FONT, "", None),
            font("Gotham", "Print", "Desktop", Some(0.0)),
            font("Futura", "", "", None),
        ];
        let stats = aggregate_font_stats(&instances).unwrap();
        assert_eq!(stats.total_instances, 5);
        assert_eq!(stats.unique_fonts, 3);
        assert_eq!(stats.web_fonts, 2);
        assert_eq!(stats.mobile_fonts, 2);
        assert_eq!(stats.enrichment_percentage, 40);
    }

    #[test]
    fn at_font_stats_03_enrichment_rounds_half_up() {
        assert_eq!(round_half_up_percent(1, 8), 13);
        assert_eq!(round_half_up_percent(1, 3), 33);
        assert_eq!(round_half_up_percent(2, 3), 67);
        assert_eq!(round_half_up_percent(3, 3), 100);
        assert_eq!(round_half_up_percent(0, 0), 0);
    }

    #[test]
    fn at_font_stats_04_invalid_instance_is_rejected() {
        let mut bad = font("Arial", "", "", None);
        bad.standardized_font_name = "   ".to_string();
        assert!(aggregate_font_stats(&[bad]).is_err());
    }

    #[test]
    fn at_font_stats_05_percentage_confidence_counts_as_enriched() {
        let instances = vec![
            font("Helvetica", USE_CASE_WEB_FONT, "Desktop", Some(85.0)),
            font("Gotham", "Print", "Desktop", Some(0.0)),
        ];
        let stats = aggregate_font_stats(&instances).unwrap();
        assert_eq!(stats.total_instances, 2);
        assert_eq!(stats.enrichment_percentage, 50);
    }
}
