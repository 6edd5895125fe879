//! Field extraction for the county septic permit form.
//!
//! The permit PDF has no structure beyond its text layout, so every field is
//! located with an ordered list of patterns: the first capture wins. When a
//! label sits alone on its line the next non-empty line is taken as the value.
//! Anything not found is left as `None`.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fields recovered from permit text. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPermitFields {
    pub permit_number: Option<String>,
    pub property_address: Option<String>,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub system_type: Option<String>,
    pub lot: Option<String>,
    pub block: Option<String>,
    pub construction_permit_for: Option<String>,
    pub excavation_required: Option<bool>,
    pub drainfield_depth: Option<String>,
    pub gpd_capacity: Option<String>,
    pub pump: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub is_pbts: Option<bool>,
}

/// Patterns for one field plus the label used for the next-line fallback.
struct FieldRule {
    patterns: Vec<Regex>,
    label: Option<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex pattern"))
        .collect()
}

fn rule(patterns: &[&str], label: Option<&str>) -> FieldRule {
    FieldRule {
        patterns: compile(patterns),
        label: label.map(|l| Regex::new(l).expect("Invalid regex pattern")),
    }
}

lazy_static! {
    static ref PERMIT_NUMBER: FieldRule = rule(
        &[
            r"(?im)permit[ \t]*(?:number|no\.?|#)[ \t]*[:#]?[ \t]*([A-Z0-9][A-Z0-9-]{3,})",
            r"(?im)application[ \t]*(?:number|no\.?|#)[ \t]*[:#]?[ \t]*([A-Z0-9][A-Z0-9-]{3,})",
            r"(?m)\b(\d{2}-[A-Z]{2}-\d{5,})\b",
        ],
        Some(r"(?i)^permit[ \t]*(?:number|no\.?|#)[ \t]*:?$"),
    );
    static ref PROPERTY_ADDRESS: FieldRule = rule(
        &[
            r"(?im)(?:property|site|installation)[ \t]+address[ \t]*:[ \t]*(.+)$",
            r"(?im)^[ \t]*address[ \t]*:[ \t]*(.+)$",
        ],
        Some(r"(?i)^(?:property|site|installation)?[ \t]*address[ \t]*:?$"),
    );
    static ref APPLICANT_NAME: FieldRule = rule(
        &[
            r"(?im)applicant(?:'s)?(?:[ \t]+name)?[ \t]*:[ \t]*(.+)$",
            r"(?im)(?:property[ \t]+)?owner(?:'s)?(?:[ \t]+name)?[ \t]*:[ \t]*(.+)$",
        ],
        Some(r"(?i)^applicant(?:'s)?(?:[ \t]+name)?[ \t]*:?$"),
    );
    static ref APPLICANT_EMAIL: FieldRule = rule(
        &[
            r"(?im)e-?mail[ \t]*:[ \t]*([A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,})",
            r"(?i)\b([A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,})\b",
        ],
        None,
    );
    static ref APPLICANT_PHONE: FieldRule = rule(
        &[
            r"(?im)(?:phone|tel(?:ephone)?)[ \t]*[:#]?[ \t]*(\(?\d{3}\)?[ .-]?\d{3}[ .-]?\d{4})",
            r"(\(\d{3}\)[ ]?\d{3}-\d{4})",
        ],
        None,
    );
    static ref SYSTEM_TYPE: FieldRule = rule(
        &[
            r"(?im)system[ \t]+type[ \t]*:[ \t]*(.+)$",
            r"(?im)type[ \t]+of[ \t]+system[ \t]*:[ \t]*(.+)$",
        ],
        Some(r"(?i)^(?:system[ \t]+type|type[ \t]+of[ \t]+system)[ \t]*:?$"),
    );
    static ref LOT: FieldRule = rule(
        &[
            r"(?im)\blot[ \t]*(?:no\.?|#)?[ \t]*:[ \t]*([A-Z0-9-]+)",
            r"(?im)\blot[ \t]+(\d+[A-Z]?)\b",
        ],
        None,
    );
    static ref BLOCK: FieldRule = rule(
        &[
            r"(?im)\bblock[ \t]*(?:no\.?|#)?[ \t]*:[ \t]*([A-Z0-9-]+)",
            r"(?im)\bblock[ \t]+(\d+[A-Z]?)\b",
        ],
        None,
    );
    static ref CONSTRUCTION_PERMIT_FOR: FieldRule = rule(
        &[r"(?im)construction[ \t]+permit[ \t]+for[ \t]*:[ \t]*(.+)$"],
        Some(r"(?i)^construction[ \t]+permit[ \t]+for[ \t]*:?$"),
    );
    static ref EXCAVATION_REQUIRED: FieldRule = rule(
        &[
            r"(?im)excavation[ \t]+required[ \t]*[:?]?[ \t]*(yes|no|true|false|x|y|n)\b",
            r"(?im)\[[ \t]*(x)[ \t]*\][ \t]*excavation[ \t]+required",
        ],
        None,
    );
    static ref DRAINFIELD_DEPTH: FieldRule = rule(
        &[
            r#"(?im)drain[ \t]*field[ \t]+depth[ \t]*:?[ \t]*(\d+(?:\.\d+)?[ \t]*(?:inches|inch|in\.?|feet|ft\.?|"|')?)"#,
            r"(?im)depth[ \t]+of[ \t]+drain[ \t]*field[ \t]*:?[ \t]*(.+)$",
        ],
        None,
    );
    static ref GPD_CAPACITY: FieldRule = rule(
        &[
            r"(?im)(?:capacity|design[ \t]+flow)[ \t]*:?[ \t]*(\d[\d,]*)[ \t]*(?:gpd|gallons)",
            r"(?i)(\d[\d,]*)[ \t]*gpd\b",
        ],
        None,
    );
    static ref PUMP: FieldRule = rule(
        &[r"(?im)pump(?:[ \t]+required)?[ \t]*:[ \t]*(.+)$"],
        Some(r"(?i)^pump(?:[ \t]+required)?[ \t]*:?$"),
    );
    static ref EXPIRATION_DATE: FieldRule = rule(
        &[
            r"(?im)expir(?:ation|es|y)(?:[ \t]+date)?[ \t]*:?[ \t]*(\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2})",
            r"(?im)valid[ \t]+(?:until|through)[ \t]*:?[ \t]*(\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2})",
        ],
        Some(r"(?i)^expiration(?:[ \t]+date)?[ \t]*:?$"),
    );
    static ref IS_PBTS: FieldRule = rule(
        &[r"(?im)\bPBTS\b[ \t]*[:?]?[ \t]*(yes|no|true|false|x|y|n)\b"],
        None,
    );
    static ref PBTS_MENTION: Regex =
        Regex::new(r"(?i)performance[ \t-]+based[ \t]+treatment[ \t]+system")
            .expect("Invalid regex pattern");
}

fn clean(value: &str) -> Option<String> {
    let value = value
        .trim()
        .trim_end_matches(|c: char| c == ',' || c == ';')
        .trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Value on the first non-empty line after a line holding only `label`.
fn next_line_after_label(label: &Regex, lines: &[&str]) -> Option<String> {
    let position = lines.iter().position(|line| label.is_match(line.trim()))?;
    lines[position + 1..]
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .and_then(clean)
}

fn find_field(rule: &FieldRule, text: &str, lines: &[&str]) -> Option<String> {
    rule.patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)).and_then(|m| clean(m.as_str())))
        .or_else(|| {
            rule.label
                .as_ref()
                .and_then(|label| next_line_after_label(label, lines))
        })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "x" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

/// Parses the date formats seen on permits: `MM/DD/YYYY`, `M/D/YY` and
/// `YYYY-MM-DD`.
pub fn parse_permit_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let parsed = if value.contains('-') {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        let year_len = value.rsplit('/').next().map(str::len).unwrap_or(0);
        match year_len {
            4 => NaiveDate::parse_from_str(value, "%m/%d/%Y").ok(),
            2 => NaiveDate::parse_from_str(value, "%m/%d/%y").ok(),
            _ => None,
        }
    };
    if parsed.is_none() {
        warn!("Ignoring unparseable permit date '{}'", value);
    }
    parsed
}

/// Pulls permit fields out of the text of a permit document.
pub fn extract_permit_fields(text: &str) -> ExtractedPermitFields {
    let lines: Vec<&str> = text.lines().collect();
    let field = |rule: &FieldRule| find_field(rule, text, &lines);

    let is_pbts = field(&IS_PBTS)
        .and_then(|v| parse_flag(&v))
        .or_else(|| PBTS_MENTION.is_match(text).then_some(true));

    ExtractedPermitFields {
        permit_number: field(&PERMIT_NUMBER).map(|v| v.to_uppercase()),
        property_address: field(&PROPERTY_ADDRESS),
        applicant_name: field(&APPLICANT_NAME),
        applicant_email: field(&APPLICANT_EMAIL).map(|v| v.to_lowercase()),
        applicant_phone: field(&APPLICANT_PHONE),
        system_type: field(&SYSTEM_TYPE),
        lot: field(&LOT),
        block: field(&BLOCK),
        construction_permit_for: field(&CONSTRUCTION_PERMIT_FOR),
        excavation_required: field(&EXCAVATION_REQUIRED).and_then(|v| parse_flag(&v)),
        drainfield_depth: field(&DRAINFIELD_DEPTH),
        gpd_capacity: field(&GPD_CAPACITY).map(|v| v.replace(',', "")),
        pump: field(&PUMP),
        expiration_date: field(&EXPIRATION_DATE).and_then(|v| parse_permit_date(&v)),
        is_pbts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
STATE OF FLORIDA
DEPARTMENT OF HEALTH
ONSITE SEWAGE TREATMENT AND DISPOSAL SYSTEM
Permit No: 36-SC-2291034
Applicant: John A. Smith
Phone: (239) 555-0142
Email: JSMITH@Example.com
Property Address: 1423 Palm Tree Blvd, Lehigh Acres, FL 33971
Lot: 14   Block: 7
Construction Permit For:
New System
System Type: Standard Subsurface
Design Flow: 1,200 GPD
Drainfield Depth: 24 inches
Excavation Required: Yes
Pump: Required
Expiration Date: 03/15/2026
";

    #[test]
    fn extracts_labelled_fields() {
        let fields = extract_permit_fields(SAMPLE);
        assert_eq!(fields.permit_number.as_deref(), Some("36-SC-2291034"));
        assert_eq!(fields.applicant_name.as_deref(), Some("John A. Smith"));
        assert_eq!(fields.applicant_phone.as_deref(), Some("(239) 555-0142"));
        assert_eq!(fields.applicant_email.as_deref(), Some("jsmith@example.com"));
        assert_eq!(
            fields.property_address.as_deref(),
            Some("1423 Palm Tree Blvd, Lehigh Acres, FL 33971")
        );
        assert_eq!(fields.lot.as_deref(), Some("14"));
        assert_eq!(fields.block.as_deref(), Some("7"));
        assert_eq!(fields.system_type.as_deref(), Some("Standard Subsurface"));
        assert_eq!(fields.gpd_capacity.as_deref(), Some("1200"));
        assert_eq!(fields.drainfield_depth.as_deref(), Some("24 inches"));
        assert_eq!(fields.excavation_required, Some(true));
        assert_eq!(fields.pump.as_deref(), Some("Required"));
        assert_eq!(
            fields.expiration_date,
            NaiveDate::from_ymd_opt(2026, 3, 15)
        );
    }

    #[test]
    fn label_alone_takes_next_non_empty_line() {
        let fields = extract_permit_fields(SAMPLE);
        assert_eq!(fields.construction_permit_for.as_deref(), Some("New System"));

        let text = "Property Address\n\n   88 Ocean Dr, Cape Coral, FL\nOther: x";
        let fields = extract_permit_fields(text);
        assert_eq!(
            fields.property_address.as_deref(),
            Some("88 Ocean Dr, Cape Coral, FL")
        );
    }

    #[test]
    fn missing_fields_are_none() {
        let fields = extract_permit_fields("nothing useful here");
        assert_eq!(fields, ExtractedPermitFields::default());
    }

    #[test]
    fn pbts_from_flag_or_mention() {
        assert_eq!(extract_permit_fields("PBTS: No").is_pbts, Some(false));
        assert_eq!(
            extract_permit_fields("Approved as a Performance-Based Treatment System").is_pbts,
            Some(true)
        );
    }

    #[test]
    fn permit_dates_in_supported_formats() {
        assert_eq!(parse_permit_date("03/15/2026"), NaiveDate::from_ymd_opt(2026, 3, 15));
        assert_eq!(parse_permit_date("3/5/26"), NaiveDate::from_ymd_opt(2026, 3, 5));
        assert_eq!(parse_permit_date("2026-03-15"), NaiveDate::from_ymd_opt(2026, 3, 15));
        assert_eq!(parse_permit_date("13/45/2026"), None);
        assert_eq!(parse_permit_date("March 3"), None);
    }
}
