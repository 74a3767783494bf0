//! Pre-compilation validation gate
//!
//! Collects every problem in a structure description into one flat report
//! instead of stopping at the first. The report decides whether to ask the
//! upstream generator to repair its output; compilation itself stays
//! permissive and skips bad fragments regardless.

use crate::material::MaterialCatalog;
use crate::model::Structure;
use crate::Limits;

/// All issues found in one validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<String>,
}

impl ValidationReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Numbered human-readable report, one issue per line
    pub fn report(&self) -> String {
        let mut out = String::new();
        for (i, issue) in self.issues.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, issue));
        }
        out
    }
}

/// Check every region and override against the material lookup and the
/// configured coordinate/volume limits.
pub fn validate(
    structure: &Structure,
    limits: &Limits,
    catalog: &dyn MaterialCatalog,
) -> ValidationReport {
    let mut issues = Vec::new();
    let max_coord = limits.max_coordinate;

    for (i, region) in structure.regions.iter().enumerate() {
        let prefix = format!("Region[{}] (material={})", i, region.material);

        if catalog.get(&region.material).is_none() {
            issues.push(format!("{prefix}: unknown material id"));
        }

        let mut corner_ok = true;
        for (name, raw) in [("from", &region.from), ("to", &region.to)] {
            match raw.as_deref() {
                Some([x, y, z]) => {
                    if [x, y, z].iter().any(|c| c.abs() > max_coord) {
                        issues.push(format!(
                            "{prefix}: '{name}' coordinate exceeds limit {max_coord}: [{x}, {y}, {z}]"
                        ));
                    }
                }
                _ => {
                    issues.push(format!("{prefix}: missing or malformed '{name}' corner"));
                    corner_ok = false;
                }
            }
        }

        if corner_ok {
            if let Some(volume) = region.volume() {
                if volume > limits.max_region_volume {
                    issues.push(format!(
                        "{prefix}: volume {volume} exceeds limit {}",
                        limits.max_region_volume
                    ));
                }
            }
        }
    }

    for (i, block) in structure.overrides.iter().enumerate() {
        let prefix = format!("Override[{}] (material={})", i, block.material);

        if catalog.get(&block.material).is_none() {
            issues.push(format!("{prefix}: unknown material id"));
        }

        match block.pos.as_deref() {
            Some([x, y, z]) => {
                if [x, y, z].iter().any(|c| c.abs() > max_coord) {
                    issues.push(format!(
                        "{prefix}: 'pos' coordinate exceeds limit {max_coord}: [{x}, {y}, {z}]"
                    ));
                }
            }
            _ => issues.push(format!("{prefix}: missing or malformed 'pos' coordinate")),
        }
    }

    ValidationReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::BuiltinCatalog;

    fn parse(json: &str) -> Structure {
        serde_json::from_str(json).unwrap()
    }

    fn check(json: &str) -> ValidationReport {
        validate(&parse(json), &Limits::default(), &BuiltinCatalog::default())
    }

    #[test]
    fn test_valid_structure_passes() {
        let report = check(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [4,4,4]}],
                "overrides": [{"material": "torch", "pos": [1,5,1]}]
            }"#,
        );
        assert!(!report.has_issues());
        assert!(report.report().is_empty());
    }

    #[test]
    fn test_collects_all_issues() {
        let report = check(
            r#"{
                "regions": [{"material": "unobtainium", "from": [0,0,0], "to": [300,0,0]}],
                "overrides": [{"material": "torch"}]
            }"#,
        );
        // Unknown material, out-of-range 'to', missing 'pos'
        assert_eq!(report.issues().len(), 3);
    }

    #[test]
    fn test_missing_corner_reported_once_per_side() {
        let report = check(r#"{"regions": [{"material": "stone", "from": [0,0]}]}"#);
        assert_eq!(report.issues().len(), 2);
        assert!(report.issues()[0].contains("'from'"));
        assert!(report.issues()[1].contains("'to'"));
    }

    #[test]
    fn test_volume_limit() {
        let report = check(r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [99,99,99]}]}"#);
        assert_eq!(report.issues().len(), 1);
        assert!(report.issues()[0].contains("volume 1000000"));
    }

    #[test]
    fn test_extreme_corners_reported_without_overflow() {
        // Corners at the i32 extremes must surface as limit issues, not
        // wrap or panic inside the volume arithmetic.
        let report = check(
            r#"{"regions": [{
                "material": "stone",
                "from": [-2147483648, 0, 0],
                "to": [2147483647, 255, 2147483647]
            }]}"#,
        );
        assert!(report.issues().iter().any(|i| i.contains("'from'")));
        assert!(report.issues().iter().any(|i| i.contains("volume")));
    }

    #[test]
    fn test_numbered_report() {
        let report = check(
            r#"{"overrides": [
                {"material": "torch"},
                {"material": "unobtainium", "pos": [0,0,0]}
            ]}"#,
        );
        let text = report.report();
        assert!(text.starts_with("1. "));
        assert!(text.contains("\n2. "));
    }

    #[test]
    fn test_both_corners_checked_independently() {
        let report = check(
            r#"{"regions": [{"material": "stone", "from": [-300,0,0], "to": [300,0,0]}]}"#,
        );
        assert_eq!(report.issues().len(), 2);
    }
}
