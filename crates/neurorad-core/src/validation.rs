//! 标注字段校验
//!
//! 逐个检查分类字段是否属于对应词表。所有失败字段都会被记录，不会在
//! 第一个错误处中止。

use crate::models::{AngioFeature, DegenerativeFeature, Feature, StrokeFeature};
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::collections::BTreeMap;

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    /// 字段名 -> 错误说明
    pub msg: BTreeMap<String, String>,
}

impl Validation {
    fn new() -> Self {
        Self { is_valid: true, msg: BTreeMap::new() }
    }

    /// 检查 `value` 是否属于 `vocabulary`，失败时以字段名记录默认格式的说明
    fn check(&mut self, field: &str, value: &str, vocabulary: Vocabulary) {
        if !vocabulary.contains(value) {
            self.add_error(field, format!("{} is not a valid '{}' value", value, field));
        }
    }

    fn check_grade(&mut self, field: &str, value: &str) {
        if !Vocabulary::Grade.contains(value) {
            self.add_error(field, format!("{} is not a valid grade", value));
        }
    }

    fn add_error(&mut self, field: &str, message: String) {
        self.is_valid = false;
        self.msg.insert(field.to_string(), message);
    }
}

/// 可校验的标注记录
pub trait Validate {
    fn validate(&self) -> Validation;
}

impl Validate for StrokeFeature {
    fn validate(&self) -> Validation {
        let mut result = Validation::new();
        result.check("kind", &self.kind, Vocabulary::Kind);
        result.check("temporal", &self.temporal, Vocabulary::Temporal);
        result.check("location", &self.location, Vocabulary::Locations);
        result.check("side", &self.side, Vocabulary::Side);
        result.check("extent", &self.extent, Vocabulary::Extent);
        result
    }
}

impl Validate for AngioFeature {
    fn validate(&self) -> Validation {
        let mut result = Validation::new();
        result.check("vessel", &self.vessel, Vocabulary::Vessels);
        result.check("side", &self.side, Vocabulary::Side);
        result.check("finding", &self.finding, Vocabulary::VesselFinding);
        result
    }
}

impl Validate for DegenerativeFeature {
    fn validate(&self) -> Validation {
        let mut result = Validation::new();
        result.check_grade("cortical_atrophy", &self.cortical_atrophy);
        result.check(
            "cortical_atrophy_description",
            &self.cortical_atrophy_description,
            Vocabulary::CorticalAtrophyDescription,
        );
        result.check_grade("central_atrophy", &self.central_atrophy);
        result.check_grade("microangiopathy", &self.microangiopathy);
        result
    }
}

impl Validate for Feature {
    fn validate(&self) -> Validation {
        match self {
            Feature::Stroke(f) => f.validate(),
            Feature::Angio(f) => f.validate(),
            Feature::Degenerative(f) => f.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> StrokeFeature {
        StrokeFeature {
            report_uid: 1,
            eid: 2,
            pid: 3,
            kind: "infarct".to_string(),
            temporal: "acute".to_string(),
            location: "MCA territory".to_string(),
            side: "left".to_string(),
            extent: "small".to_string(),
            id: None,
        }
    }

    fn angio() -> AngioFeature {
        AngioFeature {
            report_uid: 1,
            eid: 2,
            pid: 3,
            vessel: "ICA".to_string(),
            side: "right".to_string(),
            finding: "stenosis >= 70%".to_string(),
            id: None,
        }
    }

    fn degenerative() -> DegenerativeFeature {
        DegenerativeFeature {
            report_uid: 1,
            eid: 2,
            pid: 3,
            cortical_atrophy: "moderate".to_string(),
            cortical_atrophy_description: "left hemisphere predominance".to_string(),
            central_atrophy: "light".to_string(),
            microangiopathy: "NA".to_string(),
            id: None,
        }
    }

    #[test]
    fn test_valid_records_have_no_messages() {
        for feature in [Feature::from(stroke()), Feature::from(angio()), Feature::from(degenerative())] {
            let result = feature.validate();
            assert!(result.is_valid, "{:?}", result.msg);
            assert!(result.msg.is_empty());
        }
    }

    #[test]
    fn test_sentinels_are_accepted() {
        let mut f = stroke();
        f.kind = "unspecified".to_string();
        f.temporal = "NA".to_string();
        f.location = "unspecified".to_string();
        f.side = "NA".to_string();
        f.extent = "unspecified, multiple".to_string();
        assert!(f.validate().is_valid);
    }

    #[test]
    fn test_every_invalid_stroke_field_is_reported() {
        let mut f = stroke();
        f.kind = "tumor".to_string();
        f.temporal = "ancient".to_string();
        f.location = "mca territory".to_string();
        f.side = "up".to_string();
        f.extent = "huge".to_string();

        let result = f.validate();
        assert!(!result.is_valid);
        let keys: Vec<&str> = result.msg.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["extent", "kind", "location", "side", "temporal"]);
        assert_eq!(result.msg["kind"], "tumor is not a valid 'kind' value");
    }

    #[test]
    fn test_angio_side_reported_under_its_own_key() {
        let mut f = angio();
        f.side = "sideways".to_string();

        let result = f.validate();
        assert!(!result.is_valid);
        assert_eq!(result.msg.len(), 1);
        assert_eq!(result.msg["side"], "sideways is not a valid 'side' value");
        assert!(!result.msg.contains_key("vessel"));
    }

    #[test]
    fn test_angio_vessel_and_side_both_reported() {
        let mut f = angio();
        f.vessel = "M5".to_string();
        f.side = "sideways".to_string();

        let result = f.validate();
        assert_eq!(result.msg.len(), 2);
        assert!(result.msg.contains_key("vessel"));
        assert!(result.msg.contains_key("side"));
    }

    #[test]
    fn test_degenerative_grades() {
        let mut f = degenerative();
        f.cortical_atrophy = "extreme".to_string();
        f.microangiopathy = "Severe".to_string();

        let result = f.validate();
        assert!(!result.is_valid);
        assert_eq!(result.msg["cortical_atrophy"], "extreme is not a valid grade");
        assert_eq!(result.msg["microangiopathy"], "Severe is not a valid grade");
        assert!(!result.msg.contains_key("central_atrophy"));
    }

    #[test]
    fn test_cortical_atrophy_description_is_validated() {
        let mut f = degenerative();
        f.cortical_atrophy_description = "asymmetric".to_string();

        let result = f.validate();
        assert!(!result.is_valid);
        assert_eq!(
            result.msg["cortical_atrophy_description"],
            "asymmetric is not a valid 'cortical_atrophy_description' value"
        );
    }
}
