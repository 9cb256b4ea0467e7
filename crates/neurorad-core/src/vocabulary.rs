//! 受控词表
//!
//! 每个分类字段的合法取值集合。所有集合在编译期确定，进程内只读，
//! 区分大小写，并且都包含 `"unspecified"` 与 `"NA"` 两个哨兵值。

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const KIND: &[&str] = &[
    "nothing",
    "subarachnoidal hemorrhage",
    "hemorrhage",
    "hemorrhagic transformation",
    "infarct",
    "unspecified",
    "NA",
];

const TEMPORAL: &[&str] = &["acute", "subacute", "chronic", "unspecified", "NA"];

const LOCATIONS: &[&str] = &[
    "MCA territory",
    "ACA territory",
    "PCA territory",
    "frontal",
    "temporal",
    "parietal",
    "insular",
    "occipital",
    "fronto-temporal",
    "fronto-parietal",
    "temporo-parietal",
    "temporo-occipital",
    "parieto-occipital",
    "capsula interna anterior limb",
    "capsula interna posterior limb",
    "corona radiata",
    "thalamus",
    "nucleus caudatus",
    "putamen",
    "globus pallidus",
    "basal ganglia",
    "mesencephalon",
    "pons",
    "medulla oblongata",
    "brainstem unspecified",
    "cerebellum",
    "unspecified",
    "NA",
];

const SIDE: &[&str] = &[
    "left",
    "right",
    "bilateral",
    "anterior",
    "posterior",
    "central",
    "unspecified",
    "NA",
];

const EXTENT: &[&str] = &[
    "lacunar",
    "lacunar, multiple",
    "small",
    "small, multiple",
    "medium",
    "medium, multiple",
    "large",
    "large, multiple",
    "unspecified",
    "unspecified, multiple",
    "NA",
];

const GRADE: &[&str] = &["none", "light", "moderate", "severe", "unspecified", "NA"];

const VESSELS: &[&str] = &[
    "Aorta",
    "ICA",
    "ECA",
    "A1",
    "A2",
    "A3",
    "M1",
    "M2",
    "M3",
    "M4",
    "P1",
    "P2",
    "P3",
    "Vertebral",
    "Basilar",
    "PICA",
    "AICA",
    "SCA",
    "unspecified",
    "NA",
];

const VESSEL_FINDINGS: &[&str] = &[
    "nothing",
    "atheromatosis without stenosis",
    "stenosis <= 50%",
    "stenosis < 70%",
    "stenosis >= 70%",
    "stenosis, unspecified grade",
    "caliber variations",
    "occlusion",
    "thrombosis",
    "dense vessel sign",
    "dissection",
    "unspecified",
    "NA",
];

const CORTICAL_ATROPHY_DESCRIPTION: &[&str] = &[
    "symmetric",
    "right hemisphere predominance",
    "left hemisphere predominance",
    "unspecified",
    "NA",
];

/// 词表名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Vocabulary {
    Kind,
    Temporal,
    Locations,
    Side,
    Extent,
    Grade,
    Vessels,
    VesselFinding,
    CorticalAtrophyDescription,
}

impl Vocabulary {
    /// 全部词表
    pub const ALL: [Vocabulary; 9] = [
        Vocabulary::Kind,
        Vocabulary::Temporal,
        Vocabulary::Locations,
        Vocabulary::Side,
        Vocabulary::Extent,
        Vocabulary::Grade,
        Vocabulary::Vessels,
        Vocabulary::VesselFinding,
        Vocabulary::CorticalAtrophyDescription,
    ];

    /// 词表对外名称，同时作为快照中的键
    pub fn name(&self) -> &'static str {
        match self {
            Vocabulary::Kind => "Kind",
            Vocabulary::Temporal => "Temporal",
            Vocabulary::Locations => "Locations",
            Vocabulary::Side => "Side",
            Vocabulary::Extent => "Extent",
            Vocabulary::Grade => "Grade",
            Vocabulary::Vessels => "Vessels",
            Vocabulary::VesselFinding => "VesselFinding",
            Vocabulary::CorticalAtrophyDescription => "CorticalAtrophyDescription",
        }
    }

    /// 有序的合法取值
    pub fn values(&self) -> &'static [&'static str] {
        match self {
            Vocabulary::Kind => KIND,
            Vocabulary::Temporal => TEMPORAL,
            Vocabulary::Locations => LOCATIONS,
            Vocabulary::Side => SIDE,
            Vocabulary::Extent => EXTENT,
            Vocabulary::Grade => GRADE,
            Vocabulary::Vessels => VESSELS,
            Vocabulary::VesselFinding => VESSEL_FINDINGS,
            Vocabulary::CorticalAtrophyDescription => CORTICAL_ATROPHY_DESCRIPTION,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vocabulary {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Vocabulary::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("unknown vocabulary: {}", s))
    }
}

/// 按词表名称检查取值是否合法，未知词表返回 `false`
pub fn contains(vocabulary: &str, value: &str) -> bool {
    vocabulary
        .parse::<Vocabulary>()
        .map(|v| v.contains(value))
        .unwrap_or(false)
}

/// 完整词表快照，供客户端填充下拉选项
pub fn all_vocabularies() -> BTreeMap<&'static str, &'static [&'static str]> {
    Vocabulary::ALL.iter().map(|v| (v.name(), v.values())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_vocabulary_has_sentinels() {
        for vocabulary in Vocabulary::ALL {
            assert!(vocabulary.contains("unspecified"), "{} lacks 'unspecified'", vocabulary);
            assert!(vocabulary.contains("NA"), "{} lacks 'NA'", vocabulary);
        }
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        assert!(Vocabulary::Vessels.contains("ICA"));
        assert!(!Vocabulary::Vessels.contains("ica"));
        assert!(Vocabulary::Kind.contains("infarct"));
        assert!(!Vocabulary::Kind.contains("Infarct"));
        assert!(!Vocabulary::Grade.contains("na"));
    }

    #[test]
    fn test_lookup_by_name() {
        assert!(contains("Extent", "small, multiple"));
        assert!(contains("VesselFinding", "stenosis >= 70%"));
        assert!(!contains("Extent", "small multiple"));
        assert!(!contains("Tumor", "NA"));
        assert_eq!("Side".parse::<Vocabulary>(), Ok(Vocabulary::Side));
        assert!("side".parse::<Vocabulary>().is_err());
    }

    #[test]
    fn test_snapshot_keys_and_order() {
        let snapshot = all_vocabularies();
        assert_eq!(snapshot.len(), 9);
        for vocabulary in Vocabulary::ALL {
            assert_eq!(snapshot[vocabulary.name()], vocabulary.values());
        }
        assert_eq!(snapshot["Temporal"], &["acute", "subacute", "chronic", "unspecified", "NA"]);
        assert_eq!(snapshot["Locations"].first(), Some(&"MCA territory"));
    }
}
