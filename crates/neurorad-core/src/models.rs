//! 核心数据模型定义

use crate::error::{NeuroradError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 报告唯一标识，用于关联标注
pub type ReportUid = i64;

/// 标注记录标识，由存储层在插入时分配
pub type FeatureId = i64;

/// 影像报告（只读，由外部系统写入）
///
/// 两个时间字段对应 radiology 表中不带时区的 `TIMESTAMP` 列；
/// 若上游改为 `TIMESTAMPTZ` 或文本列，需同步调整数据库行模型。
/// JSON 中以 `2019-03-14 08:30:00` 的形式输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub pid: i64,                           // 患者ID
    pub eid: i64,                           // 就诊ID
    pub order_uid: i64,                     // 医嘱ID
    pub examination: Option<String>,        // 检查描述
    pub request: Option<String>,            // 申请内容
    #[serde(with = "report_time")]
    pub ordered_at: NaiveDateTime,          // 开单时间
    pub discipline: String,
    pub report_uid: ReportUid,
    pub comment: String,
    #[serde(with = "report_time")]
    pub examination_started_at: NaiveDateTime,
    pub report_type: String,
    pub report: String,                     // 报告正文
}

/// 报告时间的文本格式，读取时也接受 ISO 8601 的 `T` 分隔写法
mod report_time {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, FORMAT)
            .or_else(|_| text.parse::<NaiveDateTime>())
            .map_err(de::Error::custom)
    }
}

/// 卒中相关标注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeFeature {
    pub report_uid: ReportUid,
    pub eid: i64,
    pub pid: i64,
    pub kind: String,
    pub temporal: String,
    pub location: String,
    pub side: String,
    pub extent: String,
    #[serde(default)]
    pub id: Option<FeatureId>,
}

/// 血管造影标注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngioFeature {
    pub report_uid: ReportUid,
    pub eid: i64,
    pub pid: i64,
    pub vessel: String,
    pub side: String,
    pub finding: String,
    #[serde(default)]
    pub id: Option<FeatureId>,
}

/// 退行性改变标注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegenerativeFeature {
    pub report_uid: ReportUid,
    pub eid: i64,
    pub pid: i64,
    pub cortical_atrophy: String,
    pub cortical_atrophy_description: String,
    pub central_atrophy: String,
    pub microangiopathy: String,
    #[serde(default)]
    pub id: Option<FeatureId>,
}

/// 标注类型，对应路径中的 `{kind}` 段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Stroke,
    Angio,
    Degenerative,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 3] = [FeatureKind::Stroke, FeatureKind::Angio, FeatureKind::Degenerative];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Stroke => "stroke",
            FeatureKind::Angio => "angio",
            FeatureKind::Degenerative => "degenerative",
        }
    }

    /// 对应的数据库表
    pub fn table(&self) -> &'static str {
        match self {
            FeatureKind::Stroke => "stroke_features",
            FeatureKind::Angio => "angio_features",
            FeatureKind::Degenerative => "degenerative_features",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = NeuroradError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stroke" => Ok(FeatureKind::Stroke),
            "angio" => Ok(FeatureKind::Angio),
            "degenerative" => Ok(FeatureKind::Degenerative),
            other => Err(NeuroradError::BadRequest(format!(
                "`{}` is not a valid 'feature' path segment",
                other
            ))),
        }
    }
}

/// 三种标注的封闭和类型
///
/// 序列化时不带标签，输出与具体记录相同的 JSON。反序列化必须经由
/// [`Feature::from_json`]，由调用方指定类型。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Feature {
    Stroke(StrokeFeature),
    Angio(AngioFeature),
    Degenerative(DegenerativeFeature),
}

impl Feature {
    /// 按 `kind` 将请求体解码为对应的标注类型
    pub fn from_json(kind: FeatureKind, value: serde_json::Value) -> Result<Self> {
        let feature = match kind {
            FeatureKind::Stroke => Feature::Stroke(serde_json::from_value(value)?),
            FeatureKind::Angio => Feature::Angio(serde_json::from_value(value)?),
            FeatureKind::Degenerative => Feature::Degenerative(serde_json::from_value(value)?),
        };
        Ok(feature)
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Stroke(_) => FeatureKind::Stroke,
            Feature::Angio(_) => FeatureKind::Angio,
            Feature::Degenerative(_) => FeatureKind::Degenerative,
        }
    }

    pub fn id(&self) -> Option<FeatureId> {
        match self {
            Feature::Stroke(f) => f.id,
            Feature::Angio(f) => f.id,
            Feature::Degenerative(f) => f.id,
        }
    }

    /// 更新操作要求记录已有标识
    pub fn require_id(&self) -> Result<FeatureId> {
        self.id().ok_or_else(|| {
            NeuroradError::BadRequest(format!("{} feature is missing its 'id' field", self.kind()))
        })
    }

    pub fn report_uid(&self) -> ReportUid {
        match self {
            Feature::Stroke(f) => f.report_uid,
            Feature::Angio(f) => f.report_uid,
            Feature::Degenerative(f) => f.report_uid,
        }
    }

    /// 返回带有指定标识的副本
    pub fn with_id(mut self, id: FeatureId) -> Self {
        match &mut self {
            Feature::Stroke(f) => f.id = Some(id),
            Feature::Angio(f) => f.id = Some(id),
            Feature::Degenerative(f) => f.id = Some(id),
        }
        self
    }
}

impl From<StrokeFeature> for Feature {
    fn from(f: StrokeFeature) -> Self {
        Feature::Stroke(f)
    }
}

impl From<AngioFeature> for Feature {
    fn from(f: AngioFeature) -> Self {
        Feature::Angio(f)
    }
}

impl From<DegenerativeFeature> for Feature {
    fn from(f: DegenerativeFeature) -> Self {
        Feature::Degenerative(f)
    }
}
