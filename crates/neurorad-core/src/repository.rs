//! 存储接口
//!
//! 标注与报告的持久化契约。具体实现（PostgreSQL、内存）位于数据库模块，
//! 通过依赖注入传给 Web 层。

use crate::error::Result;
use crate::models::{
    AngioFeature, DegenerativeFeature, Feature, FeatureId, FeatureKind, Report, ReportUid, StrokeFeature,
};
use async_trait::async_trait;
use serde::Serialize;

/// 标注存储
///
/// 每个操作都是单条语句的原子操作，不开启跨记录事务。
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// 查询某报告下指定类型的全部标注，按标识升序
    async fn find_by_report(&self, kind: FeatureKind, report_uid: ReportUid) -> Result<Vec<Feature>>;

    /// 插入新标注并返回存储分配的标识。调用方负责事先校验。
    async fn insert(&self, feature: &Feature) -> Result<FeatureId>;

    /// 按标识更新分类字段。缺少标识返回 `BadRequest`，记录不存在返回 `NotFound`。
    async fn update(&self, feature: &Feature) -> Result<FeatureId>;

    /// 按标识删除，记录不存在返回 `NotFound`
    async fn delete(&self, kind: FeatureKind, id: FeatureId) -> Result<FeatureId>;
}

/// 报告存储（只读）
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// 分页查询报告，`pid` 为空时返回全部患者
    async fn list(&self, pid: Option<i64>, limit: i64, offset: i64) -> Result<Vec<Report>>;

    /// 符合条件的报告总数
    async fn count(&self, pid: Option<i64>) -> Result<i64>;
}

/// 一份报告的全部标注
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportFeatures {
    #[serde(rename = "StrokeFeatures")]
    pub stroke: Vec<StrokeFeature>,
    #[serde(rename = "AngioFeatures")]
    pub angio: Vec<AngioFeature>,
    #[serde(rename = "DegenerativeFeatures")]
    pub degenerative: Vec<DegenerativeFeature>,
}

/// 汇总报告的三类标注，任一查询失败则整体失败
pub async fn features_for(store: &dyn FeatureStore, report_uid: ReportUid) -> Result<ReportFeatures> {
    let mut features = ReportFeatures::default();

    for kind in FeatureKind::ALL {
        for feature in store.find_by_report(kind, report_uid).await? {
            match feature {
                Feature::Stroke(f) => features.stroke.push(f),
                Feature::Angio(f) => features.angio.push(f),
                Feature::Degenerative(f) => features.degenerative.push(f),
            }
        }
    }

    tracing::debug!(
        report_uid,
        stroke = features.stroke.len(),
        angio = features.angio.len(),
        degenerative = features.degenerative.len(),
        "Collected features for report"
    );
    Ok(features)
}
