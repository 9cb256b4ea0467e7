//! 内存存储
//!
//! 与PostgreSQL实现语义一致的内存版本：标识自增分配，查询按标识升序，
//! 更新和删除不存在的记录返回 `NotFound`。

use async_trait::async_trait;
use neurorad_core::{
    Feature, FeatureId, FeatureKind, FeatureStore, NeuroradError, Report, ReportStore, ReportUid, Result,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    reports: Vec<Report>,
    // 三类标注共用一个标识序列，按类型分表存放
    features: BTreeMap<(FeatureKind, FeatureId), Feature>,
    next_id: FeatureId,
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定报告初始化，顺序即插入顺序
    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            tables: RwLock::new(Tables { reports, ..Tables::default() }),
        }
    }

    /// 标注总数，便于测试断言无副作用
    pub async fn feature_count(&self) -> usize {
        self.tables.read().await.features.len()
    }
}

#[async_trait]
impl FeatureStore for MemoryStore {
    async fn find_by_report(&self, kind: FeatureKind, report_uid: ReportUid) -> Result<Vec<Feature>> {
        let tables = self.tables.read().await;
        let mut found: Vec<(FeatureId, Feature)> = tables
            .features
            .iter()
            .filter(|((k, _), f)| *k == kind && f.report_uid() == report_uid)
            .map(|((_, id), f)| (*id, f.clone()))
            .collect();
        found.sort_by_key(|(id, _)| *id);
        Ok(found.into_iter().map(|(_, f)| f).collect())
    }

    async fn insert(&self, feature: &Feature) -> Result<FeatureId> {
        let mut tables = self.tables.write().await;
        tables.next_id += 1;
        let id = tables.next_id;
        tables
            .features
            .insert((feature.kind(), id), feature.clone().with_id(id));
        debug!(kind = %feature.kind(), id, "Inserted feature into memory store");
        Ok(id)
    }

    async fn update(&self, feature: &Feature) -> Result<FeatureId> {
        let id = feature.require_id()?;
        let mut tables = self.tables.write().await;
        match tables.features.get_mut(&(feature.kind(), id)) {
            Some(existing) => {
                // 关联字段保持不变，仅替换分类字段
                let updated = match (&*existing, feature) {
                    (Feature::Stroke(old), Feature::Stroke(new)) => Feature::Stroke(neurorad_core::StrokeFeature {
                        kind: new.kind.clone(),
                        temporal: new.temporal.clone(),
                        location: new.location.clone(),
                        side: new.side.clone(),
                        extent: new.extent.clone(),
                        ..old.clone()
                    }),
                    (Feature::Angio(old), Feature::Angio(new)) => Feature::Angio(neurorad_core::AngioFeature {
                        vessel: new.vessel.clone(),
                        side: new.side.clone(),
                        finding: new.finding.clone(),
                        ..old.clone()
                    }),
                    (Feature::Degenerative(old), Feature::Degenerative(new)) => {
                        Feature::Degenerative(neurorad_core::DegenerativeFeature {
                            cortical_atrophy: new.cortical_atrophy.clone(),
                            cortical_atrophy_description: new.cortical_atrophy_description.clone(),
                            central_atrophy: new.central_atrophy.clone(),
                            microangiopathy: new.microangiopathy.clone(),
                            ..old.clone()
                        })
                    }
                    _ => return Err(NeuroradError::Internal("feature kind mismatch in memory store".to_string())),
                };
                *existing = updated;
                Ok(id)
            }
            None => Err(NeuroradError::NotFound(format!(
                "{} feature {} does not exist",
                feature.kind(),
                id
            ))),
        }
    }

    async fn delete(&self, kind: FeatureKind, id: FeatureId) -> Result<FeatureId> {
        let mut tables = self.tables.write().await;
        tables
            .features
            .remove(&(kind, id))
            .map(|_| id)
            .ok_or_else(|| NeuroradError::NotFound(format!("{} feature {} does not exist", kind, id)))
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn list(&self, pid: Option<i64>, limit: i64, offset: i64) -> Result<Vec<Report>> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(tables
            .reports
            .iter()
            .filter(|r| pid.map_or(true, |pid| r.pid == pid))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, pid: Option<i64>) -> Result<i64> {
        let tables = self.tables.read().await;
        let total = tables
            .reports
            .iter()
            .filter(|r| pid.map_or(true, |pid| r.pid == pid))
            .count();
        Ok(total as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use neurorad_core::{features_for, AngioFeature, DegenerativeFeature, StrokeFeature};

    fn stroke(report_uid: ReportUid) -> StrokeFeature {
        StrokeFeature {
            report_uid,
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

    fn angio(report_uid: ReportUid) -> AngioFeature {
        AngioFeature {
            report_uid,
            eid: 2,
            pid: 3,
            vessel: "M1".to_string(),
            side: "left".to_string(),
            finding: "occlusion".to_string(),
            id: None,
        }
    }

    fn degenerative(report_uid: ReportUid) -> DegenerativeFeature {
        DegenerativeFeature {
            report_uid,
            eid: 2,
            pid: 3,
            cortical_atrophy: "light".to_string(),
            cortical_atrophy_description: "symmetric".to_string(),
            central_atrophy: "none".to_string(),
            microangiopathy: "moderate".to_string(),
            id: None,
        }
    }

    fn report(pid: i64, report_uid: ReportUid) -> Report {
        let at = NaiveDate::from_ymd_opt(2019, 3, 14).unwrap().and_hms_opt(8, 30, 0).unwrap();
        Report {
            pid,
            eid: 100 + report_uid,
            order_uid: 200 + report_uid,
            examination: Some("CT head".to_string()),
            request: None,
            ordered_at: at,
            discipline: "neuroradiology".to_string(),
            report_uid,
            comment: String::new(),
            examination_started_at: at,
            report_type: "final".to_string(),
            report: "No acute findings.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find_round_trip() {
        let store = MemoryStore::new();
        let input = stroke(1);

        let id = store.insert(&Feature::from(input.clone())).await.unwrap();
        assert!(id > 0);

        let found = store.find_by_report(FeatureKind::Stroke, 1).await.unwrap();
        let expected = StrokeFeature { id: Some(id), ..input };
        assert_eq!(found, vec![Feature::Stroke(expected)]);
    }

    #[tokio::test]
    async fn test_find_orders_by_identifier() {
        let store = MemoryStore::new();
        let first = store.insert(&stroke(1).into()).await.unwrap();
        store.insert(&angio(1).into()).await.unwrap();
        let second = store.insert(&stroke(1).into()).await.unwrap();

        let ids: Vec<Option<FeatureId>> = store
            .find_by_report(FeatureKind::Stroke, 1)
            .await
            .unwrap()
            .iter()
            .map(Feature::id)
            .collect();
        assert_eq!(ids, vec![Some(first), Some(second)]);
    }

    #[tokio::test]
    async fn test_delete_removes_and_flags_missing() {
        let store = MemoryStore::new();
        let id = store.insert(&angio(9).into()).await.unwrap();

        assert_eq!(store.delete(FeatureKind::Angio, id).await.unwrap(), id);
        assert!(store.find_by_report(FeatureKind::Angio, 9).await.unwrap().is_empty());

        let err = store.delete(FeatureKind::Angio, id).await.unwrap_err();
        assert!(matches!(err, NeuroradError::NotFound(_)));

        // 标识属于其他类型时同样视为不存在
        let other = store.insert(&stroke(9).into()).await.unwrap();
        assert!(store.delete(FeatureKind::Degenerative, other).await.is_err());
    }

    #[tokio::test]
    async fn test_update_replaces_categorical_fields_only() {
        let store = MemoryStore::new();
        let id = store.insert(&degenerative(4).into()).await.unwrap();

        let mut changed = degenerative(999);
        changed.id = Some(id);
        changed.central_atrophy = "severe".to_string();
        assert_eq!(store.update(&changed.into()).await.unwrap(), id);

        let found = store.find_by_report(FeatureKind::Degenerative, 4).await.unwrap();
        match &found[..] {
            [Feature::Degenerative(f)] => {
                assert_eq!(f.central_atrophy, "severe");
                assert_eq!(f.report_uid, 4);
            }
            other => panic!("unexpected features: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_or_without_id() {
        let store = MemoryStore::new();

        let mut missing = stroke(1);
        missing.id = Some(77);
        let err = store.update(&missing.into()).await.unwrap_err();
        assert!(matches!(err, NeuroradError::NotFound(_)));

        let err = store.update(&stroke(1).into()).await.unwrap_err();
        assert!(matches!(err, NeuroradError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_features_for_only_returns_matching_report() {
        let store = MemoryStore::new();
        store.insert(&stroke(1).into()).await.unwrap();
        store.insert(&stroke(2).into()).await.unwrap();
        store.insert(&angio(1).into()).await.unwrap();
        store.insert(&degenerative(2).into()).await.unwrap();

        let features = features_for(&store, 1).await.unwrap();
        assert_eq!(features.stroke.len(), 1);
        assert_eq!(features.angio.len(), 1);
        assert!(features.degenerative.is_empty());
        assert!(features.stroke.iter().all(|f| f.report_uid == 1));
        assert!(features.angio.iter().all(|f| f.report_uid == 1));
    }

    #[tokio::test]
    async fn test_report_count_matches_list() {
        let store = MemoryStore::with_reports(vec![report(1, 10), report(2, 11), report(1, 12)]);

        let all = store.list(None, 1000, 0).await.unwrap();
        assert_eq!(store.count(None).await.unwrap(), all.len() as i64);
        assert_eq!(store.count(Some(1)).await.unwrap(), 2);

        let page = store.list(Some(1), 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].report_uid, 12);
        assert!(store.list(None, 0, 0).await.unwrap().is_empty());
    }
}
