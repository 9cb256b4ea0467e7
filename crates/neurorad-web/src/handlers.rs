//! HTTP处理器

use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use neurorad_core::{
    all_vocabularies, features_for, Feature, FeatureId, FeatureKind, FeatureStore, Report, ReportFeatures,
    ReportStore, ReportUid, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// 处理器共享状态，存储实现由启动方注入
#[derive(Clone)]
pub struct AppState {
    pub features: Arc<dyn FeatureStore>,
    pub reports: Arc<dyn ReportStore>,
}

impl AppState {
    pub fn new(features: Arc<dyn FeatureStore>, reports: Arc<dyn ReportStore>) -> Self {
        Self { features, reports }
    }
}

/// 写操作的响应封装
///
/// 校验失败同样返回 200，以 `error = true` 和字段说明表示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResult {
    pub error: bool,
    pub data: Option<BTreeMap<String, String>>,
    pub id: Option<FeatureId>,
}

impl SaveResult {
    pub fn saved(id: FeatureId) -> Self {
        Self { error: false, data: None, id: Some(id) }
    }

    pub fn invalid(msg: BTreeMap<String, String>) -> Self {
        Self { error: true, data: Some(msg), id: None }
    }
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 词表快照
pub async fn get_values() -> impl IntoResponse {
    Json(all_vocabularies())
}

/// 报告总数
pub async fn count_reports(State(state): State<AppState>) -> ApiResult<Json<i64>> {
    Ok(Json(state.reports.count(None).await?))
}

/// 某患者的报告总数
pub async fn count_reports_for(State(state): State<AppState>, Path(pid): Path<i64>) -> ApiResult<Json<i64>> {
    Ok(Json(state.reports.count(Some(pid)).await?))
}

/// 分页查询报告
pub async fn list_reports(
    State(state): State<AppState>,
    Path((limit, offset)): Path<(i64, i64)>,
) -> ApiResult<Json<Vec<Report>>> {
    Ok(Json(state.reports.list(None, limit, offset).await?))
}

/// 分页查询某患者的报告
pub async fn list_reports_for(
    State(state): State<AppState>,
    Path((pid, limit, offset)): Path<(i64, i64, i64)>,
) -> ApiResult<Json<Vec<Report>>> {
    Ok(Json(state.reports.list(Some(pid), limit, offset).await?))
}

/// 报告的全部标注
pub async fn get_report_features(
    State(state): State<AppState>,
    Path(report_uid): Path<ReportUid>,
) -> ApiResult<Json<ReportFeatures>> {
    Ok(Json(features_for(state.features.as_ref(), report_uid).await?))
}

/// 按路径段查询的标注结果
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FeaturesResponse {
    Kind(Vec<Feature>),
    All(ReportFeatures),
}

/// 路径段 `features` 等同于 `/features/for/{report_uid}`，只对查询生效
const ALL_FEATURES_SEGMENT: &str = "features";

/// 报告的某类标注
pub async fn get_features_by_kind(
    State(state): State<AppState>,
    Path((kind, report_uid)): Path<(String, ReportUid)>,
) -> ApiResult<Json<FeaturesResponse>> {
    if kind == ALL_FEATURES_SEGMENT {
        let all = features_for(state.features.as_ref(), report_uid).await?;
        return Ok(Json(FeaturesResponse::All(all)));
    }

    let kind: FeatureKind = kind.parse()?;
    let features = state.features.find_by_report(kind, report_uid).await?;
    Ok(Json(FeaturesResponse::Kind(features)))
}

/// 创建标注：解码 -> 校验 -> 插入
pub async fn create_feature(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SaveResult>> {
    let kind: FeatureKind = kind.parse()?;
    let feature = Feature::from_json(kind, body)?;

    let validation = feature.validate();
    if !validation.is_valid {
        warn!(kind = %kind, fields = ?validation.msg.keys().collect::<Vec<_>>(), "Rejected invalid feature");
        return Ok(Json(SaveResult::invalid(validation.msg)));
    }

    let id = state.features.insert(&feature).await?;
    info!(kind = %kind, id, report_uid = feature.report_uid(), "Feature created");
    Ok(Json(SaveResult::saved(id)))
}

/// 更新标注：解码 -> 校验 -> 按标识更新
pub async fn update_feature(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SaveResult>> {
    let kind: FeatureKind = kind.parse()?;
    let feature = Feature::from_json(kind, body)?;

    let validation = feature.validate();
    if !validation.is_valid {
        warn!(kind = %kind, fields = ?validation.msg.keys().collect::<Vec<_>>(), "Rejected invalid feature");
        return Ok(Json(SaveResult::invalid(validation.msg)));
    }

    let id = state.features.update(&feature).await?;
    info!(kind = %kind, id, "Feature updated");
    Ok(Json(SaveResult::saved(id)))
}

/// 删除标注
pub async fn delete_feature(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, FeatureId)>,
) -> ApiResult<Json<SaveResult>> {
    let kind: FeatureKind = kind.parse()?;
    let id = state.features.delete(kind, id).await?;
    info!(kind = %kind, id, "Feature deleted");
    Ok(Json(SaveResult::saved(id)))
}
