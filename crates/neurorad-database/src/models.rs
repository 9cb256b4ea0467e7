//! 数据库模型

use chrono::NaiveDateTime;
use neurorad_core::models::*;
use sqlx::FromRow;

// 数据库表模型 - 使用FromRow trait用于SQL查询

/// 报告表
#[derive(Debug, FromRow)]
pub struct DbReport {
    pub pid: i64,
    pub eid: i64,
    pub order_uid: i64,
    pub examination: Option<String>,
    pub request: Option<String>,
    pub ordered_at: NaiveDateTime,
    pub discipline: String,
    pub report_uid: i64,
    pub comment: String,
    pub examination_started_at: NaiveDateTime,
    pub report_type: String,
    pub report: String,
}

impl From<DbReport> for Report {
    fn from(db: DbReport) -> Self {
        Report {
            pid: db.pid,
            eid: db.eid,
            order_uid: db.order_uid,
            examination: db.examination,
            request: db.request,
            ordered_at: db.ordered_at,
            discipline: db.discipline,
            report_uid: db.report_uid,
            comment: db.comment,
            examination_started_at: db.examination_started_at,
            report_type: db.report_type,
            report: db.report,
        }
    }
}

/// 卒中标注表
#[derive(Debug, FromRow)]
pub struct DbStrokeFeature {
    pub id: i64,
    pub report_uid: i64,
    pub eid: i64,
    pub pid: i64,
    pub kind: String,
    pub temporal: String,
    pub location: String,
    pub side: String,
    pub extent: String,
}

impl From<DbStrokeFeature> for StrokeFeature {
    fn from(db: DbStrokeFeature) -> Self {
        StrokeFeature {
            report_uid: db.report_uid,
            eid: db.eid,
            pid: db.pid,
            kind: db.kind,
            temporal: db.temporal,
            location: db.location,
            side: db.side,
            extent: db.extent,
            id: Some(db.id),
        }
    }
}

/// 血管造影标注表
#[derive(Debug, FromRow)]
pub struct DbAngioFeature {
    pub id: i64,
    pub report_uid: i64,
    pub eid: i64,
    pub pid: i64,
    pub vessel: String,
    pub side: String,
    pub finding: String,
}

impl From<DbAngioFeature> for AngioFeature {
    fn from(db: DbAngioFeature) -> Self {
        AngioFeature {
            report_uid: db.report_uid,
            eid: db.eid,
            pid: db.pid,
            vessel: db.vessel,
            side: db.side,
            finding: db.finding,
            id: Some(db.id),
        }
    }
}

/// 退行性改变标注表
#[derive(Debug, FromRow)]
pub struct DbDegenerativeFeature {
    pub id: i64,
    pub report_uid: i64,
    pub eid: i64,
    pub pid: i64,
    pub cortical_atrophy: String,
    pub cortical_atrophy_description: String,
    pub central_atrophy: String,
    pub microangiopathy: String,
}

impl From<DbDegenerativeFeature> for DegenerativeFeature {
    fn from(db: DbDegenerativeFeature) -> Self {
        DegenerativeFeature {
            report_uid: db.report_uid,
            eid: db.eid,
            pid: db.pid,
            cortical_atrophy: db.cortical_atrophy,
            cortical_atrophy_description: db.cortical_atrophy_description,
            central_atrophy: db.central_atrophy,
            microangiopathy: db.microangiopathy,
            id: Some(db.id),
        }
    }
}
