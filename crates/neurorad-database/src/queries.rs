//! 数据库查询操作

use crate::connection::DatabasePool;
use crate::models::*;
use async_trait::async_trait;
use neurorad_core::{
    Feature, FeatureId, FeatureKind, FeatureStore, NeuroradError, Report, ReportStore, ReportUid, Result,
};
use sqlx::Row;
use tracing::{debug, warn};

const REPORT_COLUMNS: &str = "pid, eid, order_uid, examination, request, ordered_at, discipline, \
     report_uid, comment, examination_started_at, report_type, report";

/// 数据库查询操作接口
#[derive(Debug, Clone)]
pub struct DatabaseQueries {
    pool: DatabasePool,
}

impl DatabaseQueries {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// 影响行数为零时返回 `NotFound`
    fn expect_affected(kind: FeatureKind, id: FeatureId, rows_affected: u64) -> Result<FeatureId> {
        if rows_affected == 0 {
            warn!(kind = %kind, id, "No feature row matched");
            return Err(NeuroradError::NotFound(format!("{} feature {} does not exist", kind, id)));
        }
        Ok(id)
    }
}

#[async_trait]
impl FeatureStore for DatabaseQueries {
    async fn find_by_report(&self, kind: FeatureKind, report_uid: ReportUid) -> Result<Vec<Feature>> {
        let pool = self.pool.pool();
        debug!(kind = %kind, report_uid, "Finding features by report");

        let features: Vec<Feature> = match kind {
            FeatureKind::Stroke => sqlx::query_as::<_, DbStrokeFeature>(
                "SELECT id, report_uid, eid, pid, kind, temporal, location, side, extent \
                 FROM stroke_features WHERE report_uid = $1 ORDER BY id",
            )
            .bind(report_uid)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|row| Feature::Stroke(row.into()))
            .collect(),

            FeatureKind::Angio => sqlx::query_as::<_, DbAngioFeature>(
                "SELECT id, report_uid, eid, pid, vessel, side, finding \
                 FROM angio_features WHERE report_uid = $1 ORDER BY id",
            )
            .bind(report_uid)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|row| Feature::Angio(row.into()))
            .collect(),

            FeatureKind::Degenerative => sqlx::query_as::<_, DbDegenerativeFeature>(
                "SELECT id, report_uid, eid, pid, cortical_atrophy, cortical_atrophy_description, \
                 central_atrophy, microangiopathy \
                 FROM degenerative_features WHERE report_uid = $1 ORDER BY id",
            )
            .bind(report_uid)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|row| Feature::Degenerative(row.into()))
            .collect(),
        };

        Ok(features)
    }

    async fn insert(&self, feature: &Feature) -> Result<FeatureId> {
        let pool = self.pool.pool();

        let row = match feature {
            Feature::Stroke(f) => sqlx::query(
                r#"
                INSERT INTO stroke_features (report_uid, eid, pid, kind, temporal, location, side, extent)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
            "#,
            )
            .bind(f.report_uid)
            .bind(f.eid)
            .bind(f.pid)
            .bind(&f.kind)
            .bind(&f.temporal)
            .bind(&f.location)
            .bind(&f.side)
            .bind(&f.extent)
            .fetch_one(pool)
            .await?,

            Feature::Angio(f) => sqlx::query(
                r#"
                INSERT INTO angio_features (report_uid, eid, pid, vessel, side, finding)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
            "#,
            )
            .bind(f.report_uid)
            .bind(f.eid)
            .bind(f.pid)
            .bind(&f.vessel)
            .bind(&f.side)
            .bind(&f.finding)
            .fetch_one(pool)
            .await?,

            Feature::Degenerative(f) => sqlx::query(
                r#"
                INSERT INTO degenerative_features
                    (report_uid, eid, pid, cortical_atrophy, cortical_atrophy_description, central_atrophy, microangiopathy)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
            "#,
            )
            .bind(f.report_uid)
            .bind(f.eid)
            .bind(f.pid)
            .bind(&f.cortical_atrophy)
            .bind(&f.cortical_atrophy_description)
            .bind(&f.central_atrophy)
            .bind(&f.microangiopathy)
            .fetch_one(pool)
            .await?,
        };

        let id: FeatureId = row.try_get("id")?;
        debug!(kind = %feature.kind(), id, "Inserted feature");
        Ok(id)
    }

    async fn update(&self, feature: &Feature) -> Result<FeatureId> {
        let pool = self.pool.pool();
        let id = feature.require_id()?;

        let result = match feature {
            Feature::Stroke(f) => sqlx::query(
                "UPDATE stroke_features SET kind = $1, temporal = $2, location = $3, side = $4, extent = $5 \
                 WHERE id = $6",
            )
            .bind(&f.kind)
            .bind(&f.temporal)
            .bind(&f.location)
            .bind(&f.side)
            .bind(&f.extent)
            .bind(id)
            .execute(pool)
            .await?,

            Feature::Angio(f) => sqlx::query(
                "UPDATE angio_features SET vessel = $1, side = $2, finding = $3 WHERE id = $4",
            )
            .bind(&f.vessel)
            .bind(&f.side)
            .bind(&f.finding)
            .bind(id)
            .execute(pool)
            .await?,

            Feature::Degenerative(f) => sqlx::query(
                "UPDATE degenerative_features SET cortical_atrophy = $1, cortical_atrophy_description = $2, \
                 central_atrophy = $3, microangiopathy = $4 WHERE id = $5",
            )
            .bind(&f.cortical_atrophy)
            .bind(&f.cortical_atrophy_description)
            .bind(&f.central_atrophy)
            .bind(&f.microangiopathy)
            .bind(id)
            .execute(pool)
            .await?,
        };

        Self::expect_affected(feature.kind(), id, result.rows_affected())
    }

    async fn delete(&self, kind: FeatureKind, id: FeatureId) -> Result<FeatureId> {
        let pool = self.pool.pool();

        // 表名来自封闭枚举，不接受外部输入
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;

        Self::expect_affected(kind, id, result.rows_affected())
    }
}

#[async_trait]
impl ReportStore for DatabaseQueries {
    async fn list(&self, pid: Option<i64>, limit: i64, offset: i64) -> Result<Vec<Report>> {
        let pool = self.pool.pool();

        let rows = match pid {
            None => {
                let sql = format!("SELECT {} FROM radiology ORDER BY id LIMIT $1 OFFSET $2", REPORT_COLUMNS);
                sqlx::query_as::<_, DbReport>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await?
            }
            Some(pid) => {
                let sql = format!(
                    "SELECT {} FROM radiology WHERE pid = $1 ORDER BY id LIMIT $2 OFFSET $3",
                    REPORT_COLUMNS
                );
                sqlx::query_as::<_, DbReport>(&sql)
                    .bind(pid)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Report::from).collect())
    }

    async fn count(&self, pid: Option<i64>) -> Result<i64> {
        let pool = self.pool.pool();

        let total: i64 = match pid {
            None => sqlx::query_scalar("SELECT COUNT(*) FROM radiology").fetch_one(pool).await?,
            Some(pid) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM radiology WHERE pid = $1")
                    .bind(pid)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(total)
    }
}
