//! Read-only queries backing the Gantt chart.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::gantt::GanttTimeline;

/// Loads the timelines shown on the Gantt chart.
pub struct GanttRepo;

impl GanttRepo {
    /// Every project timeline, or only `project_id`'s when given, ordered by
    /// timeline start.
    pub async fn list_timelines(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<GanttTimeline>, sqlx::Error> {
        sqlx::query_as::<_, GanttTimeline>(
            "SELECT t.id AS timeline_id, t.project_id, p.name AS project_name, t.status, t.progress
             FROM timelines t
             JOIN projects p ON p.id = t.project_id
             WHERE $1::BIGINT IS NULL OR t.project_id = $1
             ORDER BY t.start_date, t.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
