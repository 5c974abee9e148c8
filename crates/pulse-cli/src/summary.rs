//! Printed analytics summary for a dashboard.

use anyhow::bail;
use sqlx::PgPool;
use uuid::Uuid;

use pulse_db::PostFilter;

pub async fn run(pool: &PgPool, dashboard_id: Uuid) -> anyhow::Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM dashboards WHERE id = $1)")
        .bind(dashboard_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        bail!("dashboard {dashboard_id} does not exist");
    }

    let rows = pulse_db::list_posts(pool, dashboard_id, &PostFilter::default()).await?;
    let posts: Vec<_> = rows.into_iter().map(pulse_db::PostRow::into_post).collect();

    let summary = pulse_analytics::summarize(&posts);
    let insights = pulse_analytics::generate_insights(&posts);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    for insight in insights {
        println!("[{}] {}: {} ({})", insight.icon, insight.title, insight.value, insight.description);
    }
    Ok(())
}
