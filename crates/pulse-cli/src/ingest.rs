//! Offline ingestion of a post export into a dashboard.

use std::path::Path;

use anyhow::{bail, Context};
use sqlx::PgPool;
use uuid::Uuid;

use pulse_ingest::SourceFormat;

pub async fn run(
    pool: &PgPool,
    dashboard_id: Uuid,
    file: &Path,
    overwrite: bool,
) -> anyhow::Result<()> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .context("file path has no usable name")?;
    let Some(format) = SourceFormat::from_filename(file_name) else {
        bail!("unsupported file extension (expected .csv or .json): {file_name}");
    };

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM dashboards WHERE id = $1)")
        .bind(dashboard_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        bail!("dashboard {dashboard_id} does not exist");
    }

    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let rows = pulse_ingest::parse_rows(&bytes, format)?;
    let posts = pulse_ingest::ingest_rows(&rows);

    if overwrite {
        let removed = pulse_db::delete_posts_by_dashboard(pool, dashboard_id).await?;
        tracing::info!(removed, "cleared existing posts before ingest");
    }

    let count = pulse_db::insert_posts(pool, dashboard_id, &posts).await?;
    pulse_db::touch_dashboard(pool, dashboard_id).await?;

    println!("ingested {count} posts into dashboard {dashboard_id}");
    Ok(())
}
