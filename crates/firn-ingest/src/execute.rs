use serde::Serialize;
use uuid::Uuid;

use firn_catalog::TableName;
use firn_connect::SqlExecutor;
use firn_frame::Frame;

use crate::error::{IngestError, IngestResult};
use crate::plan::{IngestPlan, LoadAction, WriteMode};
use crate::schema;
use crate::sql;

/// What a write call did, per column, for observability.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriteSummary {
    pub table: String,
    pub rows_written: u64,
    /// Columns converted to VARIANT in place after loading.
    pub promoted_columns: Vec<String>,
    /// Columns merged into an existing VARIANT column via staging.
    pub staged_columns: Vec<String>,
    pub staging_table: Option<String>,
}

/// Carries out an ingest plan against the target table.
///
/// With staging, the target table's rows are only touched by the final
/// merge statement, so a failure anywhere earlier leaves it as it was. The
/// staging table is scoped to this call: it is dropped on success and on
/// every failure path.
pub async fn execute_plan(
    executor: &dyn SqlExecutor,
    target: &TableName,
    frame: &Frame,
    plan: &IngestPlan,
) -> IngestResult<WriteSummary> {
    let rows_written;
    let mut staging_table = None;
    if plan.requires_staging {
        let staging = staging_name(target)?;
        rows_written = load_via_staging(executor, target, &staging, frame, plan).await?;
        staging_table = Some(staging.to_string());
    } else {
        rows_written = load_direct(executor, target, frame, plan).await?;
    }
    Ok(WriteSummary {
        table: target.to_string(),
        rows_written,
        promoted_columns: plan
            .promoted_columns()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        staged_columns: plan
            .staged_columns()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        staging_table,
    })
}

async fn load_direct(
    executor: &dyn SqlExecutor,
    target: &TableName,
    frame: &Frame,
    plan: &IngestPlan,
) -> IngestResult<u64> {
    let create = match plan.mode {
        WriteMode::Replace => Some(true),
        WriteMode::Create => Some(false),
        WriteMode::Append if !plan.target_exists => Some(false),
        WriteMode::Append => None,
    };
    match create {
        Some(or_replace) => {
            let defs = schema::load_column_defs(frame);
            executor
                .execute(&sql::create_table(target, &defs, or_replace), &[])
                .await?;
        }
        None => {
            // The frame may introduce columns the table does not have yet.
            for column_plan in plan.columns.iter().filter(|c| c.remote_type.is_none()) {
                let kind = frame
                    .column(&column_plan.name)
                    .ok_or_else(|| missing_column(&column_plan.name))?
                    .kind();
                executor
                    .execute(
                        &sql::add_column(target, &column_plan.name, schema::remote_scalar_type(kind)),
                        &[],
                    )
                    .await?;
            }
        }
    }
    let rows = executor.bulk_load(&target.to_string(), frame, false).await?;
    for column in plan.promoted_columns() {
        executor
            .execute(&sql::promote_to_variant(target, column), &[])
            .await?;
        log::debug!("promoted column {column} of {target} to VARIANT");
    }
    Ok(rows)
}

async fn load_via_staging(
    executor: &dyn SqlExecutor,
    target: &TableName,
    staging: &TableName,
    frame: &Frame,
    plan: &IngestPlan,
) -> IngestResult<u64> {
    let defs = schema::load_column_defs(frame);
    executor
        .execute(&sql::create_table(staging, &defs, false), &[])
        .await?;
    log::debug!("created staging table {staging} for {target}");

    let outcome = stage_and_merge(executor, target, staging, frame, plan).await;

    // The staging table is scoped to this call; drop it no matter what.
    let dropped = executor.execute(&sql::drop_table(staging), &[]).await;
    match (outcome, dropped) {
        (Ok(rows), Ok(_)) => {
            log::debug!("merged {rows} rows from {staging} into {target}");
            Ok(rows)
        }
        (Ok(_), Err(drop_error)) => Err(drop_error.into()),
        (Err(error), dropped) => {
            if let Err(drop_error) = dropped {
                log::warn!("failed to drop staging table {staging}: {drop_error}");
            }
            Err(error)
        }
    }
}

async fn stage_and_merge(
    executor: &dyn SqlExecutor,
    target: &TableName,
    staging: &TableName,
    frame: &Frame,
    plan: &IngestPlan,
) -> IngestResult<u64> {
    executor
        .bulk_load(&staging.to_string(), frame, false)
        .await?;
    // Rows are staged; from here on a failure means work was lost after a
    // successful load, while the target itself is still untouched.
    merge_staging(executor, target, staging, frame, plan)
        .await
        .map_err(|error| IngestError::PartialWrite {
            table: target.to_string(),
            source: Box::new(error),
        })
}

async fn merge_staging(
    executor: &dyn SqlExecutor,
    target: &TableName,
    staging: &TableName,
    frame: &Frame,
    plan: &IngestPlan,
) -> IngestResult<u64> {
    for column in plan.promoted_columns() {
        executor
            .execute(&sql::promote_to_variant(staging, column), &[])
            .await?;
    }
    for column_plan in plan.columns.iter().filter(|c| c.remote_type.is_none()) {
        // New columns carry their final type: anything structured was
        // already promoted inside the staging table.
        let data_type = match column_plan.action {
            LoadAction::Scalar => {
                let kind = frame
                    .column(&column_plan.name)
                    .ok_or_else(|| missing_column(&column_plan.name))?
                    .kind();
                schema::remote_scalar_type(kind)
            }
            _ => "VARIANT",
        };
        executor
            .execute(&sql::add_column(target, &column_plan.name, data_type), &[])
            .await?;
    }
    let columns = plan
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.action == LoadAction::ViaStaging))
        .collect::<Vec<_>>();
    let output = executor
        .execute(&sql::insert_select(target, staging, &columns), &[])
        .await?;
    Ok(output.affected_rows)
}

/// A collision-resistant staging table name next to the target. The suffix
/// is unique per call, so concurrent writers never share a staging table.
fn staging_name(target: &TableName) -> IngestResult<TableName> {
    let suffix = Uuid::new_v4().simple().to_string();
    // Stay under the identifier length limit for long table names.
    let base = target.table().chars().take(214).collect::<String>();
    Ok(target.sibling(&format!("{base}_STAGING_{suffix}"))?)
}

fn missing_column(name: &str) -> IngestError {
    IngestError::InvalidArgument(format!("plan references unknown column '{name}'"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_staging_name_is_unique_and_valid() {
        let target = TableName::parse("DB.S.EVENTS", None, None).unwrap();
        let a = staging_name(&target).unwrap();
        let b = staging_name(&target).unwrap();
        assert_ne!(a, b);
        assert!(a.table().starts_with("EVENTS_STAGING_"));
        assert_eq!(a.database(), "DB");
        assert_eq!(a.schema(), "S");
    }

    #[test]
    fn test_staging_name_for_long_table() {
        let long = "T".repeat(240);
        let target = TableName::new("DB", "S", &long).unwrap();
        let staging = staging_name(&target).unwrap();
        assert!(staging.table().len() <= 255);
    }
}
