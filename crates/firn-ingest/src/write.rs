use firn_catalog::TableName;
use firn_connect::SessionContext;
use firn_frame::Frame;

use crate::eligibility::{classify_column, classify_marked_column, Eligibility, IneligibleReason};
use crate::error::{IngestError, IngestResult};
use crate::execute::{execute_plan, WriteSummary};
use crate::plan::{build_plan, WriteMode};
use crate::probe::probe_table;
use crate::serialize::serialize_column;

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Error out if the table exists; otherwise create it.
    FailIfExists,
    /// Drop and recreate the table.
    #[default]
    Replace,
    /// Add rows to the table, creating it if absent.
    Append,
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub mode: SaveMode,
    /// Uppercase column names to match the remote system's identifier
    /// folding. On by default.
    pub uppercase_columns: bool,
    /// Columns to write as VARIANT even when their values would not be
    /// detected as structured (for example an object column of scalars, or
    /// a text column that already holds JSON).
    pub variant_columns: Option<Vec<String>>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mode: SaveMode::default(),
            uppercase_columns: true,
            variant_columns: None,
        }
    }
}

/// Writes a frame to a remote table.
///
/// Structured columns are detected, serialized to JSON text, and reconciled
/// against the remote schema. Classification and serialization failures
/// surface before any remote call is made; remote failures propagate
/// unchanged, after staging cleanup where applicable.
pub async fn write_frame(
    ctx: &SessionContext,
    frame: &Frame,
    table: &str,
    options: &WriteOptions,
) -> IngestResult<WriteSummary> {
    if frame.width() == 0 {
        return Err(IngestError::InvalidArgument(
            "cannot write a frame with no columns".to_string(),
        ));
    }
    let frame = if options.uppercase_columns {
        frame.renamed(|name| name.to_uppercase())?
    } else {
        frame.clone()
    };

    let marked = options.variant_columns.clone().unwrap_or_default();
    for name in &marked {
        if frame
            .columns()
            .iter()
            .all(|c| !c.name().eq_ignore_ascii_case(name))
        {
            return Err(IngestError::InvalidArgument(format!(
                "variant column '{name}' not found in frame"
            )));
        }
    }

    let mut verdicts = Vec::with_capacity(frame.width());
    for column in frame.columns() {
        let is_marked = marked.iter().any(|m| m.eq_ignore_ascii_case(column.name()));
        let verdict = if is_marked {
            classify_marked_column(column).ok_or_else(|| {
                IngestError::InvalidArgument(format!(
                    "column '{}' cannot be written as VARIANT: only object and text \
                     columns are supported",
                    column.name()
                ))
            })?
        } else {
            classify_column(column)
        };
        match verdict {
            Eligibility::Ineligible(IneligibleReason::ContainsNonFinite) => {
                return Err(IngestError::NonFiniteValue {
                    column: column.name().to_string(),
                });
            }
            Eligibility::Ineligible(IneligibleReason::ContainsUnrepresentable(detail)) => {
                return Err(IngestError::NonSerializableValue {
                    column: column.name().to_string(),
                    detail: detail.to_string(),
                });
            }
            _ => {}
        }
        verdicts.push((column.name().to_string(), verdict));
    }

    let mut load_frame = frame.clone();
    for (name, verdict) in &verdicts {
        if *verdict == Eligibility::Eligible {
            let column = load_frame
                .column(name)
                .ok_or_else(|| IngestError::InvalidArgument(format!("unknown column '{name}'")))?;
            if column.kind().is_object() {
                let serialized = serialize_column(column)?;
                load_frame.replace_column(serialized)?;
            }
        }
    }

    // Classification and serialization are done; only now touch the remote.
    let target = TableName::resolve(table, ctx).await?;
    let remote = probe_table(ctx.executor().as_ref(), &target).await?;
    if options.mode == SaveMode::FailIfExists && remote.exists() {
        return Err(IngestError::AlreadyExists {
            table: target.to_string(),
        });
    }
    let mode = match options.mode {
        SaveMode::FailIfExists => WriteMode::Create,
        SaveMode::Replace => WriteMode::Replace,
        SaveMode::Append => WriteMode::Append,
    };
    let plan = build_plan(&verdicts, mode, &remote)?;
    log::debug!("ingest plan for {target}: {plan:?}");

    let summary = execute_plan(ctx.executor().as_ref(), &target, &load_frame, &plan).await?;
    log::info!(
        "wrote {} rows to {} ({} promoted, {} staged)",
        summary.rows_written,
        summary.table,
        summary.promoted_columns.len(),
        summary.staged_columns.len(),
    );
    Ok(summary)
}
