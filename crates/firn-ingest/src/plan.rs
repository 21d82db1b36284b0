use crate::eligibility::Eligibility;
use crate::error::{IngestError, IngestResult};
use crate::probe::{RemoteSchema, RemoteType};

/// How the target table is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Replace,
    Append,
}

/// How a single column is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Load the column as-is; no structural handling.
    Scalar,
    /// Load JSON text, then convert the loaded column in place to VARIANT.
    TextThenPromote,
    /// Load JSON text into the staging table and parse it while merging
    /// into the target's existing VARIANT column.
    ViaStaging,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub name: String,
    pub action: LoadAction,
    /// Declared remote type classification; `None` when the column (or the
    /// whole table) does not exist remotely.
    pub remote_type: Option<RemoteType>,
}

/// The per-call loading plan. Built once per write, consumed once by the
/// executor, and inspectable before execution: every schema mutation the
/// executor will perform is derivable from this value.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestPlan {
    pub mode: WriteMode,
    pub columns: Vec<ColumnPlan>,
    /// When set, every column is routed through one staging table, so the
    /// final merge moves whole rows at once. Partial staging is never done.
    pub requires_staging: bool,
    pub target_exists: bool,
}

impl IngestPlan {
    pub fn column(&self, name: &str) -> Option<&ColumnPlan> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns converted to VARIANT in place after loading.
    pub fn promoted_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.action == LoadAction::TextThenPromote)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Columns merged into an existing VARIANT column via staging.
    pub fn staged_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.action == LoadAction::ViaStaging)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Builds the loading plan from the column verdicts, the write mode, and
/// the probed remote schema.
///
/// For a structured-eligible column the decision depends on what already
/// exists remotely: a fresh or replaced target (or a column the target does
/// not have) is loaded as text and promoted; an existing VARIANT column
/// forces the staging route; an existing scalar column wins over the local
/// shape and the column is quietly loaded as plain text. An existing column
/// of unrecognized type is an error rather than a guess.
pub fn build_plan(
    verdicts: &[(String, Eligibility)],
    mode: WriteMode,
    remote: &RemoteSchema,
) -> IngestResult<IngestPlan> {
    let mut columns = Vec::with_capacity(verdicts.len());
    for (name, verdict) in verdicts {
        let remote_column = remote.column(name);
        let action = match verdict {
            Eligibility::Ineligible(_) => LoadAction::Scalar,
            Eligibility::Eligible => match mode {
                WriteMode::Create | WriteMode::Replace => LoadAction::TextThenPromote,
                WriteMode::Append => match remote_column.map(|c| c.classification) {
                    None => LoadAction::TextThenPromote,
                    Some(RemoteType::Variant) => LoadAction::ViaStaging,
                    Some(RemoteType::Scalar) => LoadAction::Scalar,
                    Some(RemoteType::Other) => {
                        return Err(IngestError::RemoteSchemaConflict {
                            column: name.clone(),
                            declared: remote_column
                                .map(|c| c.declared.clone())
                                .unwrap_or_default(),
                        });
                    }
                },
            },
        };
        columns.push(ColumnPlan {
            name: name.clone(),
            action,
            remote_type: remote_column.map(|c| c.classification),
        });
    }
    let requires_staging = columns.iter().any(|c| c.action == LoadAction::ViaStaging);
    Ok(IngestPlan {
        mode,
        columns,
        requires_staging,
        target_exists: remote.exists(),
    })
}
