use firn_frame::{CellJsonError, CellValue, Column, ColumnData};

/// Whether a column's values can be written as a structured (VARIANT)
/// remote column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(IneligibleReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// Not an object column, or none of its values are mappings or
    /// sequences. Such columns load as plain scalars; this is not an error.
    NoStructuredValues,
    /// A value holds a NaN or infinite float somewhere in its structure.
    ContainsNonFinite,
    /// A value holds something with no JSON representation; carries the
    /// offending type name.
    ContainsUnrepresentable(&'static str),
}

/// Decides whether a column's values are uniformly representable as JSON.
///
/// Missing cells are skipped: they become true NULLs on the remote side
/// and never affect the verdict. The verdict is recomputed on every write
/// call, since the column (and the remote schema it is reconciled against)
/// may have changed between calls.
pub fn classify_column(column: &Column) -> Eligibility {
    let ColumnData::Object(cells) = column.data() else {
        return Eligibility::Ineligible(IneligibleReason::NoStructuredValues);
    };
    let present = cells.iter().flatten().collect::<Vec<_>>();
    if !present.iter().any(|value| value.is_structured()) {
        return Eligibility::Ineligible(IneligibleReason::NoStructuredValues);
    }
    check_values(&present)
}

/// Classification for a column the caller explicitly marked as structured.
///
/// The requirement that at least one value is a mapping or sequence is
/// waived, but every value must still have a JSON representation. Text
/// columns are accepted as-is (their cells are taken to be JSON already).
/// Returns `None` for column kinds that cannot be marked.
pub fn classify_marked_column(column: &Column) -> Option<Eligibility> {
    match column.data() {
        ColumnData::Object(cells) => {
            Some(check_values(&cells.iter().flatten().collect::<Vec<_>>()))
        }
        ColumnData::Utf8(_) => Some(Eligibility::Eligible),
        _ => None,
    }
}

fn check_values(values: &[&CellValue]) -> Eligibility {
    for value in values {
        if let Err(error) = value.check_json() {
            return Eligibility::Ineligible(match error {
                CellJsonError::NonFiniteFloat => IneligibleReason::ContainsNonFinite,
                CellJsonError::Unrepresentable(name) => {
                    IneligibleReason::ContainsUnrepresentable(name)
                }
            });
        }
    }
    Eligibility::Eligible
}
