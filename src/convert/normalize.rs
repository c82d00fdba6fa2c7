use tracing::debug;

use crate::model::{NormalizedRow, TaskKind};

use super::city::canon_city;
use super::columns::{ColumnMap, Field};
use super::sheet::Sheet;

#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub rows: Vec<NormalizedRow>,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingSession,
    MissingCity,
    MissingTask,
    InvalidTrial,
    InvalidCorrect,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingSession => "missing_session",
            Self::MissingCity => "missing_city",
            Self::MissingTask => "missing_task",
            Self::InvalidTrial => "invalid_trial",
            Self::InvalidCorrect => "invalid_correct",
        }
    }
}

pub fn normalize_rows(sheet: &Sheet, columns: &ColumnMap) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for index in 0..sheet.rows.len() {
        match normalize_row(sheet, columns, index) {
            Ok(row) => outcome.rows.push(row),
            Err(reason) => {
                // +2: 1-based numbering plus the header row.
                debug!(row = index + 2, reason = reason.as_str(), "skipping row");
                outcome.rejected += 1;
            }
        }
    }

    outcome
}

fn normalize_row(
    sheet: &Sheet,
    columns: &ColumnMap,
    index: usize,
) -> Result<NormalizedRow, RejectReason> {
    let cell = move |column: usize| sheet.cell(index, column);
    let field = move |field: Field| cell(columns.index(field));

    let session = field(Field::Session).render();
    if session.is_empty() {
        return Err(RejectReason::MissingSession);
    }

    let city = canon_city(field(Field::City));
    if city.is_empty() {
        return Err(RejectReason::MissingCity);
    }

    let task_code = field(Field::Task).render().to_lowercase();
    if task_code.is_empty() {
        return Err(RejectReason::MissingTask);
    }
    let task = TaskKind::from_code(&task_code);

    let trial = field(Field::Trial)
        .as_int()
        .ok_or(RejectReason::InvalidTrial)?;
    let correct = field(Field::Correct)
        .as_int()
        .ok_or(RejectReason::InvalidCorrect)?;
    let event_id = field(Field::EventId).as_int();

    let override_city = match (&task, columns.gen_city) {
        (TaskKind::Generation, Some(column)) => Some(canon_city(cell(column))),
        _ => None,
    };
    let media_city = override_city
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| city.clone());

    let choices = columns
        .choices
        .map(|indices| indices.map(|column| cell(column).as_int()));

    Ok(NormalizedRow {
        source_row: index + 2,
        session,
        city,
        task,
        trial,
        event_id,
        correct,
        media_city,
        choices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::sheet::Cell;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        Sheet {
            headers: ["session", "city", "task", "trial", "event_id", "correct", "gen_city"]
                .iter()
                .map(|header| header.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|cells| cells.iter().map(|value| Cell::text(value)).collect())
                .collect(),
        }
    }

    #[test]
    fn source_rows_count_the_header_line() {
        let sheet = sheet(&[
            &["", "City1", "ps", "1", "1", "1", ""],
            &["S1", "City1", "ps", "2", "2", "1", ""],
        ]);
        let columns = ColumnMap::resolve(&sheet.headers).expect("columns");

        let outcome = normalize_rows(&sheet, &columns);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].source_row, 3);
    }

    #[test]
    fn whitespace_override_keeps_row_city() {
        let sheet = sheet(&[
            &["S1", "City1", "gen", "1", "1", "1", "   "],
            &["S1", "City1", "gen", "2", "2", "1", "city 8"],
        ]);
        let columns = ColumnMap::resolve(&sheet.headers).expect("columns");

        let outcome = normalize_rows(&sheet, &columns);
        assert_eq!(outcome.rows[0].media_city, "City1");
        assert_eq!(outcome.rows[1].media_city, "City8");
    }
}
