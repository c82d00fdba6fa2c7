use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::debug;

/// Fields every row must provide a column for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Session,
    City,
    Task,
    Trial,
    EventId,
    Correct,
}

impl Field {
    pub const REQUIRED: [Field; 6] = [
        Field::Session,
        Field::City,
        Field::Task,
        Field::Trial,
        Field::EventId,
        Field::Correct,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::City => "city",
            Self::Task => "task",
            Self::Trial => "trial",
            Self::EventId => "event_id",
            Self::Correct => "correct",
        }
    }

    /// Accepted header spellings, in order of preference.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Session => &["session", "sess"],
            Self::City => &["city", "session_city", "city_id"],
            Self::Task => &["task", "task_id", "taskname", "task_name"],
            Self::Trial => &["trial", "trial_num", "trial_number"],
            Self::EventId => &["event_id", "event", "eventid"],
            Self::Correct => &["correct", "answer", "key", "correct_option"],
        }
    }
}

const GEN_CITY_ALIASES: &[&str] = &["gen_city", "gencity", "gen_city_id"];

const CHOICE_ALIASES: [&[&str]; 3] = [
    &["choice1", "ch1", "c1"],
    &["choice2", "ch2", "c2"],
    &["choice3", "ch3", "c3"],
];

/// Column indices resolved against one header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    required: HashMap<Field, usize>,
    pub gen_city: Option<usize>,
    pub choices: Option<[usize; 3]>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let mut required = HashMap::new();
        for field in Field::REQUIRED {
            let Some(index) = find_column(headers, field.aliases()) else {
                bail!("Required column missing: {}", field.as_str());
            };
            debug!(field = field.as_str(), header = %headers[index], "resolved column");
            required.insert(field, index);
        }

        let gen_city = find_column(headers, GEN_CITY_ALIASES);

        let found: Vec<usize> = CHOICE_ALIASES
            .iter()
            .filter_map(|aliases| find_column(headers, aliases))
            .collect();
        let choices = match found.as_slice() {
            [] => None,
            [first, second, third] => Some([*first, *second, *third]),
            other => bail!(
                "Provide 0 or 3 choice columns (choice1/2/3); found {}",
                other.len()
            ),
        };

        Ok(Self {
            required,
            gen_city,
            choices,
        })
    }

    pub fn index(&self, field: Field) -> usize {
        self.required[&field]
    }
}

/// Lowercase, with whitespace, hyphens and underscores removed.
pub fn normalize_header(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// First alias that matches any header wins; duplicate headers resolve leftmost.
pub fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    aliases.iter().find_map(|alias| {
        let alias = normalize_header(alias);
        normalized.iter().position(|header| *header == alias)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn task_resolves_through_case_and_separator_variants() {
        for header in ["Task_ID", "Task-Id", " task id ", "TASK"] {
            assert_eq!(
                find_column(&headers(&["x", header]), Field::Task.aliases()),
                Some(1),
                "{header}"
            );
        }
    }

    #[test]
    fn earlier_alias_beats_later_header_position() {
        let cols = headers(&["Event", "Event_ID"]);
        assert_eq!(find_column(&cols, Field::EventId.aliases()), Some(1));
    }

    #[test]
    fn missing_required_column_names_the_field() {
        let cols = headers(&["session", "city", "task", "trial", "correct"]);
        let err = ColumnMap::resolve(&cols).expect_err("event_id is absent");
        assert_eq!(err.to_string(), "Required column missing: event_id");
    }

    #[test]
    fn choice_columns_must_come_as_a_triple() {
        let base = ["Session", "City", "Task", "Trial", "Event", "Answer"];

        let none = ColumnMap::resolve(&headers(&base)).expect("no choices");
        assert_eq!(none.choices, None);
        assert_eq!(none.index(Field::Correct), 5);

        let mut three = base.to_vec();
        three.extend(["Ch1", "choice-2", "C3", "Gen City"]);
        let map = ColumnMap::resolve(&headers(&three)).expect("three choices");
        assert_eq!(map.choices, Some([6, 7, 8]));
        assert_eq!(map.gen_city, Some(9));

        let mut two = base.to_vec();
        two.extend(["choice1", "choice2"]);
        let err = ColumnMap::resolve(&headers(&two)).expect_err("two choices");
        assert!(err.to_string().starts_with("Provide 0 or 3 choice columns"));
    }
}
