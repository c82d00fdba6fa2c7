use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::warn;

use crate::model::{GroupKey, MediaType, NormalizedRow, TaskKind, Trial};

/// Rows sharing `(session, city, task)`, in first-appearance order.
#[derive(Debug, Clone)]
pub struct TrialGroup {
    pub key: GroupKey,
    pub rows: Vec<NormalizedRow>,
}

pub fn group_rows(rows: Vec<NormalizedRow>) -> Vec<TrialGroup> {
    let mut groups: Vec<TrialGroup> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let key = GroupKey {
            session: row.session.clone(),
            city: row.city.clone(),
            task: row.task.as_str().to_string(),
        };
        match positions.get(&key) {
            Some(&position) => groups[position].rows.push(row),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(TrialGroup {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}

/// Sorts the group by trial number (stable) and derives one trial per row.
pub fn build_trials(group: &TrialGroup) -> Result<Vec<Trial>> {
    let mut rows: Vec<&NormalizedRow> = group.rows.iter().collect();
    rows.sort_by_key(|row| row.trial);
    rows.into_iter().map(build_trial).collect()
}

pub fn build_trial(row: &NormalizedRow) -> Result<Trial> {
    let (media_type, choices, assets) = match row.task {
        TaskKind::Generation | TaskKind::PairedChoice => video_choices(row),
        TaskKind::Position => position_choices(row)?,
        TaskKind::Other(_) => (MediaType::Unknown, Vec::new(), Vec::new()),
    };

    Ok(Trial {
        trial: row.trial,
        event_id: row.event_id,
        correct: row.correct,
        media_type,
        media_city: row.media_city.clone(),
        choices,
        assets,
    })
}

fn video_choices(row: &NormalizedRow) -> (MediaType, Vec<Option<i64>>, Vec<String>) {
    let choices = match row.choices {
        Some(triple) if triple.iter().all(Option::is_some) => triple.to_vec(),
        _ => {
            if row.event_id.is_none() {
                warn!(
                    row = row.source_row,
                    task = row.task.as_str(),
                    "no choices and no event_id; asset paths use a null placeholder"
                );
            }
            vec![row.event_id; 3]
        }
    };

    let assets = choices
        .iter()
        .map(|choice| video_asset(&row.media_city, *choice))
        .collect();

    (MediaType::Video, choices, assets)
}

fn position_choices(row: &NormalizedRow) -> Result<(MediaType, Vec<Option<i64>>, Vec<String>)> {
    let Some(positions) = position_array(row.correct) else {
        bail!(
            "Invalid correct position {} for ps trial {} (session {}, city {}); expected 1, 2 or 3",
            row.correct,
            row.trial,
            row.session,
            row.city
        );
    };

    if row.event_id.is_none() {
        warn!(
            row = row.source_row,
            task = row.task.as_str(),
            "ps trial has no event_id; asset paths use a null placeholder"
        );
    }

    let assets = positions
        .iter()
        .map(|variant| location_asset(&row.media_city, row.event_id, *variant))
        .collect();

    Ok((
        MediaType::Image,
        positions.iter().copied().map(Some).collect(),
        assets,
    ))
}

/// `1` marks the correct slot; lures `2` then `3` fill the rest left to right.
pub fn position_array(correct: i64) -> Option<[i64; 3]> {
    if !(1..=3).contains(&correct) {
        return None;
    }

    let correct_slot = (correct - 1) as usize;
    let mut lures = [2, 3].into_iter();
    let mut positions = [0; 3];
    for (slot, value) in positions.iter_mut().enumerate() {
        *value = if slot == correct_slot {
            1
        } else {
            lures.next().unwrap_or_default()
        };
    }

    Some(positions)
}

/// Stands in for a missing event id inside asset paths.
pub const MISSING_EVENT_ID: &str = "null";

fn event_label(event_id: Option<i64>) -> String {
    event_id.map_or_else(|| MISSING_EVENT_ID.to_string(), |id| id.to_string())
}

/// `{lang}` is left for the presentation client to fill in.
pub fn video_asset(media_city: &str, event_id: Option<i64>) -> String {
    format!(
        "media/{media_city}/animations/{{lang}}/{}.mp4",
        event_label(event_id)
    )
}

pub fn location_asset(media_city: &str, event_id: Option<i64>, variant: i64) -> String {
    format!(
        "media/{media_city}/locations/{}_{variant}.png",
        event_label(event_id)
    )
}
