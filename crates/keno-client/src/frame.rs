//! Tabular view over a sequence of draws.
//!
//! [`DrawFrame`] keeps draws in closing-time order, drops repeats (same game
//! number and closed time), and renders rows against the fixed column
//! schema in [`COLUMNS`].

use std::collections::HashSet;

use keno_core::{time, KenoTimestamp};
use serde::Serialize;
use serde_json::Value;

use crate::normalize::Draw;

/// Column names, in row order.
pub const COLUMNS: [&str; 27] = [
    "game_number",
    "closed",
    "draw_1",
    "draw_2",
    "draw_3",
    "draw_4",
    "draw_5",
    "draw_6",
    "draw_7",
    "draw_8",
    "draw_9",
    "draw_10",
    "draw_11",
    "draw_12",
    "draw_13",
    "draw_14",
    "draw_15",
    "draw_16",
    "draw_17",
    "draw_18",
    "draw_19",
    "draw_20",
    "result",
    "heads",
    "tails",
    "roulette",
    "bonus",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawFrame {
    draws: Vec<Draw>,
    #[serde(skip)]
    seen: HashSet<(u16, KenoTimestamp)>,
}

impl DrawFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `draws` in order, skipping any already present.
    ///
    /// Returns how many were added.
    pub fn extend_unique<I>(&mut self, draws: I) -> usize
    where
        I: IntoIterator<Item = Draw>,
    {
        let before = self.draws.len();
        for draw in draws {
            if self.seen.insert((draw.game_number, draw.closed)) {
                self.draws.push(draw);
            }
        }
        self.draws.len() - before
    }

    /// Stitches another frame into this one, keeping the first occurrence of
    /// each draw and re-establishing closing-time order.
    pub fn merge(&mut self, other: DrawFrame) {
        self.extend_unique(other.draws);
        // Ties on closed time fall back to game number.
        self.draws.sort_by_key(|d| (d.closed, d.game_number));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    #[must_use]
    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    #[must_use]
    pub fn into_draws(self) -> Vec<Draw> {
        self.draws
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }

    /// The draw at `index` rendered as one row matching [`COLUMNS`].
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<Value>> {
        self.draws.get(index).map(draw_row)
    }

    /// All rows, in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        self.draws.iter().map(draw_row)
    }
}

impl<'a> IntoIterator for &'a DrawFrame {
    type Item = &'a Draw;
    type IntoIter = std::slice::Iter<'a, Draw>;

    fn into_iter(self) -> Self::IntoIter {
        self.draws.iter()
    }
}

impl FromIterator<Draw> for DrawFrame {
    fn from_iter<I: IntoIterator<Item = Draw>>(iter: I) -> Self {
        let mut frame = DrawFrame::new();
        frame.extend_unique(iter);
        frame
    }
}

fn draw_row(draw: &Draw) -> Vec<Value> {
    let mut row = Vec::with_capacity(COLUMNS.len());
    row.push(Value::from(draw.game_number));
    row.push(Value::from(time::format(draw.closed)));
    row.extend(draw.numbers.iter().map(|&n| Value::from(n)));
    row.push(Value::from(draw.result.as_str()));
    row.push(Value::from(draw.heads));
    row.push(Value::from(draw.tails));
    row.push(draw.roulette.clone().unwrap_or(Value::Null));
    row.push(draw.bonus.clone().unwrap_or(Value::Null));
    row
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::normalize::HeadsOrTails;

    fn draw(game_number: u16, closed: &str) -> Draw {
        let mut numbers = [0u8; 20];
        for (i, slot) in numbers.iter_mut().enumerate() {
            *slot = u8::try_from(i * 4 + 1).unwrap();
        }
        Draw {
            game_number,
            closed: time::parse(closed).unwrap(),
            numbers,
            result: HeadsOrTails::Evens,
            heads: 10,
            tails: 10,
            roulette: None,
            bonus: Some(json!("x2")),
        }
    }

    #[test]
    fn row_matches_column_schema() {
        let frame: DrawFrame = [draw(12, "2021-06-01T00:02:41.000Z")].into_iter().collect();
        let row = frame.row(0).unwrap();
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row[0], json!(12));
        assert_eq!(row[1], json!("2021-06-01T00:02:41.000000Z"));
        assert_eq!(row[2], json!(1));
        assert_eq!(row[21], json!(77));
        assert_eq!(row[22], json!("evens"));
        assert_eq!(row[25], Value::Null);
        assert_eq!(row[26], json!("x2"));
        assert!(frame.row(1).is_none());
    }

    #[test]
    fn extend_unique_drops_repeats_keeping_first() {
        let mut frame = DrawFrame::new();
        let added = frame.extend_unique([
            draw(1, "2021-06-01T00:00:00Z"),
            draw(2, "2021-06-01T00:03:00Z"),
        ]);
        assert_eq!(added, 2);

        let mut repeat = draw(2, "2021-06-01T00:03:00Z");
        repeat.bonus = None;
        let added = frame.extend_unique([repeat, draw(3, "2021-06-01T00:06:00Z")]);
        assert_eq!(added, 1);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.draws()[1].bonus, Some(json!("x2")));
    }

    #[test]
    fn same_game_number_on_different_days_is_kept() {
        let frame: DrawFrame = [
            draw(500, "2021-06-01T12:00:00Z"),
            draw(500, "2021-06-03T02:00:00Z"),
        ]
        .into_iter()
        .collect();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn merge_restores_time_order() {
        let mut later: DrawFrame = [draw(7, "2021-06-02T00:00:00Z")].into_iter().collect();
        let earlier: DrawFrame = [
            draw(5, "2021-06-01T23:54:00Z"),
            draw(6, "2021-06-01T23:57:00Z"),
            draw(7, "2021-06-02T00:00:00Z"),
        ]
        .into_iter()
        .collect();
        later.merge(earlier);
        let numbers: Vec<u16> = later.iter().map(|d| d.game_number).collect();
        assert_eq!(numbers, vec![5, 6, 7]);
    }

    #[test]
    fn rows_render_every_draw_in_order() {
        let frame: DrawFrame = [
            draw(40, "2021-06-01T00:00:00Z"),
            draw(41, "2021-06-01T00:03:00Z"),
            draw(42, "2021-06-01T00:06:00Z"),
        ]
        .into_iter()
        .collect();

        let rows: Vec<Vec<Value>> = frame.rows().collect();
        assert_eq!(rows.len(), frame.len());
        assert!(rows.iter().all(|row| row.len() == COLUMNS.len()));
        let firsts: Vec<&Value> = rows.iter().map(|row| &row[0]).collect();
        assert_eq!(firsts, vec![&json!(40), &json!(41), &json!(42)]);
        assert_eq!(rows[1], frame.row(1).unwrap());

        let draws = frame.clone().into_draws();
        assert_eq!(draws.as_slice(), frame.draws());
    }

    #[test]
    fn merge_breaks_closed_time_ties_by_game_number() {
        let mut frame: DrawFrame = [draw(9, "2021-06-01T00:00:00Z")].into_iter().collect();
        frame.merge([draw(3, "2021-06-01T00:00:00Z")].into_iter().collect());
        let numbers: Vec<u16> = frame.iter().map(|d| d.game_number).collect();
        assert_eq!(numbers, vec![3, 9]);
    }

    #[test]
    fn serializes_draws_only() {
        let frame: DrawFrame = [draw(1, "2021-06-01T00:00:00Z")].into_iter().collect();
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["draws"][0]["game_number"], json!(1));
        assert!(value.get("seen").is_none());
    }
}
