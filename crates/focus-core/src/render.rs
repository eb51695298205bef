//! Plain-text rendering of a day schedule.

use chrono::NaiveDate;

use crate::schedule::{BlockCategory, ScheduleBlock};

const TASK_TAG: &str = "●";
const FREE_TAG: &str = "○";
const ROUTINE_TAG: &str = "◆";

/// Tag shown in the last column.
pub fn block_tag(block: &ScheduleBlock) -> &str {
    match block.category {
        BlockCategory::Routine => block.icon.as_deref().unwrap_or(ROUTINE_TAG),
        BlockCategory::Task => TASK_TAG,
        BlockCategory::Free => FREE_TAG,
    }
}

/// `YYYY/MM/DD Plan`
pub fn plan_heading(date: NaiveDate) -> String {
    format!("{} Plan", date.format("%Y/%m/%d"))
}

/// Render blocks as a table: time range, activity, category, tag.
///
/// Column widths count `char`s, so labels with double-width glyphs (CJK,
/// most emoji) push the following columns right on a terminal.
pub fn render_table<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = &'a ScheduleBlock>,
{
    let rows: Vec<(String, &str, &str, &str)> = blocks
        .into_iter()
        .map(|b| {
            (
                b.time_range(),
                b.label.as_str(),
                b.category.as_str(),
                block_tag(b),
            )
        })
        .collect();

    let activity_width = rows
        .iter()
        .map(|(_, label, _, _)| label.chars().count())
        .chain(std::iter::once("Activity".len()))
        .max()
        .unwrap_or(0);
    let category_width = "Category".len();

    let mut out = String::new();
    out.push_str(&format!(
        "{:<11}  {:<aw$}  {:<cw$}  {}\n",
        "Time",
        "Activity",
        "Category",
        "Tag",
        aw = activity_width,
        cw = category_width
    ));
    out.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(11),
        "-".repeat(activity_width),
        "-".repeat(category_width),
        "---"
    ));
    for (time, label, category, tag) in rows {
        let pad = activity_width - label.chars().count();
        out.push_str(&format!(
            "{:<11}  {}{}  {:<cw$}  {}\n",
            time,
            label,
            " ".repeat(pad),
            category,
            tag,
            cw = category_width
        ));
    }
    out
}
