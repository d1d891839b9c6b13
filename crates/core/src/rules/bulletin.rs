//! Messages posted by people in the shared spreadsheet.

use crate::notification::Notification;

/// Author shown when a row has no identity cell.
pub const ANONYMOUS: &str = "Anonyme";

/// One notification per row: cell 0 is the message, cell 1 the author.
///
/// Rows without a message cell are skipped.
pub fn bulletin_notifications(rows: &[Vec<String>]) -> Vec<Notification> {
    rows.iter()
        .filter_map(|row| {
            let message = row.first()?;
            let identity = row
                .get(1)
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(ANONYMOUS);
            Some(Notification::broadcast(format!("{identity} : {message}")))
        })
        .collect()
}
