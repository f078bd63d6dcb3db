//! CSV rendering of the subscriber list for the `download` command.
//!
//! Fields are joined verbatim: a comma or quote inside a name or email is not
//! escaped and will shift columns for that row.

use chrono::SecondsFormat;

use crate::Subscriber;

pub const EXPORT_FILE_NAME: &str = "subscribers.csv";
pub const HEADER: [&str; 3] = ["Name", "Email", "Created At"];

pub fn subscribers_csv(subscribers: &[Subscriber]) -> Vec<u8> {
    let rows = subscribers.iter().map(|s| {
        [
            s.name.clone(),
            s.email.clone(),
            s.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ]
        .join(",")
    });

    std::iter::once(HEADER.join(","))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}
