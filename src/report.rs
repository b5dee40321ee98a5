use std::io::{self, Write};

use crate::api::ApiReply;
use crate::domain::{Channel, FeedEntry};

const RULE_WIDTH: usize = 60;
const MISSING: &str = "—";

pub fn channel_details(out: &mut impl Write, channel: &Channel) -> io::Result<()> {
    let text = |value: &Option<String>| value.as_deref().unwrap_or(MISSING).to_string();

    writeln!(out)?;
    writeln!(out, "Project Details (Fetched Once)")?;
    if let Some(id) = channel.id {
        writeln!(out, "Channel ID   : {}", id)?;
    }
    writeln!(out, "Channel Name : {}", text(&channel.name))?;
    writeln!(out, "Description  : {}", text(&channel.description))?;
    writeln!(out, "Created At   : {}", text(&channel.created_at))?;
    writeln!(out, "Updated At   : {}", text(&channel.updated_at))?;
    let labels = channel.field_labels();
    if labels.is_empty() {
        writeln!(out, "Fields       : {}", MISSING)?;
    } else {
        writeln!(out, "Fields       : {}", labels.join(", "))?;
    }
    if let Some(last) = channel.last_entry_id {
        writeln!(out, "Last Entry   : {}", last)?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

pub fn response_meta(out: &mut impl Write, reply: &ApiReply) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- API Response ---")?;
    writeln!(out, "Status Code: {}", reply.status.as_u16())?;
    for (name, value) in &reply.headers {
        writeln!(out, "{}: {}", name, value)?;
    }
    Ok(())
}

/// One row per entry; values are keyed by the channel's field label, or `fieldN` without one.
pub fn new_entries(
    out: &mut impl Write,
    entries: &[FeedEntry],
    channel: Option<&Channel>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "New Data Rows:")?;
    for entry in entries {
        writeln!(out, "{}", entry_line(entry, channel))?;
    }
    Ok(())
}

fn entry_line(entry: &FeedEntry, channel: Option<&Channel>) -> String {
    let mut line = format!(
        "#{} @ {}",
        entry.entry_id,
        entry.created_at.as_deref().unwrap_or(MISSING)
    );
    for (index, value) in entry.fields() {
        match channel.and_then(|c| c.field_label(index)) {
            Some(label) => line.push_str(&format!(" {}={}", label, value)),
            None => line.push_str(&format!(" field{}={}", index, value)),
        }
    }
    line
}

pub fn no_new_data(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "(No new data since last check)")
}

pub fn failure(out: &mut impl Write, what: &str, message: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, "{}: {}", what, message)
}
