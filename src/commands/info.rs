//! `rubbish info` - show one record in detail.

use anyhow::Result;
use rubbish::journal::MetaData;
use rubbish::utils::format_duration;
use std::process::ExitCode;

use super::Session;

/// Execute the info command, looking the record up by name or by position.
pub fn execute(session: &Session, item: Option<&str>, position: Option<i64>) -> Result<ExitCode> {
    let bin = session.bin();

    let record = match (item, position) {
        (_, Some(position)) => bin.info_at(position)?,
        (Some(item), None) => bin.info(item)?,
        (None, None) => anyhow::bail!("Specify an item name or --position"),
    };

    print!("{}", render(&record));

    if bin.entry_path(&record.item).symlink_metadata().is_err() {
        eprintln!("Warning: item is tracked but missing from the bin; run `rubbish check`");
    }

    Ok(ExitCode::SUCCESS)
}

fn render(record: &MetaData) -> String {
    let date = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map_or_else(
            || "unknown".to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
    };

    let remaining = record.remaining();
    let remaining = if record.is_wipeable() {
        if remaining < chrono::Duration::zero() {
            format!("overdue by {}", format_duration(remaining))
        } else {
            "wipeable now".to_string()
        }
    } else {
        format_duration(remaining)
    };

    format!(
        "Item:       {}\n\
         Origin:     {}\n\
         Type:       {}\n\
         Tossed at:  {}\n\
         Retention:  {} days\n\
         Wipeable:   {}\n\
         Remaining:  {remaining}\n",
        record.item,
        record.origin.display(),
        record.kind.as_str(),
        date(record.tossed_at()),
        record.wipeout_time,
        date(record.wipeable_at()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubbish::journal::ItemType;

    #[test]
    fn test_render_overdue() {
        let record = MetaData {
            item: "notes.txt_AB12CD".into(),
            origin: "/home/alex/notes.txt".into(),
            kind: ItemType::File,
            wipeout_time: 1,
            tossed_time: 0,
        };
        let out = render(&record);
        assert!(out.contains("Origin:     /home/alex/notes.txt"));
        assert!(out.contains("Tossed at:  1970-01-01 00:00:00 UTC"));
        assert!(out.contains("Wipeable:   1970-01-02 00:00:00 UTC"));
        assert!(out.contains("overdue by"));
    }
}
