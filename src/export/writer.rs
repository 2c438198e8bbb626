use super::ExportFormat;
use crate::domain::Subscriber;
use anyhow::Context;
use std::io::Write;
use time::format_description::well_known::Rfc3339;

const CSV_HEADER: [&str; 3] = ["EMAIL", "COUNTRY", "SUBSCRIPTION DATE"];

/// Serialises subscribers in the requested format and flushes the writer.
pub(super) fn write_export<W>(
    mut writer: W,
    format: ExportFormat,
    subscribers: &[Subscriber],
) -> Result<(), anyhow::Error>
where
    W: Write,
{
    match format {
        ExportFormat::Txt => write_txt(&mut writer, subscribers)?,
        ExportFormat::Csv => write_csv(&mut writer, subscribers)?,
        ExportFormat::Json => serde_json::to_writer_pretty(&mut writer, subscribers)
            .context("Failed to write JSON export")?,
    }

    writer.flush().context("Failed to flush export")
}

fn write_txt<W: Write>(writer: &mut W, subscribers: &[Subscriber]) -> Result<(), anyhow::Error> {
    for (i, subscriber) in subscribers.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        write!(
            writer,
            "{},{}",
            subscriber.email,
            subscriber.country_or_empty()
        )?;
    }

    Ok(())
}

fn write_csv<W: Write>(writer: &mut W, subscribers: &[Subscriber]) -> Result<(), anyhow::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    for subscriber in subscribers {
        let subscribed_at = subscriber
            .created_at
            .format(&Rfc3339)
            .context("Failed to format subscription date")?;
        csv.write_record([
            subscriber.email.as_str(),
            subscriber.country_or_empty(),
            subscribed_at.as_str(),
        ])
        .context("Failed to write CSV record")?;
    }

    csv.flush().context("Failed to flush CSV export")?;
    Ok(())
}
