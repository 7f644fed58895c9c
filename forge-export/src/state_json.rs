use std::io;

use forge_core::ExportRecord;

use crate::ExportError;

/// Writes the full session record as pretty-printed JSON.
pub fn write_state<W: io::Write>(
    record: &ExportRecord,
    mut writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads a record written by [`write_state`].
pub fn read_state<R: io::Read>(reader: R) -> Result<ExportRecord, ExportError> {
    Ok(serde_json::from_reader(reader)?)
}
