use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::scrape::types::TableRow;

// Spreadsheet tools only pick up UTF-8 for CSV when the BOM is present.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const SEP: char = ',';

pub const COLUMNS: [&str; 4] = ["id", "dialect", "chinese_translation", "sound_url"];

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", SEP)?; } else { first = false; }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header + one line per record. The `id` column is present only when records carry one.
pub fn write_table<R: TableRow>(path: &Path, records: &[R]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(UTF8_BOM)?;

    let with_id = records.first().is_some_and(|r| r.id().is_some());
    let header = if with_id { &COLUMNS[..] } else { &COLUMNS[1..] };
    write_row(&mut out, header)?;

    for r in records {
        let mut cells: Vec<&str> = Vec::with_capacity(4);
        if with_id {
            cells.push(r.id().unwrap_or_default());
        }
        cells.extend([r.dialect_text(), r.translation(), r.sound_url()]);
        write_row(&mut out, &cells)?;
    }
    out.flush()
}
