use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::output::error::OutputError;
use crate::table::{Cell, ResultTable};

pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, table: &ResultTable) -> Result<(), OutputError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        write_row(&mut writer, table.headers().iter().map(String::as_str))?;
        for record in table.records() {
            let mut fields = vec![format_number(record.time)];
            for (index, reading) in record.readings.iter().enumerate() {
                fields.push(render_cell(&reading.value));
                if table.confidence_column(index) {
                    fields.push(
                        reading
                            .confidence
                            .map(|c| format!("{c}"))
                            .unwrap_or_default(),
                    );
                }
            }
            write_row(&mut writer, fields.iter().map(String::as_str))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Absent => String::new(),
        Cell::Number(value) => format_number(*value),
        Cell::Text(text) => text.clone(),
    }
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

fn write_row<'a>(
    writer: &mut impl Write,
    fields: impl Iterator<Item = &'a str>,
) -> Result<(), OutputError> {
    let mut first = true;
    for field in fields {
        if !first {
            writer.write_all(b",")?;
        }
        first = false;
        write_field(writer, field)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

// RFC 4180 quoting: only fields containing a delimiter, quote, or line
// break get wrapped, with embedded quotes doubled.
fn write_field(writer: &mut impl Write, field: &str) -> Result<(), OutputError> {
    if field.contains([',', '"', '\n', '\r']) {
        writer.write_all(b"\"")?;
        writer.write_all(field.replace('"', "\"\"").as_bytes())?;
        writer.write_all(b"\"")?;
    } else {
        writer.write_all(field.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_unquoted() {
        let mut buffer = Vec::new();
        write_row(&mut buffer, ["1.5", "42", "ok"].into_iter()).unwrap();
        assert_eq!(buffer, b"1.5,42,ok\n");
    }

    #[test]
    fn special_characters_are_quoted() {
        let mut buffer = Vec::new();
        write_row(&mut buffer, ["a,b", "say \"hi\"", "line\nbreak"].into_iter()).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "\"a,b\",\"say \"\"hi\"\"\",\"line\nbreak\"\n"
        );
    }

    #[test]
    fn absent_cells_render_empty() {
        assert_eq!(render_cell(&Cell::Absent), "");
        assert_eq!(render_cell(&Cell::Number(0.5)), "0.5");
        assert_eq!(render_cell(&Cell::Text("01:02".into())), "01:02");
    }

    #[test]
    fn whole_numbers_render_without_padding() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.25), "0.25");
    }
}
