use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Write header + rows as comma-separated CSV. Every row ends with a single
/// '\n' regardless of platform; the file is written exactly once, after the
/// whole batch has finished.
pub fn write_table(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut w = BufWriter::new(file);

    write_row(&mut w, header)?;
    for row in rows {
        write_row(&mut w, row)?;
    }
    w.flush()?;
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

fn needs_quotes(cell: &str) -> bool {
    cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_to_string(header: &[&str], rows: &[Vec<String>]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&path, header, rows).unwrap();
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn header_plus_records() {
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["2".to_string(), "b".to_string()],
        ];
        let out = write_to_string(&["番号", "名前"], &rows);
        assert_eq!(out, "番号,名前\n1,a\n2,b\n");
    }

    #[test]
    fn unix_line_endings_only() {
        let out = write_to_string(&["x"], &[vec!["y".to_string()]]);
        assert!(!out.contains('\r'));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn quoting_separator_and_quotes() {
        let rows = vec![vec!["a,b".to_string(), "say \"hi\"".to_string()]];
        let out = write_to_string(&["h1", "h2"], &rows);
        assert_eq!(out, "h1,h2\n\"a,b\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn embedded_newline_is_quoted() {
        let rows = vec![vec!["two\nlines".to_string()]];
        let out = write_to_string(&["h"], &rows);
        assert_eq!(out, "h\n\"two\nlines\"\n");
    }
}
