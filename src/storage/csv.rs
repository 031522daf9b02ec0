use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::domain::{sort_by_indexed_pages, DomainCheckResult};

const BOM: &str = "\u{feff}";
const HEADER: [&str; 4] = ["domain", "status", "indexed_pages", "checked_time"];

/// Writes `results` sorted by indexed pages, replacing whatever is at `path`.
///
/// The file is assembled next to its destination and renamed into place.
pub fn write_results(path: &Path, results: &[DomainCheckResult]) -> Result<()> {
    let mut rows = results.to_vec();
    sort_by_indexed_pages(&mut rows);
    let body = render(&rows);

    let dir = parent_dir(path);
    let mut file = NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    file.write_all(body.as_bytes())
        .with_context(|| format!("failed to write results for {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("failed to move results into {}", path.display()))?;
    Ok(())
}

pub fn render(rows: &[DomainCheckResult]) -> String {
    let mut out = String::from(BOM);
    push_record(&mut out, HEADER.iter().copied());
    for row in rows {
        let pages = row.indexed_pages().to_string();
        let checked = row.checked_time();
        push_record(
            &mut out,
            [row.domain(), row.status().label(), pages.as_str(), checked.as_str()],
        );
    }
    out
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (idx, field) in fields.into_iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{Local, TimeZone};

    use super::*;
    use crate::domain::IndexStatus;

    fn result(domain: &str, status: IndexStatus, pages: u64) -> DomainCheckResult {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        DomainCheckResult::new(domain, status, pages, at)
    }

    #[test]
    fn renders_bom_header_and_sorted_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_results(
            &path,
            &[
                result("c.com", IndexStatus::IndexedCountUnknown, 3),
                result("b.com", IndexStatus::Indexed, 1234),
            ],
        )
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "\u{feff}domain,status,indexed_pages,checked_time\r\n\
             b.com,indexed,1234,2024-05-01 12:30:00\r\n\
             c.com,indexed (count unknown),3,2024-05-01 12:30:00\r\n"
        );
    }

    #[test]
    fn quotes_fields_with_separators() {
        let rendered = render(&[result("a.com/x,\"y\"", IndexStatus::Indexed, 1)]);
        assert!(rendered.contains("\"a.com/x,\"\"y\"\"\",indexed,1,"));
    }

    #[test]
    fn overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.csv");
        write_results(&path, &[result("a.com", IndexStatus::Indexed, 1)]).unwrap();
        write_results(&path, &[result("b.com", IndexStatus::Indexed, 2)]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("b.com"));
        assert!(!written.contains("a.com"));
    }
}
