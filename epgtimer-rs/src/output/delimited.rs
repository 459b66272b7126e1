//! CSV and TSV writers.

use std::borrow::Cow;

/// Quote a field containing a comma, a quote or a line break.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// TSV has no quoting; tabs and line breaks become spaces.
fn tsv_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\r', '\n']) {
        Cow::Owned(field.replace(['\t', '\r', '\n'], " "))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = Cow<'a, str>>, separator: char) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(&field);
    }
    out.push('\n');
}

fn write_rows(
    columns: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
    separator: char,
    escape: fn(&str) -> Cow<'_, str>,
) -> String {
    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| escape(c)), separator);
    for row in rows {
        push_line(&mut out, row.iter().map(|f| escape(f.as_str())), separator);
    }
    out
}

pub fn to_csv(columns: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    write_rows(columns, rows, ',', csv_field)
}

pub fn to_tsv(columns: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    write_rows(columns, rows, '\t', tsv_field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows<'a>(data: &'a [&'a [&'a str]]) -> impl Iterator<Item = Vec<String>> + 'a {
        data.iter()
            .map(|row| row.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn test_csv_quoting() {
        let csv = to_csv(
            &["ID", "Title"],
            rows(&[&["1", "plain"], &["2", "a, b"], &["3", "say \"hi\""], &["4", "two\nlines"]]),
        );
        assert_eq!(
            csv,
            "ID,Title\n1,plain\n2,\"a, b\"\n3,\"say \"\"hi\"\"\"\n4,\"two\nlines\"\n"
        );
    }

    #[test]
    fn test_tsv_replaces_separators() {
        let tsv = to_tsv(&["ID", "Title"], rows(&[&["1", "tab\there"], &["2", "cr\r\nlf"]]));
        assert_eq!(tsv, "ID\tTitle\n1\ttab here\n2\tcr  lf\n");
    }

    #[test]
    fn test_header_only() {
        assert_eq!(to_csv(&["A", "B"], std::iter::empty()), "A,B\n");
    }
}
