//! CALS tables.

use crate::dom::NodeId;

use super::Visitor;
use super::sections::leading_number;

impl Visitor<'_> {
    /// `table` and `informaltable`.
    pub(super) fn visit_table(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        if self.doc.is_named(id, "table") {
            self.append_block_title(id, "");
        }
        self.process_table(id);
        false
    }

    fn process_table(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(tgroup) = doc.child(id, "tgroup") else {
            log::warn!("Table without tgroup! Skipping.");
            return;
        };

        let numcols = self.column_count(tgroup);
        if let Some(message) = self.column_mismatch(id, tgroup, numcols) {
            log::warn!("{message}");
        }

        // Literal layout in the first body row marks its column as literal.
        let mut cols = vec!["1".to_string(); numcols];
        if let Some(row) = doc.child_path(tgroup, &["tbody", "row"]) {
            for (col, cell) in cols.iter_mut().zip(doc.elements(row)) {
                if doc
                    .elements(cell)
                    .next()
                    .is_some_and(|first| doc.is_named(first, "literallayout"))
                {
                    col.push_str("*l");
                }
            }
        }

        let frame = doc
            .attr(id, "frame")
            .map(|frame| format!(", frame=\"{frame}\""))
            .unwrap_or_default();
        let head = doc.child(tgroup, "thead");
        let foot = doc.child(tgroup, "tfoot");
        let mut options = Vec::new();
        if head.is_some() {
            options.push("header");
        }
        if foot.is_some() {
            options.push("footer");
        }
        let options = if options.is_empty() {
            String::new()
        } else {
            format!(", options=\"{}\"", options.join(","))
        };

        self.out
            .push_line(format!("[cols=\"{}\"{frame}{options}]", cols.join(",")));
        self.out.push_line("|===");

        if let Some(head) = head {
            for cell in doc.children_path(head, &["row", "entry"]) {
                self.out.push_line(format!("| {}", self.text(cell)));
            }
            self.out.push_blank_line();
        }

        for row in doc.children_path(tgroup, &["tbody", "row"]) {
            self.ifdef_start(row);
            self.out.push_blank_line();
            for cell in doc.elements(row) {
                self.out.push_line("|");
                self.traverse_children(cell);
            }
            self.ifdef_end(row);
        }

        if let Some(foot) = foot {
            for cell in doc.children_path(foot, &["row", "entry"]) {
                self.out.push_line(format!("| {}", self.text(cell)));
            }
        }
        self.out.push_line("|===");
    }

    /// The `cols` of a `tgroup`, or the entries of its first row when `cols`
    /// is missing.
    fn column_count(&self, tgroup: NodeId) -> usize {
        let doc = self.doc;
        match doc.attr(tgroup, "cols").map(leading_number) {
            Some(count) if count > 0 => count,
            _ => doc
                .child_path(tgroup, &["thead", "row"])
                .or_else(|| doc.child_path(tgroup, &["tbody", "row"]))
                .map_or(0, |row| doc.elements(row).count()),
        }
    }

    /// Describe a header row whose width differs from the column count.
    fn column_mismatch(&self, table: NodeId, tgroup: NodeId, numcols: usize) -> Option<String> {
        let doc = self.doc;
        let row = doc.child_path(tgroup, &["thead", "row"])?;
        let headers = doc.elements(row).count();
        if headers == numcols {
            return None;
        }
        let title = doc
            .child(table, "title")
            .and_then(|t| doc.first_child(t))
            .map(|t| doc.text(t))
            .unwrap_or_default();
        Some(format!(
            "{numcols} columns specified in table '{title}', but only {headers} headers"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionOptions;
    use crate::dom::parse;

    fn render(xml: &str) -> String {
        let doc = parse(xml).unwrap();
        let opts = ConversionOptions::default();
        Visitor::new(&doc, &opts).convert()
    }

    #[test]
    fn test_header_and_body() {
        let out = render(
            "<table><tgroup cols=\"2\"><thead><row><entry>A</entry><entry>B|C</entry></row></thead><tbody><row><entry>1</entry><entry>x|y</entry></row></tbody></tgroup></table>",
        );
        assert_eq!(
            out,
            "\n[cols=\"1,1\", options=\"header\"]\n|===\n| A\n| B\\|C\n\n\n|1\n|x\\|y\n|==="
        );
    }

    #[test]
    fn test_column_count_follows_tgroup() {
        let out = render(
            "<table><title>Control parameters</title><tgroup cols=\"3\"><thead><row><entry>Apple</entry></row></thead></tgroup></table>",
        );
        assert_eq!(
            out,
            "\n.Control parameters\n[cols=\"1,1,1\", options=\"header\"]\n|===\n| Apple\n|==="
        );
    }

    #[test]
    fn test_column_mismatch_is_reported() {
        let doc = parse(
            "<table><title>Control parameters</title><tgroup cols=\"3\"><thead><row><entry>Apple</entry></row></thead></tgroup></table>",
        )
        .unwrap();
        let opts = ConversionOptions::default();
        let visitor = Visitor::new(&doc, &opts);
        let table = doc.root().unwrap();
        let tgroup = doc.child(table, "tgroup").unwrap();

        assert_eq!(visitor.column_count(tgroup), 3);
        assert_eq!(
            visitor.column_mismatch(table, tgroup, 3).as_deref(),
            Some("3 columns specified in table 'Control parameters', but only 1 headers")
        );
        assert_eq!(visitor.column_mismatch(table, tgroup, 1), None);
    }

    #[test]
    fn test_missing_cols_counts_first_row() {
        let out = render(
            "<informaltable><tgroup><tbody><row><entry>a</entry><entry>b</entry></row><row><entry>c</entry></row></tbody></tgroup></informaltable>",
        );
        assert!(out.starts_with("\n[cols=\"1,1\"]\n|===\n"));

        let out = render(
            "<informaltable><tgroup><thead><row><entry>A</entry><entry>B</entry><entry>C</entry></row></thead></tgroup></informaltable>",
        );
        assert!(out.starts_with("\n[cols=\"1,1,1\", options=\"header\"]\n|==="));
    }

    #[test]
    fn test_literal_column_frame_and_footer() {
        let out = render(
            "<informaltable frame=\"all\"><tgroup cols=\"2\"><tbody><row><entry><literallayout>a</literallayout></entry><entry>b</entry></row></tbody><tfoot><row><entry>f</entry></row></tfoot></tgroup></informaltable>",
        );
        assert!(out.starts_with("\n[cols=\"1*l,1\", frame=\"all\", options=\"footer\"]\n|==="));
        assert!(out.ends_with("| f\n|==="));
    }

    #[test]
    fn test_missing_tgroup_is_skipped() {
        assert_eq!(render("<table><title>T</title></table>"), "\n.T");
    }

    #[test]
    fn test_row_condition() {
        let out = render(
            "<informaltable><tgroup cols=\"1\"><tbody><row condition=\"foo\"><entry>a</entry></row></tbody></tgroup></informaltable>",
        );
        assert!(out.contains("|===\nifdef::foo[]\n\n|a\nendif::foo[]\n|==="));
    }
}
