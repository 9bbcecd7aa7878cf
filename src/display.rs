use anyhow::Result;
use log::{debug, warn};
use std::io::Write;

use crate::process_table::ProcessTable;
use crate::transaction_log::Transaction;

/// Resolve every record of `log` against `table` and write the table:
/// one header row, then one row per record, in log order.
///
/// Blank lines are skipped. Records with too few fields are reported and
/// skipped; the run keeps going.
pub fn annotate_log(log: &str, table: &ProcessTable, mut out: impl Write) -> Result<()> {
    // The data rows' " => " occupies the same four columns as the header
    // gap, so caller and callee line up down the table.
    writeln!(out, "{:^15} {:^25}    {:^25}", "type", "caller", "callee")?;

    let mut rows = 0usize;
    for (index, line) in log.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let tx = match Transaction::parse(line) {
            Ok(tx) => tx,
            Err(err) => {
                warn!("skipping malformed record on line {}: {err}", index + 1);
                continue;
            }
        };

        writeln!(
            out,
            "{:^15} {:^25} => {:^25}",
            tx.call_type,
            table.resolve(tx.caller_pid()),
            table.resolve(tx.callee_pid()),
        )?;
        rows += 1;
    }

    debug!("annotated {rows} transaction records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = "\
USER     PID   PPID  VSIZE  RSS     WCHAN    PC         NAME
media     775   1     29996  4516  ffffffff afd0b6fc S /system/bin/mediaserver
system    2582  2571  461960 30156 c054dadc 40016110 S Binder Thread #
";

    fn annotate_to_string(log: &str, table: &ProcessTable) -> String {
        let mut out = Vec::new();
        annotate_log(log, table, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_row_bytes() {
        let text = annotate_to_string("", &ProcessTable::default());
        assert_eq!(
            text,
            concat!(
                "     type      ",
                " ",
                "         caller          ",
                "    ",
                "         callee          ",
                "\n",
            )
        );
    }

    #[test]
    fn test_resolved_row_bytes() {
        let table = ProcessTable::parse(SNAPSHOT);
        let text = annotate_to_string("1 type 2 123:1 3 2582:2\n", &table);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        // Caller 123 is not in the table and falls back to the raw key;
        // callee 2582 resolves to its command name
        assert_eq!(
            lines[1],
            concat!(
                "     type      ",
                " ",
                "           123           ",
                " => ",
                "     Binder Thread #     ",
            )
        );
    }

    #[test]
    fn test_rows_follow_log_order() {
        let table = ProcessTable::parse(SNAPSHOT);
        let log = "\
1: call  from 775:790 to 2582:2582 context binder
2: reply from 2582:2582 to 775:790 context binder
3: async from 775:790 to 4242:0 context binder
";
        let text = annotate_to_string(log, &table);
        let rows: Vec<String> = text
            .lines()
            .skip(1)
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        assert_eq!(
            rows,
            [
                "call mediaserver => Binder Thread #",
                "reply Binder Thread # => mediaserver",
                "async mediaserver => 4242",
            ]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = ProcessTable::parse(SNAPSHOT);
        let log = "\n1 call 2 775:1 3 2582:1\n   \n\t\n2 reply 3 2582:1 4 775:1\n\n";
        let text = annotate_to_string(log, &table);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let table = ProcessTable::parse(SNAPSHOT);
        let log = "\
1: call  from 775:790 to 2582:2582 context binder
garbage line
2: reply from 2582:2582 to 775:790 context binder
";
        let text = annotate_to_string(log, &table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("call"));
        assert!(lines[2].contains("reply"));
    }

    #[test]
    fn test_columns_stay_aligned() {
        let table = ProcessTable::parse(SNAPSHOT);
        let log = "1 call 2 775:1 3 9999:2\n2 reply 3 2582:1 4 775:1\n";
        let text = annotate_to_string(log, &table);
        // Every name here fits its column, so all rows share the header's width
        for line in text.lines() {
            assert_eq!(line.len(), 70, "misaligned line: {line:?}");
        }
    }
}
