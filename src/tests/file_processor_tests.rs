#[cfg(test)]
mod file_processor_tests {
    use crate::errors::{ParseError, PipelineError};
    use crate::file_processor::{parse_export_text, read_export};
    use crate::metrics::METRICS;
    use crate::tests::test_helpers::*;
    use std::io::Write;
    use std::path::Path;

    const HEADER: &str = "Datum und Uhrzeit;Meldung;L301;Pufferbehälter Durchfluss";

    fn export_text(lines: &[String]) -> String {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push_str("\r\n");
            text.push_str(line);
        }
        text.push_str("\r\n");
        text
    }

    #[test]
    fn test_header_blank_and_placeholder_lines_are_skipped() {
        let text = export_text(&[
            export_line("10:00:00.000 01-03-2024", "20,0"),
            String::new(),
            "Meldungsende".to_string(),
            export_line("11:00:00.000 01-03-2024", "21,5"),
        ]);
        let readings = parse_export_text(&text).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].measurement.temperature, 21.5);
    }

    #[test]
    fn test_line_count_is_recorded_once_per_parse() {
        let text = export_text(&[
            export_line("10:00:00.000 01-03-2024", "20,0"),
            "Meldungsende".to_string(),
            export_line("11:00:00.000 01-03-2024", "21,5"),
        ]);
        let before = METRICS.lock().total_lines_read;
        parse_export_text(&text).unwrap();
        // Other tests share the global counters, so only a lower bound holds.
        assert!(METRICS.lock().total_lines_read >= before + 3);
    }

    #[test]
    fn test_unpadded_timestamp_aborts_the_run() {
        let text = export_text(&[
            export_line("10:00:00.000 01-03-2024", "20,0"),
            export_line("1:00:00.000 1-3-2024", "21,0"),
        ]);
        match parse_export_text(&text) {
            Err(PipelineError::Parse { row, source }) => {
                assert_eq!(row, 3);
                assert!(matches!(source, ParseError::Timestamp { .. }));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_line_aborts_with_row_number() {
        let text = export_text(&[
            export_line("10:00:00.000 01-03-2024", "20,0"),
            export_line("11:00:00.000 01-03-2024", "kaputt"),
            export_line("12:00:00.000 01-03-2024", "22,0"),
        ]);
        match parse_export_text(&text) {
            Err(PipelineError::Parse { row, source }) => {
                // Header is row 1.
                assert_eq!(row, 3);
                assert!(matches!(source, ParseError::Number { .. }));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_only_crlf_separates_records() {
        let text = format!(
            "{}\n{}",
            export_line("10:00:00.000 01-03-2024", "20,0"),
            export_line("11:00:00.000 01-03-2024", "21,0")
        );
        // A bare LF leaves both records in one line, which has too many fields.
        assert!(matches!(
            parse_export_text(&text),
            Err(PipelineError::Parse { row: 1, source: ParseError::FieldCount { .. } })
        ));
    }

    #[test]
    fn test_missing_input_is_reported() {
        assert!(matches!(read_export(Path::new("")), Err(PipelineError::MissingInput)));
        assert!(matches!(
            read_export(Path::new("/no/such/export.txt")),
            Err(PipelineError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_read_utf16_export_file() {
        let text = export_text(&[
            export_line("10:00:00.000 01-03-2024", "20,0"),
            export_line("10:00:00.000 02-03-2024", "19,0"),
        ]);
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let readings = read_export(file.path()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].date(), date(2024, 3, 2));
    }

    #[test]
    fn test_read_utf8_export_file() {
        let text = export_text(&[export_line("10:00:00.000 01-03-2024", "20,0")]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let readings = read_export(file.path()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].measurement.temperature, 20.0);
    }
}
