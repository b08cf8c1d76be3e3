use anyhow::{Context, Result};
use magam_core::AssignmentRecord;
use std::io::Write;

/// Write every record as one CSV row; headers come from the record fields.
pub fn write_csv<W: Write>(records: &[AssignmentRecord], out: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    for r in records {
        w.serialize(r).context("serialize record")?;
    }
    w.flush().context("flush csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use magam_core::EventType;

    #[test]
    fn test_csv_has_header_and_rows() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
        let records = vec![
            AssignmentRecord::new("a1", "자료구조 과제 3", EventType::Assignment, date)
                .with_window(end_of_day, end_of_day),
            AssignmentRecord::new("a2", "기말고사", EventType::Exam, date),
        ];

        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,title,event_type,date,start_time,end_time,priority,difficulty,estimated_hours,description"
        );
        assert_eq!(lines.clone().count(), 2);
        assert!(out.contains("자료구조 과제 3"));
        assert!(out.contains("assignment"));
        assert!(out.contains("2024-12-25"));
        assert!(out.contains("23:59:00"));
    }

    #[test]
    fn test_multiline_description_is_quoted() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let records = vec![
            AssignmentRecord::new("a1", "과제", EventType::Assignment, date)
                .with_description("배점: 100점\n제출 장소: 온라인"),
        ];

        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("\"배점: 100점\n제출 장소: 온라인\""));
    }
}
