// tests/dataset_store.rs
//
// Persisted dataset format, strict loading, and merge rules.
mod common;

use std::fs;

use bulletin_scrape::data::{Dataset, Record};
use bulletin_scrape::error::Error;
use bulletin_scrape::store::{load_dataset, parse_dataset, render_dataset, save_dataset};
use common::month;
use tempfile::tempdir;

const HEADER: &str = "Calendar Date,PD Date,Time Difference (months)\n";

fn s(v: &str) -> String { v.to_string() }

fn sample() -> Dataset {
    let mut ds = Dataset::new();
    // Inserted out of order on purpose.
    ds.insert_new(Record::new(month(2017, 2), month(2015, 6)));
    ds.insert_new(Record::new(month(2016, 12), month(2017, 3)));
    ds.insert_new(Record::new(month(2017, 1), month(2015, 5)));
    ds
}

#[test]
fn writes_header_and_ascending_rows() {
    let text = String::from_utf8(render_dataset(&sample())).unwrap();
    assert_eq!(
        text,
        format!("{HEADER}2016-12,2017-03,-3\n2017-01,2015-05,20\n2017-02,2015-06,20\n")
    );
}

#[test]
fn save_then_load_round_trips_exactly() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("dates.csv");
    let ds = sample();

    save_dataset(&path, &ds).unwrap();
    let loaded = load_dataset(&path).unwrap();
    assert_eq!(loaded, ds);

    let before = fs::read(&path).unwrap();
    save_dataset(&path, &loaded).unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);

    // No temp files left behind.
    let names: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn missing_or_empty_file_is_empty_dataset() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("dates.csv");
    assert!(load_dataset(&path).unwrap().is_empty());

    fs::write(&path, "").unwrap();
    assert!(load_dataset(&path).unwrap().is_empty());

    fs::write(&path, HEADER).unwrap();
    assert!(load_dataset(&path).unwrap().is_empty());
}

#[test]
fn reads_crlf_files() {
    let text = "Calendar Date,PD Date,Time Difference (months)\r\n2023-01,2013-10,111\r\n";
    let ds = parse_dataset(text, "x.csv".as_ref()).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.get(month(2023, 1)).unwrap().elapsed_months(), 111);
}

#[test]
fn padded_header_and_rows_are_read_alike() {
    let text = "Calendar Date, PD Date, Time Difference (months)\n2016-01, 2014-01, 24\n";
    let ds = parse_dataset(text, "x.csv".as_ref()).unwrap();
    assert_eq!(ds.get(month(2016, 1)).unwrap().elapsed_months(), 24);

    let wrong = "Calendar Date, PD, Time Difference (months)\n";
    assert!(matches!(
        parse_dataset(wrong, "x.csv".as_ref()),
        Err(Error::CorruptDataset { line: 1, .. })
    ));
}

#[test]
fn corrupt_files_are_fatal() {
    let cases: Vec<(String, usize)> = vec![
        (s("Date,PD,Diff\n2023-01,2013-10,111\n"), 1),
        (format!("{HEADER}2023-01,2013-10\n"), 2),
        (format!("{HEADER}2023-1,2013-10,111\n"), 2),
        (format!("{HEADER}2023-01,2013-10,lots\n"), 2),
        (format!("{HEADER}2023-01,2013-10,110\n"), 2),
        (format!("{HEADER}2023-01,2013-10,111\n2023-02,2013-10,112\n2023-01,2013-10,111\n"), 4),
    ];
    for (text, want_line) in cases {
        match parse_dataset(&text, "x.csv".as_ref()) {
            Err(Error::CorruptDataset { line, .. }) => assert_eq!(line, want_line, "{text:?}"),
            other => panic!("expected CorruptDataset for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn unreadable_dataset_is_fatal() {
    let tmp = tempdir().unwrap();
    // A directory where the file should be.
    let path = tmp.path().join("dates.csv");
    fs::create_dir(&path).unwrap();
    assert!(matches!(load_dataset(&path), Err(Error::DatasetRead { .. })));
}

#[test]
fn merge_only_adds_unknown_months() {
    let mut ds = sample();
    let fresh = vec![
        Record::new(month(2017, 3), month(2015, 7)),
        // Already present with a different PD date: existing row wins.
        Record::new(month(2017, 1), month(2010, 1)),
    ];
    let stats = ds.merge(fresh.clone());
    assert_eq!((stats.added, stats.ignored), (1, 1));
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.get(month(2017, 1)).unwrap().priority_date(), month(2015, 5));

    let snapshot = ds.clone();
    let again = ds.merge(fresh);
    assert_eq!(again.added, 0);
    assert_eq!(ds, snapshot);

    let keys: Vec<_> = ds.iter().map(|r| r.calendar()).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn record_rejects_inconsistent_gap() {
    assert!(Record::from_parts(month(2023, 1), month(2013, 10), 111).is_ok());
    assert!(Record::from_parts(month(2023, 1), month(2013, 10), 0).is_err());
    assert_eq!(Record::new(month(2015, 1), month(2020, 1)).elapsed_months(), -60);
}
