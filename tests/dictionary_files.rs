use std::fs;

use lexdx::builder::merge_tables;
use lexdx::formats::{DicReadOptions, EmptyRowPolicy, ReadOptions, read_table_with_options, write_frame};
use lexdx::storage::{CellValue, Invariant, TableFrame};
use lexdx::{DxError, read_table, validate, write_table};
use tempfile::TempDir;

const HONOR_DIC: &str = "\
%
1\thonor
2\tshame
%
proud\t1
disgrace\t2
reputation\t1\t2
";

#[test]
fn test_dic_to_dicx_conversion() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    let dic_path = dir.path().join("honor.dic");
    let dicx_path = dir.path().join("honor.dicx");
    fs::write(&dic_path, HONOR_DIC).unwrap();

    let table = read_table(&dic_path).unwrap();
    write_table(&table, &dicx_path).unwrap();
    assert_eq!(
        fs::read_to_string(&dicx_path).unwrap(),
        "DicTerm,honor,shame\ndisgrace,,X\nproud,X,\nreputation,X,X\n"
    );

    let back = dir.path().join("again.dic");
    write_table(&read_table(&dicx_path).unwrap(), &back).unwrap();
    assert_eq!(read_table(&back).unwrap(), table);
}

#[test]
fn test_dicx_file_round_trip_is_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("feelings.dicx");
    let table = validate(TableFrame::from_memberships(vec![
        ("sad, really", vec!["sadness"]),
        ("joy", vec!["happiness"]),
        ("bittersweet", vec!["happiness", "sadness"]),
    ]))
    .unwrap();

    write_table(&table, &path).unwrap();
    let first = fs::read(&path).unwrap();
    let reread = read_table(&path).unwrap();
    assert_eq!(reread, table);

    write_table(&reread, &path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_all_zero_row_is_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("threat.dicx");
    let mut frame = TableFrame::new(vec!["threat".to_string()]);
    frame.push_row("sad", vec![CellValue::Int(0)]);

    let err = write_frame(frame, &path).unwrap_err();
    assert_eq!(err.invariant(), Some(Invariant::NonEmptyCategories));
    assert!(!path.exists());
}

#[test]
fn test_unknown_category_id_reports_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.dic");
    fs::write(&path, "%\n1\ta\n%\nfoo\t1\nbar\t99\n").unwrap();

    match read_table(&path).unwrap_err() {
        DxError::UnknownCategory { id, term, line, .. } => {
            assert_eq!(id, 99);
            assert_eq!(term, "bar");
            assert_eq!(line, 5);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_empty_dic_rows_follow_policy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sparse.dic");
    fs::write(&path, "%\n1\ta\n%\nfoo\t1\nlonely\t\n").unwrap();

    let kept = read_table(&path).unwrap();
    assert_eq!(kept.terms(), ["foo", "lonely"]);
    assert!(kept.categories_of("lonely").unwrap().is_empty());

    let options = ReadOptions {
        dic: DicReadOptions {
            empty_rows: EmptyRowPolicy::Skip,
            ..Default::default()
        },
    };
    assert_eq!(read_table_with_options(&path, &options).unwrap().terms(), ["foo"]);
}

#[test]
fn test_unsupported_suffix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("words.txt");
    fs::write(&path, "foo\n").unwrap();
    assert!(read_table(&path).unwrap_err().is_unsupported_format());

    let table = validate(TableFrame::from_term_list("a", ["foo"])).unwrap();
    assert!(write_table(&table, dir.path().join("out.csv")).unwrap_err().is_unsupported_format());
}

#[test]
fn test_merging_files() {
    let dir = TempDir::new().unwrap();
    let honor = dir.path().join("honor.dic");
    let threat = dir.path().join("threat.dicx");
    fs::write(&honor, HONOR_DIC).unwrap();
    fs::write(&threat, "DicTerm,threat\ndisgrace,X\nwar,X\n").unwrap();

    let a = read_table(&honor).unwrap();
    let b = read_table(&threat).unwrap();
    let ab = merge_tables(&[a.clone(), b.clone()]).unwrap();
    let ba = merge_tables(&[b, a.clone()]).unwrap();
    assert_eq!(ab, ba);
    assert_eq!(ab.categories(), ["honor", "shame", "threat"]);
    assert_eq!(ab.categories_of("disgrace").unwrap(), ["shame", "threat"]);
    assert_eq!(ab.get("war", "honor"), Some(0));
    assert_eq!(merge_tables(&[a.clone()]).unwrap(), a);

    let merged_path = dir.path().join("merged.dicx");
    write_table(&ab, &merged_path).unwrap();
    assert_eq!(read_table(&merged_path).unwrap(), ab);
}

#[test]
fn test_awkward_labels_survive_both_formats() {
    let dir = TempDir::new().unwrap();
    let table = validate(TableFrame::from_memberships(vec![
        ("can't  sleep", vec!["neg emo"]),
        ("sad, really", vec!["neg emo", "%"]),
        ("say \"hi\"", vec!["DicTerm"]),
        ("ünïcödé", vec!["%", "émotion"]),
        ("100%", vec!["DicTerm"]),
        ("%%", vec![]),
    ]))
    .unwrap();

    let dicx = dir.path().join("awkward.dicx");
    write_table(&table, &dicx).unwrap();
    assert_eq!(read_table(&dicx).unwrap(), table);

    let dic = dir.path().join("awkward.dic");
    write_table(&table, &dic).unwrap();
    assert_eq!(read_table(&dic).unwrap(), table);
}

#[test]
fn test_labels_dic_cannot_carry_are_rejected() {
    for (term, category) in [(" war", "threat"), ("war", "threat "), ("%", "threat")] {
        let frame = TableFrame::from_memberships(vec![("attack", vec!["threat"]), (term, vec![category])]);
        assert!(validate(frame).unwrap_err().is_schema_error(), "{:?}/{:?}", term, category);
    }
}
