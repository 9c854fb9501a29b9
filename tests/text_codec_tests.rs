//! Text Codec Tests
//!
//! Tests verify:
//! - Line parsing (comments, blanks, malformed ids)
//! - Keys that cannot be stored are dropped as malformed
//! - High-water mark recovery from the largest id
//! - Save/load through files, including file creation

use std::fs;

use tagdict::codec::text::{parse_line, read, Line};
use tagdict::{Dict16, Dict8, DictError, MAX_KEY_LEN, RECORD_SEPARATOR};
use tempfile::TempDir;

// =============================================================================
// Line Parsing Tests
// =============================================================================

#[test]
fn test_parse_entry() {
    assert_eq!(
        parse_line::<u16>("12;some key"),
        Line::Entry(12, "some key".to_string())
    );
}

#[test]
fn test_parse_key_keeps_semicolons_and_spaces() {
    assert_eq!(
        parse_line::<u16>("  3;a;b; c "),
        Line::Entry(3, "a;b; c ".to_string())
    );
}

#[test]
fn test_parse_ignored_lines() {
    assert_eq!(parse_line::<u16>(""), Line::Ignored);
    assert_eq!(parse_line::<u16>("   "), Line::Ignored);
    assert_eq!(parse_line::<u16>("# 1;commented"), Line::Ignored);
    assert_eq!(parse_line::<u16>("  #indented comment"), Line::Ignored);
}

#[test]
fn test_parse_malformed_lines() {
    assert_eq!(parse_line::<u16>("no separator"), Line::Malformed);
    assert_eq!(parse_line::<u16>(";missing id"), Line::Malformed);
    assert_eq!(parse_line::<u16>("abc;bad id"), Line::Malformed);
    assert_eq!(parse_line::<u16>("-1;negative"), Line::Malformed);
    assert_eq!(parse_line::<u16>("0;zero id"), Line::Malformed);
    assert_eq!(parse_line::<u16>("5;"), Line::Malformed);
}

#[test]
fn test_parse_id_must_fit_width() {
    assert_eq!(parse_line::<u8>("255;max"), Line::Entry(255, "max".to_string()));
    assert_eq!(parse_line::<u8>("256;overflow"), Line::Malformed);
    assert_eq!(parse_line::<u16>("65536;overflow"), Line::Malformed);
    assert_eq!(
        parse_line::<u32>("65536;fits"),
        Line::Entry(65536, "fits".to_string())
    );
}

#[test]
fn test_parse_unstorable_keys_are_malformed() {
    let sep = format!("1;a{}b", RECORD_SEPARATOR as char);
    assert_eq!(parse_line::<u16>(&sep), Line::Malformed);
    assert_eq!(parse_line::<u16>("1;cr\rinside"), Line::Malformed);

    let max = format!("1;{}", "k".repeat(MAX_KEY_LEN));
    assert!(matches!(parse_line::<u16>(&max), Line::Entry(1, _)));
    let too_long = format!("1;{}", "k".repeat(MAX_KEY_LEN + 1));
    assert_eq!(parse_line::<u16>(&too_long), Line::Malformed);
}

// =============================================================================
// Reader Tests
// =============================================================================

#[test]
fn test_read_skips_bad_lines_and_recovers_high_water() {
    let input = "\
# header
1;first

7;seventh
oops
3;third
x;bad
";
    let records = read::<u16, _>(input.as_bytes()).unwrap();

    assert_eq!(records.last_id, 7);
    assert_eq!(
        records.entries,
        vec![
            (1, "first".to_string()),
            (7, "seventh".to_string()),
            (3, "third".to_string()),
        ]
    );
}

#[test]
fn test_read_text_into_dictionary() {
    let dict = Dict16::new();
    let count = dict.read_text("2;b\n1;a\n".as_bytes()).unwrap();

    assert_eq!(count, 2);
    assert_eq!(dict.get_key(1).as_deref(), Some("a"));
    assert_eq!(dict.get_key(2).as_deref(), Some("b"));
    assert_eq!(dict.get_id("c").unwrap(), 3);
}

#[test]
fn test_read_text_gap_in_ids() {
    let dict = Dict16::new();
    dict.read_text("10;ten\n".as_bytes()).unwrap();

    assert_eq!(dict.last_id(), 10);
    assert_eq!(dict.get_id("eleven").unwrap(), 11);
}

#[test]
fn test_read_text_duplicates_keep_bijection() {
    let dict = Dict16::new();
    dict.read_text("1;a\n1;b\n2;b\n".as_bytes()).unwrap();

    // "1;b" replaced "1;a", then "2;b" took "b" away from id 1
    assert_eq!(dict.count(), 1);
    assert_eq!(dict.get_key(1), None);
    assert_eq!(dict.get_key(2).as_deref(), Some("b"));
    assert_eq!(dict.find_id("a"), None);
}

#[test]
fn test_read_text_handles_crlf() {
    let dict = Dict16::new();
    dict.read_text("1;windows\r\n2;line\r\n".as_bytes()).unwrap();
    assert_eq!(dict.get_key(1).as_deref(), Some("windows"));
    assert_eq!(dict.get_key(2).as_deref(), Some("line"));
}

#[test]
fn test_read_text_separator_key_survives_marshal() {
    let dict = Dict16::new();
    let input = format!("1;a{}b\n2;next\n", RECORD_SEPARATOR as char);
    assert_eq!(dict.read_text(input.as_bytes()).unwrap(), 1);

    let restored = Dict16::from_bytes(&dict.marshal()).unwrap();
    assert_eq!(restored.all(), dict.all());
    assert_eq!(restored.get_key(2).as_deref(), Some("next"));
    assert_eq!(restored.get_key(1), None);
    assert_eq!(restored.last_id(), 2);
}

// =============================================================================
// Writer Tests
// =============================================================================

#[test]
fn test_write_text_sorted_with_header() {
    let dict = Dict16::new();
    dict.get_ids(&["one", "two", "three"]).unwrap();

    let mut out = Vec::new();
    dict.write_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with('#'));
    assert_eq!(&lines[1..], &["1;one", "2;two", "3;three"]);
}

#[test]
fn test_write_then_read() {
    let dict = Dict8::new();
    dict.get_ids(&["a", "b b", "c;c"]).unwrap();

    let mut out = Vec::new();
    dict.write_text(&mut out).unwrap();

    let restored = Dict8::new();
    restored.read_text(out.as_slice()).unwrap();
    assert_eq!(restored.all(), dict.all());
    assert_eq!(restored.last_id(), 3);
}

#[test]
fn test_line_break_keys_never_reach_the_file() {
    let dict = Dict16::new();
    assert!(matches!(
        dict.get_id("line1\n2;injected"),
        Err(DictError::InvalidKey(_))
    ));
    assert!(matches!(dict.get_id("cr\r"), Err(DictError::InvalidKey(_))));

    let id = dict.get_id("line1").unwrap();
    assert!(matches!(
        dict.rename_id(id, "line1\n2;injected"),
        Err(DictError::InvalidKey(_))
    ));

    let mut out = Vec::new();
    dict.write_text(&mut out).unwrap();

    let restored = Dict16::new();
    assert_eq!(restored.read_text(out.as_slice()).unwrap(), 1);
    assert_eq!(restored.all(), dict.all());
    assert_eq!(restored.find_id("injected"), None);
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_save_and_load_text_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dict.txt");

    let dict = Dict16::new();
    let hello = dict.get_id("hello world!").unwrap();
    let bye = dict.get_id("good bye!").unwrap();
    dict.rename_id(hello, "new_key").unwrap();
    dict.save_text_file(&path).unwrap();

    let loaded = Dict16::new();
    assert_eq!(loaded.load_text_file(&path).unwrap(), 2);
    assert_eq!(loaded.get_key(bye).as_deref(), Some("good bye!"));
    assert_eq!(loaded.get_key(hello).as_deref(), Some("new_key"));
}

#[test]
fn test_load_text_file_creates_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.txt");

    let dict = Dict16::new();
    assert_eq!(dict.load_text_file(&path).unwrap(), 0);
    assert!(path.exists());
    assert!(dict.is_empty());
}

#[test]
fn test_save_text_file_overwrites() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dict.txt");
    fs::write(&path, "1;stale\n2;stale too\n3;and more stale data\n").unwrap();

    let dict = Dict16::new();
    dict.get_id("fresh").unwrap();
    dict.save_text_file(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("stale"));
    assert!(contents.contains("1;fresh"));
}

#[test]
fn test_load_text_file_hand_edited() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dict.txt");
    fs::write(&path, "# tags\n1;red\n2;green\n\nnot a line\n4;blue\n").unwrap();

    let dict = Dict16::new();
    assert_eq!(dict.load_text_file(&path).unwrap(), 3);
    assert_eq!(dict.get_id("blue").unwrap(), 4);
    assert_eq!(dict.get_id("yellow").unwrap(), 5);
}
