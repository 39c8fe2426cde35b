use gloss_core::hosts::{clean_lines, strip_color_tags, DecompilerHost, JsonDumpHost};

const DUMP: &str = r#"{
  "functions": {
    "sub_1000": { "address": 4096, "lines": ["void sub_1000(void)", "{", "  return;", "}"] },
    "sub_2000": { "address": 8192, "lines": [] }
  }
}"#;

#[test]
fn dump_host_resolves_symbols_and_decompiles() {
    let host = JsonDumpHost::from_json_str(DUMP).expect("parse dump");
    assert_eq!(host.len(), 2);

    let address = host.address_of("sub_1000").expect("known symbol");
    assert_eq!(address, 4096);
    assert!(host.address_of("sub_9999").is_none());

    let function = host.function_at(address).expect("function at address");
    assert_eq!(function.name, "sub_1000");
    assert!(host.function_at(1).is_none());

    let lines = host.decompile(&function).expect("decompile");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "void sub_1000(void)");
}

#[test]
fn dump_host_loads_from_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dump.json");
    std::fs::write(&path, DUMP).unwrap();

    let host = JsonDumpHost::from_path(&path).expect("load dump");
    assert_eq!(host.address_of("sub_2000"), Some(8192));
}

#[test]
fn invalid_dump_json_is_a_tool_error() {
    let err = JsonDumpHost::from_json_str("not json").unwrap_err();
    assert!(err.to_string().contains("failed to parse dump JSON"));
}

#[test]
fn color_tags_are_stripped_and_escapes_preserved() {
    assert_eq!(strip_color_tags("\u{1}Xvoid\u{2}X sub_1000()"), "void sub_1000()");
    // 0x03 escapes the following character, which survives literally.
    assert_eq!(strip_color_tags("a\u{3}\u{1}b"), "a\u{1}b");
    assert_eq!(strip_color_tags("plain line"), "plain line");
}

#[test]
fn clean_lines_strips_tags_and_drops_blanks() {
    let host = JsonDumpHost::from_json_str(DUMP).unwrap();
    let raw = vec![
        "\u{1}Xint x;\u{2}X".to_string(),
        String::new(),
        "   ".to_string(),
        "return x;".to_string(),
    ];
    assert_eq!(clean_lines(&host, &raw), vec!["int x;".to_string(), "return x;".to_string()]);
}
