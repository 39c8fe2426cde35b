use gloss_core::hosts::{DecompilerHost, FunctionHandle, HostError, HostRegistry, JsonDumpHost};
use gloss_core::model::{CombinedPseudocode, FunctionReference, PseudocodeDocument};

#[test]
fn version_matches_manifest() {
    assert_eq!(gloss_core::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn combined_document_renders_primary_first() {
    let mut combined = CombinedPseudocode::new("void sub_500(void)\n{\n}");
    combined.push_helper(
        FunctionReference::new("sub_1000"),
        PseudocodeDocument::from_cleaned_lines(vec![
            "void sub_1000(void)".to_string(),
            "{".to_string(),
            "}".to_string(),
        ]),
    );

    let rendered = combined.render();
    assert!(rendered.starts_with("void sub_500(void)"));
    assert!(rendered.contains("\n\n// Function: sub_1000\nvoid sub_1000(void)"));
}

#[test]
fn blank_lines_never_survive_document_construction() {
    let doc = PseudocodeDocument::from_cleaned_lines(vec![
        String::new(),
        "int x;".to_string(),
        "  ".to_string(),
    ]);
    assert_eq!(doc.text(), "int x;");
    assert_eq!(doc.lines().len(), 1);
    assert!(!doc.is_empty());

    let empty = PseudocodeDocument::from_cleaned_lines(vec!["   ".to_string()]);
    assert!(empty.is_empty());
}

struct NullHost;

impl DecompilerHost for NullHost {
    fn address_of(&self, _symbol: &str) -> Option<u64> {
        None
    }

    fn function_at(&self, _address: u64) -> Option<FunctionHandle> {
        None
    }

    fn decompile(&self, function: &FunctionHandle) -> Result<Vec<String>, HostError> {
        Err(HostError::Decompile(function.address))
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

#[test]
fn host_registry_registers_and_resolves_by_name() {
    let mut registry = HostRegistry::new();
    registry.register(NullHost);
    registry.register(JsonDumpHost::from_json_str("{}").unwrap());

    assert!(registry.get("null").is_some());
    assert!(registry.get("json").is_some());
    assert!(registry.get("ida").is_none());
    assert_eq!(registry.names(), vec!["json".to_string(), "null".to_string()]);
}
