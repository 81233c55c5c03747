use serde_json::json;
use std::fs;
use tempfile::TempDir;

use workflow_context::config::FixedVersionProbe;
use workflow_context::{Contents, Error, MemoryStore, ResultItem, ResultsOverride, Workflow};

struct Fixture {
    home: TempDir,
    working: TempDir,
    store: MemoryStore,
}

impl Fixture {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        for parent in [
            "Library/Caches/com.runningwithcrayons.Alfred-3/Workflow Data",
            "Library/Application Support/Alfred 3/Workflow Data",
        ] {
            fs::create_dir_all(home.path().join(parent)).unwrap();
        }
        Self {
            home,
            working: TempDir::new().unwrap(),
            store: MemoryStore::new(),
        }
    }

    fn workflow(&self) -> Workflow {
        Workflow::builder()
            .home(self.home.path())
            .working_dir(self.working.path())
            .probe(FixedVersionProbe(Some(3)))
            .store(self.store.clone())
            .bundle_id("com.example.integration")
            .build()
            .unwrap()
    }
}

#[test]
fn test_cache_and_data_are_versioned() {
    let fx = Fixture::new();
    let wf = fx.workflow();

    assert_eq!(wf.host_version(), 3);
    assert!(wf
        .cache_path()
        .unwrap()
        .to_string_lossy()
        .contains("com.runningwithcrayons.Alfred-3"));
    assert!(wf
        .data_path()
        .unwrap()
        .to_string_lossy()
        .contains("Application Support/Alfred 3"));
}

#[test]
fn test_persist_settings_and_files() {
    let fx = Fixture::new();
    let wf = fx.workflow();

    let settings = wf.resolve_path("data", "settings.plist").unwrap();
    wf.set_values(&settings, [("theme", "dark"), ("limit", "20")]);
    assert_eq!(wf.get_value(&settings, "limit").unwrap(), "20");
    assert_eq!(fx.store.writes().len(), 2);

    let cache = wf.resolve_path("cache", "results.json").unwrap();
    let data = json!([{"title": "a"}, {"title": "b"}]);
    let written = wf.atomic_write(&cache, data.clone(), Some("partial")).unwrap();
    assert!(written > 0);
    assert_eq!(wf.read_file(&cache).unwrap(), Contents::Json(data));
}

#[test]
fn test_feedback_document() {
    let fx = Fixture::new();
    let mut wf = fx.workflow();

    wf.add_result(
        ResultItem::new("Foo", "Launch Foo", "fileicon:/Applications/Foo.app")
            .uid("foo")
            .arg("/Applications/Foo.app")
            .kind("file"),
    );
    wf.add_result(
        ResultItem::new("Search", "Keep typing", "icon.png")
            .valid(false)
            .autocomplete(""),
    );

    let xml = wf.render_xml(None).unwrap();
    assert_eq!(
        xml,
        concat!(
            r#"<?xml version="1.0"?><items>"#,
            r#"<item uid="foo" arg="/Applications/Foo.app" valid="yes" type="file">"#,
            r#"<arg>/Applications/Foo.app</arg><title>Foo</title><subtitle>Launch Foo</subtitle>"#,
            r#"<icon type="fileicon">/Applications/Foo.app</icon></item>"#,
            r#"<item valid="no" autocomplete=""><title>Search</title><subtitle>Keep typing</subtitle>"#,
            r#"<icon>icon.png</icon></item>"#,
            r#"</items>"#,
        )
    );
}

#[test]
fn test_raw_override_with_extra_fields() {
    let fx = Fixture::new();
    let wf = fx.workflow();

    let item = json!({"title": "T", "subtitle": "S", "icon": "i", "valid": "no", "mods": "cmd"});
    let raw = match item {
        serde_json::Value::Object(map) => vec![map],
        _ => unreachable!(),
    };

    let xml = wf.render_xml(Some(ResultsOverride::Raw(raw))).unwrap();
    assert!(xml.contains(r#"<item valid="no">"#));
    assert!(xml.contains("<icon>i</icon><mods>cmd</mods></item>"));
}

#[test]
fn test_invalid_locations() {
    let fx = Fixture::new();
    let wf = fx.workflow();

    assert!(matches!(
        wf.resolve_path("library", "x"),
        Err(Error::InvalidBase(_))
    ));
    assert!(matches!(wf.resolve_path("data", ""), Err(Error::EmptyName)));
}
