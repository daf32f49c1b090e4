use super::{id, unit};
use crate::index::{EntryAnnotations, MethodInfo, SourceIndex};
use crate::reverse::ReverseIndex;
use crate::tests::graph;

#[test]
fn records_parameters_and_entry_points() {
    let mut index = SourceIndex::default();
    index.add_unit(
        &unit(
            r#"class Api {
  @org.springframework.web.bind.annotation.GetMapping("/a")
  public String a(String q) { return q; }
  @PostMapping
  public void b() {}
  @Override
  public String toString() { return ""; }
  @GET @Path("/c")
  public void c(int n) {}
}"#,
        ),
        &EntryAnnotations::default(),
    );
    let info = |s: &str| index.method_info(&id(s));
    assert_eq!(
        info("Api:a"),
        MethodInfo {
            has_parameters: true,
            is_entry_point: true
        }
    );
    assert_eq!(
        info("Api:b"),
        MethodInfo {
            has_parameters: false,
            is_entry_point: true
        }
    );
    assert!(!info("Api:toString").is_entry_point);
    assert!(info("Api:c").is_entry_point);
    assert_eq!(index.entry_point_count(), 3);
    assert_eq!(index.entry_points(), [id("Api:a"), id("Api:b"), id("Api:c")]);
}

#[test]
fn unknown_lookups_are_permissive() {
    let index = SourceIndex::default();
    assert_eq!(index.method_info(&id("Nope:nothing")), MethodInfo::UNKNOWN);
    assert!(MethodInfo::UNKNOWN.has_parameters);
    assert!(!MethodInfo::UNKNOWN.is_entry_point);
}

#[test]
fn custom_entry_annotations_replace_the_defaults() {
    let mut index = SourceIndex::default();
    let entry = EntryAnnotations::new(["com.acme.RpcHandler"]);
    index.add_unit(
        &unit("class R { @RpcHandler void h(String s) {} @GetMapping void g(String s) {} }"),
        &entry,
    );
    assert!(index.method_info(&id("R:h")).is_entry_point);
    assert!(!index.method_info(&id("R:g")).is_entry_point);
}

#[test]
fn later_declarations_overwrite() {
    let mut index = SourceIndex::default();
    let entry = EntryAnnotations::default();
    let mut first = unit("class Dup { void a(String s) {} void f() {} void f(int x) {} }");
    first.file_path = "a/Dup.java".into();
    let mut second = unit("class Dup { void b() {} } enum Other { X; void o() {} }");
    second.file_path = "b/Dup.java".into();

    index.add_unit(&first, &entry);
    assert!(index.method_info(&id("Dup:f")).has_parameters, "last overload wins");
    index.add_unit(&second, &entry);

    assert_eq!(index.type_count(), 2);
    assert_eq!(index.file_of("Dup"), Some("b/Dup.java"));
    assert_eq!(index.method_count(), 2);
    // gone with the replaced record, so it falls back to the permissive answer
    assert_eq!(index.method_info(&id("Dup:a")), MethodInfo::UNKNOWN);
    assert_eq!(index.type_names().collect::<Vec<_>>(), ["Dup", "Other"]);
}

#[test]
fn reverse_index_deduplicates_and_rebuilds_identically() {
    let g = graph(&[
        ("A:a", "S:s"),
        ("A:a", "S:s"),
        ("B:b", "S:s"),
        ("B:b", "A:a"),
    ]);
    let reverse = ReverseIndex::build(&g);
    let callers: Vec<String> = reverse.callers(&id("S:s")).map(ToString::to_string).collect();
    assert_eq!(callers, ["A:a", "B:b"]);
    assert_eq!(reverse.callers(&id("Z:z")).count(), 0);
    assert_eq!(reverse.len(), 2);
    assert_eq!(ReverseIndex::build(&g), reverse);
}
