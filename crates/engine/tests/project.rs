use engine::{BuildOptions, Project, RuleSet, Session, Vulnerability};
use ir::MethodId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn workspace() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn webapp() -> PathBuf {
    workspace().join("fixtures/java/webapp")
}

fn rules() -> RuleSet {
    loader::load_rules(&workspace().join("rules/rules.json")).unwrap()
}

fn chains_of(v: &Vulnerability) -> Vec<Vec<String>> {
    v.call_chains
        .iter()
        .map(|c| c.iter().map(ToString::to_string).collect())
        .collect()
}

fn find<'a>(found: &'a [Vulnerability], sink: &str) -> Option<&'a Vulnerability> {
    found.iter().find(|v| v.sink.to_string() == sink)
}

#[test]
fn build_counts_every_file_outcome() {
    let session = Session::new(rules());
    let summary = session.build_graph(&webapp()).unwrap();
    assert_eq!(summary.total_files, 7);
    assert_eq!(summary.parsed_files, 4);
    assert_eq!(summary.error_files, 1);
    assert_eq!(summary.skipped_files, 1);
    assert_eq!(summary.total_classes, 4);

    let project = session.project(&webapp()).unwrap();
    let stats = project.stats();
    assert_eq!(stats.excluded_files, 1);
    assert_eq!(
        stats.skipped_file_list,
        ["module/src/main/resources/template/Gen.java"]
    );
    assert_eq!(stats.error_file_list.len(), 1);
    assert_eq!(
        stats.error_file_list[0].file,
        "src/main/java/com/acme/Broken.java"
    );
    assert!(stats.error_file_list[0].error.contains("syntax error"));
}

#[test]
fn traces_each_sink_back_to_its_endpoint() {
    let session = Session::new(rules());
    let response = session.find_vulnerabilities(&webapp(), &[]).unwrap();
    let found = &response.vulnerabilities;

    let rce = find(found, "Runtime:exec").expect("command injection chain");
    assert_eq!(rce.vul_type, "RCE");
    assert_eq!(rce.severity.to_string(), "CRITICAL");
    assert_eq!(
        chains_of(rce),
        [["UserController:ping", "UserService:ping", "Runtime:exec"]]
    );
    assert!(rce.hydrated_chains.is_none());

    let sqli = find(found, "Statement:executeQuery").expect("sql injection chain");
    assert_eq!(
        chains_of(sqli),
        [[
            "UserController:search",
            "UserService:findByName",
            "UserDao:query",
            "Statement:executeQuery"
        ]]
    );

    let path = find(found, "Files:readAllBytes").expect("path traversal chain");
    assert_eq!(path.vul_type, "PATH_TRAVERSAL");
    assert_eq!(
        chains_of(path),
        [[
            "ReportResource:download",
            "ReportResource:readReport",
            "Files:readAllBytes"
        ]]
    );

    // the probe endpoint lives under src/test and is never indexed
    assert!(found
        .iter()
        .flat_map(|v| v.call_chains.iter())
        .all(|c| c.entry().map(|e| e.type_name.as_str()) != Some("UserControllerTest")));

    assert_eq!(response.total_vulnerabilities, 3);
    assert_eq!(response.total_chains, 3);
    // catalog order: RCE, SQLI, PATH_TRAVERSAL
    let kinds: Vec<&str> = found.iter().map(|v| v.vul_type.as_str()).collect();
    assert_eq!(kinds, ["RCE", "SQLI", "PATH_TRAVERSAL"]);
}

#[test]
fn rule_filter_and_depth_override() {
    let session = Session::new(rules());
    let only_rce = session
        .find_vulnerabilities(&webapp(), &["RCE".to_string()])
        .unwrap();
    assert_eq!(only_rce.total_vulnerabilities, 1);
    assert_eq!(only_rce.vulnerabilities[0].vul_type, "RCE");

    let shallow = Session::new(rules()).with_max_depth(2);
    let found = shallow.find_vulnerabilities(&webapp(), &[]).unwrap();
    assert!(find(&found.vulnerabilities, "Statement:executeQuery").is_none());
    assert!(find(&found.vulnerabilities, "Runtime:exec").is_some());
    assert_eq!(shallow.list_rules(None).depth, 2);

    let unknown = session
        .find_vulnerabilities(&webapp(), &["NOPE".to_string()])
        .unwrap();
    assert_eq!(unknown.total_vulnerabilities, 0);
}

#[test]
fn hydrated_scan_attaches_method_sources() {
    let session = Session::new(rules());
    let response = session
        .scan(&webapp(), &["RCE".to_string()], true)
        .unwrap();
    let rce = &response.vulnerabilities[0];
    let hydrated = rce.hydrated_chains.as_ref().expect("hydrated chains");
    assert_eq!(hydrated.len(), rce.call_chains.len());

    let chain = &hydrated[0].chain;
    assert_eq!(chain.len(), 3);
    let service = &chain[1];
    assert_eq!(service.function, MethodId::new("UserService", "ping"));
    assert_eq!(
        service.file_path.as_deref(),
        Some("src/main/java/com/acme/service/UserService.java")
    );
    assert_eq!(service.line, Some(14));
    let code = service.code.as_deref().unwrap();
    assert!(code.contains("Runtime.getRuntime().exec"));
    assert!(code.trim_end().ends_with('}'));

    // library sinks have no source in the project
    assert!(!chain[2].found());
    assert_eq!(chain[2].file_path, None);
}

#[test]
fn extract_method_reports_misses_without_failing() {
    let session = Session::new(rules());
    let root = webapp();
    let found = session
        .extract_method(&root, "ReportResource", "readReport")
        .unwrap();
    assert!(found.found());
    assert!(found.code.unwrap().contains("Files.readAllBytes"));

    let missing = session.extract_method(&root, "UserDao", "delete").unwrap();
    assert!(!missing.found());
    assert_eq!(
        missing.file_path.as_deref(),
        Some("src/main/java/com/acme/repo/UserDao.java")
    );

    let chain = [
        MethodId::new("UserController", "search"),
        MethodId::new("Nowhere", "run"),
    ];
    let hydrated = session.hydrate_chain(&root, &chain).unwrap();
    assert!(hydrated.chain[0].found());
    assert!(!hydrated.chain[1].found());
}

#[test]
fn statistics_describe_the_built_project() {
    let session = Session::new(rules());
    let stats = session.get_statistics(&webapp()).unwrap();
    assert_eq!(stats.total_classes, 4);
    assert_eq!(stats.total_methods, 9);
    assert_eq!(stats.entry_points, 4);
    assert_eq!(stats.unresolved_edges, 0);
    assert_eq!(stats.error_files, 1);
    assert_eq!(stats.errors.len(), 1);
    assert_eq!(
        stats.classes_with_methods,
        ["ReportResource", "UserDao", "UserService", "UserController"]
    );
}

#[test]
fn rule_listing_filters_by_name() {
    let session = Session::new(rules());
    let all = session.list_rules(None);
    assert_eq!(all.total_rules, session.rules().sink_rules.len());
    assert_eq!(all.depth, 8);
    let sqli = session.list_rules(Some("SQLI"));
    assert_eq!(sqli.total_rules, 1);
    assert_eq!(sqli.rules[0].sink_name, "SQLI");
    assert_eq!(session.list_rules(Some("nope")).total_rules, 0);
}

#[test]
fn session_reuses_and_replaces_builds() {
    let session = Session::new(rules());
    let root = webapp();
    let first = session.project(&root).unwrap();
    let again = session.project(&root.join("src/..")).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    session.build_graph(&root).unwrap();
    let rebuilt = session.project(&root).unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));

    assert!(session.invalidate(&root));
    assert!(!session.invalidate(&root));
}

#[test]
fn unit_cache_skips_unchanged_files() {
    let cache = TempDir::new().unwrap();
    let cold = Session::new(rules()).with_unit_cache_dir(cache.path());
    let project = cold.project(&webapp()).unwrap();
    assert_eq!(project.stats().parser.files_parsed, 4);
    assert_eq!(project.stats().parser.cache_hits, 0);

    let warm = Session::new(rules()).with_unit_cache_dir(cache.path());
    let project = warm.project(&webapp()).unwrap();
    assert_eq!(project.stats().parser.cache_hits, 4);
    assert_eq!(project.stats().parser.files_parsed, 0);
    assert_eq!(project.graph().edge_count(), cold.project(&webapp()).unwrap().graph().edge_count());
}

#[test]
fn missing_project_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = Project::build(&tmp.path().join("absent"), &BuildOptions::default()).unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}

#[test]
fn scratch_project_uses_custom_entry_annotations() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src/rpc");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(
        src.join("Handler.java"),
        r#"package rpc;
public class Handler {
    @RpcMethod
    public void handle(String payload) throws Exception {
        new ObjectInputStream(open(payload)).readObject();
    }
}
"#,
    )
    .unwrap();
    let mut catalog = rules();
    catalog.entry_annotations = Some(vec!["RpcMethod".into()]);
    let session = Session::new(catalog);
    let found = session.find_vulnerabilities(tmp.path(), &[]).unwrap();
    assert_eq!(found.total_vulnerabilities, 1);
    let v = &found.vulnerabilities[0];
    assert_eq!(v.vul_type, "DESERIALIZATION");
    assert_eq!(chains_of(v), [["Handler:handle", "ObjectInputStream:readObject"]]);
}
