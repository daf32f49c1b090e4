use crate::{to_markdown, write_report, Format, ScanInfo};
use engine::{HydratedChain, MethodSource, TaintChain, Vulnerability};
use ir::MethodId;
use loader::Severity;

fn id(s: &str) -> MethodId {
    s.parse().unwrap()
}

fn sample(hydrated: bool) -> Vec<Vulnerability> {
    let chain = TaintChain(vec![
        id("UserController:ping"),
        id("UserService:ping"),
        id("Runtime:exec"),
    ]);
    let hydrated_chains = hydrated.then(|| {
        vec![HydratedChain {
            chain: vec![
                MethodSource {
                    function: id("UserController:ping"),
                    file_path: Some("web/UserController.java".into()),
                    line: Some(12),
                    code: Some("public String ping(String host) {\n    return svc.ping(host);\n}\n".into()),
                },
                MethodSource {
                    function: id("UserService:ping"),
                    file_path: Some("service/UserService.java".into()),
                    line: Some(14),
                    code: Some("public String ping(String host) {\n    Runtime.getRuntime().exec(host);\n}\n".into()),
                },
                MethodSource {
                    function: id("Runtime:exec"),
                    file_path: None,
                    line: None,
                    code: None,
                },
            ],
        }]
    });
    vec![Vulnerability {
        vul_type: "RCE".into(),
        sink_desc: "Command execution".into(),
        severity: Severity::Critical,
        sink: id("Runtime:exec"),
        call_chains: vec![chain],
        chain_count: 1,
        hydrated_chains,
    }]
}

fn render(found: &[Vulnerability], fmt: Format, info: Option<&ScanInfo>) -> String {
    let mut buf = Vec::new();
    write_report(&mut buf, found, fmt, info).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn json_carries_totals_and_chains() {
    let rendered = render(&sample(false), Format::Json, None);
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["total_vulnerabilities"], 1);
    assert_eq!(value["total_chains"], 1);
    let v = &value["vulnerabilities"][0];
    assert_eq!(v["vul_type"], "RCE");
    assert_eq!(v["severity"], "CRITICAL");
    assert_eq!(v["sink"], "Runtime:exec");
    assert_eq!(
        v["call_chains"][0],
        serde_json::json!(["UserController:ping", "UserService:ping", "Runtime:exec"])
    );
    assert!(v.get("hydrated_chains").is_none());
}

#[test]
fn json_of_hydrated_chains_keeps_missing_sources() {
    let rendered = render(&sample(true), Format::Json, None);
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    let chain = &value["vulnerabilities"][0]["hydrated_chains"][0]["chain"];
    assert_eq!(chain.as_array().unwrap().len(), 3);
    assert_eq!(chain[1]["line"], 14);
    assert!(chain[2]["code"].is_null());
}

#[test]
fn text_lists_chains_and_locations() {
    let info = ScanInfo {
        project: "webapp".into(),
        rules_loaded: 9,
        depth: 8,
        files_analyzed: 4,
        failed_files: 1,
        ..ScanInfo::default()
    };
    let rendered = render(&sample(true), Format::Text, Some(&info));
    assert!(rendered.contains("Analysis Status"));
    assert!(rendered.contains("Tracing webapp with 9 rules at depth 8"));
    assert!(rendered.contains("UserController:ping -> UserService:ping -> Runtime:exec"));
    assert!(rendered.contains("UserService:ping service/UserService.java:14"));
    assert!(rendered.contains("Runtime:exec (no source)"));
    assert!(rendered.contains("Total: 1 sink(s), 1 chain(s)"));
}

#[test]
fn text_without_results() {
    let rendered = render(&[], Format::Text, None);
    assert!(rendered.contains("No taint chains found"));
    assert!(!rendered.contains("Analysis Status"));
}

#[test]
fn markdown_has_a_section_per_chain() {
    let md = to_markdown(&sample(false), None);
    assert!(md.starts_with("# sinktracer report"));
    assert!(md.contains("# RCE (1 chain(s))"));
    assert!(md.contains("## Chain 1"));
    assert!(md.contains("- Severity: **CRITICAL**"));
    assert!(md.contains("- `UserService:ping`"));
    assert!(!md.contains("```java"));
}

#[test]
fn markdown_embeds_hydrated_sources() {
    let info = ScanInfo {
        project: "webapp".into(),
        ..ScanInfo::default()
    };
    let md = render(&sample(true), Format::Markdown, Some(&info));
    assert!(md.contains("- Project: **webapp**"));
    assert!(md.contains("```java\n// UserController:ping\npublic String ping"));
    assert!(md.contains("Runtime.getRuntime().exec(host);"));
    assert!(md.contains("// Runtime:exec\n// source not available"));
}
