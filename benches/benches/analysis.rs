use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine::{trace_back, BuildOptions, CallGraph, Project, ReverseIndex, Session, SourceIndex};
use ir::MethodId;
use loader::load_rules;
use std::{fs, path::PathBuf};

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..")
}

fn bench_parser(c: &mut Criterion) {
    let file = root().join("fixtures/java/webapp/src/main/java/com/acme/service/UserService.java");
    let content = fs::read_to_string(&file).expect("read fixture");
    c.bench_function("parse_java", |b| {
        b.iter(|| parsers::parse_java(black_box(&content), "UserService.java").unwrap())
    });
}

fn bench_build(c: &mut Criterion) {
    let project = root().join("fixtures/java/webapp");
    let rules = load_rules(&root().join("rules/rules.json")).expect("load rules");
    let opts = BuildOptions::from_rules(&rules);
    c.bench_function("build_project", |b| {
        b.iter(|| Project::build(black_box(&project), black_box(&opts)).unwrap())
    });
    let session = Session::new(rules);
    session.project(&project).expect("build project");
    c.bench_function("scan_cached_project", |b| {
        b.iter(|| session.find_vulnerabilities(black_box(&project), &[]).unwrap())
    });
}

/// `width` parallel lanes of `length` methods, every lane ending in the sink
/// and every method also calling its neighbour lane.
fn lattice(width: usize, length: usize) -> CallGraph {
    let mut graph = CallGraph::new();
    let node = |lane: usize, step: usize| MethodId::new(format!("L{lane}"), format!("m{step}"));
    for lane in 0..width {
        for step in 1..length {
            graph.add_edge(node(lane, step), node(lane, step - 1));
            graph.add_edge(node(lane, step), node((lane + 1) % width, step - 1));
        }
        graph.add_edge(node(lane, 0), MethodId::new("Runtime", "exec"));
    }
    graph
}

fn bench_tracer(c: &mut Criterion) {
    let sink = MethodId::new("Runtime", "exec");
    let oracle = SourceIndex::default();
    let mut group = c.benchmark_group("trace_back");
    for (width, length) in [(4, 8), (16, 8), (16, 16)] {
        let reverse = ReverseIndex::build(&lattice(width, length));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{length}")),
            &reverse,
            |b, reverse| b.iter(|| trace_back(black_box(reverse), &oracle, &sink, length)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parser, bench_build, bench_tracer);
criterion_main!(benches);
