use super::parse_snippet;
use ir::{ChainRoot, Receiver, Scope};

#[test]
fn receiver_chain_is_recorded_before_its_arguments() {
    let unit = parse_snippet("class A { void m() { a.b(x.y()).c(); } }");
    let order: Vec<_> = unit.calls.iter().map(|c| c.member.as_str()).collect();
    assert_eq!(order, ["b", "c", "y"]);
}

#[test]
fn arguments_of_every_chain_link_follow_in_link_order() {
    let unit = parse_snippet(
        "class A { void m() { new B(f()).p(g()).q.r(h(i())); } }",
    );
    let order: Vec<_> = unit.calls.iter().map(|c| c.member.as_str()).collect();
    assert_eq!(order, ["f", "p", "r", "g", "h", "i"]);
}

#[test]
fn classifies_receivers() {
    let unit = parse_snippet(
        r#"class R {
  void m(String s) {
    repo.find();
    System.out.println(s);
    this.helper();
    this.repo.save();
    helper();
    "x".trim();
    new ProcessBuilder(s).start();
    R.class.getName();
    a.b().c();
  }
}
"#,
    );
    let got: Vec<_> = unit
        .calls
        .iter()
        .map(|c| (c.member.as_str(), c.receiver.clone()))
        .collect();
    let q = |s: &str| Receiver::Qualified(s.to_string());
    assert_eq!(
        got,
        [
            ("find", q("repo")),
            ("println", q("System.out")),
            ("helper", Receiver::Implicit),
            ("save", q("repo")),
            ("helper", Receiver::Implicit),
            ("trim", Receiver::Chained(ChainRoot::StringLiteral)),
            (
                "start",
                Receiver::Chained(ChainRoot::ObjectCreation("ProcessBuilder".into()))
            ),
            (
                "getName",
                Receiver::Chained(ChainRoot::ClassLiteral("R".into()))
            ),
            ("b", q("a")),
            ("c", Receiver::Chained(ChainRoot::Other)),
        ]
    );
}

#[test]
fn chains_keep_the_root_of_the_whole_expression() {
    let unit = parse_snippet(
        r#"class C { void m() { new StringBuilder().append("a").toString(); "p".trim().length(); } }"#,
    );
    let sb = Receiver::Chained(ChainRoot::ObjectCreation("StringBuilder".into()));
    assert_eq!(unit.calls[0].receiver, sb);
    assert_eq!(unit.calls[1].receiver, sb);
    assert_eq!(unit.calls[2].receiver, Receiver::Chained(ChainRoot::StringLiteral));
    assert_eq!(unit.calls[3].receiver, Receiver::Chained(ChainRoot::StringLiteral));
}

#[test]
fn call_sites_carry_enclosing_scopes() {
    let unit = parse_snippet(
        r#"class Outer {
  private String name = build();
  Outer() { init(); }
  void run() {
    Runnable r = new Runnable() {
      public void run2() { exec(); }
    };
  }
}
"#,
    );
    let build = &unit.calls[0];
    assert_eq!(build.member, "build");
    assert_eq!(build.scopes, [Scope::Type("Outer".into())]);
    assert_eq!(build.enclosing_method(), None);
    assert_eq!(build.line, 2);

    let init = &unit.calls[1];
    assert_eq!(init.enclosing_method(), None, "constructors are not methods");

    let exec = &unit.calls[2];
    assert_eq!(exec.member, "exec");
    assert_eq!(exec.enclosing_method(), Some("run2"));
    assert_eq!(exec.enclosing_type(), Some("Outer"));
    assert_eq!(exec.line, 6);
}
