use clap::Parser;
use formwork::cli::{Cli, Runner};
use formwork::constants::MISSING_TEMPLATE_PLACEHOLDER;
use formwork::error::ErrorKind;
use test_log::test;
mod utils;
use utils::{template_folder, write_file};

fn run_args(args: &[&str]) -> formwork::error::Result<String> {
    let cli = Cli::parse_from(std::iter::once("formwork").chain(args.iter().copied()));
    Runner::new(cli).run()
}

const FORM_YAML: &str = r#"
fields:
  - name: email
    attributes:
      placeholder: you@example.com
  - name: born
    type: date
  - name: bio
    type: textarea
    value: "<b>hi</b>"
"#;

#[test]
fn test_fields_command_skips_failed_fields() {
    let folder = template_folder(&[("form.yaml", FORM_YAML)]);
    let file = folder.path().join("form.yaml");

    let output = run_args(&["fields", file.to_str().unwrap()]).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"<input id="email" name="email" placeholder="you@example.com" type="text" />"#,
            r#"<textarea id="bio" name="bio">&lt;b&gt;hi&lt;&#x2f;b&gt;</textarea>"#,
        ]
    );
}

#[test]
fn test_fields_command_flags() {
    let folder = template_folder(&[("form.yaml", FORM_YAML)]);
    let file = folder.path().join("form.yaml");

    let output =
        run_args(&["fields", file.to_str().unwrap(), "--lenient", "--raw-textarea"]).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], r#"<input id="born" name="born" type="text" />"#);
    assert_eq!(lines[2], r#"<textarea id="bio" name="bio"><b>hi</b></textarea>"#);
}

#[test]
fn test_fields_command_reads_config() {
    let folder = template_folder(&[
        ("form.yaml", FORM_YAML),
        ("conf/formwork.yaml", "fields:\n  unknown_types: text\n"),
    ]);
    let file = folder.path().join("form.yaml");
    let conf = folder.path().join("conf");

    let output = run_args(&[
        "fields",
        file.to_str().unwrap(),
        "--config",
        conf.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn test_fields_command_keeps_going_past_bad_entries() {
    let folder = template_folder(&[(
        "form.json",
        r#"{"fields": [{"name": "first"}, {"type": "hidden"}, "junk", {"name": "last"}]}"#,
    )]);
    let file = folder.path().join("form.json");

    let output = run_args(&["fields", file.to_str().unwrap()]).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"<input id="first" name="first" type="text" />"#,
            r#"<input id="last" name="last" type="text" />"#,
        ]
    );
}

#[test]
fn test_fields_command_rejects_duplicate_names() {
    let folder = template_folder(&[("dup.json", r#"[{"name": "a"}, {"name": "a"}]"#)]);
    let file = folder.path().join("dup.json");

    let err = run_args(&["fields", file.to_str().unwrap()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_render_command() {
    let folder = template_folder(&[
        ("hello.mustache", "Hello {{name}}"),
        ("hello.twig", "Hi {{ name }}"),
    ]);
    let root = folder.path().to_str().unwrap();

    let mustache =
        run_args(&["render", "hello", "--root", root, "--context", r#"{"name":"Ada"}"#]);
    assert_eq!(mustache.unwrap(), "Hello Ada");

    let twig = run_args(&[
        "render",
        "hello",
        "-r",
        root,
        "--engine",
        "twig",
        "--context",
        r#"{"name":"Ada"}"#,
    ]);
    assert_eq!(twig.unwrap(), "Hi Ada");

    let verbatim = run_args(&["render", "hello.twig", "-r", root, "-e", "twig", "--no-extension"]);
    assert_eq!(verbatim.unwrap(), "Hi ");
}

#[test]
fn test_render_command_uses_config_engine() {
    let folder = template_folder(&[
        ("views/page.twig", "{{ title | slugify }}"),
        ("formwork.json", r#"{"engine": {"root_path": "views", "kind": "twig"}}"#),
    ]);
    let output = run_args(&[
        "render",
        "page",
        "--config",
        folder.path().to_str().unwrap(),
        "--context",
        r#"{"title":"Contact Us"}"#,
    ])
    .unwrap();
    assert_eq!(output, "contact-us");
}

#[test]
fn test_render_command_root_flag_overrides_config() {
    let folder = template_folder(&[
        ("views/page.twig", "from config"),
        ("other/page.twig", "from flag"),
        ("formwork.yaml", "engine:\n  root_path: views\n  kind: twig\n"),
    ]);
    let other = folder.path().join("other");

    let output = run_args(&[
        "render",
        "page",
        "--root",
        other.to_str().unwrap(),
        "--config",
        folder.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(output, "from flag");
}

#[test]
fn test_render_command_needs_a_root() {
    let err = run_args(&["render", "page"]).unwrap_err();
    assert!(matches!(err, formwork::error::Error::NoTemplateRoot));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_render_command_missing_template() {
    let folder = template_folder(&[]);
    let output =
        run_args(&["render", "nothing", "--root", folder.path().to_str().unwrap()]).unwrap();
    assert_eq!(output, MISSING_TEMPLATE_PLACEHOLDER);
}

#[test]
fn test_render_command_rejects_non_object_context() {
    let folder = template_folder(&[("a.mustache", "x")]);
    let root = folder.path().to_str().unwrap();
    let err = run_args(&["render", "a", "--root", root, "--context", "[1]"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_init_command() {
    let folder = template_folder(&[]);
    let root = folder.path().join("site");
    std::fs::create_dir(&root).unwrap();
    write_file(&root, "index.mustache", "home");

    let output = run_args(&["init", root.to_str().unwrap()]).unwrap();
    assert!(output.starts_with("Template folder ready"));
    assert!(root.join("partials").is_dir());
    assert!(root.join("cache").is_dir());
    assert!(root.join("index.mustache").is_file());
}

#[test]
fn test_init_command_missing_root() {
    let folder = template_folder(&[]);
    let err = run_args(&["init", folder.path().join("nope").to_str().unwrap()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
