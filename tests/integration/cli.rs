use bowser_render::test_utils::TemplateFixture;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use super::bowser_command;

#[test]
fn test_render_to_stdout() {
    let temp = TempDir::new().unwrap();
    let fixture = TemplateFixture::product_list();
    let (template, context) = fixture.write_to(temp.path()).unwrap();

    bowser_command(temp.path())
        .arg("render")
        .arg(&template)
        .arg("--context")
        .arg(&context)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<li data-id="1">Tea</li><li data-id="3">Bread</li>"#))
        .stdout(predicate::str::contains("Milk").not())
        .stdout(predicate::str::contains("<template>").not());
}

#[test]
fn test_render_with_vars_and_output_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.html"), r#"<h1 class="$$(theme)">$$(title)</h1>"#).unwrap();

    bowser_command(temp.path())
        .args(["render", "page.html", "--var", "title=Home", "--var", r#"theme="dark""#])
        .args(["--output", "out/page.html"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(temp.path().join("out/page.html")).unwrap();
    assert_eq!(written, r#"<h1 class="dark">Home</h1>"#);
}

#[test]
fn test_render_failure_shows_suggestion() {
    let temp = TempDir::new().unwrap();
    let fixture = TemplateFixture::broken_path();
    let (template, context) = fixture.write_to(temp.path()).unwrap();

    bowser_command(temp.path())
        .arg("render")
        .arg(&template)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Problem resolving expression: usr.name"))
        .stderr(predicate::str::contains("Did you mean: user?"));
}

#[test]
fn test_render_missing_template() {
    let temp = TempDir::new().unwrap();

    bowser_command(temp.path())
        .args(["render", "nope.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.html"));
}

#[test]
fn test_project_config_changes_directives() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bowser.toml"), "[directives]\nrepeat = \"data-for\"\n").unwrap();
    fs::write(temp.path().join("list.html"), r#"<b data-for="n in ns">$$(n)</b>"#).unwrap();

    bowser_command(temp.path())
        .args(["render", "list.html", "--var", "ns=[1,2]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<b>1</b><b>2</b>"));
}

#[test]
fn test_explicit_config_must_exist() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.html"), "<p></p>").unwrap();

    bowser_command(temp.path())
        .args(["--config", "missing.toml", "render", "a.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.toml"), "[directives]\ncondition = \"same\"\nrepeat = \"same\"\n")
        .unwrap();
    fs::write(temp.path().join("a.html"), "<p></p>").unwrap();

    bowser_command(temp.path())
        .args(["-c", "bad.toml", "check", "a.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_check_reports_each_template() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("good.html"), r#"<li loop="x in xs">$$(x)</li>"#).unwrap();
    fs::write(temp.path().join("bad.html"), r#"<li loop="x from xs"></li>"#).unwrap();

    bowser_command(temp.path())
        .args(["check", "good.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("good.html"))
        .stdout(predicate::str::contains("1 loops"));

    bowser_command(temp.path())
        .args(["check", "good.html", "bad.html", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""valid": false"#))
        .stdout(predicate::str::contains("Invalid loop: x from xs"))
        .stderr(predicate::str::contains("1 of 2 template(s) failed to check"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.html"), r#"<i loop="x in xs">$$(x)</i>"#).unwrap();

    bowser_command(temp.path())
        .args(["--verbose", "render", "a.html", "--var", "xs=[1]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<i>1</i>"))
        .stderr(predicate::str::contains("Expanding loop"));
}
