//! Browser checks of the rendered page without the wasm bundle: the static
//! contract the behavior relies on, and that the page stays readable when
//! no script runs.
//!
//! Run with: `cargo test --test browser_page -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn ensure_page_rendered() {
    static RENDERED: OnceLock<()> = OnceLock::new();
    RENDERED.get_or_init(|| {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let output_dir = generated_dir();
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir).expect("failed to clean output dir");
        }

        let status = Command::new(env!("CARGO_BIN_EXE_showcase"))
            .args([
                "render",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                output_dir.to_str().unwrap(),
            ])
            .status()
            .expect("failed to run showcase");
        assert!(status.success(), "render failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load_index() -> Arc<Tab> {
    ensure_page_rendered();
    let tab = browser().new_tab().unwrap();
    let file = generated_dir().join("index.html");
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval(tab: &Tab, js: &str) -> serde_json::Value {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
}

#[test]
#[ignore]
fn nav_links_point_at_existing_sections() {
    let tab = load_index();
    let missing = eval(
        &tab,
        r#"Array.from(document.querySelectorAll('.nav-links a'))
            .map(a => a.getAttribute('href'))
            .filter(href => !document.getElementById(href.slice(1)))
            .join(',')"#,
    );
    assert_eq!(missing.as_str(), Some(""), "dangling nav links: {missing}");
}

#[test]
#[ignore]
fn contact_fields_have_error_slots() {
    let tab = load_index();
    let slots = eval(
        &tab,
        r#"['contact-name', 'contact-email', 'contact-message']
            .filter(id => document.getElementById(id)
                && document.querySelector(`#contact-form [data-error-for="${id}"]`))
            .length"#,
    );
    assert_eq!(slots.as_u64(), Some(3));
}

#[test]
#[ignore]
fn embedded_config_is_valid_json() {
    let tab = load_index();
    let threshold = eval(
        &tab,
        r#"JSON.parse(document.getElementById('showcase-config').textContent).spy.threshold"#,
    );
    assert_eq!(threshold.as_f64(), Some(0.5));
}

#[test]
#[ignore]
fn reveal_content_is_visible_without_script() {
    let tab = load_index();
    let opacity = eval(
        &tab,
        r#"getComputedStyle(document.querySelector('.project-card.reveal')).opacity"#,
    );
    assert_eq!(opacity.as_str(), Some("1"));
    let behavior = eval(&tab, "document.documentElement.hasAttribute('data-behavior')");
    assert_eq!(behavior.as_bool(), Some(false));
}
