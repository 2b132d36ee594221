// tests/config_load.rs
use news_digest::config::{load_settings_default, load_settings_from, Secrets, ENV_CONFIG_PATH};
use news_digest::notify::Channel;
use news_digest::DedupBasis;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

const FULL_TOML: &str = r#"
rss_urls = ["https://techwire.example/rss", "https://science.example/atom"]
ranking_rss_url = "https://ranking.example/rss"
num_articles = 5
keywords = [" AI ", "Rust", "ai", ""]
prompt_template = "Summarize in 200 characters: {title} {link}"
similarity_threshold = 0.6
dedup_basis = "summary"
fetch_article_body = true

[summarizer]
provider = "openai"
model = "gpt-4o"

[dispatch]
channel = "push"
subject_prefix = "Today"
push_url = "https://notify.example/api/notify"
"#;

#[test]
fn full_toml_round_trip_to_interest() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.toml");
    fs::write(&p, FULL_TOML).unwrap();

    let s = load_settings_from(&p).unwrap();
    assert_eq!(s.rss_urls.len(), 2);
    assert_eq!(s.dispatch.channel, Channel::Push);
    assert_eq!(s.summarizer.model.as_deref(), Some("gpt-4o"));

    let interest = s.interest();
    assert_eq!(interest.keywords, vec!["ai".to_string(), "rust".to_string()]);
    assert_eq!(interest.target_count, 5);
    assert_eq!(interest.similarity_threshold, 0.6);
    assert_eq!(interest.dedup_basis, DedupBasis::Summary);
}

#[test]
fn json_settings_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.json");
    fs::write(
        &p,
        r#"{"rss_urls":["https://a.example/rss"],"ranking_rss_url":"https://r.example/rss",
            "num_articles":2,"prompt_template":"{title}","dispatch":{"channel":"stdout"}}"#,
    )
    .unwrap();
    let s = load_settings_from(&p).unwrap();
    assert_eq!(s.dispatch.channel, Channel::Stdout);
    assert_eq!(s.dispatch.subject_prefix, "News digest");
}

#[test]
fn invalid_values_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("num_articles = 5", "num_articles = 0", "num_articles"),
        ("similarity_threshold = 0.6", "similarity_threshold = 1.5", "similarity_threshold"),
        ("similarity_threshold = 0.6", "similarity_threshold = 0.0", "similarity_threshold"),
        (
            "ranking_rss_url = \"https://ranking.example/rss\"",
            "ranking_rss_url = \"not a url\"",
            "ranking_rss_url",
        ),
        (
            "push_url = \"https://notify.example/api/notify\"",
            "",
            "push_url",
        ),
        ("num_articles = 5", "", "num_articles"),
    ];
    for (from, to, needle) in cases {
        let p = dir.path().join("bad.toml");
        fs::write(&p, FULL_TOML.replace(from, to)).unwrap();
        let err = load_settings_from(&p).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains(needle), "expected {needle:?} in {msg}");
    }
}

/// Restores the working directory and `DIGEST_CONFIG_PATH` even when an assert fails.
struct EnvGuard {
    cwd: PathBuf,
    config_path: Option<String>,
}

impl EnvGuard {
    fn enter(dir: &Path) -> Self {
        let guard = Self {
            cwd: env::current_dir().unwrap(),
            config_path: env::var(ENV_CONFIG_PATH).ok(),
        };
        env::set_current_dir(dir).unwrap();
        env::remove_var(ENV_CONFIG_PATH);
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.cwd);
        match &self.config_path {
            Some(v) => env::set_var(ENV_CONFIG_PATH, v),
            None => env::remove_var(ENV_CONFIG_PATH),
        }
    }
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let tmp = tempfile::tempdir().unwrap();
    let _guard = EnvGuard::enter(tmp.path());

    // 1) Nothing at all -> fatal
    assert!(load_settings_default().is_err());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("digest.toml"), FULL_TOML).unwrap();
    assert_eq!(load_settings_default().unwrap().num_articles, 5);

    // 3) Env wins
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, FULL_TOML.replace("num_articles = 5", "num_articles = 9")).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_settings_default().unwrap().num_articles, 9);

    // 4) Env pointing nowhere is an error, not a silent fallback
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_settings_default().is_err());
}

#[serial_test::serial]
#[test]
fn env_guard_restores_state_after_a_panic() {
    let before = env::current_dir().unwrap();
    let before_var = env::var(ENV_CONFIG_PATH).ok();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().to_path_buf();
    let res = std::panic::catch_unwind(move || {
        let _guard = EnvGuard::enter(&path);
        env::set_var(ENV_CONFIG_PATH, "/nowhere/digest.toml");
        panic!("assert failed mid-test");
    });
    assert!(res.is_err());
    assert_eq!(env::current_dir().unwrap(), before);
    assert_eq!(env::var(ENV_CONFIG_PATH).ok(), before_var);
}

#[test]
fn secrets_required_by_channel_and_provider() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.toml");
    fs::write(&p, FULL_TOML).unwrap();
    let s = load_settings_from(&p).unwrap();

    let env_of = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    };

    let full = env_of(&[("OPENAI_API_KEY", "sk-test"), ("PUSH_TOKEN", "tok")]);
    let sec = Secrets::from_lookup(&s, |k| full.get(k).cloned()).unwrap();
    assert_eq!(sec.push_token.as_deref(), Some("tok"));
    assert!(sec.email.is_none());

    let no_key = env_of(&[("PUSH_TOKEN", "tok")]);
    let err = Secrets::from_lookup(&s, |k| no_key.get(k).cloned()).unwrap_err();
    assert!(err.to_string().contains("OPENAI_API_KEY"));

    let blank_token = env_of(&[("OPENAI_API_KEY", "sk-test"), ("PUSH_TOKEN", "  ")]);
    let err = Secrets::from_lookup(&s, |k| blank_token.get(k).cloned()).unwrap_err();
    assert!(err.to_string().contains("PUSH_TOKEN"));
}
