use cgpa::config::Settings;
use cgpa::models::Tier;
use cgpa::session::Session;
use cgpa::utils::share::SharePayload;
use cgpa::utils::theme::{JsonFileStore, Theme, ThemeSwitch};
use tempfile::tempdir;

#[tokio::test]
async fn scripted_session_computes_and_remembers_theme() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().join("preferences.json");
    let prefs_path = prefs.to_str().unwrap().to_string();
    let settings = Settings::from_lookup(|key| match key {
        "CGPA_PREFS_PATH" => Some(prefs_path.clone()),
        "CGPA_REMOVE_DELAY_MS" => Some("0".to_string()),
        _ => None,
    })
    .unwrap();

    let theme = ThemeSwitch::init(JsonFileStore::new(&settings.prefs_path), settings.prefers_dark);
    let mut session = Session::new(theme, SharePayload::new(settings.share_url.clone()))
        .with_remove_delay(settings.remove_delay)
        .with_celebration_threshold(settings.celebrate_at);

    let script = "\
name 1 Mathematics
credits 1 3
grade 1 O
credits 2 4
grade 2 8
remove 3
credits 4 abc
calc
theme
quit
";
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out).await.unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("CGPA: 8.86"), "{}", output);
    assert_eq!(session.last_result().unwrap().tier, Tier::Great);
    assert_eq!(session.roster().len(), 5);
    assert_eq!(session.roster().entries()[0].name, "Mathematics");

    let reopened = ThemeSwitch::init(JsonFileStore::new(&prefs), Some(false));
    assert_eq!(reopened.current(), Theme::Dark);
}
