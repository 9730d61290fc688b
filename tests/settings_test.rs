use depthdesk::DeskError;
use depthdesk::models::MarketSymbol;
use depthdesk::settings::{Settings, SettingsPatch, SettingsStore, TextDirection, Theme};

#[test]
fn test_settings_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut store = SettingsStore::load(&path).unwrap();
    store
        .update(SettingsPatch {
            theme: Some(Theme::Dark),
            language: Some("English".to_string()),
            currency: Some("USD".to_string()),
            favorites: Some(vec![MarketSymbol::new("BTC-PERP")]),
            direction: None,
        })
        .unwrap();

    let reloaded = SettingsStore::load(&path).unwrap();
    let settings = reloaded.settings();
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.language, "English");
    assert_eq!(settings.currency, "USD");
    assert_eq!(settings.favorites, vec![MarketSymbol::new("BTC-PERP")]);
    assert_eq!(settings.direction, TextDirection::Ltr);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::load(dir.path().join("absent.json")).unwrap();
    assert_eq!(store.settings(), &Settings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{\"theme\": ").unwrap();

    let err = SettingsStore::load(&path).unwrap_err();
    assert!(matches!(err, DeskError::Settings(_)));
}

#[test]
fn test_toggle_favorite_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let symbol = MarketSymbol::new("ETH-USD");

    let mut store = SettingsStore::load(&path).unwrap();
    assert!(store.toggle_favorite(&symbol).unwrap());
    assert!(SettingsStore::load(&path).unwrap().settings().is_favorite(&symbol));

    assert!(!store.toggle_favorite(&symbol).unwrap());
    assert!(!SettingsStore::load(&path).unwrap().settings().is_favorite(&symbol));
}
