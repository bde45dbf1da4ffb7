use quellbot::presentation::config::{ChunkingSettings, ConfigError, SearchSettings};

// One test owns the chunking env vars; splitting it up would race on the
// shared process environment.
#[test]
fn given_degenerate_chunking_env_when_loading_then_errors_name_the_variable() {
    std::env::set_var("CHUNK_SIZE", "0");
    let result = ChunkingSettings::from_env();
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            name: "CHUNK_SIZE",
            ..
        })
    ));

    std::env::set_var("CHUNK_SIZE", "100");
    std::env::set_var("CHUNK_OVERLAP", "100");
    let result = ChunkingSettings::from_env();
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            name: "CHUNK_OVERLAP",
            ..
        })
    ));

    std::env::set_var("CHUNK_OVERLAP", "20");
    let settings = ChunkingSettings::from_env().unwrap();
    assert_eq!(settings.chunk_size, 100);
    assert_eq!(settings.overlap, 20);

    std::env::remove_var("CHUNK_SIZE");
    std::env::remove_var("CHUNK_OVERLAP");
}

fn search_settings(api_key: &str) -> SearchSettings {
    SearchSettings {
        endpoint: "https://search.example.net".to_string(),
        api_key: api_key.to_string(),
        index_name: "documents".to_string(),
        use_semantic: false,
    }
}

#[test]
fn given_multibyte_api_key_when_masking_then_edges_are_shown_without_panic() {
    let settings = search_settings("äöüß12345678äöüß");

    assert_eq!(settings.masked_api_key(), "äöüß...äöüß");
}

#[test]
fn given_short_api_key_when_masking_then_nothing_leaks() {
    let settings = search_settings("kurz");

    assert_eq!(settings.masked_api_key(), "****");
}
