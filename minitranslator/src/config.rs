use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use minitranslator_languages::{LanguageId, LanguagePair};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::store::{JsonFileStore, KeyValueStore, StoreError};

/// File name of the settings store inside the app data directory
pub const STORE_FILE_NAME: &str = "config.json";

/// Type-safe configuration key that associates a key name with its value type
#[derive(Debug, Clone, Copy)]
pub struct ConfigKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> ConfigKey<T> {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn key_name(&self) -> &'static str {
        self.name
    }
}

// ===== Translator Configuration =====

/// Language selection and detection settings (stored locally)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorConfig {
    pub source_language: LanguageId,
    pub target_language: LanguageId,
    /// Infer the source language from typed text
    #[serde(default)]
    pub auto_detect_source: bool,
}

impl TranslatorConfig {
    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(self.source_language, self.target_language)
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        let pair = LanguagePair::default();
        Self {
            source_language: pair.source,
            target_language: pair.target,
            auto_detect_source: false,
        }
    }
}

impl ConfigKey<TranslatorConfig> {
    pub const TRANSLATOR: Self = Self::new("translatorConfig");
}

// ===== Shown-once flags =====

/// Key of the persisted "download complete notice shown" flag for `pair`.
pub fn download_complete_flag_key(pair: LanguagePair) -> String {
    format!("downloadCompleteShown.{}", pair.key_suffix())
}

// ===== Type-Safe Config Store =====

pub trait ConfigStore {
    fn get<T: DeserializeOwned>(&self, key: &ConfigKey<T>) -> Option<T>;
    fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<(), StoreError>;
    fn delete<T>(&self, key: &ConfigKey<T>) -> Result<(), StoreError>;
}

/// Boolean flags that survive process restarts.
///
/// Flags are only ever raised; a missing or non-boolean value reads as unset.
pub trait FlagStore: Send + Sync {
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&self, key: &str) -> Result<(), StoreError>;
}

/// Type-safe configuration store over a raw key-value store
#[derive(Clone)]
pub struct Config {
    store: Arc<dyn KeyValueStore>,
}

impl Config {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Open the settings file `config.json` inside `data_dir`.
    pub fn open_in(data_dir: impl AsRef<Path>) -> crate::Result<Self> {
        let store = JsonFileStore::open(data_dir.as_ref().join(STORE_FILE_NAME))?;
        Ok(Self::new(Arc::new(store)))
    }
}

impl ConfigStore for Config {
    fn get<T: DeserializeOwned>(&self, key: &ConfigKey<T>) -> Option<T> {
        self.store
            .get(key.key_name())
            .and_then(|v| serde_json::from_value(v).ok())
    }

    fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<(), StoreError> {
        let val = serde_json::to_value(value)?;
        self.store.set(key.key_name(), val)
    }

    fn delete<T>(&self, key: &ConfigKey<T>) -> Result<(), StoreError> {
        self.store.delete(key.key_name())
    }
}

impl FlagStore for Config {
    fn get_flag(&self, key: &str) -> bool {
        self.store
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn set_flag(&self, key: &str) -> Result<(), StoreError> {
        self.store.set(key, serde_json::Value::Bool(true))
    }
}

pub fn load_translator_config(config: &impl ConfigStore) -> TranslatorConfig {
    config.get(&ConfigKey::TRANSLATOR).unwrap_or_default()
}

pub fn save_translator_config(
    config: &impl ConfigStore,
    translator_config: &TranslatorConfig,
) -> Result<(), StoreError> {
    config.set(&ConfigKey::TRANSLATOR, translator_config.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn memory_config() -> Config {
        Config::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_translator_config_store() {
        let test_cases = vec![
            (
                "TranslatorConfig with defaults",
                ConfigKey::TRANSLATOR,
                TranslatorConfig::default(),
            ),
            (
                "TranslatorConfig with auto-detect",
                ConfigKey::TRANSLATOR,
                TranslatorConfig {
                    source_language: LanguageId::Japanese,
                    target_language: LanguageId::ChineseSimplified,
                    auto_detect_source: true,
                },
            ),
            (
                "TranslatorConfig with identical languages",
                ConfigKey::TRANSLATOR,
                TranslatorConfig {
                    source_language: LanguageId::English,
                    target_language: LanguageId::English,
                    auto_detect_source: false,
                },
            ),
        ];

        for (description, key, config) in test_cases {
            let store = memory_config();
            test_config_lifecycle(&store, &key, config, description);
        }
    }

    #[test]
    fn test_load_translator_config_falls_back_to_default() {
        let store = MemoryStore::new();
        store
            .set(
                ConfigKey::TRANSLATOR.key_name(),
                serde_json::json!({ "sourceLanguage": "xx", "targetLanguage": "en" }),
            )
            .unwrap();
        let config = Config::new(Arc::new(store));

        assert_eq!(load_translator_config(&config), TranslatorConfig::default());
    }

    #[test]
    fn test_auto_detect_defaults_to_false() {
        let store = MemoryStore::new();
        store
            .set(
                ConfigKey::TRANSLATOR.key_name(),
                serde_json::json!({ "sourceLanguage": "ja", "targetLanguage": "ko" }),
            )
            .unwrap();
        let config = Config::new(Arc::new(store));

        let loaded = load_translator_config(&config);
        assert_eq!(
            loaded.pair(),
            LanguagePair::new(LanguageId::Japanese, LanguageId::Korean)
        );
        assert!(!loaded.auto_detect_source);
    }

    #[test]
    fn test_flags() {
        let config = memory_config();
        let pair = LanguagePair::new(LanguageId::English, LanguageId::Korean);
        let key = download_complete_flag_key(pair);

        assert_eq!(key, "downloadCompleteShown.en-ko");
        assert!(!config.get_flag(&key));

        config.set_flag(&key).unwrap();
        assert!(config.get_flag(&key));
        assert!(!config.get_flag(&download_complete_flag_key(pair.swapped())));
    }

    #[test]
    fn test_non_boolean_flag_reads_unset() {
        let store = MemoryStore::new();
        store.set("weird", serde_json::json!("yes")).unwrap();
        let config = Config::new(Arc::new(store));

        assert!(!config.get_flag("weird"));
    }

    #[test]
    fn test_open_in_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::open_in(dir.path()).unwrap();
        let saved = TranslatorConfig {
            source_language: LanguageId::English,
            target_language: LanguageId::Japanese,
            auto_detect_source: true,
        };
        save_translator_config(&config, &saved).unwrap();

        let reopened = Config::open_in(dir.path()).unwrap();
        assert_eq!(load_translator_config(&reopened), saved);
        assert!(dir.path().join(STORE_FILE_NAME).exists());
    }

    // Helper function to check if a string is in camelCase format
    fn is_camel_case(s: &str) -> bool {
        let mut chars = s.chars();

        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {}
            _ => return false,
        }

        chars.all(|c| c.is_alphanumeric())
    }

    // Helper function to verify camelCase format dynamically
    fn verify_camel_case<T>(store: &Config, key: &ConfigKey<T>) {
        assert!(
            is_camel_case(key.key_name()),
            "Config key '{}' should be camelCase",
            key.key_name()
        );

        if let Some(serde_json::Value::Object(obj)) = store.store.get(key.key_name()) {
            for field_key in obj.keys() {
                assert!(
                    is_camel_case(field_key),
                    "Field '{}' in {} should be camelCase",
                    field_key,
                    key.key_name()
                );
            }
        }
    }

    // Helper function to test the full lifecycle of a config
    fn test_config_lifecycle<T>(
        store: &Config,
        key: &ConfigKey<T>,
        test_config: T,
        description: &str,
    ) where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug + Clone,
    {
        let result: Option<T> = store.get(key);
        assert!(
            result.is_none(),
            "{}: Get should return None before set",
            description
        );

        store
            .set(key, test_config.clone())
            .unwrap_or_else(|e| panic!("{}: Set should succeed: {}", description, e));

        let retrieved_config: Option<T> = store.get(key);
        assert_eq!(
            retrieved_config,
            Some(test_config),
            "{}: Retrieved config should match",
            description
        );

        verify_camel_case(store, key);

        store
            .delete(key)
            .unwrap_or_else(|e| panic!("{}: Delete should succeed: {}", description, e));

        let result: Option<T> = store.get(key);
        assert!(
            result.is_none(),
            "{}: Get should return None after delete",
            description
        );
    }
}
