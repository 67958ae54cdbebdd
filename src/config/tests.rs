// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::loader::section_overrides;
use super::{CONFIG_PATH_VAR, Config, ConfigLoader, ENV_PREFIX};
use crate::logging::LogLevel;
use crate::runtime::jni::JniVersion;
use crate::runtime::mock::lock_env;
use std::io::Write;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_snapshot!(config.format_options().join("\n"), @r"
    facility.accessor   = getEnvironment
    facility.class      = org/sigrok/androidutils/Environment
    logging.level       = 0
    runtime.jni_version = 1.6
    ");
}

#[test]
fn test_parse_all_sections() {
    let toml = r#"
[facility]
class = "org.example.Env"
accessor = "getVars"

[runtime]
jni_version = "1.8"

[logging]
level = 4
file = "/tmp/srau.log"
"#;
    let config = Config::parse(toml).unwrap();

    assert_eq!(config.facility.class, "org.example.Env");
    assert_eq!(config.runtime.jni_version, JniVersion::V1_8);
    assert_eq!(config.logging.level, LogLevel::DEBUG);
    assert_eq!(
        config.facility().unwrap().class(),
        c"org/example/Env",
        "dotted names are normalised"
    );
}

#[test]
fn test_unknown_field_rejected() {
    let toml = r"
[runtime]
jni_versoin = 1.6
";
    assert!(Config::parse(toml).is_err());
}

#[test]
fn test_invalid_jni_version_rejected() {
    let toml = r#"
[runtime]
jni_version = "1.7"
"#;
    let err = Config::parse(toml).unwrap_err();
    assert!(format!("{err:#}").contains("jni_version"), "{err:#}");
}

#[test]
fn test_invalid_facility_rejected_at_build() {
    let toml = r#"
[facility]
class = ""
"#;
    assert!(Config::parse(toml).is_err());
}

#[test]
fn test_log_level_out_of_range_rejected() {
    let toml = r"
[logging]
level = 9
";
    assert!(Config::parse(toml).is_err());
}

#[test]
fn test_env_overrides_beat_file() {
    let config = ConfigLoader::new()
        .add_toml_str("[facility]\naccessor = \"fromFile\"\n")
        .with_env_vars(ENV_PREFIX, vars(&[("SRAU_FACILITY__ACCESSOR", "fromEnv")]))
        .build()
        .unwrap();
    assert_eq!(config.facility.accessor, "fromEnv");
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = 2").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.logging.level, LogLevel::WARN);

    let missing_optional = ConfigLoader::new()
        .add_toml_file_optional("/nonexistent/srau.toml")
        .build()
        .unwrap();
    assert_eq!(missing_optional, Config::default());
}

#[test]
fn test_section_overrides_filter() {
    let kept = section_overrides(
        ENV_PREFIX,
        vars(&[
            ("SRAU_LOGGING__LEVEL", "4"),
            ("SRAU_RUNTIME__JNI_VERSION", "1.8"),
            ("SRAU_CONFIG", "/etc/srau.toml"),
            ("SRAU_PATHS__PREFIX", "/opt"),
            ("SRAU_LOGGINGLEVEL", "4"),
            ("PATH", "/usr/bin"),
        ]),
    );
    let mut names: Vec<_> = kept.keys().cloned().collect();
    names.sort();
    assert_eq!(names, ["SRAU_LOGGING__LEVEL", "SRAU_RUNTIME__JNI_VERSION"]);
}

#[test]
fn test_load_from_vars() {
    let config = Config::load_from(vars(&[
        ("SRAU_FACILITY__ACCESSOR", "getFromEnv"),
        ("SRAU_RUNTIME__JNI_VERSION", "1.8"),
        ("SRAU_LOGGING__LEVEL", "5"),
        ("SRAU_UNRELATED", "1"),
    ]))
    .unwrap();

    assert_eq!(config.facility.accessor, "getFromEnv");
    assert_eq!(config.runtime.jni_version, JniVersion::V1_8);
    assert_eq!(config.logging.level, LogLevel::TRACE);
}

#[test]
fn test_load_applies_file_named_by_path_var() {
    let _env = lock_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = 2").unwrap();

    // SAFETY: serialised by the environment lock.
    unsafe {
        std::env::set_var(CONFIG_PATH_VAR, file.path());
        std::env::set_var("SRAU_STRAY_SETTING", "1");
    }

    let result = Config::load();

    // SAFETY: as above.
    unsafe {
        std::env::remove_var(CONFIG_PATH_VAR);
        std::env::remove_var("SRAU_STRAY_SETTING");
    }

    let config = result.unwrap();
    assert_eq!(config.logging.level, LogLevel::WARN);
    assert_eq!(config.facility, Config::default().facility);
}
