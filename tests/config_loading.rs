// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use hostagent::config::load_and_validate;
use hostagent::errors::AgentError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_uses_defaults() {
    let file = config_file("");

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.agent.supervisor, "monit");
    assert_eq!(cfg.agent.base_dir, PathBuf::from("/var/vcap"));
    assert_eq!(cfg.monit.url, "http://127.0.0.1:2822");
    assert_eq!(cfg.monit.user, "vcap");
    assert_eq!(cfg.monit.password, "");
}

#[test]
fn explicit_values_override_defaults() {
    let file = config_file(
        r#"
[agent]
supervisor = "dummy-nats"
base_dir = "/srv/agent"

[monit]
url = "http://10.0.0.5:2822"
user = "admin"
password = "secret"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.agent.supervisor, "dummy-nats");
    assert_eq!(cfg.agent.base_dir, PathBuf::from("/srv/agent"));
    assert_eq!(cfg.monit.url, "http://10.0.0.5:2822");
    assert_eq!(cfg.monit.password, "secret");
}

#[test]
fn unknown_supervisor_is_a_config_error() {
    let file = config_file("[agent]\nsupervisor = \"systemd\"\n");

    match load_and_validate(file.path()) {
        Err(AgentError::ConfigError(msg)) => {
            assert!(msg.contains("supervisor"));
            assert!(msg.contains("systemd"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn monit_url_must_be_http() {
    let file = config_file("[monit]\nurl = \"ftp://127.0.0.1\"\n");

    match load_and_validate(file.path()) {
        Err(AgentError::ConfigError(msg)) => assert!(msg.contains("[monit].url")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn monit_url_is_not_checked_for_other_supervisors() {
    let file = config_file("[agent]\nsupervisor = \"dummy\"\n\n[monit]\nurl = \"\"\n");

    assert!(load_and_validate(file.path()).is_ok());
}

#[test]
fn invalid_toml_is_reported() {
    let file = config_file("[agent\nsupervisor = ");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(AgentError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/hostagent.toml"),
        Err(AgentError::IoError(_))
    ));
}
