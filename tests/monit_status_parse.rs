// tests/monit_status_parse.rs

use hostagent::jobsupervisor::monit::status::parse_status;
use hostagent::jobsupervisor::monit::MonitError;

const STATUS_XML: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<monit id="4b7b8c1b3b2a5f3e1d0c" incarnation="1500000123" version="5.2.5">
  <server>
    <uptime>1302</uptime>
    <poll>10</poll>
    <startdelay>0</startdelay>
    <localhostname>agent-host</localhostname>
    <controlfile>/var/vcap/monit/monitrc</controlfile>
    <httpd>
      <address>127.0.0.1</address>
      <port>2822</port>
      <ssl>0</ssl>
    </httpd>
  </server>
  <platform>
    <name>Linux</name>
    <cpu>4</cpu>
    <memory>8167184</memory>
  </platform>
  <services>
    <service name="nats">
      <type>3</type>
      <collected_sec>1500000200</collected_sec>
      <collected_usec>1234</collected_usec>
      <status>0</status>
      <status_hint>0</status_hint>
      <monitor>1</monitor>
      <monitormode>0</monitormode>
      <pendingaction>0</pendingaction>
      <pid>2041</pid>
      <ppid>1</ppid>
      <uptime>1290</uptime>
      <children>0</children>
      <memory>
        <percent>0.1</percent>
        <kilobyte>9124</kilobyte>
      </memory>
    </service>
    <service name="router">
      <type>3</type>
      <collected_sec>1500000200</collected_sec>
      <collected_usec>1500</collected_usec>
      <status>512</status>
      <status_hint>0</status_hint>
      <monitor>2</monitor>
      <monitormode>0</monitormode>
      <pendingaction>1</pendingaction>
    </service>
    <service name="sshd">
      <type>3</type>
      <status>0</status>
      <status_hint>0</status_hint>
      <monitor>0</monitor>
      <monitormode>0</monitormode>
      <pendingaction>0</pendingaction>
    </service>
  </services>
  <servicegroups>
    <servicegroup name="vcap">
      <service>nats</service>
      <service>router</service>
    </servicegroup>
  </servicegroups>
</monit>"#;

#[test]
fn parses_incarnation_services_and_groups() {
    let status = parse_status(STATUS_XML).unwrap();

    assert_eq!(status.incarnation, 1_500_000_123);
    assert_eq!(status.services.len(), 3);
    assert_eq!(status.groups["vcap"], vec!["nats", "router"]);

    let router = &status.services[1];
    assert_eq!(router.name, "router");
    assert_eq!(router.status, 512);
    assert_eq!(router.monitor, 2);
    assert_eq!(router.pending_action, 1);
}

#[test]
fn group_lookup_only_returns_members() {
    let status = parse_status(STATUS_XML).unwrap();

    assert_eq!(status.service_names_in_group("vcap"), vec!["nats", "router"]);
    assert!(status.services_in_group("missing").is_empty());
}

#[test]
fn service_health_flags() {
    let status = parse_status(STATUS_XML).unwrap();
    let [nats, router, sshd] = &status.services[..] else {
        panic!("expected three services");
    };

    assert!(!nats.is_pending() && !nats.is_failing());
    assert!(router.is_pending() && router.is_failing());
    assert!(!sshd.is_pending() && sshd.is_failing());
}

#[test]
fn incarnation_element_of_older_daemons_is_accepted() {
    let xml = r#"<monit>
  <server><incarnation>1304319946</incarnation></server>
  <services>
    <service name="nats"><status>0</status><monitor>1</monitor><pendingaction>0</pendingaction></service>
  </services>
</monit>"#;

    let status = parse_status(xml).unwrap();

    assert_eq!(status.incarnation, 1_304_319_946);
    assert_eq!(status.services[0].name, "nats");
}

#[test]
fn document_without_incarnation_is_rejected() {
    let err = parse_status("<monit><services></services></monit>").unwrap_err();

    assert!(matches!(err, MonitError::Parse(_)));
}
