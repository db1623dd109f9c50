// tests/alerts.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use hostagent::jobsupervisor::monit::alerts::{parse_alert, serve_alerts};
use hostagent::jobsupervisor::{Alert, JobFailureHandler};

const ALERT_MAIL: &str = "\
Message-id: <1304319946.0@localhost>
Service: nats
Event: does not exist
Action: restart
Date: Sun, 22 May 2011 20:07:41 +0500
Description: process is not running";

#[test]
fn parses_monit_alert_mail() {
    let alert = parse_alert(ALERT_MAIL).unwrap();

    assert_eq!(
        alert,
        Alert {
            id: "1304319946.0@localhost".to_string(),
            service: "nats".to_string(),
            event: "does not exist".to_string(),
            action: "restart".to_string(),
            date: "Sun, 22 May 2011 20:07:41 +0500".to_string(),
            description: "process is not running".to_string(),
        }
    );
}

#[test]
fn header_names_are_case_insensitive() {
    let alert = parse_alert("SERVICE: nats\nevent: restarted").unwrap();

    assert_eq!(alert.service, "nats");
    assert_eq!(alert.event, "restarted");
}

#[test]
fn mail_without_service_is_rejected() {
    assert!(parse_alert("Event: does not exist\nAction: restart").is_err());
}

async fn expect_reply(lines: &mut tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>, code: &str) {
    let line = lines.next_line().await.unwrap().unwrap();
    assert!(line.starts_with(code), "expected {code}, got {line:?}");
}

#[tokio::test]
async fn smtp_delivery_reaches_the_handler() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler: JobFailureHandler = Arc::new(move |alert: Alert| -> anyhow::Result<()> {
        tx.send(alert)?;
        Ok(())
    });
    tokio::spawn(serve_alerts(listener, handler));

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    expect_reply(&mut lines, "220").await;
    for (command, code) in [
        ("HELO localhost", "250"),
        ("MAIL FROM:<monit@localhost>", "250"),
        ("RCPT TO:<agent@localhost>", "250"),
        ("DATA", "354"),
    ] {
        write.write_all(format!("{command}\r\n").as_bytes()).await.unwrap();
        expect_reply(&mut lines, code).await;
    }

    write.write_all(ALERT_MAIL.replace('\n', "\r\n").as_bytes()).await.unwrap();
    write.write_all(b"\r\n.\r\n").await.unwrap();
    expect_reply(&mut lines, "250").await;

    write.write_all(b"QUIT\r\n").await.unwrap();
    expect_reply(&mut lines, "221").await;

    let alert = with_timeout(rx.recv()).await.unwrap();
    assert_eq!(alert.service, "nats");
    assert_eq!(alert.event, "does not exist");
}
