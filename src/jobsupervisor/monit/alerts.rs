// src/jobsupervisor/monit/alerts.rs

//! Local listener for monit alert mails.
//!
//! Monit is configured to deliver alerts by SMTP to `127.0.0.1:<port>`. The
//! listener speaks just enough SMTP to accept a message, then parses the
//! `Key: value` lines of the mail into an [`Alert`]:
//!
//! ```text
//! Message-id: <1304319946.0@localhost>
//! Service: nats
//! Event: does not exist
//! Action: restart
//! Date: Sun, 22 May 2011 20:07:41 +0500
//! Description: process is not running
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::jobsupervisor::{Alert, JobFailureHandler};

/// Parse the body of an alert mail.
///
/// Fails when the mail names no service or no event.
pub fn parse_alert(body: &str) -> Result<Alert> {
    let mut alert = Alert::default();

    for line in body.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();

        match key.trim().to_ascii_lowercase().as_str() {
            "message-id" => {
                alert.id = value
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string()
            }
            "service" => alert.service = value,
            "event" => alert.event = value,
            "action" => alert.action = value,
            "date" => alert.date = value,
            "description" => alert.description = value,
            _ => {}
        }
    }

    if alert.service.is_empty() || alert.event.is_empty() {
        return Err(anyhow!("alert mail is missing service or event"));
    }
    Ok(alert)
}

/// Accept connections until the listener fails.
pub async fn serve_alerts(listener: TcpListener, handler: JobFailureHandler) -> Result<()> {
    info!(addr = ?listener.local_addr().ok(), "job failure listener started");

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("accepting alert connection")?;
        debug!(%peer, "alert connection accepted");

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, handler).await {
                warn!(%peer, error = %e, "alert connection failed");
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, handler: JobFailureHandler) -> Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    write.write_all(b"220 hostagent alert listener\r\n").await?;

    let mut in_data = false;
    let mut body: Vec<String> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if in_data {
            if line == "." {
                in_data = false;
                deliver(&body.join("\n"), &handler);
                body.clear();
                write.write_all(b"250 OK\r\n").await?;
            } else if let Some(unstuffed) = line.strip_prefix("..") {
                body.push(format!(".{unstuffed}"));
            } else {
                body.push(line);
            }
            continue;
        }

        let verb = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        let reply: &[u8] = match verb.as_str() {
            "HELO" | "EHLO" | "MAIL" | "RCPT" | "RSET" | "NOOP" => b"250 OK\r\n",
            "DATA" => {
                in_data = true;
                b"354 End data with <CR><LF>.<CR><LF>\r\n"
            }
            "QUIT" => {
                write.write_all(b"221 Bye\r\n").await?;
                break;
            }
            _ => b"500 Unrecognized command\r\n",
        };
        write.write_all(reply).await?;
    }

    Ok(())
}

fn deliver(body: &str, handler: &JobFailureHandler) {
    match parse_alert(body) {
        Ok(alert) => {
            info!(service = %alert.service, event = %alert.event, "job failure alert received");
            if let Err(e) = handler(alert) {
                error!(error = %e, "job failure handler returned an error");
            }
        }
        Err(e) => warn!(error = %e, "ignoring unparseable alert mail"),
    }
}
