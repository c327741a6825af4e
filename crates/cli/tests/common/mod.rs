// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

/// Canned HTTP response
#[derive(Clone)]
pub struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self::status(200)
            .header("Content-Type", "application/json")
            .body(body)
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    fn render(&self) -> String {
        let mut out = format!("HTTP/1.1 {} X\r\n", self.status);
        for (name, value) in &self.headers {
            out.push_str(&format!("{}: {}\r\n", name, value));
        }
        out.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.body.len(),
            self.body
        ));
        out
    }
}

/// A request as the test server saw it
pub struct Request {
    /// Request line and headers
    pub head: String,
    pub body: String,
}

impl Request {
    pub fn method(&self) -> &str {
        self.head.split(' ').next().unwrap_or_default()
    }

    /// Path without the query string
    pub fn path(&self) -> &str {
        let target = self.head.split(' ').nth(1).unwrap_or_default();
        target.split('?').next().unwrap_or_default()
    }
}

/// Serve `replies` in order, one per connection, and hand back each raw
/// request head (request line and headers)
pub fn serve(replies: Vec<Reply>) -> (String, mpsc::Receiver<String>) {
    let mut replies = replies.into_iter();
    serve_with(move |_, _| replies.next())
}

/// Answer each connection with `handler`, given the server url and the
/// request; the server stops when it returns `None`
pub fn serve_with<F>(mut handler: F) -> (String, mpsc::Receiver<String>)
where
    F: FnMut(&str, &Request) -> Option<Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::channel();

    let base = url.clone();
    thread::spawn(move || loop {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            if line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        let mut body = vec![0u8; content_length];
        let _ = reader.read_exact(&mut body);
        let request = Request {
            head,
            body: String::from_utf8_lossy(&body).into_owned(),
        };

        let Some(reply) = handler(&base, &request) else {
            return;
        };
        let mut stream = stream;
        let _ = stream.write_all(reply.render().as_bytes());
        let _ = stream.flush();
        let _ = tx.send(request.head);
    });

    (url, rx)
}

/// How one job behaves on [`serve_ci`]
pub struct JobScript {
    pub name: &'static str,
    /// Replaces the accepted trigger reply
    pub trigger: Option<Reply>,
    pub queue_item: u64,
    pub build: u64,
    /// Queue polls answered with "still queued" before the build starts
    pub queued_polls: usize,
    /// Test tree or test report body
    pub harvest: &'static str,
}

impl JobScript {
    pub fn new(name: &'static str, queue_item: u64, build: u64, harvest: &'static str) -> Self {
        Self {
            name,
            trigger: None,
            queue_item,
            build,
            queued_polls: 0,
            harvest,
        }
    }
}

/// A CI server without CSRF protection that runs every scripted job to
/// completion, echoing the external job id each trigger carried
pub fn serve_ci(scripts: Vec<JobScript>) -> (String, mpsc::Receiver<String>) {
    let mut external_ids: HashMap<&'static str, String> = HashMap::new();
    let mut queue_polls: HashMap<u64, usize> = HashMap::new();

    serve_with(move |base, request| {
        let path = request.path();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        if segments.first() == Some(&"queue") {
            let script = scripts
                .iter()
                .find(|s| segments.get(2) == Some(&s.queue_item.to_string().as_str()))?;
            let polls = queue_polls.entry(script.queue_item).or_default();
            *polls += 1;
            return Some(if *polls <= script.queued_polls {
                Reply::json(&format!(r#"{{"id":{}}}"#, script.queue_item))
            } else {
                Reply::json(&format!(
                    r#"{{"id":{},"executable":{{"number":{}}}}}"#,
                    script.queue_item, script.build
                ))
            });
        }
        if segments.first() != Some(&"job") {
            return Some(Reply::status(404));
        }
        let script = scripts.iter().find(|s| segments.get(1) == Some(&s.name))?;

        let reply = match (request.method(), &segments[2..]) {
            ("POST", [_trigger]) => {
                if let Some(reply) = &script.trigger {
                    return Some(reply.clone());
                }
                external_ids.insert(script.name, external_id(&request.body)?);
                Reply::status(201).header(
                    "Location",
                    &format!("{}/queue/item/{}/", base, script.queue_item),
                )
            }
            ("GET", ["api", "json"]) => Reply::json(&format!(
                r#"{{"builds":[{{"number":{},"building":true,"actions":[{{"parameters":[{{"name":"externalJobId","value":"{}"}}]}}]}}]}}"#,
                script.build,
                external_ids.get(script.name)?
            )),
            ("GET", [_, "api", "json"]) => Reply::json(&format!(
                r#"{{"number":{},"building":false,"result":"SUCCESS"}}"#,
                script.build
            )),
            ("GET", [_, "artifact", ..]) | ("GET", [_, "testReport", ..]) => {
                Reply::json(script.harvest)
            }
            _ => Reply::status(404),
        };
        Some(reply)
    })
}

/// The uuid following `externalJobId` in a trigger body
fn external_id(body: &str) -> Option<String> {
    let body = &body[body.find("externalJobId")?..];
    (0..body.len())
        .filter_map(|i| body.get(i..i + 36))
        .find(|candidate| {
            candidate.char_indices().all(|(i, c)| match i {
                8 | 13 | 18 | 23 => c == '-',
                _ => c.is_ascii_hexdigit(),
            })
        })
        .map(str::to_string)
}

/// `jb` run in an empty directory with no ambient configuration
pub fn jb(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jb").expect("jb binary");
    cmd.current_dir(dir.path())
        .env_remove("JB_URL")
        .env_remove("JB_USER")
        .env_remove("JB_TOKEN")
        .env_remove("JB_LOG");
    cmd
}
