#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub struct Sidecar {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    next_id: u64,
}

impl Sidecar {
    pub fn spawn() -> Self {
        let exe = env!("CARGO_BIN_EXE_timetabled");
        let mut child = Command::new(exe)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn timetabled");
        let stdin = child.stdin.take().expect("child stdin");
        let stdout = child.stdout.take().expect("child stdout");
        Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
            next_id: 0,
        }
    }

    /// Spawned and pointed at `workspace`.
    pub fn open(workspace: &Path) -> Self {
        let mut sc = Self::spawn();
        sc.ok("workspace.select", json!({ "path": workspace.to_string_lossy() }));
        sc
    }

    pub fn send_raw(&mut self, line: &str) -> Value {
        writeln!(self.stdin, "{}", line).expect("write request");
        self.stdin.flush().expect("flush request");
        let mut out = String::new();
        self.reader.read_line(&mut out).expect("read response line");
        assert!(!out.trim().is_empty(), "empty response for {}", line);
        serde_json::from_str(out.trim()).expect("parse response json")
    }

    pub fn request(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let id = self.next_id.to_string();
        let payload = json!({ "id": id, "method": method, "params": params });
        let value = self.send_raw(&payload.to_string());
        assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id.as_str()));
        value
    }

    pub fn ok(&mut self, method: &str, params: Value) -> Value {
        let value = self.request(method, params);
        assert_eq!(
            value.get("ok").and_then(|v| v.as_bool()),
            Some(true),
            "{} failed: {}",
            method,
            value
        );
        value.get("result").cloned().unwrap_or(Value::Null)
    }

    /// Error code of a request expected to fail.
    pub fn err_code(&mut self, method: &str, params: Value) -> (String, Value) {
        let value = self.request(method, params);
        assert_eq!(
            value.get("ok").and_then(|v| v.as_bool()),
            Some(false),
            "{} unexpectedly succeeded: {}",
            method,
            value
        );
        let error = value.get("error").cloned().unwrap_or(Value::Null);
        let code = error
            .get("code")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        (code, error)
    }

    pub fn close(self) {
        let Sidecar {
            mut child, stdin, ..
        } = self;
        drop(stdin);
        let _ = child.wait();
    }
}

/// Ids of the sample school, looked up by display values.
pub struct School {
    pub teachers: Vec<Value>,
    pub subjects: Vec<Value>,
    pub classes: Vec<Value>,
    pub timeslots: Vec<Value>,
}

impl School {
    pub fn seed(sc: &mut Sidecar) -> Self {
        sc.ok("setup.seedSample", json!({}));
        Self::load(sc)
    }

    pub fn load(sc: &mut Sidecar) -> Self {
        let list = |sc: &mut Sidecar, method: &str, key: &str| -> Vec<Value> {
            sc.ok(method, json!({}))[key]
                .as_array()
                .cloned()
                .expect("array result")
        };
        Self {
            teachers: list(sc, "teachers.list", "teachers"),
            subjects: list(sc, "subjects.list", "subjects"),
            classes: list(sc, "classes.list", "classes"),
            timeslots: list(sc, "timeslots.list", "timeslots"),
        }
    }

    pub fn teacher(&self, name: &str) -> String {
        find(&self.teachers, |t| t["name"] == name)
    }

    pub fn subject(&self, code: &str) -> String {
        find(&self.subjects, |s| s["code"] == code)
    }

    pub fn class(&self, name: &str, section: &str) -> String {
        find(&self.classes, |c| c["name"] == name && c["section"] == section)
    }

    pub fn slot(&self, day: &str, start: &str) -> String {
        find(&self.timeslots, |s| s["day"] == day && s["startTime"] == start)
    }
}

fn find(rows: &[Value], pred: impl Fn(&Value) -> bool) -> String {
    rows.iter()
        .find(|r| pred(r))
        .and_then(|r| r["id"].as_str())
        .map(str::to_string)
        .expect("row present")
}

pub fn placement(teacher: &str, subject: &str, class: &str, slot: &str) -> Value {
    json!({
        "teacherId": teacher,
        "subjectId": subject,
        "classId": class,
        "timeslotId": slot,
    })
}
