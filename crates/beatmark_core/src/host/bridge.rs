//! Host access through an external bridge process.
//!
//! The editing host only exposes its project model to embedded scripting,
//! so the one shipped [`HostSession`] implementation drives a bridge
//! command (configured in `[host]` settings) that runs inside the host's
//! scripting environment and speaks line-delimited JSON over stdio.
//!
//! Requests are single-line JSON objects tagged with `"op"`:
//!
//! ```text
//! -> {"op":"list_clips"}
//! <- {"ok":true,"clips":[{"id":1,"name":"song"}]}
//! -> {"op":"clip_property","id":1,"key":"FPS"}
//! <- {"ok":true,"value":"25"}
//! -> {"op":"add_marker","id":1,"frame":10,"color":"Yellow","name":"...","note":"...","duration":1}
//! <- {"ok":true,"added":true}
//! ```
//!
//! Failure responses carry `"ok":false` with an `"error"` message and an
//! optional machine-readable `"code"`; the driver reports a missing project
//! as `"code":"no_project"`.

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use super::{HostClip, HostError, HostResult, HostSession};

/// A request to the bridge driver.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    ListClips,
    ClipProperty {
        id: u64,
        key: &'a str,
    },
    AddMarker {
        id: u64,
        frame: u64,
        color: &'a str,
        name: &'a str,
        note: &'a str,
        duration: u64,
    },
    DeleteMarkersByColor {
        id: u64,
        color: &'a str,
    },
    OpenPage {
        name: &'a str,
    },
    CurrentTimeline,
    SetCurrentTimeline {
        id: u64,
    },
}

/// Parse one response line from the driver.
///
/// Returns the full response object on success, a typed error otherwise.
fn parse_response(line: &str) -> HostResult<Value> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| HostError::Protocol(format!("invalid response line: {}", e)))?;

    let ok = value
        .get("ok")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| HostError::Protocol("response missing \"ok\" field".to_string()))?;

    if ok {
        return Ok(value);
    }

    let code = value.get("code").and_then(|c| c.as_str()).unwrap_or("");
    if code == "no_project" {
        return Err(HostError::NoProjectLoaded);
    }

    let message = value
        .get("error")
        .and_then(|e| e.as_str())
        .unwrap_or("unspecified error")
        .to_string();
    Err(HostError::Rejected {
        operation: value
            .get("op")
            .and_then(|o| o.as_str())
            .unwrap_or("request")
            .to_string(),
        message,
    })
}

/// The pipes of a running bridge process.
struct BridgeIo {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl BridgeIo {
    fn request(&mut self, request: &Request<'_>) -> HostResult<Value> {
        let line = serde_json::to_string(request)
            .map_err(|e| HostError::Protocol(format!("failed to encode request: {}", e)))?;

        tracing::trace!("bridge -> {}", line);
        self.stdin
            .write_all(line.as_bytes())
            .and_then(|_| self.stdin.write_all(b"\n"))
            .and_then(|_| self.stdin.flush())
            .map_err(|e| HostError::Bridge(format!("failed to write to bridge: {}", e)))?;

        let mut response = String::new();
        let read = self
            .stdout
            .read_line(&mut response)
            .map_err(|e| HostError::Bridge(format!("failed to read from bridge: {}", e)))?;
        if read == 0 {
            return Err(HostError::Bridge("bridge closed its output".to_string()));
        }
        tracing::trace!("bridge <- {}", response.trim_end());

        parse_response(response.trim_end())
    }
}

impl Drop for BridgeIo {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Host session backed by a bridge subprocess.
pub struct BridgeSession {
    io: Rc<RefCell<BridgeIo>>,
}

impl BridgeSession {
    /// Spawn the bridge command and open a session over its stdio.
    pub fn spawn(command: &str, args: &[String]) -> HostResult<Self> {
        tracing::debug!("Spawning host bridge: {} {:?}", command, args);

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| HostError::Bridge(format!("failed to spawn {:?}: {}", command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HostError::Bridge("failed to open bridge stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| HostError::Bridge("failed to open bridge stdout".to_string()))?;

        Ok(Self {
            io: Rc::new(RefCell::new(BridgeIo {
                child,
                stdin,
                stdout,
            })),
        })
    }

    fn request(&self, request: &Request<'_>) -> HostResult<Value> {
        self.io.borrow_mut().request(request)
    }
}

/// A clip handle resolved through the bridge.
pub struct BridgeClip {
    id: u64,
    name: String,
    io: Rc<RefCell<BridgeIo>>,
}

impl HostClip for BridgeClip {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn property(&self, key: &str) -> HostResult<String> {
        let response = self
            .io
            .borrow_mut()
            .request(&Request::ClipProperty { id: self.id, key })?;
        // The host's property map is untyped; unknown keys come back null.
        Ok(response
            .get("value")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string())
    }

    fn add_marker(
        &self,
        frame: u64,
        color: &str,
        name: &str,
        note: &str,
        duration: u64,
    ) -> HostResult<bool> {
        let response = self.io.borrow_mut().request(&Request::AddMarker {
            id: self.id,
            frame,
            color,
            name,
            note,
            duration,
        })?;
        Ok(response
            .get("added")
            .and_then(|a| a.as_bool())
            .unwrap_or(false))
    }

    fn delete_markers_by_color(&self, color: &str) -> HostResult<()> {
        self.io
            .borrow_mut()
            .request(&Request::DeleteMarkersByColor { id: self.id, color })?;
        Ok(())
    }
}

/// An opaque timeline handle resolved through the bridge.
pub struct BridgeTimeline {
    id: u64,
}

impl HostSession for BridgeSession {
    type Clip = BridgeClip;
    type Timeline = BridgeTimeline;

    fn open_page(&self, name: &str) -> HostResult<()> {
        self.request(&Request::OpenPage { name })?;
        Ok(())
    }

    fn list_root_clips(&self) -> HostResult<Vec<BridgeClip>> {
        let response = self.request(&Request::ListClips)?;
        let clips = response
            .get("clips")
            .and_then(|c| c.as_array())
            .ok_or_else(|| HostError::Protocol("list_clips response missing clips".to_string()))?;

        clips
            .iter()
            .map(|clip| {
                let id = clip
                    .get("id")
                    .and_then(|i| i.as_u64())
                    .ok_or_else(|| HostError::Protocol("clip entry missing id".to_string()))?;
                let name = clip
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or("")
                    .to_string();
                Ok(BridgeClip {
                    id,
                    name,
                    io: Rc::clone(&self.io),
                })
            })
            .collect()
    }

    fn current_timeline(&self) -> HostResult<Option<BridgeTimeline>> {
        let response = self.request(&Request::CurrentTimeline)?;
        Ok(response
            .get("timeline")
            .and_then(|t| t.as_u64())
            .map(|id| BridgeTimeline { id }))
    }

    fn set_current_timeline(&self, timeline: &BridgeTimeline) -> HostResult<()> {
        self.request(&Request::SetCurrentTimeline { id: timeline.id })?;
        Ok(())
    }
}
