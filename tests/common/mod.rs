#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod fake_project {
    use protosmith::config::ProjectConfig;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A stand-in for gen_service.sh with the same argument contract:
    ///
    /// - `NAME FIELDS`: writes proto/service/model, fails if the proto exists
    /// - `remove NAME`: deletes them, succeeds even if nothing was there
    /// - `add-rpc SERVICE RPC REQ RES http=.. [body=..]`: appends to the proto
    pub const FAKE_GEN_SERVICE: &str = r#"#!/bin/sh
lower() { printf '%s' "$1" | tr '[:upper:]' '[:lower:]'; }

case "$1" in
  remove)
    stem=$(lower "$2")
    rm -f "proto/$stem.proto" "services/$stem.go" "models/$stem.go"
    echo "removed $2"
    ;;
  add-rpc)
    stem=$(lower "$2")
    if [ ! -f "proto/$stem.proto" ]; then
      printf 'service %s not found' "$2" >&2
      exit 1
    fi
    echo "rpc $3($4) returns ($5) $6 $7" >> "proto/$stem.proto"
    echo "added $3 to $2"
    ;;
  *)
    stem=$(lower "$1")
    if [ -f "proto/$stem.proto" ]; then
      printf 'service exists' >&2
      exit 1
    fi
    mkdir -p proto services models
    echo "message $1 { $2 }" > "proto/$stem.proto"
    echo "package services" > "services/$stem.go"
    echo "package models" > "models/$stem.go"
    echo "generated $1"
    ;;
esac
"#;

    /// Writes an executable script at `path`
    pub fn write_script(path: &Path, body: &str) {
        fs::write(path, body).unwrap();
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }

    /// Temporary project root with the fake codegen tool installed
    pub struct FakeProject {
        pub dir: TempDir,
    }

    impl FakeProject {
        pub fn new() -> Self {
            let dir = TempDir::new().unwrap();
            write_script(&dir.path().join("gen_service.sh"), FAKE_GEN_SERVICE);
            FakeProject { dir }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        /// Default config; the health URL points at a closed local port
        pub fn config(&self) -> ProjectConfig {
            let mut config = ProjectConfig::new(self.root());
            config.health_url = format!("http://127.0.0.1:{}/health", closed_port());
            config
        }

        pub fn touch(&self, rel: &str) -> PathBuf {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
            path
        }
    }

    /// A local port with nothing listening on it
    pub fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }
}

pub mod health_server {
    use std::net::SocketAddr;
    use std::thread::JoinHandle;
    use tiny_http::{Response, Server};

    /// Serve `requests` health checks answering `status`, then stop
    pub fn serve(status: u16, requests: usize) -> (SocketAddr, JoinHandle<()>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            for _ in 0..requests {
                let Ok(request) = server.recv() else {
                    return;
                };
                let _ = request.respond(Response::from_string("ok").with_status_code(status));
            }
        });
        (addr, handle)
    }
}
