#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Unit tests for the orchestrator against stub external tools

use crate::config::ProjectConfig;
use crate::orchestrator::{add_rpc_args, run_tool, Operation, OrchestratorError, ServiceOrchestrator};
use crate::spec::{parse_rpc, ParseError, RpcSpec};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write an executable `/bin/sh` script into `dir`
fn stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Stub that records its arguments one per line in `args.log`
fn recording_stub(dir: &Path, name: &str, exit_code: i32) -> (PathBuf, PathBuf) {
    let log = dir.join(format!("{name}.args.log"));
    let script = stub(
        dir,
        name,
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\necho \"stdout from {name}\"\necho \"stderr from {name}\" >&2\nexit {exit_code}",
            log.display()
        ),
    );
    (script, log)
}

fn recorded_args(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn orchestrator_with(root: &Path, codegen: PathBuf) -> ServiceOrchestrator {
    let mut config = ProjectConfig::new(root);
    config.codegen = codegen;
    ServiceOrchestrator::new(config)
}

#[test]
fn test_create_service_passes_name_and_fields_literally() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    let report = orch
        .create_service("User", "name:string,email:string,age:int32")
        .unwrap();

    assert_eq!(
        recorded_args(&log),
        vec!["User", "name:string,email:string,age:int32"]
    );
    assert_eq!(report.output, "stdout from gen.sh\n");
    assert_eq!(
        report.operation,
        Operation::CreateService {
            service_name: "User".to_string()
        }
    );
}

#[test]
fn test_create_service_normalizes_field_spec() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    orch.create_service("Order", "repeated string items, total:float")
        .unwrap();
    assert_eq!(
        recorded_args(&log),
        vec!["Order", "items:repeated string,total:float"]
    );
}

#[test]
fn test_create_service_with_no_fields() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    orch.create_service("Marker", "").unwrap();
    assert_eq!(recorded_args(&log), vec!["Marker", ""]);
}

#[test]
fn test_parse_failure_never_invokes_tool() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    let err = orch.create_service("User", "name").unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::Parse(ParseError::MalformedFieldSpec { .. })
    ));
    assert!(!log.exists());

    let err = orch
        .add_rpc(RpcSpec {
            service_name: "User",
            rpc_name: "GetItem",
            request_fields: "query:string",
            response_fields: "data:User",
            http: "GET:/v1/items/{missing}",
            body: None,
        })
        .unwrap_err();
    assert_eq!(err.kind(), "UnboundPathParameter");
    assert!(!log.exists());
}

#[test]
fn test_create_service_rejects_bad_names() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    assert_eq!(
        orch.create_service("  ", "name:string").unwrap_err(),
        OrchestratorError::EmptyServiceName
    );
    assert_eq!(
        orch.create_service("Bad Name", "name:string")
            .unwrap_err()
            .kind(),
        "InvalidIdentifier"
    );
    assert!(!log.exists());
}

#[test]
fn test_non_zero_exit_surfaces_both_streams() {
    let dir = TempDir::new().unwrap();
    let tool = stub(
        dir.path(),
        "gen.sh",
        "echo 'partial progress'\nprintf 'service exists' >&2\nexit 3",
    );
    let orch = orchestrator_with(dir.path(), tool);

    let err = orch.create_service("User", "name:string").unwrap_err();
    assert_eq!(err.to_string(), "service exists");
    assert_eq!(err.output(), Some("partial progress\n"));
    match err {
        OrchestratorError::ExternalToolFailure {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, Some(3));
            assert_eq!(stderr, "service exists");
        }
        other => panic!("expected ExternalToolFailure, got {other:?}"),
    }
}

#[test]
fn test_missing_executable_is_invocation_error() {
    let dir = TempDir::new().unwrap();
    let orch = orchestrator_with(dir.path(), dir.path().join("does-not-exist.sh"));

    let err = orch.create_service("User", "name:string").unwrap_err();
    match &err {
        OrchestratorError::Invocation { program, message } => {
            assert!(program.ends_with("does-not-exist.sh"));
            assert!(!message.is_empty());
        }
        other => panic!("expected Invocation, got {other:?}"),
    }
    assert_eq!(err.kind(), "InvocationError");
    assert_eq!(err.output(), None);
}

#[test]
fn test_invalid_working_directory_is_invocation_error() {
    let dir = TempDir::new().unwrap();
    let (tool, _log) = recording_stub(dir.path(), "gen.sh", 0);
    let mut config = ProjectConfig::new(dir.path().join("missing-root"));
    config.codegen = tool;
    let orch = ServiceOrchestrator::new(config);

    let err = orch.remove_service("User").unwrap_err();
    assert!(matches!(err, OrchestratorError::Invocation { .. }));
}

#[test]
fn test_add_rpc_arguments() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    let report = orch
        .add_rpc(RpcSpec {
            service_name: "Order",
            rpc_name: "UpsertOrder",
            request_fields: "data:Order",
            response_fields: "data:Order",
            http: "put:/v1/orders/{data.id}",
            body: Some("*"),
        })
        .unwrap();

    assert_eq!(
        recorded_args(&log),
        vec![
            "add-rpc",
            "Order",
            "UpsertOrder",
            "data:Order",
            "data:Order",
            "http=PUT:/v1/orders/{data.id}",
            "body=*",
        ]
    );
    assert_eq!(
        report.operation,
        Operation::AddRpc {
            service_name: "Order".to_string(),
            rpc_name: "UpsertOrder".to_string(),
        }
    );
}

#[test]
fn test_add_rpc_args_without_body() {
    let rpc = parse_rpc(RpcSpec {
        service_name: "User",
        rpc_name: "SearchUsers",
        request_fields: "query:string,limit:int32",
        response_fields: "data:repeated User",
        http: "GET:/v1/users:search",
        body: None,
    })
    .unwrap();
    assert_eq!(
        add_rpc_args(&rpc),
        vec![
            "add-rpc",
            "User",
            "SearchUsers",
            "query:string,limit:int32",
            "data:repeated User",
            "http=GET:/v1/users:search",
        ]
    );
}

#[test]
fn test_remove_service_is_delegated_without_precheck() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    assert!(orch.exists("Ghost").is_absent());
    let report = orch.remove_service("Ghost").unwrap();
    assert_eq!(recorded_args(&log), vec!["remove", "Ghost"]);
    assert_eq!(
        report.operation,
        Operation::RemoveService {
            service_name: "Ghost".to_string()
        }
    );
}

#[test]
fn test_remove_service_requires_name() {
    let dir = TempDir::new().unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let orch = orchestrator_with(dir.path(), tool);

    assert_eq!(
        orch.remove_service("").unwrap_err(),
        OrchestratorError::EmptyServiceName
    );
    assert!(!log.exists());
}

#[test]
fn test_regenerate_runs_build_target() {
    let dir = TempDir::new().unwrap();
    let (make, log) = recording_stub(dir.path(), "make", 0);
    let mut config = ProjectConfig::new(dir.path());
    config.build_tool = make;
    let orch = ServiceOrchestrator::new(config);

    let report = orch.regenerate().unwrap();
    assert_eq!(recorded_args(&log), vec!["proto"]);
    assert_eq!(report.operation, Operation::Regenerate);
    assert_eq!(report.output, "stdout from make\n");
}

#[test]
fn test_regenerate_failure() {
    let dir = TempDir::new().unwrap();
    let (make, _log) = recording_stub(dir.path(), "make", 2);
    let mut config = ProjectConfig::new(dir.path());
    config.build_tool = make;
    let orch = ServiceOrchestrator::new(config);

    let err = orch.regenerate().unwrap_err();
    assert_eq!(err.to_string(), "stderr from make\n");
    assert_eq!(err.output(), Some("stdout from make\n"));
}

#[test]
fn test_strict_types_use_inventory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("proto")).unwrap();
    fs::write(dir.path().join("proto/user.proto"), "").unwrap();
    let (tool, log) = recording_stub(dir.path(), "gen.sh", 0);
    let mut config = ProjectConfig::new(dir.path());
    config.codegen = tool;
    config.strict_types = true;
    let orch = ServiceOrchestrator::new(config);

    let err = orch.create_service("Order", "buyer:Customer").unwrap_err();
    assert_eq!(err.kind(), "UnknownFieldType");
    assert!(!log.exists());

    orch.create_service("Order", "buyer:User,parent:Order").unwrap();
    assert_eq!(recorded_args(&log), vec!["Order", "buyer:User,parent:Order"]);
}

#[test]
fn test_run_tool_uses_working_directory() {
    let dir = TempDir::new().unwrap();
    let tool = stub(dir.path(), "pwd.sh", "pwd");
    let out = run_tool(&tool, Vec::<String>::new(), dir.path()).unwrap();
    let reported = fs::canonicalize(out.stdout.trim()).unwrap();
    assert_eq!(reported, fs::canonicalize(dir.path()).unwrap());
}
