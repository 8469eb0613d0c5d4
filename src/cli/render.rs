use crate::inventory::InventoryListing;
use crate::orchestrator::{Operation, OperationReport, OrchestratorError};
use crate::spec::PrimitiveType;
use crate::status::ProjectSnapshot;

fn mark(present: bool) -> &'static str {
    if present {
        "✅"
    } else {
        "❌"
    }
}

/// Human-readable service listing
#[must_use]
pub fn render_listing(listing: &InventoryListing) -> String {
    if !listing.protocol_dir_present {
        return "No services found (protocol directory does not exist yet).\n".to_string();
    }
    if listing.services.is_empty() {
        return "No services found in the project.\n".to_string();
    }

    let mut out = String::from("Existing services:\n\n");
    for s in &listing.services {
        out.push_str(&format!("{}\n", s.name));
        out.push_str(&format!("  - Proto:   {} {}\n", mark(s.has_protocol), s.protocol_path.display()));
        out.push_str(&format!("  - Service: {} {}\n", mark(s.has_service), s.service_path.display()));
        out.push_str(&format!("  - Model:   {} {}\n", mark(s.has_model), s.model_path.display()));
        out.push('\n');
    }
    out
}

/// Human-readable project status
#[must_use]
pub fn render_snapshot(snapshot: &ProjectSnapshot) -> String {
    let mut out = String::from("Project status:\n\n");
    out.push_str(&format!("Server status: {}\n", snapshot.server_liveness));
    out.push_str(&format!("Project root:  {}\n\n", snapshot.project_root.display()));
    out.push_str("File counts:\n");
    out.push_str(&format!("  - Proto files:        {}\n", snapshot.protocol_count));
    out.push_str(&format!("  - Service files:      {}\n", snapshot.service_stub_count));
    out.push_str(&format!("  - Model files:        {}\n", snapshot.model_count));
    out.push_str(&format!("  - Generated PB files: {}\n", snapshot.generated_binding_count));
    out
}

/// Success line followed by the tool's output
#[must_use]
pub fn render_report(report: &OperationReport) -> String {
    let headline = match &report.operation {
        Operation::CreateService { service_name } => {
            format!("✅ Service '{service_name}' generated successfully!")
        }
        Operation::AddRpc {
            service_name,
            rpc_name,
        } => format!("✅ RPC '{rpc_name}' added to service '{service_name}' successfully!"),
        Operation::RemoveService { service_name } => {
            format!("✅ Service '{service_name}' removed successfully!")
        }
        Operation::Regenerate => "✅ Protocol buffer files regenerated successfully!".to_string(),
    };
    if report.output.is_empty() {
        format!("{headline}\n")
    } else {
        format!("{headline}\n\n{}", report.output)
    }
}

/// Failure line followed by the error text (tool stderr, verbatim)
#[must_use]
pub fn render_failure(what: &str, err: &OrchestratorError) -> String {
    format!("❌ Failed to {what} [{}]:\n\n{err}", err.kind())
}

/// Reference for the field and RPC mini-languages
#[must_use]
pub fn guide() -> String {
    let mut out = String::from("Field types\n\n");
    for p in PrimitiveType::ALL {
        let note = match p {
            PrimitiveType::Timestamp => " (maps to google.protobuf.Timestamp)",
            _ => "",
        };
        out.push_str(&format!("  {}{note}\n", p.as_str()));
    }
    out.push_str(
        r#"  <Capitalized>  reference to another service's model, e.g. User

Field formats

  simple     name:type                  name:string,age:int32,is_active:bool
  repeated   name:repeated type         tags:repeated string
             repeated type name         repeated string tags

HTTP mappings

  METHOD:PATH with METHOD one of GET, POST, PUT, PATCH, DELETE.
  Path placeholders {field} or {field.sub} must name a request field.
  Body is '*' (whole request) or a request field name.

Examples

  protosmith create User "name:string,email:string,age:int32,created_at:timestamp"
  protosmith create Order "user_id:string,items:repeated string,total:float"
  protosmith add-rpc User SearchUsers "query:string,limit:int32" "data:repeated User" \
      --http "GET:/v1/users:search"
  protosmith add-rpc Order UpsertOrder "data:Order" "data:Order" \
      --http "PUT:/v1/orders/{data.id}" --body "*"
  protosmith regenerate

Each service owns proto/{name}.proto, services/{name}.go and models/{name}.go.
Run `regenerate` after creating services so bindings and gateway code follow.
"#,
    );
    out
}
