//! Simulated user-data tools and data export

use serde_json::{json, Map, Value};

use super::{ParamKind, ParamSpec, ToolArgs, ToolRegistry, ToolSpec};
use crate::error::Result;

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolSpec {
            name: "fetch_user_data",
            description: "Simulated user profile lookup",
            params: vec![
                ParamSpec::required("user_id", ParamKind::Integer),
                ParamSpec::optional("include_metadata", ParamKind::Boolean, Some(json!(false))),
            ],
        },
        fetch_user_data,
    );
    registry.register(
        ToolSpec {
            name: "analyze_user_behavior",
            description: "Simulated behaviour summary for a user",
            params: vec![
                ParamSpec::required("user_id", ParamKind::Integer),
                ParamSpec::optional("days_back", ParamKind::Integer, Some(json!(30))),
            ],
        },
        analyze_user_behavior,
    );
    registry.register(
        ToolSpec {
            name: "export_data",
            description: "Render an object as json, csv or xml text",
            params: vec![
                ParamSpec::required("data", ParamKind::Object),
                ParamSpec::optional("format_type", ParamKind::String, Some(json!("json"))),
            ],
        },
        export_data,
    );
}

fn fetch_user_data(args: &ToolArgs) -> Result<Value> {
    let user_id = args.integer("user_id")?;
    let mut user = json!({
        "id": user_id,
        "name": format!("User {user_id}"),
        "email": format!("user{user_id}@example.com"),
        "created_at": "2024-01-01T00:00:00Z",
    });
    if args.boolean("include_metadata")? {
        user["metadata"] = json!({
            "last_login": "2024-01-15T10:30:00Z",
            "profile_completion": 85,
            "subscription_status": "active",
        });
    }
    Ok(user)
}

fn analyze_user_behavior(args: &ToolArgs) -> Result<Value> {
    Ok(json!({
        "user_id": args.integer("user_id")?,
        "period_days": args.integer("days_back")?,
        "total_sessions": 45,
        "avg_session_duration": 12.5,
        "most_active_hour": 14,
        "preferred_features": ["dashboard", "reports", "settings"],
        "engagement_score": 7.8,
    }))
}

/// Plain text for a scalar; JSON text for anything else
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render `data` as `format` (json, csv, xml); unknown formats give compact JSON
pub fn export(data: &Map<String, Value>, format: &str) -> Result<String> {
    Ok(match format.to_ascii_lowercase().as_str() {
        "json" => serde_json::to_string_pretty(data)?,
        "csv" => {
            let headers: Vec<&str> = data.keys().map(String::as_str).collect();
            let values: Vec<String> = data.values().map(plain).collect();
            format!("{}\n{}", headers.join(","), values.join(","))
        }
        "xml" => {
            let mut lines = vec!["<data>".to_string()];
            lines.extend(
                data.iter()
                    .map(|(key, value)| format!("  <{key}>{}</{key}>", plain(value))),
            );
            lines.push("</data>".to_string());
            lines.join("\n")
        }
        _ => serde_json::to_string(data)?,
    })
}

fn export_data(args: &ToolArgs) -> Result<Value> {
    let text = export(args.object("data")?, args.string("format_type")?)?;
    Ok(Value::String(text))
}
