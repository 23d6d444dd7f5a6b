//! API helper tools: request validation, response envelopes, pagination

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use super::{ParamKind, ParamSpec, ToolArgs, ToolRegistry, ToolSpec};
use crate::bail_invalid;
use crate::error::Result;

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolSpec {
            name: "validate_api_request",
            description: "Check a request object for missing or empty required fields",
            params: vec![
                ParamSpec::required("request_data", ParamKind::Object),
                ParamSpec::required("required_fields", ParamKind::Array),
            ],
        },
        validate_api_request,
    );
    registry.register(
        ToolSpec {
            name: "format_api_response",
            description: "Wrap data in a standard API response envelope",
            params: vec![
                ParamSpec::required("data", ParamKind::Any),
                ParamSpec::optional("status_code", ParamKind::Integer, Some(json!(200))),
                ParamSpec::optional("message", ParamKind::String, Some(json!("Success"))),
            ],
        },
        format_api_response,
    );
    registry.register(
        ToolSpec {
            name: "paginate_results",
            description: "Return one page of items with pagination metadata",
            params: vec![
                ParamSpec::required("items", ParamKind::Array),
                ParamSpec::optional("page", ParamKind::Integer, Some(json!(1))),
                ParamSpec::optional("per_page", ParamKind::Integer, Some(json!(10))),
            ],
        },
        paginate_results,
    );
}

fn validate_api_request(args: &ToolArgs) -> Result<Value> {
    let request = args.object("request_data")?;
    let required = args.strings("required_fields")?;

    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    for field in required {
        match request.get(field) {
            None => missing.push(field),
            Some(Value::Null) => invalid.push(field),
            Some(Value::String(s)) if s.is_empty() => invalid.push(field),
            Some(_) => {}
        }
    }

    let valid = missing.is_empty() && invalid.is_empty();
    Ok(json!({
        "valid": valid,
        "missing_fields": missing,
        "invalid_fields": invalid,
        "message": if valid { "Valid request" } else { "Request validation failed" },
    }))
}

fn format_api_response(args: &ToolArgs) -> Result<Value> {
    let status_code = args.integer("status_code")?;
    let status = if (200..300).contains(&status_code) {
        "success"
    } else {
        "error"
    };
    Ok(json!({
        "status": status,
        "status_code": status_code,
        "message": args.string("message")?,
        "data": args.get("data").cloned().unwrap_or(Value::Null),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

/// One page of `items`; pages are 1-based
pub fn paginate(items: &[Value], page: usize, per_page: usize) -> Result<Value> {
    if page < 1 || per_page < 1 {
        bail_invalid!(
            "pagination",
            format!("page ({page}) and per_page ({per_page}) must be at least 1")
        );
    }

    let total_items = items.len();
    let total_pages = if total_items == 0 {
        1
    } else {
        total_items.div_ceil(per_page)
    };
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Ok(json!({
        "items": &items[start..end],
        "pagination": {
            "current_page": page,
            "per_page": per_page,
            "total_items": total_items,
            "total_pages": total_pages,
            "has_next": page < total_pages,
            "has_prev": page > 1,
        },
    }))
}

fn paginate_results(args: &ToolArgs) -> Result<Value> {
    let page = usize::try_from(args.integer("page")?).unwrap_or(0);
    let per_page = usize::try_from(args.integer("per_page")?).unwrap_or(0);
    paginate(args.array("items")?, page, per_page)
}
