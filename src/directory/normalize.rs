use serde_json::{Map, Value, json};

use crate::graph::models::UserRecord;

fn services(plans: Option<&Value>) -> (usize, String) {
    let plans = plans.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
    let names: Vec<&str> = plans
        .iter()
        .filter_map(|p| {
            p.get("service")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .or_else(|| p.get("servicePlanId").and_then(Value::as_str))
        })
        .filter(|s| !s.is_empty())
        .collect();
    (plans.len(), names.join(", "))
}

/// Flatten a user into one JSON object: every extension attribute as a
/// top level string, manager fields prefixed with `manager`, and counts
/// for plan and device arrays.
pub fn normalize_user(user: &UserRecord) -> Value {
    let mut out = match serde_json::to_value(user) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for n in 1..=15u8 {
        out.insert(
            format!("extensionAttribute{}", n),
            Value::String(user.extension_attribute(n).to_string()),
        );
    }

    let manager = user.manager.as_ref();
    let text = |v: Option<&Option<String>>| Value::String(v.cloned().flatten().unwrap_or_default());
    out.insert(
        "managerDisplayName".into(),
        text(manager.map(|m| &m.display_name)),
    );
    out.insert("managerMail".into(), text(manager.map(|m| &m.mail)));
    out.insert(
        "managerUserPrincipalName".into(),
        text(manager.map(|m| &m.user_principal_name)),
    );
    out.insert("managerJobTitle".into(), text(manager.map(|m| &m.job_title)));

    let (assigned, assigned_services) = services(user.extra.get("assignedPlans"));
    let (provisioned, provisioned_services) = services(user.extra.get("provisionedPlans"));
    let devices = user
        .extra
        .get("managedDevices")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    out.insert("assignedPlansCount".into(), json!(assigned));
    out.insert("assignedPlansServices".into(), json!(assigned_services));
    out.insert("provisionedPlansCount".into(), json!(provisioned));
    out.insert("provisionedPlansServices".into(), json!(provisioned_services));
    out.insert("managedDevicesCount".into(), json!(devices));

    Value::Object(out)
}
