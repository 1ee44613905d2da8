//! Agent command presentation.

use super::shared::render_structured;
use crate::schema::Agent;
use serde_json::Value;

pub fn format_agent_show(agent: &Agent, format: &str) -> String {
    let mut fragment = agent.to_mount_plan_fragment();
    fragment.insert("name".to_string(), Value::String(agent.name().to_string()));
    if let Some(source) = agent.source() {
        fragment.insert("source".to_string(), Value::String(source.display().to_string()));
    }
    render_structured(&fragment, format)
}
