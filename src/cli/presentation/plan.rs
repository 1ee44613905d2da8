//! Mount plan presentation.

use super::shared::render_structured;
use crate::compiler::MountPlan;

pub fn format_mount_plan(plan: &MountPlan, format: &str) -> String {
    render_structured(plan, format)
}
