use crate::config::GameConfig;
use crate::signal::Signal;

use super::{ActionContext, ActionPlan, Planned, RejectReason};

pub(super) fn plan_indicator_string(ctx: &ActionContext<'_>, index: usize, text: &str) -> Planned {
    if index >= GameConfig::NUMBER_OF_INDICATOR_STRINGS {
        return Err(RejectReason::InvalidArgument);
    }
    Ok(ActionPlan::immediate(vec![Signal::IndicatorString {
        robot: ctx.robot.id,
        index,
        text: text.to_owned(),
    }]))
}

/// Masked write into the team memory carried to the next match.
pub(super) fn plan_team_memory(
    ctx: &ActionContext<'_>,
    index: usize,
    value: i64,
    mask: i64,
) -> Planned {
    if index >= GameConfig::TEAM_MEMORY_SIZE {
        return Err(RejectReason::InvalidArgument);
    }
    if !ctx.robot.team.is_player() {
        return Err(RejectReason::NotApplicable);
    }
    Ok(ActionPlan::immediate(vec![Signal::TeamMemory {
        team: ctx.robot.team,
        index,
        value,
        mask,
    }]))
}

pub(super) fn plan_resign(ctx: &ActionContext<'_>) -> Planned {
    if !ctx.robot.team.is_player() {
        return Err(RejectReason::NotApplicable);
    }
    Ok(ActionPlan {
        resign: true,
        ..ActionPlan::default()
    })
}
