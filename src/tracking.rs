//! Order tracking timeline.
//!
//! The timeline is projected from the order's current status plus whatever
//! history the backend recorded. History may have gaps, duplicates, unknown
//! statuses, or may briefly disagree with the current status; none of these
//! are errors here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::models::{OrderStatus, OrderStatusHistory};
use crate::status::{StatusIcon, StatusView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Completed,
    Current,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub status: String,
    pub label: String,
    pub icon: StatusIcon,
    pub state: StepState,
    /// The order is currently in this status.
    pub is_current: bool,
    /// Caption the step as still to come.
    pub awaiting: bool,
    pub reached_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub current: StatusView,
    pub cancelled: bool,
    pub steps: Vec<TimelineStep>,
}

/// Earliest recorded timestamp per status.
fn recorded_at(history: &[OrderStatusHistory]) -> HashMap<&OrderStatus, DateTime<Utc>> {
    let mut recorded: HashMap<&OrderStatus, DateTime<Utc>> = HashMap::new();
    for entry in history {
        recorded
            .entry(&entry.status)
            .and_modify(|at| *at = (*at).min(entry.changed_at))
            .or_insert(entry.changed_at);
    }
    recorded
}

pub fn build_timeline(current: &OrderStatus, history: &[OrderStatusHistory]) -> Timeline {
    let cancelled = *current == OrderStatus::Cancelled;
    let recorded = recorded_at(history);
    let current_index = current.progress_index();

    let mut steps: Vec<TimelineStep> = OrderStatus::PROGRESS
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let reached_at = recorded.get(stage).copied();
            // Stages behind the current one were passed even when unrecorded.
            let passed = current_index.is_some_and(|position| index < position);
            let is_current = stage == current;

            let state = if reached_at.is_some() || passed {
                StepState::Completed
            } else if is_current {
                StepState::Current
            } else {
                StepState::Pending
            };

            let view = StatusView::of(stage);
            TimelineStep {
                status: view.code,
                label: view.label,
                icon: view.icon,
                state,
                is_current,
                awaiting: state == StepState::Pending && !cancelled,
                reached_at,
            }
        })
        .collect();

    if cancelled {
        let view = StatusView::of(&OrderStatus::Cancelled);
        steps.push(TimelineStep {
            status: view.code,
            label: view.label,
            icon: view.icon,
            state: StepState::Cancelled,
            is_current: true,
            awaiting: false,
            reached_at: recorded.get(&OrderStatus::Cancelled).copied(),
        });
    }

    Timeline {
        current: StatusView::of(current),
        cancelled,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, 10, 30, 0).unwrap()
    }

    fn entry(status: OrderStatus, day: u32) -> OrderStatusHistory {
        OrderStatusHistory {
            id: None,
            order_id: Some("order-1".into()),
            status,
            changed_at: at(day),
            changed_by: None,
            notes: None,
        }
    }

    fn states(timeline: &Timeline) -> Vec<(&str, StepState)> {
        timeline
            .steps
            .iter()
            .map(|step| (step.status.as_str(), step.state))
            .collect()
    }

    #[test]
    fn freshly_placed_order() {
        let timeline = build_timeline(&OrderStatus::Placed, &[entry(OrderStatus::Placed, 20)]);

        assert_eq!(
            states(&timeline),
            vec![
                ("PLACED", StepState::Completed),
                ("CONFIRMS", StepState::Pending),
                ("PROCESSING", StepState::Pending),
                ("SHIPPED", StepState::Pending),
                ("DELIVERED", StepState::Pending),
            ]
        );
        assert!(timeline.steps[0].is_current);
        assert_eq!(timeline.steps[0].reached_at, Some(at(20)));
        assert!(timeline.steps[1..].iter().all(|step| step.awaiting));
    }

    #[test]
    fn skipped_stages_render_completed_without_timestamp() {
        let history = [entry(OrderStatus::Placed, 20), entry(OrderStatus::Shipped, 22)];
        let timeline = build_timeline(&OrderStatus::Shipped, &history);

        assert_eq!(
            states(&timeline),
            vec![
                ("PLACED", StepState::Completed),
                ("CONFIRMS", StepState::Completed),
                ("PROCESSING", StepState::Completed),
                ("SHIPPED", StepState::Completed),
                ("DELIVERED", StepState::Pending),
            ]
        );
        assert_eq!(timeline.steps[1].reached_at, None);
        assert_eq!(timeline.steps[2].reached_at, None);
        assert_eq!(timeline.steps[3].reached_at, Some(at(22)));
        assert!(timeline.steps[3].is_current);
        assert!(timeline.steps[4].awaiting);
    }

    #[test]
    fn current_status_without_history_is_current() {
        let timeline = build_timeline(&OrderStatus::Processing, &[]);
        assert_eq!(timeline.steps[2].state, StepState::Current);
        assert_eq!(timeline.steps[0].state, StepState::Completed);
        assert_eq!(timeline.steps[3].state, StepState::Pending);
    }

    #[test]
    fn cancelled_order_appends_terminal_step() {
        let history = [entry(OrderStatus::Placed, 20), entry(OrderStatus::Cancelled, 21)];
        let timeline = build_timeline(&OrderStatus::Cancelled, &history);

        assert!(timeline.cancelled);
        assert_eq!(timeline.steps.len(), 6);
        assert_eq!(timeline.steps[0].state, StepState::Completed);
        assert!(timeline.steps[1..5]
            .iter()
            .all(|step| step.state == StepState::Pending && !step.awaiting));

        let last = timeline.steps.last().unwrap();
        assert_eq!(last.state, StepState::Cancelled);
        assert_eq!(last.label, "Cancelled");
        assert_eq!(last.reached_at, Some(at(21)));
    }

    #[test]
    fn cancelled_without_history_still_renders() {
        let timeline = build_timeline(&OrderStatus::Cancelled, &[]);
        assert_eq!(timeline.steps.last().unwrap().reached_at, None);
    }

    #[test]
    fn unknown_statuses_in_history_are_ignored() {
        let history = [
            entry(OrderStatus::Placed, 20),
            entry(OrderStatus::from("ON_HOLD"), 21),
        ];
        let timeline = build_timeline(&OrderStatus::from("ON_HOLD"), &history);

        assert_eq!(timeline.steps.len(), 5);
        assert_eq!(timeline.current.label, "ON_HOLD");
        assert_eq!(timeline.steps[0].state, StepState::Completed);
        assert!(timeline.steps.iter().all(|step| !step.is_current));
    }

    #[test]
    fn history_ahead_of_order_status_is_tolerated() {
        let history = [
            entry(OrderStatus::Placed, 20),
            entry(OrderStatus::Shipped, 22),
            entry(OrderStatus::Delivered, 24),
        ];
        let timeline = build_timeline(&OrderStatus::Shipped, &history);
        assert_eq!(timeline.steps[4].state, StepState::Completed);
    }

    #[test]
    fn duplicate_entries_keep_the_earliest_timestamp() {
        let history = [entry(OrderStatus::Placed, 21), entry(OrderStatus::Placed, 20)];
        let timeline = build_timeline(&OrderStatus::Placed, &history);
        assert_eq!(timeline.steps[0].reached_at, Some(at(20)));
    }
}
