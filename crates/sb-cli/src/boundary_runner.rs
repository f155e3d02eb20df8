use sb_core::{StoryStatus, StoryView};

use crate::BoundaryEvent;

pub(crate) fn boundary_event(status: StoryStatus) -> BoundaryEvent {
    match status {
        StoryStatus::Paused => BoundaryEvent::Choices,
        StoryStatus::DeadEnd | StoryStatus::Terminal => BoundaryEvent::End,
        StoryStatus::Missing => BoundaryEvent::Missing,
        StoryStatus::CycleDetected => BoundaryEvent::Cycle,
    }
}

fn json_string(text: &str) -> String {
    serde_json::to_string(text).expect("string json")
}

/// Protocol lines describing one view, in emission order.
pub(crate) fn view_lines(view: &StoryView, state_out: Option<&str>) -> Vec<String> {
    let mut lines = vec!["RESULT:OK".to_string()];
    lines.push(
        match boundary_event(view.status) {
            BoundaryEvent::Choices => "EVENT:CHOICES",
            BoundaryEvent::End => "EVENT:END",
            BoundaryEvent::Missing => "EVENT:MISSING",
            BoundaryEvent::Cycle => "EVENT:CYCLE",
        }
        .to_string(),
    );

    if let Some(node_id) = &view.node_id {
        lines.push(format!("NODE:{}", node_id));
    }
    lines.push(format!("LABEL_JSON:{}", json_string(&view.label)));
    lines.push(format!("CONTENT_JSON:{}", json_string(&view.content)));

    for choice in &view.choices {
        lines.push(format!(
            "CHOICE:{}|{}|{}",
            choice.index,
            json_string(&choice.label),
            choice.target_id
        ));
    }

    lines.push(format!("CAN_GO_BACK:{}", view.can_go_back));
    lines.push(format!("STATE_OUT:{}", state_out.unwrap_or("NONE")));
    lines
}

pub(crate) fn emit_view(view: &StoryView, state_out: Option<&str>) {
    for line in view_lines(view, state_out) {
        println!("{}", line);
    }
}
