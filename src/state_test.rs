use super::*;
use crate::edit::EditField;
use crate::model::{ExamRequest, RoomRequest};
use crate::submit::TransportError;

fn exam(name: &str, filiere: &str, day: u32, slot: u32, room: &str) -> Assignment {
    Assignment {
        name: name.into(),
        filiere: filiere.into(),
        promotion: 1,
        day,
        slot,
        room: room.into(),
    }
}

fn loaded(assignments: Vec<Assignment>) -> ScheduleView {
    let constraints = ScheduleConstraints::new(
        2,
        3,
        0,
        vec![
            ExamRequest::new("Algo".into(), 2, 10, 1, "IA".into()),
            ExamRequest::new("Reseaux".into(), 1, 10, 1, "GL".into()),
        ],
        vec![RoomRequest::new("A".into(), 20), RoomRequest::new("B".into(), 20)],
    );
    let mut view = ScheduleView::default();
    view.apply_result(&constraints, ScheduleResult { assignments, total_period: 2 });
    view
}

#[test]
fn single_cell_result_populates_one_cell() {
    let constraints = ScheduleConstraints::example();
    let algo = exam("Algo", "IA", 0, 0, "A");
    let mut view = ScheduleView::default();
    view.apply_result(&constraints, ScheduleResult { assignments: vec![algo.clone()], total_period: 1 });

    let index = view.index();
    assert_eq!(index.cell(0, 0, "A"), &[algo]);
    assert!(index.cell(0, 1, "A").is_empty());
    assert_eq!(index.rooms(), &["A".to_owned()]);
    assert_eq!(view.summary(), Summary { exam_count: 1, total_period: 1 });
}

#[test]
fn failure_keeps_previous_list_and_sets_notice() {
    let mut view = loaded(vec![exam("Algo", "IA", 0, 0, "A")]);
    let constraints = ScheduleConstraints::example();

    view.apply_outcome(&constraints, Err(SubmitError::Rejected { message: "infeasible".into() }));
    assert_eq!(view.displayed().len(), 1);
    assert_eq!(view.notice(), Some("infeasible"));

    let unreachable = SubmitError::Unreachable { attempts: 4, last: TransportError::Timeout };
    view.apply_outcome(&constraints, Err(unreachable));
    assert!(view.notice().is_some_and(|n| n.contains("starting up")));
}

#[test]
fn cancelled_outcome_changes_nothing() {
    let mut view = loaded(vec![exam("Algo", "IA", 0, 0, "A")]);
    view.apply_outcome(&ScheduleConstraints::example(), Err(SubmitError::Cancelled));
    assert_eq!(view.notice(), None);
    assert_eq!(view.summary().total_period, 2);
}

#[test]
fn filter_narrows_visible_list_and_index() {
    let mut view = loaded(vec![exam("Algo", "IA", 0, 0, "A"), exam("Reseaux", "GL", 0, 1, "B")]);
    view.set_filter(FilterCriteria::new(None, Some("GL"), None));

    assert_eq!(view.visible().len(), 1);
    let index = view.index();
    assert_eq!(index.len(), 1);
    assert_eq!(index.rooms(), &["B".to_owned()]);
    assert_eq!(view.summary().exam_count, 2);
}

#[test]
fn index_is_reused_until_list_changes() {
    let mut view = loaded(vec![exam("Algo", "IA", 0, 0, "A")]);
    assert_eq!(view.index().len(), 1);
    let version = view.version;
    assert_eq!(view.cache.built_for, Some(version));

    // A stale marker survives a repeated query only if nothing was rebuilt.
    view.cache.index = ScheduleIndex::default();
    assert!(view.index().is_empty());
    assert_eq!(view.version, version);

    view.set_filter(FilterCriteria::new(Some("algo"), None, None));
    assert_ne!(view.cache.built_for, Some(view.version));
    assert_eq!(view.index().len(), 1);
    assert_eq!(view.cache.built_for, Some(view.version));
}

#[test]
fn hover_highlights_rejoined_span() {
    let algo = exam("Algo", "IA", 0, 0, "A");
    let mut view = loaded(vec![algo.clone(), exam("Reseaux", "GL", 0, 1, "B")]);
    view.hover(Some(algo.key()));

    assert!(view.is_highlighted(0, 0, "A"));
    assert!(view.is_highlighted(0, 1, "A"));
    assert!(!view.is_highlighted(0, 2, "A"));
    assert!(!view.is_highlighted(0, 1, "B"));
    assert_eq!(view.highlighted_cells().len(), 2);
    assert!(view.is_hovered(&exam("Algo", "other", 0, 0, "Z")));

    view.hover(None);
    assert!(view.highlighted_cells().is_empty());
}

#[test]
fn edit_commit_then_end_promotes_draft() {
    let algo = exam("Algo", "IA", 0, 0, "A");
    let reseaux = exam("Reseaux", "GL", 1, 0, "B");
    let mut view = loaded(vec![algo.clone(), reseaux.clone()]);

    view.open_field(&algo.key()).unwrap().set(EditField::Room, "C").unwrap();
    assert!(view.is_editing());
    view.commit_field().unwrap();
    assert_eq!(view.displayed()[0].room, "C");
    assert_eq!(view.confirmed()[0].room, "A");
    assert_eq!(view.index().cell(0, 0, "C").len(), 1);

    assert!(view.end_edit());
    assert!(!view.is_editing());
    assert_eq!(view.confirmed()[0].room, "C");
    assert_eq!(view.confirmed()[1], reseaux);
}

#[test]
fn cancel_edit_reverts_to_last_confirmed_list() {
    let algo = exam("Algo", "IA", 0, 0, "A");
    let mut view = loaded(vec![algo.clone()]);

    view.open_field(&algo.key()).unwrap().set(EditField::Slot, "2").unwrap();
    view.commit_field().unwrap();
    assert_eq!(view.displayed()[0].slot, 2);

    assert!(view.cancel_edit());
    assert_eq!(view.displayed(), &[algo]);
    assert!(!view.cancel_edit());
}

#[test]
fn commit_outside_edit_mode_fails() {
    let mut view = loaded(vec![exam("Algo", "IA", 0, 0, "A")]);
    assert_eq!(view.commit_field(), Err(EditError::NothingOpen));
    assert!(!view.end_edit());
    assert!(!view.cancel_field());
}

#[test]
fn committing_away_hovered_entry_clears_hover() {
    let algo = exam("Algo", "IA", 0, 0, "A");
    let mut view = loaded(vec![algo.clone()]);
    view.hover(Some(algo.key()));

    view.open_field(&algo.key()).unwrap().set(EditField::Day, "1").unwrap();
    view.commit_field().unwrap();
    assert!(view.hovered().is_none());
}

#[test]
fn new_result_discards_open_draft() {
    let algo = exam("Algo", "IA", 0, 0, "A");
    let mut view = loaded(vec![algo.clone()]);
    view.begin_edit();

    let constraints = ScheduleConstraints::example();
    view.apply_result(&constraints, ScheduleResult { assignments: vec![], total_period: 0 });
    assert!(!view.is_editing());
    assert!(view.displayed().is_empty());
}

#[test]
fn conflicts_use_rejoined_durations() {
    let view = loaded(vec![exam("Algo", "IA", 0, 0, "A"), exam("Reseaux", "GL", 0, 1, "A")]);
    let found = view.conflicts();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].cell, Cell { day: 0, slot: 1, room: "A".into() });
    assert_eq!(found[0].exams, vec!["Algo".to_owned(), "Reseaux".to_owned()]);
}

#[test]
fn exports_follow_visible_list() {
    let mut view = loaded(vec![exam("Algo", "IA", 0, 0, "A"), exam("Reseaux", "GL", 1, 0, "B")]);
    view.set_filter(FilterCriteria::new(Some("reseaux"), None, None));

    let json = view.export_json().unwrap();
    assert!(json.contains("Reseaux"));
    assert!(!json.contains("Algo"));

    view.compact = true;
    let pages = view.render_pages(1).unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages[1].contains("| Reseaux"));
    assert!(pages[0].starts_with("1 exams scheduled, total period 2"));
}
