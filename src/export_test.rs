use serde_json::Value;

use super::*;
use crate::model::ExamRequest;

fn exam(name: &str, day: u32, slot: u32, room: &str) -> Assignment {
    Assignment {
        name: name.into(),
        filiere: "IA".into(),
        promotion: 1,
        day,
        slot,
        room: room.into(),
    }
}

fn shape() -> GridShape {
    GridShape { days: 1, slots_per_day: 2, start_hour: 8, total_period: 1 }
}

#[test]
fn json_export_carries_shape_and_list() {
    let list = vec![exam("Algo", 0, 0, "A")];
    let json = to_json(&list, shape()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["days"], 1);
    assert_eq!(value["slots_per_day"], 2);
    assert_eq!(value["total_period"], 1);
    assert_eq!(value["exam_count"], 1);
    assert_eq!(value["assignments"][0]["name"], "Algo");
    assert_eq!(value["assignments"][0]["room"], "A");
    assert!(json.contains('\n'));
}

#[test]
fn single_cell_renders_detailed_text() {
    let index = ScheduleIndex::build(&[exam("Algo", 0, 0, "A")], 1, 2);
    let options = RenderOptions { total_period: 1, ..RenderOptions::default() };
    let pages = render_pages(&index, &CoverageResolver::single_slot(), &options).unwrap();

    assert_eq!(pages.len(), 1);
    let page = &pages[0];
    assert!(page.starts_with("1 exams scheduled, total period 1 (page 1/1)"));
    assert!(page.contains("Jour 1 (Lundi)"));
    assert!(page.contains("8:00 - 9:00  | Algo (IA, L1)"));
    assert!(page.contains("9:00 - 10:00 |\n"));
}

#[test]
fn compact_render_omits_filiere_and_promotion() {
    let index = ScheduleIndex::build(&[exam("Algo", 0, 0, "A")], 1, 1);
    let options = RenderOptions { compact: true, ..RenderOptions::default() };
    let page = &render_pages(&index, &CoverageResolver::single_slot(), &options).unwrap()[0];

    assert!(page.contains("| Algo"));
    assert!(!page.contains("(IA, L1)"));
}

#[test]
fn multi_slot_exam_marks_continuation_cells() {
    let exams = vec![ExamRequest::new("Algo".into(), 2, 10, 1, "IA".into())];
    let resolver = CoverageResolver::from_exams(&exams).with_day_length(3);
    let index = ScheduleIndex::build(&[exam("Algo", 0, 0, "A")], 1, 3);
    let options = RenderOptions { compact: true, ..RenderOptions::default() };
    let page = &render_pages(&index, &resolver, &options).unwrap()[0];

    assert!(page.contains("9:00 - 10:00  | ^ Algo"));
    assert!(page.contains("10:00 - 11:00 |\n"));
}

#[test]
fn pages_split_by_days_per_page() {
    let list = vec![exam("Algo", 0, 0, "A"), exam("Reseaux", 2, 0, "A")];
    let index = ScheduleIndex::build(&list, 3, 1);
    let options = RenderOptions { days_per_page: 2, ..RenderOptions::default() };
    let pages = render_pages(&index, &CoverageResolver::single_slot(), &options).unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages[0].contains("Jour 1 (Lundi)"));
    assert!(pages[0].contains("Jour 2 (Mardi)"));
    assert!(!pages[0].contains("Reseaux"));
    assert!(pages[1].contains("(page 2/2)"));
    assert!(pages[1].contains("Jour 3 (Mercredi)"));
    assert!(pages[1].contains("Reseaux"));
}

#[test]
fn stray_assignments_are_noted_on_last_page() {
    let list = vec![exam("Algo", 0, 0, "A"), exam("Late", 5, 0, "A")];
    let index = ScheduleIndex::build(&list, 2, 1);
    let pages = render_pages(&index, &CoverageResolver::single_slot(), &RenderOptions::default()).unwrap();

    assert_eq!(pages.len(), 2);
    assert!(!pages[0].contains("outside the grid"));
    assert!(pages[1].contains("1 assignment(s) fall outside the grid"));
}

#[test]
fn empty_grid_still_renders_header_page() {
    let index = ScheduleIndex::build(&[], 0, 0);
    let pages = render_pages(&index, &CoverageResolver::single_slot(), &RenderOptions::default()).unwrap();
    assert_eq!(pages, vec!["0 exams scheduled, total period 0 (page 1/1)\n".to_owned()]);
}

#[test]
fn zero_days_per_page_is_rejected() {
    let index = ScheduleIndex::build(&[], 1, 1);
    let options = RenderOptions { days_per_page: 0, ..RenderOptions::default() };
    let err = render_pages(&index, &CoverageResolver::single_slot(), &options).unwrap_err();
    assert_eq!(err.error_code(), "E_EXPORT_PAGE_SIZE");
}
