use super::*;

fn exam(name: &str, filiere: &str, promotion: u32, day: u32, slot: u32, room: &str) -> Assignment {
    Assignment {
        name: name.into(),
        filiere: filiere.into(),
        promotion,
        day,
        slot,
        room: room.into(),
    }
}

fn sample() -> Vec<Assignment> {
    vec![
        exam("Algo", "IA", 1, 0, 0, "B12"),
        exam("Algo", "IA", 1, 0, 0, "A01"),
        exam("Reseaux", "SI", 3, 1, 2, "A01"),
        exam("Compil", "GL", 4, 2, 5, "C3"),
    ]
}

#[test]
fn single_assignment_populates_one_cell() {
    let list = vec![exam("Algo", "IA", 1, 0, 0, "A")];
    let index = ScheduleIndex::build(&list, 1, 2);

    assert_eq!(index.rooms(), ["A".to_owned()]);
    assert_eq!(index.cell(0, 0, "A"), list.as_slice());
    assert!(index.cell(0, 1, "A").is_empty());
    assert!(index.cell(0, 0, "B").is_empty());
    assert_eq!(index.populated().len(), 1);
    assert_eq!(index.total_cells(), 2);
}

#[test]
fn rooms_are_sorted_and_distinct() {
    let index = ScheduleIndex::build(&sample(), 3, 6);
    assert_eq!(index.rooms(), ["A01", "B12", "C3"].map(String::from));
    assert_eq!(index.room_position("B12"), Some(1));
    assert_eq!(index.room_position("Z"), None);
}

#[test]
fn every_assignment_lands_in_its_own_cell_exactly_once() {
    let list = sample();
    let index = ScheduleIndex::build(&list, 3, 6);

    for a in &list {
        let bucket = index.cell(a.day, a.slot, &a.room);
        assert_eq!(bucket.iter().filter(|b| *b == a).count(), 1);
        assert!(bucket.iter().all(|b| b.day == a.day && b.slot == a.slot && b.room == a.room));
    }

    let mut union: Vec<Assignment> = index
        .populated()
        .into_iter()
        .flat_map(|(_, _, _, bucket)| bucket.iter().cloned())
        .collect();
    let mut expected = list.clone();
    union.sort_by(|a, b| a.key().cmp(&b.key()));
    expected.sort_by(|a, b| a.key().cmp(&b.key()));
    assert_eq!(union, expected);
    assert_eq!(index.len(), list.len());
}

#[test]
fn shared_cell_keeps_input_order() {
    let list = vec![exam("Algo", "IA", 1, 0, 0, "A"), exam("BD", "GL", 2, 0, 0, "A")];
    let index = ScheduleIndex::build(&list, 1, 1);
    let names: Vec<&str> = index.cell(0, 0, "A").iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Algo", "BD"]);
}

#[test]
fn dimension_sets_are_derived() {
    let index = ScheduleIndex::build(&sample(), 3, 6);
    assert_eq!(index.filieres().iter().collect::<Vec<_>>(), vec!["GL", "IA", "SI"]);
    assert_eq!(index.promotions().iter().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
}

#[test]
fn populated_cells_are_ordered_by_day_slot_column() {
    let index = ScheduleIndex::build(&sample(), 3, 6);
    let order: Vec<(u32, u32, &str)> = index
        .populated()
        .into_iter()
        .map(|(d, s, r, _)| (d, s, r))
        .collect();
    assert_eq!(order, vec![(0, 0, "A01"), (0, 0, "B12"), (1, 2, "A01"), (2, 5, "C3")]);
}

#[test]
fn out_of_range_assignments_are_still_indexed() {
    let list = vec![exam("Late", "IA", 1, 4, 0, "A"), exam("Ok", "IA", 1, 0, 0, "A")];
    let index = ScheduleIndex::build(&list, 2, 2);
    assert_eq!(index.cell(4, 0, "A").len(), 1);
    let stray: Vec<&str> = index.out_of_range().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(stray, vec!["Late"]);
}

#[test]
fn empty_list_gives_empty_grid() {
    let index = ScheduleIndex::build(&[], 3, 10);
    assert!(index.is_empty());
    assert!(index.rooms().is_empty());
    assert_eq!(index.total_cells(), 0);
}
