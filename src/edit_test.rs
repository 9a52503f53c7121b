use super::*;

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

fn sample() -> Vec<Assignment> {
    vec![exam("Algo", 0, 0, "A"), exam("Reseaux", 0, 1, "B"), exam("Algo", 1, 0, "A")]
}

#[test]
fn begin_copies_list() {
    let list = sample();
    let draft = EditDraft::begin(&list);
    assert_eq!(draft.assignments(), list.as_slice());
    assert!(draft.buffer().is_none());
}

#[test]
fn commit_changes_only_the_targeted_entry() {
    let list = sample();
    let mut draft = EditDraft::begin(&list);

    let buffer = draft.open_field(&list[2].key()).unwrap();
    buffer.set(EditField::Room, "C").unwrap();
    let new_key = draft.commit_field().unwrap();

    assert_eq!(new_key.room, "C");
    assert_eq!(new_key.day, 1);
    let edited = draft.assignments();
    assert_eq!(edited[0], list[0]);
    assert_eq!(edited[1], list[1]);
    assert_eq!(edited[2].room, "C");
    assert!(draft.buffer().is_none());
}

#[test]
fn opening_second_editor_discards_first() {
    let list = sample();
    let mut draft = EditDraft::begin(&list);

    draft.open_field(&list[0].key()).unwrap().set(EditField::Name, "Changed").unwrap();
    let second = draft.open_field(&list[1].key()).unwrap();
    assert_eq!(second.value(), &list[1]);

    draft.commit_field().unwrap();
    assert_eq!(draft.assignments()[0], list[0]);
}

#[test]
fn open_unknown_key_fails_and_closes_buffer() {
    let list = sample();
    let mut draft = EditDraft::begin(&list);
    draft.open_field(&list[0].key()).unwrap();

    let missing = exam("Nope", 0, 0, "A").key();
    let err = draft.open_field(&missing).unwrap_err();
    assert_eq!(err, EditError::NotFound(missing));
    assert_eq!(err.error_code(), "E_EDIT_NOT_FOUND");
    assert!(draft.buffer().is_none());
}

#[test]
fn commit_without_buffer_fails() {
    let mut draft = EditDraft::begin(&sample());
    assert_eq!(draft.commit_field(), Err(EditError::NothingOpen));
}

#[test]
fn cancel_field_leaves_draft_unchanged() {
    let list = sample();
    let mut draft = EditDraft::begin(&list);
    draft.open_field(&list[1].key()).unwrap().set(EditField::Slot, "5").unwrap();

    assert!(draft.cancel_field());
    assert!(!draft.cancel_field());
    assert_eq!(draft.assignments(), list.as_slice());
}

#[test]
fn end_drops_uncommitted_buffer() {
    let list = sample();
    let mut draft = EditDraft::begin(&list);
    draft.open_field(&list[0].key()).unwrap().set(EditField::Day, "2").unwrap();
    draft.commit_field().unwrap();
    draft.open_field(&list[1].key()).unwrap().set(EditField::Room, "Z").unwrap();

    let promoted = draft.end();
    assert_eq!(promoted[0].day, 2);
    assert_eq!(promoted[1], list[1]);
    assert_eq!(promoted[2], list[2]);
}

#[test]
fn set_rejects_invalid_values() {
    let list = sample();
    let mut draft = EditDraft::begin(&list);
    let buffer = draft.open_field(&list[0].key()).unwrap();

    assert!(buffer.set(EditField::Name, "   ").is_err());
    assert!(buffer.set(EditField::Day, "-1").is_err());
    assert!(buffer.set(EditField::Slot, "abc").is_err());
    assert!(buffer.set(EditField::Promotion, "0").is_err());
    assert_eq!(buffer.value(), &list[0]);

    buffer.set(EditField::Promotion, " 4 ").unwrap();
    assert_eq!(buffer.value().promotion, 4);
}

#[test]
fn duplicate_identities_edit_the_first_match() {
    let twin = exam("Algo", 0, 0, "A");
    let list = vec![twin.clone(), twin.clone()];
    let mut draft = EditDraft::begin(&list);
    draft.open_field(&twin.key()).unwrap().set(EditField::Room, "B").unwrap();
    draft.commit_field().unwrap();

    assert_eq!(draft.assignments()[0].room, "B");
    assert_eq!(draft.assignments()[1], twin);
}
