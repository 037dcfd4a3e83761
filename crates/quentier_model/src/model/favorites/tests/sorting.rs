//! Sorting, the reverse fast path and persistent index remapping.

use super::*;

fn three_tags() -> (Vec<Entity>, [(&'static str, u32); 3]) {
    let entities = vec![
        favorite_tag("Work").into(),
        favorite_tag("Home").into(),
        favorite_tag("Misc").into(),
    ];
    (entities, [("Work", 5), ("Home", 2), ("Misc", 0)])
}

#[test]
fn flipping_the_order_reverses_rows_without_storage_calls() {
    let mut harness = make_model();
    let entities: Vec<Entity> = ["Delta", "alpha", "Charlie", "bravo"]
        .iter()
        .map(|name| favorite_notebook(name).into())
        .collect();
    harness.load(&entities, &[]);
    let ascending = harness.names();
    assert_eq!(ascending, vec!["alpha", "bravo", "Charlie", "Delta"]);

    harness
        .model
        .sort(Column::DisplayName, SortOrder::Descending);
    let descending = harness.names();
    let n = ascending.len();
    for (i, name) in ascending.iter().enumerate() {
        assert_eq!(&descending[n - 1 - i], name);
    }
    assert!(harness.sent().is_empty());
    assert_eq!(
        harness.seen.take(),
        vec![Seen::LayoutAboutToChange, Seen::LayoutChanged]
    );
    assert_eq!(harness.model.sort_order(), SortOrder::Descending);
    harness.assert_indexes_agree();
}

#[test]
fn sorting_by_the_current_column_and_order_is_a_no_op() {
    let mut harness = make_model();
    harness.load(&[favorite_tag("Work").into()], &[]);
    harness.model.sort(Column::DisplayName, SortOrder::Ascending);
    assert!(harness.seen.take().is_empty());
}

#[test]
fn full_resort_is_stable_for_ties() {
    let mut harness = make_model();
    let notebook = favorite_notebook("Inbox");
    let entities: Vec<Entity> = vec![
        favorite_tag("b-tag").into(),
        favorite_search("a-search").into(),
        notebook.clone().into(),
        favorite_tag("a-tag").into(),
        favorite_note("c-note", &notebook, &[]).into(),
    ];
    harness.load(&entities, &[]);
    assert_eq!(
        harness.names(),
        vec!["a-search", "a-tag", "b-tag", "c-note", "Inbox"]
    );

    harness.model.sort(Column::Type, SortOrder::Ascending);
    assert_eq!(
        harness.names(),
        vec!["c-note", "Inbox", "a-tag", "b-tag", "a-search"]
    );
    harness.assert_indexes_agree();
}

#[test]
fn work_home_misc_scenario_rename_succeeds() {
    let mut harness = make_model();
    let (entities, counts) = three_tags();
    harness.load(&entities, &counts);
    assert_eq!(harness.names(), vec!["Home", "Misc", "Work"]);

    harness.model.sort(Column::NoteCount, SortOrder::Descending);
    assert_eq!(harness.names(), vec!["Work", "Home", "Misc"]);
    assert!(harness.sent().is_empty());

    let row = harness.row_of("Misc");
    assert_eq!(
        harness.model.set_data(row, Column::DisplayName, "Archive"),
        Ok(true)
    );
    assert_eq!(harness.names(), vec!["Work", "Home", "Archive"]);

    let cmds = harness.sent();
    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        StorageCmd::Update { entity, .. } => {
            assert_eq!(entity.kind(), EntityKind::Tag);
            assert_eq!(entity.display_name(), "Archive");
        }
        other => panic!("expected tag update, got {:?}", other),
    }
    harness.seen.take();

    for cmd in cmds {
        harness.model.apply_event(respond(cmd, &entities, &counts));
    }
    assert!(harness.sent().is_empty());
    assert!(harness.seen.take().is_empty());
    assert_eq!(harness.names(), vec!["Work", "Home", "Archive"]);
    assert!(harness.model.is_idle());
}

#[test]
fn work_home_misc_scenario_rename_fails_and_snaps_back() {
    let mut harness = make_model();
    let (entities, counts) = three_tags();
    harness.load(&entities, &counts);
    harness.model.sort(Column::NoteCount, SortOrder::Descending);

    let row = harness.row_of("Misc");
    harness
        .model
        .set_data(row, Column::DisplayName, "Archive")
        .expect("rename");
    for cmd in harness.sent() {
        let StorageCmd::Update { request_id, entity } = cmd else {
            panic!("expected update");
        };
        harness.model.apply_event(StorageEvent::UpdateFailed {
            request_id,
            entity,
            message: "update rejected".to_string(),
        });
    }

    let cmds = harness.sent();
    assert!(matches!(
        cmds.as_slice(),
        [StorageCmd::Find {
            kind: EntityKind::Tag,
            ..
        }]
    ));
    for cmd in cmds {
        harness.model.apply_event(respond(cmd, &entities, &counts));
    }

    assert_eq!(harness.names(), vec!["Work", "Home", "Misc"]);
    let errors = harness.seen.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ModelErrorKind::Backend);
    assert!(harness.model.is_idle());
    harness.assert_indexes_agree();
}

#[test]
fn persistent_index_follows_its_item() {
    let mut harness = make_model();
    let (entities, counts) = three_tags();
    harness.load(&entities, &counts);
    let home = harness
        .model
        .persistent_index(harness.row_of("Home"), Column::DisplayName)
        .expect("index");
    assert_eq!(home.row(), Some(0));

    harness.model.sort(Column::NoteCount, SortOrder::Descending);
    assert_eq!(home.row(), Some(1));

    harness.model.sort(Column::NoteCount, SortOrder::Ascending);
    assert_eq!(home.row(), Some(1));
    assert_eq!(harness.names(), vec!["Misc", "Home", "Work"]);

    let misc_row = harness.row_of("Misc");
    harness.model.remove_rows(misc_row, 1).expect("remove");
    assert_eq!(home.row(), Some(0));

    harness.model.remove_rows(0, 1).expect("remove");
    assert!(!home.is_valid());
    assert!(harness
        .model
        .persistent_index(5, Column::Type)
        .is_none());
}

#[test]
fn new_rows_are_inserted_at_their_sorted_position() {
    let mut harness = make_model();
    let (entities, counts) = three_tags();
    harness.load(&entities, &counts);

    let extra = favorite_tag("Garden");
    harness.model.apply_event(StorageEvent::Added {
        request_id: RequestId::new(),
        entity: extra.clone().into(),
    });
    assert_eq!(harness.names(), vec!["Garden", "Home", "Misc", "Work"]);
    assert_eq!(
        harness.seen.take(),
        vec![Seen::AboutToInsert(0, 0), Seen::Inserted(0, 0)]
    );
    harness.assert_indexes_agree();
}

#[test]
fn accented_names_sort_next_to_their_base_letters() {
    let mut harness = make_model();
    let entities: Vec<Entity> = ["Zebra", "éclair", "Eagle", "Ölfarbe"]
        .iter()
        .map(|name| favorite_search(name).into())
        .collect();
    harness.load(&entities, &[]);
    assert_eq!(harness.names(), vec!["Eagle", "éclair", "Ölfarbe", "Zebra"]);

    harness
        .model
        .sort(Column::DisplayName, SortOrder::Descending);
    assert_eq!(harness.names(), vec!["Zebra", "Ölfarbe", "éclair", "Eagle"]);
    harness.assert_indexes_agree();
}
