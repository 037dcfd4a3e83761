//! Renames and removals initiated from the view.

use super::*;
use quentier_core::models::NotebookRestrictions;

fn updates(cmds: &[StorageCmd]) -> Vec<&Entity> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            StorageCmd::Update { entity, .. } => Some(entity),
            _ => None,
        })
        .collect()
}

#[test]
fn case_insensitive_name_collision_is_rejected_without_side_effects() {
    let mut harness = make_model();
    harness.load(
        &[favorite_tag("Work").into(), favorite_tag("Home").into()],
        &[],
    );
    let before = harness.names();

    let row = harness.row_of("Home");
    let err = harness
        .model
        .set_data(row, Column::DisplayName, "wORK")
        .expect_err("duplicate name");
    assert_eq!(err.kind, ModelErrorKind::Validation);
    assert_eq!(harness.names(), before);
    assert!(harness.sent().is_empty());
    assert!(harness.seen.take().is_empty());
}

#[test]
fn same_name_in_another_kind_is_allowed() {
    let mut harness = make_model();
    harness.load(
        &[favorite_tag("Work").into(), favorite_notebook("Inbox").into()],
        &[],
    );
    let row = harness.row_of("Inbox");
    assert_eq!(
        harness.model.set_data(row, Column::DisplayName, "Work"),
        Ok(true)
    );
}

#[test]
fn changing_only_the_case_of_a_name_is_allowed() {
    let mut harness = make_model();
    harness.load(&[favorite_tag("Work").into()], &[]);
    assert_eq!(
        harness.model.set_data(0, Column::DisplayName, "WORK"),
        Ok(true)
    );
    assert_eq!(harness.names(), vec!["WORK"]);
}

#[test]
fn rename_moves_row_under_name_sort_and_writes_through_cache() {
    let mut harness = make_model();
    let zebra = favorite_notebook("Zebra");
    harness.load(
        &[zebra.clone().into(), favorite_notebook("Mango").into()],
        &[],
    );
    assert_eq!(harness.names(), vec!["Mango", "Zebra"]);

    let row = harness.row_of("Zebra");
    assert_eq!(
        harness.model.set_data(row, Column::DisplayName, "Apple"),
        Ok(true)
    );
    assert_eq!(harness.names(), vec!["Apple", "Mango"]);
    assert_eq!(harness.model.index_of(&zebra.local_id), Some(0));
    assert_eq!(
        harness.seen.take(),
        vec![
            Seen::DataChanged(CellRange::cell(1, Column::DisplayName.index())),
            Seen::LayoutAboutToChange,
            Seen::LayoutChanged,
        ]
    );

    let cmds = harness.sent();
    assert_eq!(cmds.len(), 1);
    let sent = updates(&cmds);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].local_id(), zebra.local_id);
    assert_eq!(sent[0].display_name(), "Apple");
    harness.assert_indexes_agree();
}

#[test]
fn rename_of_uncached_entity_fetches_it_first() {
    let mut harness = make_model();
    let tag = favorite_tag("Work");
    let entities: Vec<Entity> = vec![tag.clone().into()];
    harness.load(&entities, &[]);
    harness
        .caches
        .borrow_mut()
        .remove(EntityKind::Tag, &tag.local_id);

    harness
        .model
        .set_data(0, Column::DisplayName, "Office")
        .expect("rename");
    let cmds = harness.sent();
    assert!(matches!(
        cmds.as_slice(),
        [StorageCmd::Find { kind: EntityKind::Tag, local_id, .. }] if *local_id == tag.local_id
    ));

    for cmd in cmds {
        harness.model.apply_event(respond(cmd, &entities, &[]));
    }
    let cmds = harness.sent();
    let sent = updates(&cmds);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].display_name(), "Office");
    assert_eq!(harness.names(), vec!["Office"]);
}

#[test]
fn names_are_trimmed_and_validated() {
    let mut harness = make_model();
    harness.load(&[favorite_tag("Work").into()], &[]);

    let err = harness
        .model
        .set_data(0, Column::DisplayName, "   ")
        .expect_err("empty");
    assert_eq!(err.kind, ModelErrorKind::Validation);
    let err = harness
        .model
        .set_data(0, Column::DisplayName, "a,b")
        .expect_err("comma in tag name");
    assert_eq!(err.kind, ModelErrorKind::Validation);
    assert_eq!(
        harness.model.set_data(0, Column::DisplayName, "  Work "),
        Ok(false)
    );
    assert!(harness.sent().is_empty());

    assert_eq!(
        harness.model.set_data(0, Column::DisplayName, "  Office "),
        Ok(true)
    );
    assert_eq!(harness.names(), vec!["Office"]);
}

#[test]
fn only_the_name_column_is_editable() {
    let mut harness = make_model();
    harness.load(&[favorite_tag("Work").into()], &[]);
    assert!(!harness.model.flags(0, Column::Type).editable);
    assert!(!harness.model.flags(0, Column::NoteCount).editable);
    assert!(harness.model.flags(0, Column::DisplayName).editable);
    assert!(harness.model.set_data(0, Column::Type, "Tag").is_err());
    assert_eq!(harness.model.flags(7, Column::DisplayName), ItemFlags::default());
}

#[test]
fn notebook_restrictions_disable_renames() {
    let mut harness = make_model();
    let mut shared = favorite_notebook("Shared");
    shared.guid = Some("nb-guid".to_string());
    shared.restrictions = Some(NotebookRestrictions {
        no_update_notebook: true,
        no_update_notes: true,
        no_update_tags: true,
    });
    let note = favorite_note("Plan", &shared, &[]);
    let mut linked_tag = favorite_tag("Linked");
    linked_tag.linked_notebook_guid = Some("nb-guid".to_string());
    let free_tag = favorite_tag("Free");

    harness.load(
        &[
            shared.clone().into(),
            note.into(),
            linked_tag.into(),
            free_tag.into(),
        ],
        &[],
    );

    for name in ["Shared", "Plan", "Linked"] {
        let row = harness.row_of(name);
        assert!(!harness.model.flags(row, Column::DisplayName).editable, "{}", name);
        assert!(harness
            .model
            .set_data(row, Column::DisplayName, "Renamed")
            .is_err());
    }
    let row = harness.row_of("Free");
    assert!(harness.model.flags(row, Column::DisplayName).editable);
}

#[test]
fn unfavoriting_the_only_notebook_removes_one_row_and_updates_once() {
    let mut harness = make_model();
    let notebook = favorite_notebook("Inbox");
    let entities: Vec<Entity> = vec![notebook.clone().into()];
    harness.load(&entities, &[]);
    harness
        .caches
        .borrow_mut()
        .remove(EntityKind::Notebook, &notebook.local_id);

    harness.model.remove_rows(0, 1).expect("remove");
    assert_eq!(harness.model.row_count(), 0);
    assert_eq!(
        harness.seen.take(),
        vec![Seen::AboutToRemove(0, 0), Seen::Removed(0, 0)]
    );

    let cmds = harness.sent();
    assert!(matches!(cmds.as_slice(), [StorageCmd::Find { .. }]));
    for cmd in cmds {
        harness.model.apply_event(respond(cmd, &entities, &[]));
    }

    let cmds = harness.sent();
    let sent = updates(&cmds);
    assert_eq!(cmds.len(), 1);
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].is_favorited());
    assert_eq!(sent[0].local_id(), notebook.local_id);

    for cmd in cmds {
        harness.model.apply_event(respond(cmd, &entities, &[]));
    }
    assert!(harness.sent().is_empty());
    assert!(harness.model.is_idle());
    assert_eq!(harness.model.row_count(), 0);
}

#[test]
fn unfavoriting_a_cached_entity_updates_immediately() {
    let mut harness = make_model();
    harness.load(
        &[favorite_tag("Work").into(), favorite_tag("Home").into()],
        &[],
    );
    harness.model.remove_rows(0, 2).expect("remove");
    let cmds = harness.sent();
    let sent = updates(&cmds);
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|entity| !entity.is_favorited()));
}

#[test]
fn failed_unfavorite_restores_the_row() {
    let mut harness = make_model();
    let tag = favorite_tag("Work");
    let entities: Vec<Entity> = vec![tag.clone().into()];
    harness.load(&entities, &[("Work", 3)]);
    harness.model.remove_rows(0, 1).expect("remove");

    for cmd in harness.sent() {
        let StorageCmd::Update { request_id, entity } = cmd else {
            panic!("expected update");
        };
        harness.model.apply_event(StorageEvent::UpdateFailed {
            request_id,
            entity,
            message: "read-only".to_string(),
        });
    }
    assert_eq!(harness.seen.errors().len(), 1);
    harness.serve(&entities, &[("Work", 3)]);

    assert_eq!(harness.names(), vec!["Work"]);
    assert_eq!(
        harness.model.data(0, Column::NoteCount),
        Some(CellValue::Count(Some(3)))
    );
    assert!(harness.model.is_idle());
}

#[test]
fn out_of_range_removal_is_an_internal_error() {
    let mut harness = make_model();
    harness.load(&[favorite_tag("Work").into()], &[]);
    let err = harness.model.remove_rows(0, 2).expect_err("range");
    assert_eq!(err.kind, ModelErrorKind::Internal);
    assert_eq!(harness.model.row_count(), 1);
    assert!(harness.sent().is_empty());
    assert_eq!(harness.seen.errors(), vec![err]);
}

#[test]
fn rename_then_unfavorite_keeps_new_name() {
    let mut harness = make_model();
    harness.load(
        &[
            favorite_notebook("Work").into(),
            favorite_notebook("Home").into(),
            favorite_tag("Misc").into(),
        ],
        &[],
    );

    let row = harness.row_of("Misc");
    harness
        .model
        .set_data(row, Column::DisplayName, "Archive")
        .expect("rename");
    let renamed = harness.sent();
    assert_eq!(updates(&renamed)[0].display_name(), "Archive");

    let row = harness.row_of("Archive");
    harness.model.remove_rows(row, 1).expect("remove");
    let cmds = harness.sent();
    let sent = updates(&cmds);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].display_name(), "Archive");
    assert!(!sent[0].is_favorited());
}

#[test]
fn rename_then_unfavorite_of_uncached_entity_keeps_new_name() {
    let mut harness = make_model();
    let tag = favorite_tag("Misc");
    let entities: Vec<Entity> = vec![tag.clone().into()];
    harness.load(&entities, &[]);
    harness
        .caches
        .borrow_mut()
        .remove(EntityKind::Tag, &tag.local_id);

    harness
        .model
        .set_data(0, Column::DisplayName, "Archive")
        .expect("rename");
    harness.model.remove_rows(0, 1).expect("remove");
    let finds = harness.sent();
    assert_eq!(finds.len(), 2);
    assert!(finds
        .iter()
        .all(|cmd| matches!(cmd, StorageCmd::Find { .. })));

    for cmd in finds {
        harness.model.apply_event(respond(cmd, &entities, &[]));
    }
    let cmds = harness.sent();
    let sent = updates(&cmds);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].display_name(), "Archive");
    assert!(sent[0].is_favorited());
    assert_eq!(sent[1].display_name(), "Archive");
    assert!(!sent[1].is_favorited());
}

#[test]
fn unfavoriting_a_note_drops_its_links() {
    let mut harness = make_model();
    let inbox = favorite_notebook("Inbox");
    let note = favorite_note("Draft", &inbox, &[]);
    harness.load(&[inbox.into(), note.clone().into()], &[]);
    assert!(harness.model.indices.note_links(&note.local_id).is_some());

    let row = harness.row_of("Draft");
    harness.model.remove_rows(row, 1).expect("remove");
    assert!(harness.model.indices.note_links(&note.local_id).is_none());
}
