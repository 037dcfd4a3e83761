//! Favorites model tests driven by hand-fed storage events.

mod edits;
mod sorting;

use super::*;
use crate::backend::StorageEvent;
use crate::model::{EntityCaches, ModelErrorKind};
use crossbeam_channel::{unbounded, Receiver};
use quentier_core::models::{Note, Notebook, SavedSearch, Tag};
use std::cell::RefCell;
use std::rc::Rc;

const PAGE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    AboutToInsert(usize, usize),
    Inserted(usize, usize),
    AboutToRemove(usize, usize),
    Removed(usize, usize),
    DataChanged(CellRange),
    LayoutAboutToChange,
    LayoutChanged,
    AllListed,
    Error(ModelError),
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Seen>>>);

impl Recorder {
    fn take(&self) -> Vec<Seen> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    fn errors(&self) -> Vec<ModelError> {
        self.0
            .borrow()
            .iter()
            .filter_map(|seen| match seen {
                Seen::Error(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ModelObserver for Recorder {
    fn rows_about_to_be_inserted(&mut self, first: usize, last: usize) {
        self.0.borrow_mut().push(Seen::AboutToInsert(first, last));
    }

    fn rows_inserted(&mut self, first: usize, last: usize) {
        self.0.borrow_mut().push(Seen::Inserted(first, last));
    }

    fn rows_about_to_be_removed(&mut self, first: usize, last: usize) {
        self.0.borrow_mut().push(Seen::AboutToRemove(first, last));
    }

    fn rows_removed(&mut self, first: usize, last: usize) {
        self.0.borrow_mut().push(Seen::Removed(first, last));
    }

    fn data_changed(&mut self, range: CellRange) {
        self.0.borrow_mut().push(Seen::DataChanged(range));
    }

    fn layout_about_to_change(&mut self) {
        self.0.borrow_mut().push(Seen::LayoutAboutToChange);
    }

    fn layout_changed(&mut self) {
        self.0.borrow_mut().push(Seen::LayoutChanged);
    }

    fn all_items_listed(&mut self) {
        self.0.borrow_mut().push(Seen::AllListed);
    }

    fn error(&mut self, error: &ModelError) {
        self.0.borrow_mut().push(Seen::Error(error.clone()));
    }
}

struct TestHarness {
    model: FavoritesModel,
    cmd_rx: Receiver<StorageCmd>,
    seen: Recorder,
    caches: SharedCaches,
}

fn make_model() -> TestHarness {
    let (cmd_tx, cmd_rx) = unbounded();
    let caches = EntityCaches::shared(16);
    let mut model = FavoritesModel::new(cmd_tx, caches.clone(), PAGE_SIZE);
    let seen = Recorder::default();
    model.set_observer(Box::new(seen.clone()));
    TestHarness {
        model,
        cmd_rx,
        seen,
        caches,
    }
}

fn favorite_tag(name: &str) -> Tag {
    let mut tag = Tag::new(name.to_string());
    tag.is_favorited = true;
    tag
}

fn favorite_notebook(name: &str) -> Notebook {
    let mut notebook = Notebook::new(name.to_string());
    notebook.is_favorited = true;
    notebook
}

fn favorite_note(title: &str, notebook: &Notebook, tags: &[&Tag]) -> Note {
    let mut note = Note::new(title.to_string(), notebook.local_id.clone());
    note.tag_local_ids = tags.iter().map(|tag| tag.local_id.clone()).collect();
    note.is_favorited = true;
    note
}

fn favorite_search(name: &str) -> SavedSearch {
    let mut search = SavedSearch::new(name.to_string(), "tag:*".to_string());
    search.is_favorited = true;
    search
}

/// Storage's answer to `cmd`, computed from a fixed snapshot.
fn respond(cmd: StorageCmd, entities: &[Entity], counts: &[(&str, u32)]) -> StorageEvent {
    let find = |local_id: &str| entities.iter().find(|e| e.local_id() == local_id).cloned();
    match cmd {
        StorageCmd::List {
            request_id,
            kind,
            offset,
            limit,
            ..
        } => StorageEvent::Listed {
            request_id,
            kind,
            offset,
            items: entities
                .iter()
                .filter(|e| e.kind() == kind && e.is_favorited())
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        },
        StorageCmd::CountNotes {
            request_id,
            kind,
            local_id,
        } => {
            let name = find(&local_id).map(|e| e.display_name().to_string());
            let count = counts
                .iter()
                .find(|(counted, _)| Some(*counted) == name.as_deref())
                .map_or(0, |(_, count)| *count);
            StorageEvent::NoteCount {
                request_id,
                kind,
                local_id,
                count,
            }
        }
        StorageCmd::Find {
            request_id,
            kind,
            local_id,
        } => match find(&local_id) {
            Some(entity) => StorageEvent::Found { request_id, entity },
            None => StorageEvent::FindFailed {
                request_id,
                kind,
                message: format!("{} not found", local_id),
                local_id,
            },
        },
        StorageCmd::Update { request_id, entity } => StorageEvent::Updated { request_id, entity },
        other => panic!("unexpected command {:?}", other),
    }
}

impl TestHarness {
    fn sent(&self) -> Vec<StorageCmd> {
        self.cmd_rx.try_iter().collect()
    }

    /// Answer queued commands from `entities` until the model stops sending.
    fn serve(&mut self, entities: &[Entity], counts: &[(&str, u32)]) {
        loop {
            let cmds = self.sent();
            if cmds.is_empty() {
                break;
            }
            for cmd in cmds {
                let event = respond(cmd, entities, counts);
                self.model.apply_event(event);
            }
        }
    }

    /// Start the model, serve every request, and clear recorded notifications.
    fn load(&mut self, entities: &[Entity], counts: &[(&str, u32)]) {
        self.model.start();
        self.serve(entities, counts);
        assert!(self.model.is_idle());
        self.seen.take();
    }

    fn names(&self) -> Vec<String> {
        self.model
            .items()
            .map(|item| item.display_name.clone())
            .collect()
    }

    fn row_of(&self, name: &str) -> usize {
        self.model
            .items()
            .position(|item| item.display_name == name)
            .expect("row with name")
    }

    fn assert_indexes_agree(&self) {
        for (row, item) in self.model.items().enumerate() {
            assert_eq!(self.model.index_of(&item.local_id), Some(row));
            assert_eq!(self.model.item_at(row), Some(item));
        }
    }
}
