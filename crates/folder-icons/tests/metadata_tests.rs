//! Round trips through the folder icon store over real directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use folder_icons::metadata::{CUSTOM_ICON, CUSTOM_ICON_NAME, SYMBOLIC_ICON};
use folder_icons::{
    ErrorKind, FolderIconStore, IconIdentifier, MemoryBackend, MetadataError, classify,
};
use folder_icons_theme::{IconTheme, StaticTheme};

fn theme() -> Arc<dyn IconTheme> {
    Arc::new(StaticTheme::new(&[
        "folder",
        "folder-music",
        "folder-music-symbolic",
        "folder-videos",
        "folder-xyz",
    ]))
}

fn setup() -> (tempfile::TempDir, Arc<MemoryBackend>, FolderIconStore) {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MemoryBackend::new().require_existing());
    let store = FolderIconStore::new(backend.clone(), theme());
    (dir, backend, store)
}

#[test]
fn test_named_round_trip() {
    let (dir, _, store) = setup();
    let id = classify("folder-videos");
    store.set(dir.path(), &id).unwrap();

    let record = store.get(dir.path()).unwrap();
    assert_eq!(record.effective_icon(), IconIdentifier::Named("folder-videos".into()));
    assert_eq!(record.custom_icon, None);
}

#[test]
fn test_mutual_exclusivity() {
    let (dir, _, store) = setup();

    store.set(dir.path(), &classify("/img/a.svg")).unwrap();
    let record = store.get(dir.path()).unwrap();
    assert_eq!(record.custom_icon.as_deref(), Some("/img/a.svg"));
    assert_eq!(record.custom_icon_name, None);

    store.set(dir.path(), &classify("folder-music")).unwrap();
    let record = store.get(dir.path()).unwrap();
    assert_eq!(record.custom_icon, None);
    assert_eq!(record.custom_icon_name.as_deref(), Some("folder-music"));
}

#[test]
fn test_path_icon_stored_as_uri() {
    let (dir, backend, store) = setup();
    store.set(dir.path(), &classify("/home/u/My Icons/a.png")).unwrap();

    let stored = backend.attributes(dir.path());
    assert_eq!(stored.get(CUSTOM_ICON), Some("file:///home/u/My%20Icons/a.png"));
    assert_eq!(
        store.get(dir.path()).unwrap().effective_icon(),
        IconIdentifier::PathRef("/home/u/My Icons/a.png".into())
    );
}

#[test]
fn test_path_icon_with_reserved_characters_round_trips() {
    let (dir, backend, store) = setup();

    for path in ["/img/a#1.png", "/img/a%41.png", "/img/what?.svg", "/img/café.svg"] {
        let id = IconIdentifier::PathRef(path.to_string());
        store.set(dir.path(), &id).unwrap();

        let stored = backend.attributes(dir.path());
        let uri = stored.get(CUSTOM_ICON).unwrap();
        assert!(!uri[7..].contains(['#', '?']), "unescaped URI {uri}");
        assert_eq!(store.get(dir.path()).unwrap().effective_icon(), id);
    }
}

#[test]
fn test_restore_idempotent() {
    let (dir, _, store) = setup();
    store.set(dir.path(), &classify("folder-music")).unwrap();

    store.restore(dir.path()).unwrap();
    let first = store.get(dir.path()).unwrap();
    store.restore(dir.path()).unwrap();
    let second = store.get(dir.path()).unwrap();

    assert_eq!(first, second);
    assert!(!second.is_customized());
    assert_eq!(second.symbolic_icon, None);
    assert_eq!(second.effective_icon(), IconIdentifier::Named("folder".into()));
}

#[test]
fn test_restore_untouched_directory() {
    let (dir, _, store) = setup();
    store.restore(dir.path()).unwrap();
    assert_eq!(
        store.get(dir.path()).unwrap().effective_icon(),
        IconIdentifier::Named("folder".into())
    );
}

#[test]
fn test_symbolic_companion() {
    let (dir, _, store) = setup();

    store.set(dir.path(), &classify("folder-music")).unwrap();
    let record = store.get(dir.path()).unwrap();
    assert_eq!(record.symbolic_icon.as_deref(), Some("folder-music-symbolic"));

    store.set(dir.path(), &classify("folder-xyz")).unwrap();
    assert_eq!(store.get(dir.path()).unwrap().symbolic_icon, None);

    store.set(dir.path(), &classify("folder-music")).unwrap();
    store.set(dir.path(), &classify("/img/a.svg")).unwrap();
    assert_eq!(store.get(dir.path()).unwrap().symbolic_icon, None);
}

#[test]
fn test_path_icon_then_restore() {
    let (dir, backend, store) = setup();
    backend.set_standard_icon(dir.path(), "folder");

    store.set(dir.path(), &IconIdentifier::PathRef("/img/a.svg".into())).unwrap();
    assert_eq!(
        store.get(dir.path()).unwrap().effective_icon(),
        IconIdentifier::PathRef("/img/a.svg".into())
    );

    store.restore(dir.path()).unwrap();
    assert_eq!(
        store.get(dir.path()).unwrap().effective_icon(),
        IconIdentifier::Named("folder".into())
    );
    for key in [CUSTOM_ICON, CUSTOM_ICON_NAME, SYMBOLIC_ICON] {
        assert!(!backend.attributes(dir.path()).contains(key));
    }
}

#[test]
fn test_missing_directory() {
    let (_, _, store) = setup();
    let missing = Path::new("/nonexistent/folder-icons");

    assert_eq!(store.get(missing).unwrap_err().kind(), ErrorKind::NotFound);
    let err = store.set(missing, &classify("folder")).unwrap_err();
    assert!(matches!(err, MetadataError::NotFound { .. }));
    assert_eq!(
        store.effective_icon_or_default(missing),
        IconIdentifier::Named("folder".into())
    );
}

#[test]
fn test_batch_continues_after_failure() {
    let root = tempfile::tempdir().unwrap();
    let dirs: Vec<PathBuf> = ["a", "b", "c"]
        .iter()
        .map(|name| {
            let dir = root.path().join(name);
            std::fs::create_dir(&dir).unwrap();
            dir
        })
        .collect();

    let backend = Arc::new(MemoryBackend::new().require_existing());
    backend.mark_unsupported(&dirs[1]);
    let store = FolderIconStore::new(backend.clone(), theme());

    let results = store.set_many(&dirs, &classify("folder-videos"));
    assert_eq!(results.len(), 3);
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].1.as_ref().unwrap_err().kind(), ErrorKind::Unsupported);
    assert!(results[2].1.is_ok());
    assert_eq!(
        store.get(&dirs[2]).unwrap().effective_icon(),
        IconIdentifier::Named("folder-videos".into())
    );

    let restored = store.restore_many(&dirs);
    assert_eq!(restored.iter().filter(|(_, r)| r.is_ok()).count(), 2);
    assert!(!store.get(&dirs[0]).unwrap().is_customized());
}
