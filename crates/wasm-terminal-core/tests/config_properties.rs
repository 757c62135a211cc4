//! Property-based tests for terminal configuration.
//!
//! Uses proptest to generate records and verify construction invariants.

use proptest::prelude::*;
use std::sync::Arc;

use wasm_terminal_core::{
    resolver_fn, Error, FetchedCommand, MemoryFs, SharedResolver, TerminalConfig,
    TerminalConfigRecord, VirtualFs,
};

fn any_resolver() -> SharedResolver {
    resolver_fn(|_request| async { Ok(FetchedCommand::Binary(Vec::new())) })
}

/// Generate an optional worker endpoint.
fn worker_endpoint() -> impl Strategy<Value = Option<String>> {
    prop::option::of("https://[a-z]{1,12}\\.example/[a-z]{1,8}\\.js")
}

/// Generate an optional pre-populated filesystem: the files it should hold.
fn filesystem_files() -> impl Strategy<Value = Option<Vec<(String, Vec<u8>)>>> {
    prop::option::of(prop::collection::vec(
        ("/[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..16)),
        0..4,
    ))
}

fn build_fs(files: &[(String, Vec<u8>)]) -> Arc<MemoryFs> {
    let fs = Arc::new(MemoryFs::new());
    for (path, contents) in files {
        fs.write_file(path, contents).unwrap();
    }
    fs
}

proptest! {
    /// Records without a resolver never construct.
    #[test]
    fn missing_resolver_always_fails(
        endpoint in worker_endpoint(),
        files in filesystem_files(),
    ) {
        let record = TerminalConfigRecord {
            command_resolver: None,
            worker_endpoint: endpoint,
            filesystem: files.map(|f| build_fs(&f) as Arc<dyn VirtualFs>),
        };
        let result = TerminalConfig::new(Some(record));
        prop_assert!(matches!(result, Err(Error::MissingCommandResolver)));
    }

    /// A supplied filesystem is passed through by reference.
    #[test]
    fn supplied_filesystem_is_identical(
        endpoint in worker_endpoint(),
        files in prop::collection::vec(("/[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..16)), 0..4),
    ) {
        let fs: Arc<dyn VirtualFs> = build_fs(&files);
        let record = TerminalConfigRecord {
            command_resolver: Some(any_resolver()),
            worker_endpoint: endpoint,
            filesystem: Some(Arc::clone(&fs)),
        };
        let config = TerminalConfig::new(Some(record)).unwrap();
        prop_assert!(Arc::ptr_eq(config.filesystem(), &fs));
        prop_assert_eq!(config.fs().list(), fs.list());
    }

    /// Without a filesystem, every config gets its own empty one.
    #[test]
    fn default_filesystem_is_fresh(endpoint in worker_endpoint()) {
        let record = TerminalConfigRecord {
            command_resolver: Some(any_resolver()),
            worker_endpoint: endpoint.clone(),
            filesystem: None,
        };
        let first = TerminalConfig::from_record(&record).unwrap();
        let second = TerminalConfig::from_record(&record).unwrap();

        prop_assert!(first.fs().list().is_empty());
        prop_assert!(!Arc::ptr_eq(first.filesystem(), second.filesystem()));
        prop_assert_eq!(first.worker_endpoint(), endpoint.as_deref());
        prop_assert_eq!(first.supports_process_workers(), endpoint.is_some());
    }

    /// Construction leaves the caller's record as it was.
    #[test]
    fn construction_does_not_mutate_record(
        has_resolver in any::<bool>(),
        endpoint in worker_endpoint(),
        files in filesystem_files(),
    ) {
        let resolver = any_resolver();
        let fs = files.map(|f| build_fs(&f) as Arc<dyn VirtualFs>);
        let record = TerminalConfigRecord {
            command_resolver: has_resolver.then(|| Arc::clone(&resolver)),
            worker_endpoint: endpoint.clone(),
            filesystem: fs.clone(),
        };

        let _ = TerminalConfig::from_record(&record);

        prop_assert_eq!(record.command_resolver.is_some(), has_resolver);
        if let Some(kept) = &record.command_resolver {
            prop_assert!(Arc::ptr_eq(kept, &resolver));
        }
        prop_assert_eq!(&record.worker_endpoint, &endpoint);
        match (&record.filesystem, &fs) {
            (Some(kept), Some(original)) => prop_assert!(Arc::ptr_eq(kept, original)),
            (None, None) => {}
            _ => prop_assert!(false, "filesystem presence changed"),
        }
    }
}

#[test]
fn absent_record_fails_with_missing_config() {
    assert!(matches!(
        TerminalConfig::new(None),
        Err(Error::MissingConfig)
    ));
}

#[test]
fn resolver_only_record_uses_defaults() {
    let resolver = any_resolver();
    let config = TerminalConfig::new(Some(
        TerminalConfigRecord::new().command_resolver(Arc::clone(&resolver)),
    ))
    .unwrap();

    assert!(Arc::ptr_eq(config.command_resolver(), &resolver));
    assert_eq!(config.worker_endpoint(), None);
    assert!(config.fs().list().is_empty());
}
