use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use nova_typeref::{
    AnalysisConfig, ConformanceComputer, FunctionTypeConversion, Owner, TypeStore, TypeUniverse,
};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct LogBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            bytes: self.bytes.clone(),
        }
    }
}

struct LogBufferWriter {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(buffer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buffer.text()
}

#[test]
fn ambiguous_conversions_are_logged() {
    let store = TypeStore::with_minimal_jdk();
    let logs = capture(|| {
        let owner = Owner::new(&store);
        let map = owner.raw(store.type_id("java.util.Map").unwrap()).unwrap();
        assert_eq!(FunctionTypeConversion::new(&owner).to_function_shape(&map), None);
    });
    assert!(logs.contains("ambiguous function type conversion"), "{logs}");
    assert!(logs.contains("nova.typeref"), "{logs}");
}

#[test]
fn recursion_limit_is_reported_as_a_warning() {
    let store = TypeStore::with_minimal_jdk();
    let logs = capture(|| {
        let config = AnalysisConfig {
            max_depth: 1,
            ..AnalysisConfig::default()
        };
        let owner = Owner::with_config(&store, config);
        let list = store.type_id("java.util.List").unwrap();
        let nested = |leaf: &str| {
            let leaf = owner.raw(store.type_id(leaf).unwrap()).unwrap();
            let inner = owner.class_ref(list, vec![leaf]).unwrap();
            owner.class_ref(list, vec![inner]).unwrap()
        };
        let target = nested("java.lang.String");
        let source = nested("java.lang.Integer");
        assert!(ConformanceComputer::new(&owner).is_conformant(&target, &source));
    });
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("conformance check exceeded the recursion limit"), "{logs}");
}

#[test]
fn rejected_conformance_is_traced_with_both_types() {
    let store = TypeStore::with_minimal_jdk();
    let logs = capture(|| {
        let owner = Owner::new(&store);
        let runnable = owner
            .raw(store.type_id("java.lang.Runnable").unwrap())
            .unwrap();
        let string = owner.raw(store.well_known().string).unwrap();
        assert!(!ConformanceComputer::new(&owner).is_conformant(&runnable, &string));
    });
    assert!(logs.contains("not conformant"), "{logs}");
    assert!(logs.contains("expected=Runnable"), "{logs}");
    assert!(logs.contains("actual=String"), "{logs}");
}
