// Binder tests against a recording route group

use conroute::engine::path::join_paths;
use conroute::{
    bind, handler_fn, BindError, Context, FieldEntry, FileSystem, HandlerFunc, HandlersChain, InvocationError,
    MethodEntry, RegisterError, RouteGroup, Routable, StaticArgs, StaticRoute, Verb,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

/// Records every call; refuses the paths listed in `refuse`
struct Recorder {
    base: String,
    log: Log,
    refuse: Rc<Vec<&'static str>>,
}

impl Recorder {
    fn new() -> (Self, Log) {
        Self::refusing(Vec::new())
    }

    fn refusing(refuse: Vec<&'static str>) -> (Self, Log) {
        let log = Log::default();
        let recorder = Self {
            base: "/".to_string(),
            log: Rc::clone(&log),
            refuse: Rc::new(refuse),
        };
        (recorder, log)
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl RouteGroup for Recorder {
    fn base_path(&self) -> &str {
        &self.base
    }

    fn group(&self, relative: &str) -> Box<dyn RouteGroup> {
        let base = join_paths(&self.base, relative);
        self.record(format!("group {base}"));
        Box::new(Recorder {
            base,
            log: Rc::clone(&self.log),
            refuse: Rc::clone(&self.refuse),
        })
    }

    fn use_handlers(&mut self, handlers: HandlersChain) {
        self.record(format!("use {} x{}", self.base, handlers.len()));
    }

    fn handle(&mut self, verb: Verb, relative: &str, _handler: HandlerFunc) -> Result<(), RegisterError> {
        let path = join_paths(&self.base, relative);
        if self.refuse.contains(&path.as_str()) {
            return Err(RegisterError::Duplicate {
                method: verb.to_string(),
                path,
            });
        }
        self.record(format!("{verb} {path}"));
        Ok(())
    }

    fn register_static(&mut self, route: StaticRoute) -> Result<(), RegisterError> {
        let path = join_paths(&self.base, route.mount());
        self.record(format!("{} {path}", route.kind()));
        Ok(())
    }
}

fn noop() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |_c: &mut Context| {}
}

/// Hand-written table
struct Table {
    methods: fn() -> Vec<MethodEntry>,
    fields: Vec<(&'static str, Option<&'static str>, bool, Table)>,
}

impl Table {
    fn leaf(methods: fn() -> Vec<MethodEntry>) -> Self {
        Self {
            methods,
            fields: Vec::new(),
        }
    }
}

impl Routable for Table {
    fn methods(&self) -> Vec<MethodEntry> {
        (self.methods)()
    }

    fn fields(&self) -> Vec<FieldEntry<'_>> {
        self.fields
            .iter()
            .map(|(name, tag, embedded, value)| FieldEntry {
                name: *name,
                type_name: "Table",
                tag: *tag,
                embedded: *embedded,
                value,
            })
            .collect()
    }
}

#[test]
fn test_use_runs_before_other_methods() {
    let table = Table::leaf(|| {
        vec![
            MethodEntry::handler("GetPing", noop()),
            MethodEntry::handler("Use", noop()),
            MethodEntry::handler("PostUser_1id", noop()),
        ]
    });

    let (mut group, log) = Recorder::new();
    bind(&mut group, &table).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["use / x1", "GET /ping", "POST /user/:id"]
    );
}

#[test]
fn test_use_chain_and_hook() {
    let chain = Table::leaf(|| {
        vec![MethodEntry::chain("Use", || {
            vec![handler_fn(|_| {}), handler_fn(|_| {})]
        })]
    });
    let (mut group, log) = Recorder::new();
    bind(&mut group, &chain).unwrap();
    assert_eq!(*log.borrow(), vec!["use / x2"]);

    let hook = Table::leaf(|| {
        vec![MethodEntry::hook("Use", |g: &mut dyn RouteGroup| {
            g.handle(Verb::Get, "/manual", handler_fn(|_| {})).unwrap();
        })]
    });
    let (mut group, log) = Recorder::new();
    bind(&mut group, &hook).unwrap();
    assert_eq!(*log.borrow(), vec!["GET /manual"]);
}

#[test]
fn test_use_with_unsupported_shape_is_ignored() {
    let table = Table::leaf(|| {
        vec![
            MethodEntry::opaque("Use"),
            MethodEntry::handler("GetPing", noop()),
        ]
    });

    let (mut group, log) = Recorder::new();
    bind(&mut group, &table).unwrap();
    assert_eq!(*log.borrow(), vec!["GET /ping"]);
}

#[test]
fn test_non_action_methods_are_skipped() {
    let table = Table::leaf(|| {
        vec![
            MethodEntry::opaque("Helper"),
            MethodEntry::opaque("Get"),
            MethodEntry::handler("GetPing", noop()),
        ]
    });

    let (mut group, log) = Recorder::new();
    bind(&mut group, &table).unwrap();
    assert_eq!(*log.borrow(), vec!["GET /ping"]);
}

#[test]
fn test_first_failure_stops_binding() {
    let table = Table::leaf(|| {
        vec![
            MethodEntry::handler("GetA", noop()),
            MethodEntry::handler("GetB", noop()),
            MethodEntry::handler("GetC", noop()),
            MethodEntry::handler("GetD", noop()),
            MethodEntry::handler("GetE", noop()),
        ]
    });

    let (mut group, log) = Recorder::refusing(vec!["/c"]);
    let err = bind(&mut group, &table).unwrap_err();

    assert_eq!(err.method(), "GetC");
    assert!(matches!(
        err,
        BindError::Registration {
            source: RegisterError::Duplicate { .. },
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "method \"GetC\" error: handler for GET \"/c\" is already registered"
    );
    assert_eq!(*log.borrow(), vec!["GET /a", "GET /b"]);
}

#[test]
fn test_signature_mismatch() {
    let table = Table::leaf(|| vec![MethodEntry::thunk("GetPing", || ("/a", "b"))]);
    let (mut group, _) = Recorder::new();
    let err = bind(&mut group, &table).unwrap_err();
    assert!(matches!(
        err,
        BindError::Registration {
            source: RegisterError::Signature { .. },
            ..
        }
    ));

    let table = Table::leaf(|| vec![MethodEntry::handler("StaticFileIcon", noop())]);
    let (mut group, _) = Recorder::new();
    let err = bind(&mut group, &table).unwrap_err();
    assert_eq!(err.method(), "StaticFileIcon");
}

#[test]
fn test_static_argument_mismatch() {
    let table = Table::leaf(|| {
        vec![MethodEntry::thunk("StaticFSPublic", || ("/public", "./public"))]
    });
    let (mut group, log) = Recorder::new();

    let err = bind(&mut group, &table).unwrap_err();
    assert!(matches!(
        err,
        BindError::Registration {
            source: RegisterError::Signature { .. },
            ..
        }
    ));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_static_invocation_failure() {
    let table = Table::leaf(|| {
        vec![
            MethodEntry::handler("GetPing", noop()),
            MethodEntry::thunk("StaticFSAssets", || {
                Err::<StaticArgs, _>(InvocationError("asset root missing".into()))
            }),
        ]
    });
    let (mut group, log) = Recorder::new();

    let err = bind(&mut group, &table).unwrap_err();
    assert!(matches!(err, BindError::Invocation { .. }));
    assert_eq!(err.to_string(), "method \"StaticFSAssets\" error: asset root missing");
    assert_eq!(*log.borrow(), vec!["GET /ping"]);
}

#[test]
fn test_static_kinds() {
    let table = Table::leaf(|| {
        vec![
            MethodEntry::thunk("StaticFileIcon", || ("/favicon.ico", "./favicon.ico")),
            MethodEntry::thunk("StaticAssets", || ("/assets", "./assets")),
            MethodEntry::thunk("StaticFSPublic", || ("/public", FileSystem::dir("./public"))),
            MethodEntry::thunk("StaticFileFSRobots", || {
                ("/robots.txt", "robots.txt", FileSystem::dir("./public"))
            }),
        ]
    });
    let (mut group, log) = Recorder::new();
    bind(&mut group, &table).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "StaticFile /favicon.ico",
            "Static /assets",
            "StaticFS /public",
            "StaticFileFS /robots.txt",
        ]
    );
}

#[test]
fn test_field_groups() {
    let root = Table {
        methods: Vec::new,
        fields: vec![
            ("Embedded", None, true, Table::leaf(|| vec![MethodEntry::handler("GetA", noop())])),
            ("UserApi", None, false, Table::leaf(|| vec![MethodEntry::handler("GetB", noop())])),
            ("admin", Some("admin"), false, Table::leaf(|| vec![MethodEntry::handler("GetC", noop())])),
            ("hidden", Some("-"), false, Table::leaf(|| vec![MethodEntry::handler("GetD", noop())])),
        ],
    };

    let (mut group, log) = Recorder::new();
    bind(&mut group, &root).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "GET /a",
            "group /user/api",
            "GET /user/api/b",
            "group /admin",
            "GET /admin/c",
        ]
    );
}

#[test]
fn test_promoted_methods_bind_at_their_own_level() {
    // Outer exposes Inner's method as promoted; only the walk into the
    // embedded field registers it
    let root = Table {
        methods: || vec![MethodEntry::handler("GetInner", noop()).promoted()],
        fields: vec![(
            "Inner",
            None,
            true,
            Table::leaf(|| vec![MethodEntry::handler("GetInner", noop())]),
        )],
    };

    let (mut group, log) = Recorder::new();
    bind(&mut group, &root).unwrap();
    assert_eq!(*log.borrow(), vec!["GET /inner"]);
}

#[test]
fn test_failure_in_nested_field_keeps_earlier_routes() {
    let root = Table {
        methods: || vec![MethodEntry::handler("GetTop", noop())],
        fields: vec![(
            "api",
            Some("api"),
            false,
            Table::leaf(|| {
                vec![
                    MethodEntry::handler("GetOne", noop()),
                    MethodEntry::handler("GetTwo", noop()),
                ]
            }),
        )],
    };

    let (mut group, log) = Recorder::refusing(vec!["/api/two"]);
    let err = bind(&mut group, &root).unwrap_err();
    assert_eq!(err.method(), "GetTwo");
    assert_eq!(*log.borrow(), vec!["GET /top", "group /api", "GET /api/one"]);
}

/// One untagged, non-embedded field with explicit field and type names
struct Named {
    field: &'static str,
    type_name: &'static str,
    inner: Table,
}

impl Routable for Named {
    fn methods(&self) -> Vec<MethodEntry> {
        Vec::new()
    }

    fn fields(&self) -> Vec<FieldEntry<'_>> {
        vec![FieldEntry {
            name: self.field,
            type_name: self.type_name,
            tag: None,
            embedded: false,
            value: &self.inner,
        }]
    }
}

#[test]
fn test_field_named_after_its_type_shares_the_group() {
    let outer = Named {
        field: "Inner",
        type_name: "Inner",
        inner: Table::leaf(|| vec![MethodEntry::handler("GetPing", noop())]),
    };

    let (mut group, log) = Recorder::new();
    bind(&mut group, &outer).unwrap();
    assert_eq!(*log.borrow(), vec!["GET /ping"]);
}

#[test]
fn test_field_named_apart_from_its_type_gets_a_group() {
    let outer = Named {
        field: "Inner",
        type_name: "Other",
        inner: Table::leaf(|| vec![MethodEntry::handler("GetPing", noop())]),
    };

    let (mut group, log) = Recorder::new();
    bind(&mut group, &outer).unwrap();
    assert_eq!(*log.borrow(), vec!["group /inner", "GET /inner/ping"]);
}
